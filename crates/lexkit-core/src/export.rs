//! Printable word-list exports: JavaScript arrays for web flashcards and
//! LaTeX tables for paper study sheets.

use itertools::Itertools;

/// LaTeX table columns per page.
pub const LATEX_COLUMNS: usize = 12;
/// LaTeX table rows per page.
pub const LATEX_ROWS: usize = 62;

const BLANK_CELL: &str = "     ";

const LATEX_PREAMBLE: &str = "\\documentclass{article}

\\usepackage{tabularx}
\\usepackage[margin=0.1in,voffset=-0.2in,footskip=0.0in]{geometry}
\\usepackage[sfdefault,medium]{inter}
\\usepackage[T1]{fontenc}

\\begin{document}
\\pagestyle{empty}
\\noindent
";

/// `var words = [...]` with one inner array per list.
pub fn javascript_word_arrays<S: AsRef<str>>(lists: &[Vec<S>]) -> String {
    let arrays = lists
        .iter()
        .map(|words| format!("[{}]", words.iter().map(|w| format!("\"{}\"", w.as_ref())).join(", ")))
        .join(",\n");
    format!("var words = [\n{arrays}];")
}

/// A LaTeX document laying `words` out in pages of `columns x rows`
/// tables, filled column by column.
pub fn latex_word_tables<S: AsRef<str>>(words: &[S], columns: usize, rows: usize) -> String {
    let per_page = columns * rows;
    let mut body = String::new();
    if per_page > 0 {
        for page in words.chunks(per_page) {
            body.push_str(&latex_table(page, columns, rows));
        }
    }
    format!("{LATEX_PREAMBLE}{body}\n\\end{{document}}")
}

fn latex_table<S: AsRef<str>>(page: &[S], columns: usize, rows: usize) -> String {
    let mut cells = String::new();
    for row in 0..rows {
        let line = (0..columns)
            .map(|col| page.get(col * rows + row).map_or(BLANK_CELL, |w| w.as_ref()))
            .join(" & ");
        cells.push_str(&line);
        cells.push_str(" \\\\\n");
    }
    format!(
        "\\begin{{table}}[!htbp]\n\\begin{{tabularx}}{{\\linewidth}}{{{}}}\n{cells}\\end{{tabularx}}\n\\end{{table}}",
        "X".repeat(columns)
    )
}
