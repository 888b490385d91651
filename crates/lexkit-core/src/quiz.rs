//! Quiz file formats.
//!
//! The quiz program reads two layouts, both starting with a `0` count line:
//!
//! - CQZ: `0<TAB>question<TAB>answer` rows.
//! - JQZ: `question;answer;value` rows.
//!
//! Functions here build file contents in memory; [`write_quiz_files`] puts
//! a batch of them on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::QuizError;
use crate::lexicon::{Definitions, HookEntry};

/// Count line every quiz file starts with.
pub const HEADER: &str = "0";

/// Answer shown after the final word of an ordered list.
pub const LAST_WORD: &str = "LAST WORD";

/// Windowed quiz files cover at most this many lines.
const WINDOW_SPAN: usize = 2000;
/// Windowed quiz files grow by this many lines at a time.
const WINDOW_STEP: usize = 100;

/// A quiz file to be written: a bare file name and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizFile {
    pub name: String,
    pub contents: String,
}

impl QuizFile {
    fn jqz(name: String, lines: &[String]) -> Self {
        let mut contents = format!("{HEADER}\n");
        for line in lines {
            contents.push_str(line);
            contents.push('\n');
        }
        Self { name, contents }
    }
}

/// Write each file into `dir`, creating it if needed.
pub fn write_quiz_files(dir: &Path, files: &[QuizFile]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;
    files
        .iter()
        .map(|file| {
            let path = dir.join(&file.name);
            std::fs::write(&path, &file.contents)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

/// Convert two-column TSV text to CQZ.
pub fn tsv_to_cqz(text: &str) -> Result<String, QuizError> {
    let mut out = format!("{HEADER}\n");
    for line in text.lines() {
        if line.matches('\t').count() != 1 {
            return Err(QuizError::MalformedRow(line.trim().to_string()));
        }
        let (question, answer) = line
            .trim()
            .split_once('\t')
            .ok_or_else(|| QuizError::MalformedRow(line.trim().to_string()))?;
        out.push_str(&format!("0\t{question}\t{answer}\n"));
    }
    Ok(out)
}

/// Path of the CQZ file produced from a TSV input.
pub fn cqz_path(tsv: &Path) -> PathBuf {
    tsv.with_extension("cqz")
}

/// An order-memory quiz: each word's answer is the word after it.
pub fn order_quiz(words: &[String]) -> Result<String, QuizError> {
    let (first, last) = match (words.first(), words.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(QuizError::EmptyWordList),
    };
    let mut out = format!("{HEADER}\n*;{first};0\n");
    for pair in words.windows(2) {
        out.push_str(&format!("{};{};0\n", pair[0], pair[1]));
    }
    out.push_str(&format!("{last};-;0\n"));
    Ok(out)
}

/// An order-memory quiz with definitions and hooks.
///
/// Words are ordered alphabetically within their length; each question
/// shows the word's hooks and definition followed by the next word's.
pub fn definitions_quiz(entries: &[HookEntry], quiz_words: &[String]) -> Result<String, QuizError> {
    let answers: HashMap<&str, String> = entries
        .iter()
        .map(|e| {
            (
                e.word.as_str(),
                format!(
                    "{}/{}/{}<br>{}",
                    e.front_hooks, e.word_with_inner_hooks, e.back_hooks, e.definition
                ),
            )
        })
        .collect();

    let mut by_length: HashMap<usize, Vec<&str>> = HashMap::new();
    for entry in entries {
        by_length
            .entry(entry.word.chars().count())
            .or_default()
            .push(entry.word.as_str());
    }
    let mut next_words: HashMap<&str, Option<&str>> = HashMap::new();
    for list in by_length.values_mut() {
        list.sort_unstable();
        for (i, word) in list.iter().enumerate() {
            next_words.insert(*word, list.get(i + 1).copied());
        }
    }

    let mut out = format!("{HEADER}\n");
    for word in quiz_words {
        let word = word.trim().to_uppercase();
        let answer = answers
            .get(word.as_str())
            .ok_or_else(|| QuizError::UnknownWord(word.clone()))?;
        let next = next_words
            .get(word.as_str())
            .ok_or_else(|| QuizError::UnknownWord(word.clone()))?;
        let next_answer = match next {
            Some(next) => answers[next].as_str(),
            None => LAST_WORD,
        };
        out.push_str(&format!("{word};{answer}<br>***<br>{next_answer};0\n"));
    }
    Ok(out)
}

/// Result of attaching definitions to an order-memory file.
#[derive(Debug, Clone, Default)]
pub struct OrderDefinitions {
    pub contents: String,
    /// Word pairs left unchanged because a definition was missing.
    pub missing: Vec<(String, String)>,
}

/// Attach definitions to both sides of every `w1;w2;value` line.
///
/// The first line is replaced with the count line. Semicolons are removed
/// from definitions so they cannot break the layout.
pub fn add_order_definitions(defs: &Definitions, text: &str) -> Result<OrderDefinitions, QuizError> {
    let mut result = OrderDefinitions {
        contents: format!("{HEADER}\n"),
        missing: Vec::new(),
    };
    for line in text.lines().skip(1) {
        let line = line.trim();
        let [w1, w2, value] = line.split(';').collect::<Vec<_>>()[..] else {
            return Err(QuizError::WrongFieldCount(line.to_string()));
        };
        match (defs.get(&w1.to_uppercase()), defs.get(&w2.to_uppercase())) {
            (Some(d1), Some(d2)) => {
                let d1 = d1.replace(';', "");
                let d2 = d2.replace(';', "");
                result
                    .contents
                    .push_str(&format!("{w1}<br>{d1};{w2}<br>{d2};{value}\n"));
            }
            _ => {
                tracing::warn!("word(s) not in dictionary: {w1},{w2}");
                result.missing.push((w1.to_string(), w2.to_string()));
                result.contents.push_str(line);
                result.contents.push('\n');
            }
        }
    }
    Ok(result)
}

/// Sort JQZ question lines by the playability of their question word,
/// highest first. Words without a playability value sort ahead of all
/// others. The count line is dropped.
pub fn reorder_by_playability(
    text: &str,
    playability: &HashMap<String, f64>,
) -> Result<Vec<String>, QuizError> {
    let mut ranked = Vec::new();
    for line in text.lines().skip(1) {
        let parts: Vec<&str> = line.trim().split(';').collect();
        if parts.len() != 3 {
            return Err(QuizError::WrongFieldCount(line.to_string()));
        }
        let rank = playability.get(parts[0]).copied().unwrap_or(f64::INFINITY);
        ranked.push((rank, line.to_string()));
    }
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    Ok(ranked.into_iter().map(|(_, line)| line).collect())
}

/// Split ordered lines into growing windows: every 100 lines, a file with
/// the most recent (up to) 2000 lines, plus one file with everything.
pub fn playability_windows(base: &str, lines: &[String]) -> Vec<QuizFile> {
    let mut files = Vec::new();
    for end in (WINDOW_STEP..=lines.len()).step_by(WINDOW_STEP) {
        let start = end.saturating_sub(WINDOW_SPAN);
        files.push(QuizFile::jqz(
            format!("{base}_{start}_to_{end}.jqz"),
            &lines[start..end],
        ));
    }
    files.push(QuizFile::jqz(format!("{base}_all.jqz"), lines));
    files
}

/// Split a JQZ file into consecutive quizzes of `size` questions.
pub fn segment_quiz(stem: &str, text: &str, size: usize) -> Result<Vec<QuizFile>, QuizError> {
    if size == 0 {
        return Err(QuizError::ZeroSize("quiz size"));
    }
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    if lines.first().is_some_and(|l| l.trim() == HEADER) {
        lines.remove(0);
    }
    Ok(lines
        .chunks(size)
        .enumerate()
        .map(|(i, chunk)| QuizFile::jqz(format!("{stem}_{}.jqz", i + 1), chunk))
        .collect())
}

/// Cumulative prefixes of a file: the i-th output holds the first `i*n + 1`
/// lines (the count line plus `i*n` questions), and a final output holds
/// every line.
pub fn cumulative_splits(name: &str, text: &str, n: usize) -> Result<Vec<QuizFile>, QuizError> {
    if n == 0 {
        return Err(QuizError::ZeroSize("increment"));
    }
    let lines: Vec<&str> = text.lines().collect();
    let total = lines.len();
    let render = |count: usize| {
        let mut contents = lines[..count].join("\n");
        contents.push('\n');
        contents
    };

    let mut files = Vec::new();
    let mut i = 1;
    while i * n < total {
        files.push(QuizFile {
            name: format!("{name}_{i}.txt"),
            contents: render(i * n + 1),
        });
        i += 1;
    }
    if total > 0 {
        files.push(QuizFile {
            name: format!("{name}_{i}.txt"),
            contents: render(total),
        });
    }
    Ok(files)
}

/// Shuffle anagram groups and cut them into overlapping batches.
///
/// Batches start every `increment` groups and hold up to `size` groups.
/// Each batch file lists its groups' words one per line.
pub fn anagram_batches<R: Rng + ?Sized>(
    mut groups: Vec<(String, Vec<String>)>,
    size: usize,
    increment: usize,
    rng: &mut R,
) -> Result<Vec<QuizFile>, QuizError> {
    if size == 0 {
        return Err(QuizError::ZeroSize("batch size"));
    }
    if increment == 0 {
        return Err(QuizError::ZeroSize("batch increment"));
    }
    groups.shuffle(rng);

    let mut files = Vec::new();
    for start in (0..groups.len()).step_by(increment) {
        let end = (start + size).min(groups.len());
        let mut contents = String::new();
        for (_, words) in &groups[start..end] {
            contents.push_str(&words.join("\n"));
            contents.push('\n');
        }
        files.push(QuizFile {
            name: format!("{start}_to_{end}.txt"),
            contents,
        });
    }
    Ok(files)
}
