//! The `lexkit words` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Table};

use lexkit_core::bingo::build_bingo_quiz;
use lexkit_core::export::{javascript_word_arrays, latex_word_tables, LATEX_COLUMNS, LATEX_ROWS};
use lexkit_core::lexicon::{load_definitions, load_numeric_csv, load_probabilities, load_word_list};
use lexkit_core::stats::{extremes, leave_differences, probability_stats, LeaveDifference};
use lexkit_core::subanagram::subanagrams_of_all;
use lexkit_core::syllables::syllable_gain_pairs;

#[derive(Subcommand)]
pub enum WordsCommand {
    /// List every subanagram and anagram of the given words
    Subanagrams {
        /// Word list file
        word_list: PathBuf,

        /// Words to search
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Build a bingo quiz of N alphagrams
    BingoQuiz {
        /// Number of alphagrams in the quiz
        #[arg(allow_negative_numbers = true)]
        n: i64,

        /// Lexicon with definitions (WORD<TAB>definition)
        #[arg(long, default_value = "csw24.tsv")]
        defs: PathBuf,

        /// Bingos missed in play, one per line
        #[arg(long, default_value = "missed_bingos.txt")]
        missed: PathBuf,

        /// Directory for bingo_words_<N>.txt
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Find words that gain a syllable when a letter is added
    Syllables {
        /// Word list file
        word_list: PathBuf,
    },

    /// Probability statistics per word length
    ProbStats {
        /// Lexicon with probabilities (WORD N per line)
        lexicon: PathBuf,

        /// Words to summarize
        words_file: PathBuf,
    },

    /// Compare two leave-value CSV files
    LeaveDiffs {
        file1: PathBuf,
        file2: PathBuf,

        /// Number of differences to show on each side
        n: usize,

        /// Rank by absolute difference, smallest first
        #[arg(long)]
        smallest: bool,
    },

    /// Render word lists as a JavaScript array of arrays
    JsArrays {
        /// One word list per inner array
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Render a word list as LaTeX tables
    Latex {
        word_list: PathBuf,

        #[arg(long, default_value_t = LATEX_COLUMNS)]
        columns: usize,

        #[arg(long, default_value_t = LATEX_ROWS)]
        rows: usize,
    },
}

pub fn execute(command: WordsCommand) -> Result<()> {
    match command {
        WordsCommand::Subanagrams { word_list, words } => {
            let list = load_word_list(&word_list)?;
            let found = subanagrams_of_all(&words, &list);
            let found: Vec<_> = found.into_iter().collect();
            println!("Subanagrams and anagrams: {}", found.join(", "));
            Ok(())
        }
        WordsCommand::BingoQuiz {
            n,
            defs,
            missed,
            output_dir,
        } => bingo_quiz(n, defs, missed, output_dir),
        WordsCommand::Syllables { word_list } => {
            let words = load_word_list(&word_list)?;
            for pair in syllable_gain_pairs(&words) {
                println!("{pair}");
            }
            Ok(())
        }
        WordsCommand::ProbStats { lexicon, words_file } => {
            let probabilities = load_probabilities(&lexicon)?;
            let words = load_word_list(&words_file)?;
            for stats in probability_stats(&probabilities, &words)? {
                println!("Word Length: {}", stats.length);
                println!("Count: {}", stats.count);
                println!("Average Probability: {:.2}", stats.mean);
                match stats.std_dev {
                    Some(sd) => println!("Standard Deviation: {sd:.2}"),
                    None => println!("Standard Deviation: Not applicable (only one word of this length)"),
                }
                println!();
            }
            Ok(())
        }
        WordsCommand::LeaveDiffs {
            file1,
            file2,
            n,
            smallest,
        } => {
            let first = load_numeric_csv(&file1)?;
            let second = load_numeric_csv(&file2)?;
            let diffs = leave_differences(&first, &second, smallest);
            let (negative, positive) = extremes(&diffs, n);
            let (name1, name2) = (file1.display().to_string(), file2.display().to_string());

            println!("Top {n} negative differences:");
            println!("{}", differences_table(negative.iter(), &name1, &name2));
            println!("\nTop {n} positive differences:");
            println!("{}", differences_table(positive.into_iter(), &name1, &name2));
            Ok(())
        }
        WordsCommand::JsArrays { files } => {
            let lists = files
                .iter()
                .map(|f| load_word_list(f))
                .collect::<Result<Vec<_>>>()?;
            println!("{}", javascript_word_arrays(&lists));
            Ok(())
        }
        WordsCommand::Latex {
            word_list,
            columns,
            rows,
        } => {
            anyhow::ensure!(columns > 0 && rows > 0, "columns and rows must be at least 1");
            let words = load_word_list(&word_list)?;
            println!("{}", latex_word_tables(&words, columns, rows));
            Ok(())
        }
    }
}

fn bingo_quiz(n: i64, defs: PathBuf, missed: PathBuf, output_dir: PathBuf) -> Result<()> {
    let n = usize::try_from(n).map_err(|_| anyhow::anyhow!("invalid argument for N: must be a non-negative integer"))?;

    let definitions = load_definitions(&defs)?;
    if definitions.is_empty() {
        println!("No words found in '{}' to process.", defs.display());
        return Ok(());
    }
    let missed_words = load_word_list(&missed)?;

    let quiz = build_bingo_quiz(&definitions, &missed_words, n);
    println!("Generated {} tricky words.", quiz.tricky);
    println!("Generated {} new unique missed bingos.", quiz.missed);
    println!("Generated {} unique alphagrams in total.", quiz.len());
    if quiz.probable > 0 {
        println!(
            "Least probable seven is {}\nLeast probable eight is {}",
            quiz.least_probable_seven.as_deref().unwrap_or(""),
            quiz.least_probable_eight.as_deref().unwrap_or("")
        );
    }
    if quiz.len() < n {
        tracing::warn!("only {} candidates available for a quiz of {n}", quiz.len());
    }

    let path = output_dir.join(format!("bingo_words_{n}.txt"));
    std::fs::write(&path, quiz.to_file_contents())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {} words to {}", quiz.len(), path.display());
    Ok(())
}

fn differences_table<'a>(
    rows: impl Iterator<Item = &'a LeaveDifference>,
    name1: &str,
    name2: &str,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Key", name1, name2, "Difference"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.key),
            Cell::new(format!("{:.6}", row.first)),
            Cell::new(format!("{:.6}", row.second)),
            Cell::new(format!("{:.6}", row.difference)),
        ]);
    }
    table
}
