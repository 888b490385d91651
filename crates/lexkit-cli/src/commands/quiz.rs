//! The `lexkit quiz` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use lexkit_core::lexicon::{load_definitions, load_hook_lexicon, load_playability, load_word_list};
use lexkit_core::quiz::{
    add_order_definitions, anagram_batches, cqz_path, cumulative_splits, definitions_quiz, order_quiz,
    playability_windows, reorder_by_playability, segment_quiz, tsv_to_cqz, write_quiz_files,
};
use lexkit_core::AnagramGroups;
use lexkit_remote::SheetsClient;

#[derive(Subcommand)]
pub enum QuizCommand {
    /// Convert a two-column TSV into a CQZ quiz
    Cqz {
        /// TSV file (written first when --sheet-id is given)
        tsv: PathBuf,

        /// Download the TSV from this spreadsheet before converting
        #[arg(long)]
        sheet_id: Option<String>,

        /// Copy the finished quiz into this directory
        #[arg(long)]
        copy_to: Option<PathBuf>,
    },

    /// Build an order-memory quiz from a word list
    Order {
        word_list: PathBuf,
    },

    /// Build a definitions quiz from a hook lexicon
    Defs {
        /// Lexicon with front hooks, back hooks, inner hooks, and definitions
        lexicon: PathBuf,

        /// Quiz words, one per line
        words: PathBuf,
    },

    /// Add definitions to an order-memory quiz
    OrderDefs {
        /// Definitions file (WORD<TAB>definition)
        dictionary: PathBuf,
        input: PathBuf,
        output: PathBuf,
    },

    /// Reorder a JQZ quiz by playability and write windowed quizzes
    Playability {
        jqz: PathBuf,

        /// Playability file (SCORE WORD per line)
        playab: PathBuf,

        /// Base name for the output quizzes
        base: String,

        output_dir: PathBuf,
    },

    /// Split a quiz into fixed-size quizzes
    Segment {
        file: PathBuf,

        /// Questions per quiz
        size: usize,
    },

    /// Write cumulative prefixes of a quiz file
    Split {
        input: PathBuf,

        /// Lines added per file
        n: usize,
    },

    /// Shuffle anagram groups into overlapping batch files
    Batches {
        word_list: PathBuf,

        /// Groups per batch
        size: usize,

        /// Groups between batch starts
        increment: usize,

        directory: PathBuf,

        /// Minimum word length to include
        #[arg(long, default_value = "0")]
        min: usize,

        /// Maximum word length to include
        #[arg(long)]
        max: Option<usize>,

        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub async fn execute(command: QuizCommand, config: Option<PathBuf>) -> Result<()> {
    match command {
        QuizCommand::Cqz {
            tsv,
            sheet_id,
            copy_to,
        } => cqz(tsv, sheet_id, copy_to, config).await,
        QuizCommand::Order { word_list } => {
            let words = load_word_list(&word_list)?;
            print!("{}", order_quiz(&words)?);
            Ok(())
        }
        QuizCommand::Defs { lexicon, words } => {
            let entries = load_hook_lexicon(&lexicon)?;
            let quiz_words = load_word_list(&words)?;
            print!("{}", definitions_quiz(&entries, &quiz_words)?);
            Ok(())
        }
        QuizCommand::OrderDefs {
            dictionary,
            input,
            output,
        } => {
            let defs = load_definitions(&dictionary)?;
            let text = read(&input)?;
            let result = add_order_definitions(&defs, &text)?;
            for (w1, w2) in &result.missing {
                println!("word(s) not in dict: {w1},{w2}");
            }
            std::fs::write(&output, result.contents)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Wrote {}", output.display());
            Ok(())
        }
        QuizCommand::Playability {
            jqz,
            playab,
            base,
            output_dir,
        } => {
            let playability = load_playability(&playab)?;
            let lines = reorder_by_playability(&read(&jqz)?, &playability)?;
            let written = write_quiz_files(&output_dir, &playability_windows(&base, &lines))?;
            report(&written);
            println!("jqz file reordered successfully!");
            Ok(())
        }
        QuizCommand::Segment { file, size } => {
            let stem = file
                .file_stem()
                .and_then(|s| s.to_str())
                .context("quiz file name is not valid UTF-8")?;
            let files = segment_quiz(stem, &read(&file)?, size)?;
            report(&write_quiz_files(&parent_dir(&file), &files)?);
            Ok(())
        }
        QuizCommand::Split { input, n } => {
            let name = input
                .file_name()
                .and_then(|s| s.to_str())
                .context("input file name is not valid UTF-8")?;
            let files = cumulative_splits(name, &read(&input)?, n)?;
            for (file, path) in files.iter().zip(write_quiz_files(&parent_dir(&input), &files)?) {
                println!("Created: {} with {} lines", path.display(), file.contents.lines().count());
            }
            Ok(())
        }
        QuizCommand::Batches {
            word_list,
            size,
            increment,
            directory,
            min,
            max,
            seed,
        } => {
            let words = load_word_list(&word_list)?;
            let groups = AnagramGroups::from_words_in_range(&words, min, max).into_vec();
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };
            let files = anagram_batches(groups, size, increment, &mut rng)?;
            report(&write_quiz_files(&directory, &files)?);
            Ok(())
        }
    }
}

async fn cqz(
    tsv: PathBuf,
    sheet_id: Option<String>,
    copy_to: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    if let Some(sheet_id) = sheet_id {
        let config = lexkit_remote::load_config_from(config.as_deref())?;
        let client = SheetsClient::new(&config.sheets, &config.crosstables.user_agent)?;
        let text = client
            .export_tsv(&sheet_id)
            .await
            .context("failed to download sheet")?;
        std::fs::write(&tsv, text).with_context(|| format!("failed to write {}", tsv.display()))?;
        println!("Sheet downloaded and saved as {}", tsv.display());
    }

    let quiz = tsv_to_cqz(&read(&tsv)?).with_context(|| format!("failed to convert {}", tsv.display()))?;
    let out = cqz_path(&tsv);
    std::fs::write(&out, quiz).with_context(|| format!("failed to write {}", out.display()))?;
    println!("Created {}", out.display());

    if let Some(dir) = copy_to {
        let name = out.file_name().context("quiz path has no file name")?;
        let dest = dir.join(name);
        std::fs::copy(&out, &dest)
            .with_context(|| format!("failed to copy {} to {}", out.display(), dest.display()))?;
        println!("Copied to {}", dest.display());
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn report(written: &[PathBuf]) {
    for path in written {
        println!("Created {}", path.display());
    }
}
