//! The `lexkit defs` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use lexkit_core::definitions::{load_definition_entries, longest_definitions, numeric_definitions, DEFAULT_DIGITS};
use lexkit_core::lexicon::{load_definitions, load_word_list};
use lexkit_core::update::{merge_definitions, open_definitions_from_files, parse_update_sheet};
use lexkit_remote::SheetsClient;

#[derive(Subcommand)]
pub enum DefsCommand {
    /// Print the N longest definitions
    Longest {
        /// Definitions file
        file: PathBuf,

        /// Number of definitions to print
        n: usize,

        /// Minimum word length (inclusive)
        #[arg(long, default_value = "1")]
        min: usize,

        /// Maximum word length (inclusive)
        #[arg(long)]
        max: Option<usize>,
    },

    /// Print definitions containing a standalone number, such as a year
    Numeric {
        /// Definitions file
        file: PathBuf,

        /// Digits in the number
        #[arg(long, default_value_t = DEFAULT_DIGITS)]
        digits: usize,
    },

    /// Merge crowdsourced updates and old definitions for a new word list
    Merge {
        /// New lexicon word list
        new_words: PathBuf,

        /// Previous lexicon definitions (WORD<TAB>definition)
        old_defs: PathBuf,

        /// Update sheet TSV (word in column 1, definition in column 6)
        #[arg(long, conflicts_with = "sheet_id", required_unless_present = "sheet_id")]
        updates: Option<PathBuf>,

        /// Download the update sheet from this spreadsheet instead
        #[arg(long)]
        sheet_id: Option<String>,

        #[arg(long, default_value = "merged_definitions.txt")]
        output: PathBuf,
    },

    /// List definitions to revisit after a lexicon update
    Open {
        /// Lexicon two editions back
        oldest: PathBuf,

        /// Previous lexicon
        previous: PathBuf,

        /// New lexicon
        newest: PathBuf,

        /// Directory for words_to_update.csv and new_inflections.csv
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

pub async fn execute(command: DefsCommand, config: Option<PathBuf>) -> Result<()> {
    match command {
        DefsCommand::Longest { file, n, min, max } => {
            let entries = load_definition_entries(&file)?;
            for (word, definition) in longest_definitions(&entries, n, min, max) {
                println!("{word}: {definition}");
            }
            Ok(())
        }
        DefsCommand::Numeric { file, digits } => {
            let entries = load_definition_entries(&file)?;
            let found = numeric_definitions(&entries, digits)?;
            println!("Definitions containing a {digits}-digit number:");
            for (word, definition) in found {
                println!("{word}: {definition}");
            }
            Ok(())
        }
        DefsCommand::Merge {
            new_words,
            old_defs,
            updates,
            sheet_id,
            output,
        } => {
            let sheet = match (updates, sheet_id) {
                (Some(path), _) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read update sheet: {}", path.display()))?,
                (None, Some(id)) => {
                    let config = lexkit_remote::load_config_from(config.as_deref())?;
                    SheetsClient::new(&config.sheets, &config.crosstables.user_agent)?
                        .export_tsv(&id)
                        .await
                        .context("failed to download sheet")?
                }
                (None, None) => anyhow::bail!("either --updates or --sheet-id is required"),
            };
            let updates = parse_update_sheet(&sheet)?;
            let words = load_word_list(&new_words)?;
            println!("Number of new lexicon words loaded: {}", words.len());
            let old = load_definitions(&old_defs)?;

            let merged = merge_definitions(&words, &old, &updates)?;
            if !merged.unused.is_empty() {
                println!("Unused words from old definitions:");
                for word in &merged.unused {
                    println!("{word}");
                }
            }
            std::fs::write(&output, merged.to_tsv())
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Number of rows written to {}: {}",
                output.display(),
                merged.definitions.len()
            );
            Ok(())
        }
        DefsCommand::Open {
            oldest,
            previous,
            newest,
            output_dir,
        } => {
            let report = open_definitions_from_files(&oldest, &previous, &newest)?;
            println!("Expurgated before the previous edition: {}", report.expurgated_before.len());
            println!("Expurgated in the new edition: {}", report.expurgated_now.len());
            println!("Total expurgated words: {}", report.expurgated().len());
            println!("New words: {}", report.new_words.len());
            println!("Root words to new words: {}", report.roots.len());
            println!(
                "Words with expurgated words in definitions: {}",
                report.mentions_expurgated.len()
            );
            println!("Total words to update: {}", report.entries.len());

            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("failed to create directory: {}", output_dir.display()))?;
            let update_path = output_dir.join("words_to_update.csv");
            std::fs::write(&update_path, report.to_tsv()?)
                .with_context(|| format!("failed to write {}", update_path.display()))?;
            let inflections_path = output_dir.join("new_inflections.csv");
            std::fs::write(&inflections_path, report.inflections_csv()?)
                .with_context(|| format!("failed to write {}", inflections_path.display()))?;
            println!("Wrote {} and {}", update_path.display(), inflections_path.display());
            Ok(())
        }
    }
}
