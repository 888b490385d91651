//! Tools for moving definitions from one lexicon edition to the next.
//!
//! [`merge_definitions`] builds the new edition's definitions file from the
//! previous edition plus a sheet of updates. [`open_definitions`] finds the
//! entries an editor still has to look at: new words, definitions that
//! mention expurgated words, and roots that gained new inflections.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;

use crate::error::UpdateError;
use crate::lexicon::Definitions;

static LETTER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("valid letter regex"));
static UPPERCASE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]+").expect("valid uppercase regex"));

/// Column of the update sheet holding the revised definition.
const SHEET_DEFINITION_COLUMN: usize = 5;

/// Outcome of [`merge_definitions`].
#[derive(Debug, Clone, Default)]
pub struct MergedDefinitions {
    /// Every new-edition word with its definition, sorted by word.
    pub definitions: BTreeMap<String, String>,
    /// Previous-edition words that were not carried over, sorted.
    pub unused: Vec<String>,
}

impl MergedDefinitions {
    /// Render as `word<TAB>definition` lines.
    pub fn to_tsv(&self) -> String {
        self.definitions
            .iter()
            .map(|(word, def)| format!("{word}\t{def}\n"))
            .collect()
    }
}

/// Give every word of the new edition a definition, preferring the update
/// sheet over the previous edition.
pub fn merge_definitions(
    new_words: &[String],
    old: &Definitions,
    updates: &Definitions,
) -> Result<MergedDefinitions, UpdateError> {
    let mut words: Vec<&String> = new_words.iter().collect();
    words.sort();

    let mut merged = MergedDefinitions::default();
    let mut used = HashSet::new();
    for word in words {
        let definition = updates
            .get(word)
            .or_else(|| old.get(word))
            .ok_or_else(|| UpdateError::MissingDefinition(word.clone()))?;
        merged.definitions.insert(word.clone(), definition.clone());
        used.insert(word.as_str());
    }

    merged.unused = old
        .keys()
        .filter(|w| !used.contains(w.as_str()))
        .cloned()
        .collect();
    merged.unused.sort();
    Ok(merged)
}

/// Parse the update sheet export: word in the first column, revised
/// definition in the sixth. Rows missing either are skipped. Words are
/// uppercased to match lexicon keys.
pub fn parse_update_sheet(text: &str) -> Result<Definitions> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut updates = Definitions::new();
    for record in reader.records() {
        let record = record.context("failed to read update sheet row")?;
        if record.len() <= SHEET_DEFINITION_COLUMN {
            return Err(UpdateError::TooFewColumns {
                found: record.len(),
                line: record.iter().collect::<Vec<_>>().join("\t"),
            }
            .into());
        }
        let word = record[0].trim();
        let definition = record[SHEET_DEFINITION_COLUMN].trim();
        if !word.is_empty() && !definition.is_empty() {
            updates.insert(word.to_uppercase(), definition.to_string());
        }
    }
    tracing::debug!("parsed {} updated definitions", updates.len());
    Ok(updates)
}

/// Where an entry to review came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A word new in the latest edition.
    New,
    /// A word carried over from the previous edition.
    Old,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Old => "OLD",
        }
    }
}

/// An entry whose definition should be reviewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenEntry {
    pub word: String,
    pub definition: String,
    pub source: Source,
    /// New words whose definitions point at this word.
    pub new_inflections: BTreeSet<String>,
    /// Expurgated words this definition mentions.
    pub expurgations: BTreeSet<String>,
}

/// Summary of three consecutive lexicon editions.
#[derive(Debug, Clone, Default)]
pub struct OpenDefinitions {
    /// Words in the newest edition only, in file order.
    pub new_words: Vec<String>,
    /// Words dropped between the oldest and previous edition.
    pub expurgated_before: BTreeSet<String>,
    /// Words dropped between the previous and newest edition.
    pub expurgated_now: BTreeSet<String>,
    /// Previous-edition words mapped to the expurgated words their
    /// definitions mention.
    pub mentions_expurgated: IndexMap<String, BTreeSet<String>>,
    /// Newest-edition words mapped to new words defined in terms of them.
    pub roots: IndexMap<String, BTreeSet<String>>,
    /// Entries to review, sorted by word.
    pub entries: Vec<OpenEntry>,
}

impl OpenDefinitions {
    pub fn expurgated(&self) -> BTreeSet<String> {
        self.expurgated_before
            .union(&self.expurgated_now)
            .cloned()
            .collect()
    }

    /// Render the review table as tab-separated text with a header row.
    pub fn to_tsv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(Vec::new());
        writer.write_record(["Word", "Definition", "Source", "New Inflection", "Expurgations"])?;
        for entry in &self.entries {
            let inflections = join(&entry.new_inflections);
            let expurgations = join(&entry.expurgations);
            writer.write_record([
                entry.word.as_str(),
                entry.definition.as_str(),
                entry.source.label(),
                inflections.as_str(),
                expurgations.as_str(),
            ])?;
        }
        into_string(writer)
    }

    /// Render `root,"INFLECTION, INFLECTION"` rows.
    pub fn inflections_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        for (root, inflections) in &self.roots {
            writer.write_record([root.as_str(), join(inflections).as_str()])?;
        }
        into_string(writer)
    }
}

fn join(words: &BTreeSet<String>) -> String {
    words.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().context("failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

type Entries = IndexMap<String, Option<String>>;

fn definition_of<'a>(entries: &'a Entries, word: &str) -> &'a str {
    entries.get(word).and_then(|d| d.as_deref()).unwrap_or("")
}

/// Compare three editions (oldest, previous, newest) and collect the
/// entries to review.
pub fn open_definitions(
    oldest: &Entries,
    previous: &Entries,
    newest: &Entries,
) -> Result<OpenDefinitions, UpdateError> {
    let mut report = OpenDefinitions {
        new_words: newest
            .keys()
            .filter(|w| !previous.contains_key(*w))
            .cloned()
            .collect(),
        expurgated_before: oldest
            .keys()
            .filter(|w| !previous.contains_key(*w))
            .cloned()
            .collect(),
        expurgated_now: previous
            .keys()
            .filter(|w| !newest.contains_key(*w))
            .cloned()
            .collect(),
        ..Default::default()
    };
    let expurgated = report.expurgated();

    for (word, definition) in previous {
        let mentioned: BTreeSet<String> = LETTER_RUN
            .find_iter(definition.as_deref().unwrap_or(""))
            .map(|m| m.as_str().to_uppercase())
            .filter(|token| expurgated.contains(token))
            .collect();
        if !mentioned.is_empty() {
            report.mentions_expurgated.insert(word.clone(), mentioned);
        }
    }

    for word in &report.new_words {
        for root in UPPERCASE_RUN.find_iter(definition_of(newest, word)) {
            if newest.contains_key(root.as_str()) {
                report
                    .roots
                    .entry(root.as_str().to_string())
                    .or_default()
                    .insert(word.clone());
            }
        }
    }

    let mut entries = Vec::new();
    for word in &report.new_words {
        let definition = definition_of(newest, word);
        if definition.is_empty() {
            return Err(UpdateError::MissingDefinition(word.clone()));
        }
        entries.push(OpenEntry {
            word: word.clone(),
            definition: definition.to_string(),
            source: Source::New,
            new_inflections: BTreeSet::new(),
            expurgations: BTreeSet::new(),
        });
    }
    for (word, mentioned) in &report.mentions_expurgated {
        if !newest.contains_key(word) {
            continue;
        }
        let definition = definition_of(previous, word);
        if definition.is_empty() {
            return Err(UpdateError::MissingDefinition(word.clone()));
        }
        entries.push(OpenEntry {
            word: word.clone(),
            definition: definition.to_string(),
            source: Source::Old,
            new_inflections: BTreeSet::new(),
            expurgations: mentioned.clone(),
        });
    }
    for (root, inflections) in &report.roots {
        let definition = definition_of(previous, root);
        if !definition.is_empty() {
            entries.push(OpenEntry {
                word: root.clone(),
                definition: definition.to_string(),
                source: Source::Old,
                new_inflections: inflections.clone(),
                expurgations: BTreeSet::new(),
            });
        }
    }
    entries.sort_by(|a, b| a.word.cmp(&b.word));
    report.entries = entries;
    Ok(report)
}

/// Load three strict lexicon files and compare them.
pub fn open_definitions_from_files(oldest: &Path, previous: &Path, newest: &Path) -> Result<OpenDefinitions> {
    let oldest = crate::lexicon::load_strict_entries(oldest)?;
    let previous = crate::lexicon::load_strict_entries(previous)?;
    let newest = crate::lexicon::load_strict_entries(newest)?;
    Ok(open_definitions(&oldest, &previous, &newest)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{parse_definitions, parse_strict_entries};

    #[test]
    fn merge_prefers_updates_then_old() {
        let old = parse_definitions("QI\told qi\nZA\told za\nXU\tdropped\n");
        let updates = parse_definitions("QI\tnew qi\n");
        let new_words = vec!["ZA".to_string(), "QI".to_string()];
        let merged = merge_definitions(&new_words, &old, &updates).unwrap();
        assert_eq!(merged.to_tsv(), "QI\tnew qi\nZA\told za\n");
        assert_eq!(merged.unused, vec!["XU"]);
    }

    #[test]
    fn merge_fails_on_undefined_word() {
        let old = parse_definitions("QI\told qi\n");
        let err = merge_definitions(&["ZZZ".to_string()], &old, &Definitions::new()).unwrap_err();
        assert_eq!(err.to_string(), "missing definition for word 'ZZZ'");
    }

    #[test]
    fn update_sheet_needs_six_columns() {
        let sheet = "Word\ta\tb\tc\td\tDefinition\nqi\t\t\t\t\t life force \nZA\t\t\t\t\t\n";
        let updates = parse_update_sheet(sheet).unwrap();
        assert_eq!(updates["QI"], "life force");
        assert!(!updates.contains_key("ZA"));

        let old = parse_definitions("QI\told qi\n");
        let merged = merge_definitions(&["QI".to_string()], &old, &updates).unwrap();
        assert_eq!(merged.to_tsv(), "QI\tlife force\n");

        let err = parse_update_sheet("QI\tx\n").unwrap_err();
        assert!(err.to_string().contains("expected at least 6"));
    }

    fn editions() -> (Entries, Entries, Entries) {
        let oldest = parse_strict_entries("GONER\nQI\tlife force\nZA\tpizza\n").unwrap();
        let previous = parse_strict_entries(
            "QI\tlife force\nZA\tpizza, as in goner\nCAT\ta feline\nXU\tcoin\n",
        )
        .unwrap();
        let newest = parse_strict_entries(
            "QI\tlife force\nZA\tpizza\nCAT\ta feline\nCATTO\tslang for CAT\n",
        )
        .unwrap();
        (oldest, previous, newest)
    }

    #[test]
    fn open_definitions_collects_review_rows() {
        let (oldest, previous, newest) = editions();
        let report = open_definitions(&oldest, &previous, &newest).unwrap();
        assert_eq!(report.new_words, vec!["CATTO"]);
        assert!(report.expurgated_before.contains("GONER"));
        assert!(report.expurgated_now.contains("XU"));
        assert!(report.mentions_expurgated["ZA"].contains("GONER"));
        assert!(report.roots["CAT"].contains("CATTO"));

        let words: Vec<_> = report.entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["CAT", "CATTO", "ZA"]);
        assert_eq!(report.entries[0].source, Source::Old);
        assert_eq!(report.entries[1].source, Source::New);
        assert_eq!(report.entries[2].definition, "pizza, as in goner");
    }

    #[test]
    fn open_definitions_renders_tables() {
        let (oldest, previous, newest) = editions();
        let report = open_definitions(&oldest, &previous, &newest).unwrap();
        let tsv = report.to_tsv().unwrap();
        let lines: Vec<_> = tsv.lines().collect();
        assert_eq!(lines[0], "Word\tDefinition\tSource\tNew Inflection\tExpurgations");
        assert_eq!(lines[1], "CAT\ta feline\tOLD\tCATTO\t");
        assert_eq!(lines[3], "ZA\tpizza, as in goner\tOLD\t\tGONER");

        assert_eq!(report.inflections_csv().unwrap(), "CAT,CATTO\n");
    }

    #[test]
    fn inflections_csv_quotes_joined_inflections() {
        let mut report = OpenDefinitions::default();
        report.roots.insert(
            "CAT".to_string(),
            BTreeSet::from(["CATTOS".to_string(), "CATTO".to_string()]),
        );
        report
            .roots
            .insert("QI".to_string(), BTreeSet::from(["QIS".to_string()]));
        assert_eq!(report.inflections_csv().unwrap(), "CAT,\"CATTO, CATTOS\"\nQI,QIS\n");
    }

    #[test]
    fn new_word_without_definition_fails() {
        let previous = parse_strict_entries("QI\tx\n").unwrap();
        let newest = parse_strict_entries("QI\tx\nZA\n").unwrap();
        let err = open_definitions(&Entries::new(), &previous, &newest).unwrap_err();
        assert!(matches!(err, UpdateError::MissingDefinition(w) if w == "ZA"));
    }
}
