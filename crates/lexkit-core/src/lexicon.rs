//! Lexicon file loaders.
//!
//! Every loader comes in two forms: `load_*` reads a file and adds path
//! context to I/O errors, `parse_*` works on already-read text (useful for
//! testing and for downloaded content).

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;

use crate::error::LexiconError;

/// Ordered `WORD -> definition` mapping, in file order.
pub type Definitions = IndexMap<String, String>;

/// Marker the hook lexicon puts on either side of a word to show it takes
/// inner hooks.
pub const INNER_HOOK_MARKER: char = '·';

static EXPORT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.(\w+).\t\s*([^\t]*)").expect("valid export regex"));

/// A lexicon line carrying hook information alongside the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEntry {
    /// Letters that can be prepended to the word.
    pub front_hooks: String,
    /// The word as written in the lexicon, including inner-hook markers.
    pub word_with_inner_hooks: String,
    /// The bare word.
    pub word: String,
    /// Letters that can be appended to the word.
    pub back_hooks: String,
    /// Definition with semicolons replaced by colons.
    pub definition: String,
}

fn read(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what}: {}", path.display()))
}

/// Parse a plain word list: one word per line, uppercased, blanks skipped.
pub fn parse_word_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_uppercase())
        .collect()
}

/// Load a plain word list from a file.
pub fn load_word_list(path: &Path) -> Result<Vec<String>> {
    Ok(parse_word_list(&read(path, "word list")?))
}

/// Load a word list as a membership set.
pub fn load_word_set(path: &Path) -> Result<HashSet<String>> {
    Ok(load_word_list(path)?.into_iter().collect())
}

/// Parse `WORD<TAB>definition` lines.
///
/// Splits on the first tab only. Lines without a tab, or with an empty word
/// or definition, are skipped.
pub fn parse_definitions(text: &str) -> Definitions {
    let mut defs = Definitions::new();
    for line in text.lines() {
        let line = line.trim();
        let Some((word, definition)) = line.split_once('\t') else {
            continue;
        };
        let word = word.trim().to_uppercase();
        let definition = definition.trim();
        if !word.is_empty() && !definition.is_empty() {
            defs.insert(word, definition.to_string());
        }
    }
    defs
}

/// Load a definitions file.
pub fn load_definitions(path: &Path) -> Result<Definitions> {
    Ok(parse_definitions(&read(path, "definitions file")?))
}

/// Parse a lexicon where every non-blank line must begin with a word made
/// only of letters. The definition after the first tab is optional.
pub fn parse_strict_entries(text: &str) -> Result<IndexMap<String, Option<String>>, LexiconError> {
    let mut entries = IndexMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (word, definition) = match line.split_once('\t') {
            Some((w, d)) => (w, Some(d.trim().to_string())),
            None => (line, None),
        };
        let word = word.trim().to_uppercase();
        if word.is_empty() || !word.chars().all(char::is_alphabetic) {
            return Err(LexiconError::InvalidLine(line.to_string()));
        }
        entries.insert(word, definition);
    }
    Ok(entries)
}

/// Load a strict lexicon file, logging how many words it holds.
pub fn load_strict_entries(path: &Path) -> Result<IndexMap<String, Option<String>>> {
    let entries = parse_strict_entries(&read(path, "lexicon")?)
        .with_context(|| format!("failed to parse lexicon: {}", path.display()))?;
    tracing::info!("loaded {} words from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse the quiz program's definitions export.
///
/// Each line holds a wrapped word (one marker character on either side),
/// a tab, and the definition up to the next tab.
pub fn parse_zyzzyva_export(text: &str) -> Result<Definitions, LexiconError> {
    let mut defs = Definitions::new();
    for line in text.lines() {
        let line = line.trim_end_matches(['\r', '\n']);
        let caps = EXPORT_LINE
            .captures(line)
            .ok_or_else(|| LexiconError::UnmatchedExportLine(line.to_string()))?;
        defs.insert(caps[1].to_string(), caps[2].to_string());
    }
    Ok(defs)
}

/// Load the quiz program's definitions export.
pub fn load_zyzzyva_export(path: &Path) -> Result<Definitions> {
    if !path.is_file() {
        anyhow::bail!("definitions file does not exist: {}", path.display());
    }
    Ok(parse_zyzzyva_export(&read(path, "definitions export")?)?)
}

/// Parse a lexicon with front hooks, back hooks, inner hooks, and
/// definitions.
///
/// Empty tab fields are dropped, so a line with four remaining fields has
/// front hooks and a line with three does not.
pub fn parse_hook_lexicon(text: &str) -> Result<Vec<HookEntry>, LexiconError> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let mut fields: Vec<&str> = line.trim().split('\t').filter(|f| !f.is_empty()).collect();
        if fields.len() < 3 {
            return Err(LexiconError::InvalidHookLine(line.to_string()));
        }
        let front_hooks = if fields.len() == 4 {
            fields.remove(0).to_string()
        } else {
            String::new()
        };
        let word_with_inner_hooks = fields[0].trim().to_uppercase();
        let word = word_with_inner_hooks
            .strip_prefix(INNER_HOOK_MARKER)
            .unwrap_or(&word_with_inner_hooks);
        let word = word.strip_suffix(INNER_HOOK_MARKER).unwrap_or(word).to_string();
        entries.push(HookEntry {
            front_hooks,
            word,
            back_hooks: fields[1].to_string(),
            definition: fields[2].replace(';', ":"),
            word_with_inner_hooks,
        });
    }
    Ok(entries)
}

/// Load a hook lexicon file.
pub fn load_hook_lexicon(path: &Path) -> Result<Vec<HookEntry>> {
    Ok(parse_hook_lexicon(&read(path, "hook lexicon")?)?)
}

/// Parse `WORD N` probability lines (whitespace separated).
pub fn parse_probabilities(text: &str) -> Result<HashMap<String, i64>, LexiconError> {
    let mut map = HashMap::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [word, value] = parts.as_slice() else {
            return Err(LexiconError::InvalidLine(line.to_string()));
        };
        let value = value.parse().map_err(|_| LexiconError::InvalidNumber {
            value: value.to_string(),
            line: line.to_string(),
        })?;
        map.insert(word.to_uppercase(), value);
    }
    Ok(map)
}

/// Load a probability list.
pub fn load_probabilities(path: &Path) -> Result<HashMap<String, i64>> {
    Ok(parse_probabilities(&read(path, "probability list")?)?)
}

/// Parse `SCORE WORD` playability lines.
pub fn parse_playability(text: &str) -> Result<HashMap<String, f64>, LexiconError> {
    let mut map = HashMap::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [score, word] = parts.as_slice() else {
            return Err(LexiconError::InvalidLine(line.to_string()));
        };
        let score = score.parse().map_err(|_| LexiconError::InvalidNumber {
            value: score.to_string(),
            line: line.to_string(),
        })?;
        map.insert(word.to_string(), score);
    }
    Ok(map)
}

/// Load a playability list.
pub fn load_playability(path: &Path) -> Result<HashMap<String, f64>> {
    Ok(parse_playability(&read(path, "playability list")?)?)
}

/// Parse two-column `key,value` CSV rows. Rows of any other width are
/// ignored.
pub fn parse_numeric_csv(text: &str) -> Result<IndexMap<String, f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut map = IndexMap::new();
    for record in reader.records() {
        let record = record.context("failed to read CSV row")?;
        if record.len() != 2 {
            continue;
        }
        let value = record[1].trim();
        let parsed: f64 = value.parse().map_err(|_| LexiconError::InvalidNumber {
            value: value.to_string(),
            line: record.iter().collect::<Vec<_>>().join(","),
        })?;
        map.insert(record[0].trim().to_string(), parsed);
    }
    Ok(map)
}

/// Load a two-column numeric CSV file.
pub fn load_numeric_csv(path: &Path) -> Result<IndexMap<String, f64>> {
    parse_numeric_csv(&read(path, "CSV file")?)
        .with_context(|| format!("failed to parse CSV: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_list_uppercases_and_skips_blanks() {
        let words = parse_word_list("cat\n\n  dog \nEEL\n");
        assert_eq!(words, vec!["CAT", "DOG", "EEL"]);
    }

    #[test]
    fn definitions_split_on_first_tab() {
        let defs = parse_definitions("aa\ta lava [n]\nBB\tsome\tthing\nnotab\nCC\t   \n");
        assert_eq!(defs.len(), 2);
        assert_eq!(defs["AA"], "a lava [n]");
        assert_eq!(defs["BB"], "some\tthing");
        assert!(!defs.contains_key("CC"));
    }

    #[test]
    fn definitions_keep_file_order() {
        let defs = parse_definitions("ZO\tx\nAA\ty\n");
        let keys: Vec<_> = defs.keys().cloned().collect();
        assert_eq!(keys, vec!["ZO", "AA"]);
    }

    #[test]
    fn strict_entries_reject_non_letters() {
        let ok = parse_strict_entries("AA\tlava\nQI\n").unwrap();
        assert_eq!(ok["AA"].as_deref(), Some("lava"));
        assert_eq!(ok["QI"], None);

        let err = parse_strict_entries("A1\tbad\n").unwrap_err();
        assert!(err.to_string().contains("invalid line format"));
    }

    #[test]
    fn zyzzyva_export_lines() {
        let defs = parse_zyzzyva_export("\"AA\"\t  rough lava [n]\n\"QI\"\tlife force [n]\textra\n")
            .unwrap();
        assert_eq!(defs["AA"], "rough lava [n]");
        assert_eq!(defs["QI"], "life force [n]");

        assert!(parse_zyzzyva_export("no tab here").is_err());
    }

    #[test]
    fn hook_lexicon_with_and_without_front_hooks() {
        let text = "B\t·AA·\tHS\trough lava; basalt\n\t·QI\tS\tlife force\n";
        let entries = parse_hook_lexicon(text).unwrap();
        assert_eq!(entries[0].front_hooks, "B");
        assert_eq!(entries[0].word, "AA");
        assert_eq!(entries[0].word_with_inner_hooks, "·AA·");
        assert_eq!(entries[0].back_hooks, "HS");
        assert_eq!(entries[0].definition, "rough lava: basalt");
        assert_eq!(entries[1].front_hooks, "");
        assert_eq!(entries[1].word, "QI");
    }

    #[test]
    fn hook_lexicon_rejects_short_lines() {
        assert!(parse_hook_lexicon("AA\tlava\n").is_err());
    }

    #[test]
    fn probabilities_and_playability() {
        let probs = parse_probabilities("aeinrst 120\nQI 3\n").unwrap();
        assert_eq!(probs["AEINRST"], 120);
        assert!(parse_probabilities("ONLYWORD\n").is_err());

        let playab = parse_playability("12.5 QI\n3 ZA\n").unwrap();
        assert_eq!(playab["QI"], 12.5);
    }

    #[test]
    fn numeric_csv_ignores_other_widths() {
        let map = parse_numeric_csv("AE,1.5\nheader\nQ, -3.25 \na,b,c\n").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["Q"], -3.25);
        assert!(parse_numeric_csv("Q,abc\n").is_err());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "qi\nza\n").unwrap();
        let set = load_word_set(&path).unwrap();
        assert!(set.contains("QI"));
        assert!(load_word_list(&dir.path().join("missing.txt")).is_err());
    }
}
