//! Definition analysis: longest definitions and definitions that mention
//! numbers such as years.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

/// Default digit count for [`numeric_definitions`].
pub const DEFAULT_DIGITS: usize = 4;

/// A `(word, definition)` pair as written in the file.
pub type DefinitionEntry = (String, String);

/// Parse tab-separated definition lines, keeping file order and duplicates.
///
/// The word is the first field as written and the definition is the second
/// field, trimmed. Lines with a single field are skipped.
pub fn parse_definition_entries(text: &str) -> Vec<DefinitionEntry> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let word = fields.next()?;
            let definition = fields.next()?;
            Some((word.to_string(), definition.trim().to_string()))
        })
        .collect()
}

pub fn load_definition_entries(path: &Path) -> Result<Vec<DefinitionEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read definitions file: {}", path.display()))?;
    Ok(parse_definition_entries(&text))
}

/// Keep entries whose word length lies in `min..=max` (`max = None` means
/// unbounded).
pub fn filter_by_word_length(
    entries: &[DefinitionEntry],
    min: usize,
    max: Option<usize>,
) -> Vec<DefinitionEntry> {
    entries
        .iter()
        .filter(|(word, _)| {
            let len = word.chars().count();
            len >= min && max.is_none_or(|m| len <= m)
        })
        .cloned()
        .collect()
}

/// The `n` longest definitions among words of the given length range.
/// Ties keep file order.
pub fn longest_definitions(
    entries: &[DefinitionEntry],
    n: usize,
    min: usize,
    max: Option<usize>,
) -> Vec<DefinitionEntry> {
    let mut filtered = filter_by_word_length(entries, min, max);
    filtered.sort_by_key(|(_, def)| std::cmp::Reverse(def.chars().count()));
    filtered.truncate(n);
    filtered
}

/// Entries whose definition contains a standalone number of exactly
/// `digits` digits.
pub fn numeric_definitions(entries: &[DefinitionEntry], digits: usize) -> Result<Vec<DefinitionEntry>> {
    anyhow::ensure!(digits > 0, "digit count must be at least 1");
    let pattern = Regex::new(&format!(r"\b\d{{{digits}}}\b")).context("failed to build number pattern")?;
    Ok(entries
        .iter()
        .filter(|(_, def)| pattern.is_match(def))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<DefinitionEntry> {
        parse_definition_entries(
            "QI\tlife force\nZA\tpizza\nAALII\ta shrub first noted in 1789 [n]\nZYZZYVA\ta weevil\textra\nsolo\n",
        )
    }

    #[test]
    fn parses_second_field_only() {
        let entries = sample();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3], ("ZYZZYVA".to_string(), "a weevil".to_string()));
    }

    #[test]
    fn longest_first_with_stable_ties() {
        let entries = parse_definition_entries("AB\tabc\nCD\txyz\nEF\tlonger one\nGHI\tabcdefghijklmn\n");
        let top = longest_definitions(&entries, 3, 2, Some(2));
        let words: Vec<_> = top.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["EF", "AB", "CD"]);

        let top = longest_definitions(&entries, 1, 1, None);
        assert_eq!(top[0].0, "GHI");
    }

    #[test]
    fn numbers_must_stand_alone() {
        let entries = parse_definition_entries(
            "A\tborn 1789\nB\tcode 12345\nC\tin 17th century\nD\tcost 250 crowns\n",
        );
        let years = numeric_definitions(&entries, DEFAULT_DIGITS).unwrap();
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].0, "A");

        let threes = numeric_definitions(&entries, 3).unwrap();
        assert_eq!(threes[0].0, "D");
        assert!(numeric_definitions(&entries, 0).is_err());
    }

    #[test]
    fn length_filter_counts_chars() {
        let filtered = filter_by_word_length(&sample(), 5, None);
        assert_eq!(filtered.len(), 2);
    }
}
