//! Heuristic classifier for bingo-quiz words that are easy to miss.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::alphagram::AnagramGroups;
use crate::lexicon::Definitions;

static BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid bracket regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("valid separator regex"));

const TRICKY_SUFFIXES: &[&str] = &[
    "ANT", "ENT", "ITY", "LY", "ABLE", "NESS", "LESS", "LIKE", "EAU", "IEU", "ATE", "OID", "INESS",
    "IVE", "IAN", "FUL", "FORM", "OSE", "OUS", "ISH", "UM",
];

const TRICKY_PREFIXES: &[&str] = &["OVER", "OUT", "NON", "EM", "IM", "EN"];

/// Groups with more anagrams than this are never quizzed.
pub const MAX_ANAGRAMS: usize = 3;

/// Part of speech tags found in definition brackets, e.g. `[n]` or `[adj]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Interjection,
    Preposition,
    Conjunction,
    Pronoun,
}

impl PartOfSpeech {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "n" | "noun" | "nouns" => Some(Self::Noun),
            "v" | "verb" | "verbs" => Some(Self::Verb),
            "adj" | "adjective" | "adjectives" => Some(Self::Adjective),
            "adv" | "adverb" | "adverbs" => Some(Self::Adverb),
            "interj" | "interjection" => Some(Self::Interjection),
            "prep" | "preposition" => Some(Self::Preposition),
            "conj" | "conjunction" => Some(Self::Conjunction),
            "pron" | "pronoun" => Some(Self::Pronoun),
            _ => None,
        }
    }
}

/// Collect the parts of speech tagged in a definition.
pub fn extract_parts_of_speech(definition: &str) -> HashSet<PartOfSpeech> {
    BRACKETS
        .captures_iter(definition)
        .flat_map(|caps| {
            let content = caps[1].to_lowercase();
            SEPARATORS
                .split(&content)
                .filter_map(|tag| PartOfSpeech::from_tag(tag.trim()))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn vowel_count(word: &str) -> usize {
    word.chars().filter(|c| "AEIOU".contains(*c)).count()
}

/// Whether an uppercase word is a tricky seven- or eight-letter bingo.
///
/// The rules are checked in order and the first decisive one wins.
pub fn is_tricky(word: &str, defs: &Definitions, groups: &AnagramGroups) -> bool {
    let len = word.chars().count();
    if len != 7 && len != 8 {
        return false;
    }

    let anagrams = groups.count(word);
    if anagrams > MAX_ANAGRAMS {
        return false;
    }

    let parts = extract_parts_of_speech(defs.get(word).map(String::as_str).unwrap_or(""));
    if word.ends_with("ED") && parts.contains(&PartOfSpeech::Adjective) {
        return true;
    }

    let plural_defined = defs.contains_key(&format!("{word}S"));
    if word.ends_with("ING") && plural_defined {
        return true;
    }

    if TRICKY_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        return true;
    }

    if word.ends_with("ER") && anagrams == 1 && plural_defined {
        return true;
    }

    if word.starts_with("UN") && word.ends_with("ED") {
        return true;
    }

    if TRICKY_PREFIXES.iter().any(|p| word.starts_with(p)) {
        return true;
    }

    vowel_count(word) == 5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(entries: &[(&str, &str)]) -> Definitions {
        entries
            .iter()
            .map(|(w, d)| (w.to_string(), d.to_string()))
            .collect()
    }

    fn classify(word: &str, d: &Definitions) -> bool {
        let groups = AnagramGroups::from_words(d.keys());
        is_tricky(word, d, &groups)
    }

    #[test]
    fn parts_of_speech_from_brackets() {
        let parts = extract_parts_of_speech("pertaining to X [adj] also a thing [n, v]");
        assert!(parts.contains(&PartOfSpeech::Adjective));
        assert!(parts.contains(&PartOfSpeech::Noun));
        assert!(parts.contains(&PartOfSpeech::Verb));
        assert!(!parts.contains(&PartOfSpeech::Adverb));

        let parts = extract_parts_of_speech("[INTERJ] hi [pron PRONOUN]");
        assert!(parts.contains(&PartOfSpeech::Interjection));
        assert!(parts.contains(&PartOfSpeech::Pronoun));
        assert!(extract_parts_of_speech("no tags").is_empty());
    }

    #[test]
    fn wrong_length_is_never_tricky() {
        let d = defs(&[("QUICKLY", "fast [adv]"), ("SHORTLY", "soon [adv]"), ("LY", "x")]);
        assert!(classify("QUICKLY", &d));
        assert!(!classify("LY", &d));
    }

    #[test]
    fn too_many_anagrams() {
        let d = defs(&[
            ("RETAINS", "x [v]"),
            ("STAINER", "x [n]"),
            ("NASTIER", "x [adj]"),
            ("RETINAS", "x [n]"),
        ]);
        assert!(!classify("RETAINS", &d));
    }

    #[test]
    fn adjective_ed() {
        let d = defs(&[("BEARDED", "having a beard [adj]"), ("CRASHED", "past [v]")]);
        assert!(classify("BEARDED", &d));
        assert!(!classify("CRASHED", &d));
    }

    #[test]
    fn ing_with_plural() {
        let d = defs(&[("BRIDING", "a thing [n]"), ("BRIDINGS", "pl")]);
        assert!(classify("BRIDING", &d));
        let d = defs(&[("BRIDING", "a thing [n]")]);
        assert!(!classify("BRIDING", &d));
    }

    #[test]
    fn suffix_and_prefix_rules() {
        let d = defs(&[
            ("GRIMNESS", "x"),
            ("OVERDRY", "x"),
            ("EMBRYOS", "x"),
            ("UNTIRED", "x"),
            ("STRENGTH", "x"),
        ]);
        assert!(classify("GRIMNESS", &d));
        assert!(classify("OVERDRY", &d));
        assert!(classify("EMBRYOS", &d));
        assert!(classify("UNTIRED", &d));
        assert!(!classify("STRENGTH", &d));
    }

    #[test]
    fn er_requires_unique_anagram_and_plural() {
        let d = defs(&[("DRABBER", "x"), ("DRABBERS", "x")]);
        assert!(classify("DRABBER", &d));
        let d = defs(&[("DRABBER", "x")]);
        assert!(!classify("DRABBER", &d));
    }

    #[test]
    fn five_vowels() {
        let d = defs(&[("AUREOLE", "x")]);
        assert!(classify("AUREOLE", &d));
    }
}
