//! Subanagram search.
//!
//! A subanagram of a word is any arrangement of a non-empty subset of its
//! letters. Instead of enumerating every permutation of every subset, each
//! candidate from the word list is checked for letter-count containment,
//! which finds the same set without the factorial blowup.

use std::collections::{BTreeSet, HashMap};

fn letter_counts(word: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for c in word.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

/// Whether `candidate` can be spelled using only the letters of `rack`.
pub fn is_subanagram(candidate: &str, rack: &HashMap<char, usize>) -> bool {
    if candidate.is_empty() {
        return false;
    }
    letter_counts(candidate)
        .iter()
        .all(|(c, n)| rack.get(c).is_some_and(|have| have >= n))
}

/// All words in `word_list` that are subanagrams (including full anagrams)
/// of `word`. Comparison is case-insensitive; results are uppercase.
pub fn subanagrams<'a, I>(word: &str, word_list: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let rack = letter_counts(&word.to_uppercase());
    let rack_len = word.chars().count();
    word_list
        .into_iter()
        .filter(|w| w.chars().count() <= rack_len)
        .map(|w| w.to_uppercase())
        .filter(|w| is_subanagram(w, &rack))
        .collect()
}

/// Union of the subanagrams of every input word.
pub fn subanagrams_of_all<S: AsRef<str>>(words: &[S], word_list: &[String]) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for word in words {
        found.extend(subanagrams(word.as_ref(), word_list));
    }
    found
}
