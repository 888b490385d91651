//! Alphagrams and anagram groups.

use indexmap::IndexMap;

/// Sort a word's letters into canonical order.
pub fn alphagram(word: &str) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

/// Words grouped by alphagram.
///
/// Groups appear in the order their first word was seen, and the words in
/// each group keep input order, so `group[0]` is the first-listed anagram.
#[derive(Debug, Clone, Default)]
pub struct AnagramGroups {
    groups: IndexMap<String, Vec<String>>,
}

impl AnagramGroups {
    /// Group every word.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_words_in_range(words, 0, None)
    }

    /// Group the words whose length lies in `min..=max` (`max = None` means
    /// unbounded).
    pub fn from_words_in_range<I, S>(words: I, min: usize, max: Option<usize>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        for word in words {
            let word = word.as_ref();
            let len = word.chars().count();
            if len < min || max.is_some_and(|m| len > m) {
                continue;
            }
            groups
                .entry(alphagram(word))
                .or_default()
                .push(word.to_string());
        }
        Self { groups }
    }

    /// Words sharing an alphagram with `word` (including `word` itself if
    /// it was grouped).
    pub fn anagrams_of(&self, word: &str) -> &[String] {
        self.get(&alphagram(word))
    }

    /// The group for an alphagram, empty if there is none.
    pub fn get(&self, alphagram: &str) -> &[String] {
        self.groups.get(alphagram).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of words sharing `word`'s alphagram.
    pub fn count(&self, word: &str) -> usize {
        self.anagrams_of(word).len()
    }

    /// Iterate `(alphagram, words)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.groups.iter()
    }

    /// Number of distinct alphagrams.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume into the ordered `(alphagram, words)` list.
    pub fn into_vec(self) -> Vec<(String, Vec<String>)> {
        self.groups.into_iter().collect()
    }
}
