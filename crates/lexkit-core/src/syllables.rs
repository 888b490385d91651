//! Syllable counting and "add a letter, gain a syllable" pairs.

use std::collections::{BTreeSet, HashMap};

fn is_vowel(c: char, position: usize) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') || (c == 'y' && position > 0)
}

/// Estimate the number of syllables in an English word.
///
/// Counts vowel groups, dropping a silent final `e` (but not `-le` after a
/// consonant) and silent `-es`/`-ed` endings. Returns 0 for input that is
/// empty or contains non-letters; otherwise at least 1.
pub fn count_syllables(word: &str) -> usize {
    let word = word.trim().to_lowercase();
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return 0;
    }
    let chars: Vec<char> = word.chars().collect();

    let mut groups = 0;
    let mut in_group = false;
    for (i, &c) in chars.iter().enumerate() {
        let vowel = is_vowel(c, i);
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }

    let n = chars.len();
    if n > 2 {
        let last = chars[n - 1];
        let prev = chars[n - 2];
        let before = chars[n - 3];
        let consonant_before = !is_vowel(before, n - 3);
        if last == 'e' && !is_vowel(prev, n - 2) && !(prev == 'l' && consonant_before) {
            groups -= 1;
        } else if (last == 's' || last == 'd')
            && prev == 'e'
            && consonant_before
            && !silent_ending_is_voiced(before, last)
        {
            groups -= 1;
        }
    }
    groups.max(1)
}

/// `-es` after a sibilant and `-ed` after `t`/`d` are pronounced.
fn silent_ending_is_voiced(before: char, last: char) -> bool {
    match last {
        's' => matches!(before, 's' | 'x' | 'z' | 'c' | 'g' | 'h'),
        _ => matches!(before, 't' | 'd'),
    }
}

/// For every word, each single-letter deletion that is also a word with
/// strictly more syllables, rendered `sub (a) -> word (b)`. Sorted and
/// deduplicated.
pub fn syllable_gain_pairs(words: &[String]) -> BTreeSet<String> {
    let counts: HashMap<&str, usize> = words
        .iter()
        .map(|w| (w.as_str(), count_syllables(w)))
        .filter(|(_, n)| *n > 0)
        .collect();

    let mut pairs = BTreeSet::new();
    for (word, &syllables) in &counts {
        let chars: Vec<char> = word.chars().collect();
        for i in 0..chars.len() {
            let sub: String = chars[..i].iter().chain(&chars[i + 1..]).collect();
            if let Some(&sub_syllables) = counts.get(sub.as_str()) {
                if sub_syllables > syllables {
                    pairs.insert(format!("{sub} ({sub_syllables}) -> {word} ({syllables})"));
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_words() {
        assert_eq!(count_syllables("CAT"), 1);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("baked"), 1);
        assert_eq!(count_syllables("wanted"), 2);
        assert_eq!(count_syllables("boxes"), 2);
        assert_eq!(count_syllables("happy"), 2);
        assert_eq!(count_syllables("yes"), 1);
        assert_eq!(count_syllables("beautiful"), 3);
    }

    #[test]
    fn non_words_have_no_syllables() {
        assert_eq!(count_syllables(""), 0);
        assert_eq!(count_syllables("a-b"), 0);
        assert_eq!(count_syllables("hmm"), 1);
    }

    #[test]
    fn deletion_that_gains_a_syllable() {
        let words: Vec<String> = ["TABLE", "TABLED", "CAT", "CATS", "HMM"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let pairs: Vec<_> = syllable_gain_pairs(&words).into_iter().collect();
        assert_eq!(pairs, vec!["TABLE (2) -> TABLED (1)"]);
    }
}
