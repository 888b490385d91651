//! Bingo quiz builder.
//!
//! A bingo quiz is a list of N distinct alphagrams, each represented by one
//! word. It is filled from three sources in priority order: tricky words
//! from the lexicon, bingos the player has missed in games, and finally the
//! most probable remaining seven- and eight-letter racks.

use std::cmp::Reverse;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::alphagram::{alphagram, AnagramGroups};
use crate::lexicon::Definitions;
use crate::tricky::{is_tricky, MAX_ANAGRAMS};

/// Tile distribution of a standard English set, blanks excluded.
pub const TILE_COUNTS: [(char, u64); 26] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 4),
    ('E', 12),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 4),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
];

fn tiles_for(letter: char) -> u64 {
    TILE_COUNTS
        .iter()
        .find(|(c, _)| *c == letter)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// Number of ways to draw `rack` from a full bag.
///
/// Racks that need more copies of a letter than the bag holds (only
/// drawable with blanks) count as a single way.
pub fn ways_to_draw(rack: &str) -> u64 {
    let mut counts: HashMap<char, u64> = HashMap::new();
    for c in rack.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    let mut total = 1;
    for (letter, count) in counts {
        let available = tiles_for(letter);
        if available < count {
            return 1;
        }
        total *= binomial(available, count);
    }
    total
}

/// A finished bingo quiz and how it was assembled.
#[derive(Debug, Clone, Default)]
pub struct BingoQuiz {
    /// `alphagram -> word`, in the order entries were first added.
    pub entries: IndexMap<String, String>,
    /// Entries contributed by the tricky-word classifier.
    pub tricky: usize,
    /// New alphagrams contributed by the missed-bingo list.
    pub missed: usize,
    /// Entries filled from the probability ranking.
    pub probable: usize,
    /// Last seven-letter word added from the probability ranking.
    pub least_probable_seven: Option<String>,
    /// Last eight-letter word added from the probability ranking.
    pub least_probable_eight: Option<String>,
}

impl BingoQuiz {
    /// The quiz words in order.
    pub fn words(&self) -> impl Iterator<Item = &String> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the quiz file body: one word per line, no trailing newline.
    pub fn to_file_contents(&self) -> String {
        self.words().cloned().collect::<Vec<_>>().join("\n")
    }
}

/// Build a quiz of `n` alphagrams.
pub fn build_bingo_quiz(defs: &Definitions, missed: &[String], n: usize) -> BingoQuiz {
    let groups = AnagramGroups::from_words(defs.keys());
    let mut quiz = BingoQuiz::default();

    for word in defs.keys() {
        if is_tricky(word, defs, &groups) {
            let key = alphagram(word);
            let representative = groups.get(&key)[0].clone();
            quiz.entries.insert(key, representative);
        }
    }
    quiz.tricky = quiz.entries.len();
    tracing::info!("generated {} tricky words", quiz.tricky);

    for word in missed {
        let word = word.trim().to_uppercase();
        if !word.is_empty() {
            quiz.entries.insert(alphagram(&word), word);
        }
    }
    quiz.missed = quiz.entries.len() - quiz.tricky;
    tracing::info!("generated {} new unique missed bingos", quiz.missed);

    if quiz.entries.len() < n {
        fill_probable(&groups, &mut quiz, n);
    }
    quiz
}

fn ranked_candidates(groups: &AnagramGroups, length: usize) -> Vec<(String, u64)> {
    let mut candidates: Vec<(String, u64)> = groups
        .iter()
        .filter(|(key, words)| words.len() <= MAX_ANAGRAMS && key.chars().count() == length)
        .map(|(key, words)| (words[0].clone(), ways_to_draw(key)))
        .collect();
    candidates.sort_by_key(|(_, ways)| Reverse(*ways));
    candidates
}

fn fill_probable(groups: &AnagramGroups, quiz: &mut BingoQuiz, n: usize) {
    let before = quiz.entries.len();
    let mut sevens = ranked_candidates(groups, 7).into_iter();
    let mut eights = ranked_candidates(groups, 8).into_iter();

    while quiz.entries.len() < n {
        let mut progressed = false;
        if let Some((seven, _)) = sevens.next() {
            quiz.entries.insert(alphagram(&seven), seven.clone());
            quiz.least_probable_seven = Some(seven);
            progressed = true;
        }
        if quiz.entries.len() < n {
            if let Some((eight, _)) = eights.next() {
                quiz.entries.insert(alphagram(&eight), eight.clone());
                quiz.least_probable_eight = Some(eight);
                progressed = true;
            }
        }
        if !progressed {
            tracing::warn!(
                "ran out of probable bingos with {} of {n} entries",
                quiz.entries.len()
            );
            break;
        }
    }
    quiz.probable = quiz.entries.len() - before;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(words: &[&str]) -> Definitions {
        words
            .iter()
            .map(|w| (w.to_string(), "a word [n]".to_string()))
            .collect()
    }

    #[test]
    fn binomials() {
        assert_eq!(binomial(12, 2), 66);
        assert_eq!(binomial(9, 0), 1);
        assert_eq!(binomial(1, 2), 0);
    }

    #[test]
    fn ways_to_draw_racks() {
        // C(9,1) * C(12,1) * C(9,1) * C(6,1) * C(6,1) * C(4,1) * C(6,1)
        assert_eq!(ways_to_draw("AEINRST"), 9 * 12 * 9 * 6 * 6 * 4 * 6);
        assert_eq!(ways_to_draw("EE"), 66);
        // Two Zs need a blank.
        assert_eq!(ways_to_draw("ZZ"), 1);
    }

    #[test]
    fn tricky_words_come_first_with_group_representative() {
        let d = defs(&["QUICKLY", "STRENGTH", "PLAYFUL"]);
        let quiz = build_bingo_quiz(&d, &[], 0);
        let words: Vec<_> = quiz.words().cloned().collect();
        assert_eq!(words, vec!["QUICKLY", "PLAYFUL"]);
        assert_eq!(quiz.tricky, 2);
        assert_eq!(quiz.probable, 0);
    }

    #[test]
    fn missed_bingos_overwrite_in_place() {
        let d = defs(&["QUICKLY"]);
        let missed = vec!["quickly".to_string(), "strength".into()];
        let quiz = build_bingo_quiz(&d, &missed, 0);
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz.missed, 1);
        assert_eq!(quiz.to_file_contents(), "QUICKLY\nSTRENGTH");
    }

    #[test]
    fn probable_fill_alternates_and_stops_when_exhausted() {
        // None of these words is tricky, so all come from the probability ranking.
        let d = defs(&["STRENGTH", "TRANSIT", "BRRRRRR"]);
        let quiz = build_bingo_quiz(&d, &[], 10);
        assert_eq!(quiz.tricky, 0);
        assert_eq!(quiz.len(), 3);
        assert_eq!(quiz.probable, 3);
        let words: Vec<_> = quiz.words().cloned().collect();
        // TRANSIT outranks BRRRRRR; STRENGTH follows the first seven.
        assert_eq!(words, vec!["TRANSIT", "STRENGTH", "BRRRRRR"]);
        assert_eq!(quiz.least_probable_seven.as_deref(), Some("BRRRRRR"));
        assert_eq!(quiz.least_probable_eight.as_deref(), Some("STRENGTH"));
    }

    #[test]
    fn probable_fill_stops_at_n() {
        let d = defs(&["STRENGTH", "TRANSIT", "BRRRRRR"]);
        let quiz = build_bingo_quiz(&d, &[], 1);
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.least_probable_eight, None);
    }
}
