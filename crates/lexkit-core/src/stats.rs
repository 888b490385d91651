//! Word list statistics.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::LexiconError;

/// Probability summary for one word length.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthStats {
    pub length: usize,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, absent for a single word.
    pub std_dev: Option<f64>,
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Needs two values.
pub(crate) fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Summarize the probabilities of `words` per word length, lengths in
/// order of first appearance.
pub fn probability_stats(
    probabilities: &HashMap<String, i64>,
    words: &[String],
) -> Result<Vec<LengthStats>, LexiconError> {
    let mut by_length: IndexMap<usize, Vec<f64>> = IndexMap::new();
    for word in words {
        let p = probabilities
            .get(word)
            .ok_or_else(|| LexiconError::UnknownWord(word.clone()))?;
        by_length
            .entry(word.chars().count())
            .or_default()
            .push(*p as f64);
    }
    Ok(by_length
        .into_iter()
        .map(|(length, values)| LengthStats {
            length,
            count: values.len(),
            mean: mean(&values),
            std_dev: sample_std_dev(&values),
        })
        .collect())
}

/// A key present in both files.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveDifference {
    pub key: String,
    pub first: f64,
    pub second: f64,
    /// `second - first`.
    pub difference: f64,
}

/// Pair up the keys of two value files, ordered by signed difference
/// ascending, or by absolute difference when `by_magnitude` is set.
pub fn leave_differences(
    first: &IndexMap<String, f64>,
    second: &IndexMap<String, f64>,
    by_magnitude: bool,
) -> Vec<LeaveDifference> {
    let mut diffs: Vec<LeaveDifference> = first
        .iter()
        .filter_map(|(key, a)| {
            second.get(key).map(|b| LeaveDifference {
                key: key.clone(),
                first: *a,
                second: *b,
                difference: b - a,
            })
        })
        .collect();
    if by_magnitude {
        diffs.sort_by(|x, y| x.difference.abs().total_cmp(&y.difference.abs()));
    } else {
        diffs.sort_by(|x, y| x.difference.total_cmp(&y.difference));
    }
    diffs
}

/// The first `n` entries and the last `n` entries reversed.
pub fn extremes(diffs: &[LeaveDifference], n: usize) -> (&[LeaveDifference], Vec<&LeaveDifference>) {
    let head = &diffs[..n.min(diffs.len())];
    let tail = diffs.iter().rev().take(n).collect();
    (head, tail)
}
