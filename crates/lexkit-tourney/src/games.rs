//! Game-record CSV model and score statistics.
//!
//! Records come from the game-database export written by `lexkit xt
//! games`. Numeric cells that fail to parse are read as missing, and a
//! game with a missing score or rating is left out of any statistic that
//! needs it.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TourneyError;

/// Default first date included in score statistics.
pub fn default_since() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default()
}

/// One row of a game export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameRecord {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub gameid: Option<i64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub winnerscore: Option<i64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub loserscore: Option<i64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub winneroldrating: Option<i64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub loseroldrating: Option<i64>,
    #[serde(default)]
    pub lexicon: String,
}

impl GameRecord {
    /// Winner's score minus loser's score.
    pub fn score_difference(&self) -> Option<i64> {
        Some(self.winnerscore? - self.loserscore?)
    }

    /// Absolute difference between the players' pre-game ratings.
    pub fn rating_difference(&self) -> Option<i64> {
        Some((self.winneroldrating? - self.loseroldrating?).abs())
    }

    fn played_since(&self, since: NaiveDate) -> bool {
        self.date.is_some_and(|d| d >= since)
    }

    /// Both players were rated at least `threshold` before the game.
    pub fn both_rated_at_least(&self, threshold: i64) -> bool {
        matches!(
            (self.winneroldrating, self.loseroldrating),
            (Some(w), Some(l)) if w >= threshold && l >= threshold
        )
    }
}

/// Read game records from CSV text with a header row.
pub fn read_games<R: Read>(reader: R) -> Result<Vec<GameRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut games = Vec::new();
    for (i, row) in reader.deserialize().enumerate() {
        let game: GameRecord = row.with_context(|| format!("failed to read game row {}", i + 1))?;
        games.push(game);
    }
    tracing::debug!("read {} game records", games.len());
    Ok(games)
}

/// Load a game export file.
pub fn load_games(path: &Path) -> Result<Vec<GameRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open games file: {}", path.display()))?;
    read_games(file).with_context(|| format!("failed to parse games file: {}", path.display()))
}

/// Mean and spread of score differences for a set of games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub average: f64,
    pub std_deviation: f64,
    pub total_games: usize,
}

impl ScoreSummary {
    /// Population standard deviation. `None` for no games.
    fn population(diffs: &[f64]) -> Option<Self> {
        if diffs.is_empty() {
            return None;
        }
        let n = diffs.len() as f64;
        let average = diffs.iter().sum::<f64>() / n;
        let var = diffs.iter().map(|d| (d - average).powi(2)).sum::<f64>() / n;
        Some(Self {
            average,
            std_deviation: var.sqrt(),
            total_games: diffs.len(),
        })
    }
}

/// Statistics for one rating threshold, optionally restricted to a lexicon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSummary {
    pub threshold: i64,
    pub lexicon: Option<String>,
    #[serde(flatten)]
    pub summary: ScoreSummary,
}

impl ThresholdSummary {
    pub fn label(&self) -> String {
        match &self.lexicon {
            Some(lex) => format!("Lexicon {lex}, Min Rating {}", self.threshold),
            None => format!("Min Rating {}", self.threshold),
        }
    }
}

/// Signed score-difference statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreStats {
    pub overall: Option<ScoreSummary>,
    pub by_lexicon: IndexMap<String, ScoreSummary>,
    pub by_threshold: Vec<ThresholdSummary>,
}

/// Thresholds for [`score_stats`]: 0 to 2000 in steps of 100.
pub const STATS_THRESHOLDS: std::ops::RangeInclusive<i64> = 0..=2000;
/// Thresholds for [`score_analysis`]: 1200 to 2000 in steps of 100.
pub const ANALYSIS_THRESHOLDS: std::ops::RangeInclusive<i64> = 1200..=2000;
const THRESHOLD_STEP: usize = 100;

fn scored_since(games: &[GameRecord], since: NaiveDate) -> Vec<&GameRecord> {
    games
        .iter()
        .filter(|g| g.played_since(since) && g.score_difference().is_some())
        .collect()
}

fn signed_diffs(games: &[&GameRecord]) -> Vec<f64> {
    games
        .iter()
        .filter_map(|g| g.score_difference())
        .map(|d| d as f64)
        .collect()
}

/// Signed score-difference statistics for games played on or after `since`:
/// overall, per lexicon (first-seen order), and per minimum rating, both
/// combined and per lexicon. Empty groups are left out.
pub fn score_stats(games: &[GameRecord], since: NaiveDate) -> ScoreStats {
    let games = scored_since(games, since);

    let mut lexicons: IndexMap<&str, Vec<&GameRecord>> = IndexMap::new();
    for &game in &games {
        lexicons.entry(game.lexicon.as_str()).or_default().push(game);
    }

    let mut stats = ScoreStats {
        overall: ScoreSummary::population(&signed_diffs(&games)),
        ..Default::default()
    };
    for (lexicon, group) in &lexicons {
        if let Some(summary) = ScoreSummary::population(&signed_diffs(group)) {
            stats.by_lexicon.insert(lexicon.to_string(), summary);
        }
    }

    for threshold in STATS_THRESHOLDS.step_by(THRESHOLD_STEP) {
        let rated: Vec<&GameRecord> = games
            .iter()
            .copied()
            .filter(|g| g.both_rated_at_least(threshold))
            .collect();
        if let Some(summary) = ScoreSummary::population(&signed_diffs(&rated)) {
            stats.by_threshold.push(ThresholdSummary {
                threshold,
                lexicon: None,
                summary,
            });
        }
        for lexicon in lexicons.keys() {
            let diffs: Vec<f64> = rated
                .iter()
                .filter(|g| g.lexicon == *lexicon)
                .filter_map(|g| g.score_difference())
                .map(|d| d as f64)
                .collect();
            if let Some(summary) = ScoreSummary::population(&diffs) {
                stats.by_threshold.push(ThresholdSummary {
                    threshold,
                    lexicon: Some(lexicon.to_string()),
                    summary,
                });
            }
        }
    }
    stats
}

/// One row of the absolute score-difference analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    #[serde(rename = "Lexicon")]
    pub lexicon: String,
    #[serde(rename = "Threshold")]
    pub threshold: i64,
    #[serde(rename = "Average Score Diff")]
    pub average: Option<f64>,
    /// Sample standard deviation; absent with fewer than two games.
    #[serde(rename = "StdDev Score Diff")]
    pub std_deviation: Option<f64>,
    #[serde(rename = "Game Count")]
    pub count: usize,
}

/// Absolute score differences per lexicon (sorted) and minimum rating.
/// Every lexicon gets a row for every threshold, empty or not.
pub fn score_analysis(games: &[GameRecord], since: NaiveDate) -> Vec<AnalysisRow> {
    let games = scored_since(games, since);
    let mut lexicons: BTreeMap<&str, Vec<&GameRecord>> = BTreeMap::new();
    for &game in &games {
        lexicons.entry(game.lexicon.as_str()).or_default().push(game);
    }

    let mut rows = Vec::new();
    for (lexicon, group) in &lexicons {
        for threshold in ANALYSIS_THRESHOLDS.step_by(THRESHOLD_STEP) {
            let diffs: Vec<f64> = group
                .iter()
                .filter(|g| g.both_rated_at_least(threshold))
                .filter_map(|g| g.score_difference())
                .map(|d| d.abs() as f64)
                .collect();
            let count = diffs.len();
            let average = (count > 0).then(|| diffs.iter().sum::<f64>() / count as f64);
            let std_deviation = average.filter(|_| count > 1).map(|avg| {
                let var = diffs.iter().map(|d| (d - avg).powi(2)).sum::<f64>() / (count - 1) as f64;
                var.sqrt()
            });
            rows.push(AnalysisRow {
                lexicon: lexicon.to_string(),
                threshold,
                average,
                std_deviation,
                count,
            });
        }
    }
    rows
}

/// Write analysis rows as CSV with a header row.
pub fn write_analysis_csv(rows: &[AnalysisRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// A sorted table of score differences, each appearing in proportion to
/// how often it occurred.
#[derive(Debug, Clone, Default)]
pub struct ScoreDifferenceArray {
    pub values: Vec<i64>,
    /// Games that passed the filters.
    pub total_games: usize,
    /// Occurrences of each difference among those games.
    pub counts: BTreeMap<i64, usize>,
}

/// Build the score-difference table from games on or after `start` where
/// both players were rated at least `min_rating`. A difference seen `c`
/// times appears `round(c / scale)` times, rounding halves to even.
pub fn score_difference_array(
    games: &[GameRecord],
    min_rating: i64,
    start: NaiveDate,
    scale: f64,
) -> Result<ScoreDifferenceArray, TourneyError> {
    if scale.is_nan() || scale <= 0.0 {
        return Err(TourneyError::InvalidScale(scale));
    }
    let mut array = ScoreDifferenceArray::default();
    for game in games {
        if !game.played_since(start) || !game.both_rated_at_least(min_rating) {
            continue;
        }
        if let Some(diff) = game.score_difference() {
            *array.counts.entry(diff).or_insert(0) += 1;
            array.total_games += 1;
        }
    }
    for (&diff, &count) in &array.counts {
        let instances = (count as f64 / scale).round_ties_even() as usize;
        array.values.extend(std::iter::repeat(diff).take(instances));
    }
    Ok(array)
}

/// Render values as a Go source file declaring `ScoreDifferences`, ten
/// values per line.
pub fn go_array_literal(values: &[i64]) -> String {
    let mut out = String::from("package standings\n\nvar ScoreDifferences = []int{\n");
    for (i, value) in values.iter().enumerate() {
        let end = if i + 1 == values.len() {
            "\n"
        } else if (i + 1) % 10 == 0 {
            ",\n"
        } else {
            ", "
        };
        out.push_str(&format!("{value}{end}"));
    }
    out.push_str("}\n");
    out
}

/// The first game with the largest positive rating difference.
pub fn max_rating_difference(games: &[GameRecord]) -> Option<&GameRecord> {
    let mut best: Option<(&GameRecord, i64)> = None;
    for game in games {
        let Some(diff) = game.rating_difference() else {
            continue;
        };
        if diff > best.map_or(0, |(_, d)| d) {
            best = Some((game, diff));
        }
    }
    best.map(|(game, _)| game)
}
