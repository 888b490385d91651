//! Convert plain-text game results into the `.t` results format.
//!
//! Input lines look like `3 Jane Doe 420 John Roe 388`: round, first
//! player, score, second player, score. Names are exactly two words.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::error::TourneyError;

/// One game from the results file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub round: u32,
    pub player1: String,
    pub score1: i32,
    pub player2: String,
    pub score2: i32,
}

/// Parsed results: players numbered from 1 in order of first appearance,
/// and games ordered by round.
#[derive(Debug, Clone, Default)]
pub struct Results {
    pub players: IndexMap<String, usize>,
    pub games: Vec<GameResult>,
}

fn parse_line(line: &str) -> Option<GameResult> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [round, first1, last1, score1, first2, last2, score2] = parts[..] else {
        return None;
    };
    Some(GameResult {
        round: round.parse().ok()?,
        player1: format!("{first1} {last1}"),
        score1: score1.parse().ok()?,
        player2: format!("{first2} {last2}"),
        score2: score2.parse().ok()?,
    })
}

/// Parse results text. Blank lines are skipped.
pub fn parse_results(text: &str) -> Result<Results, TourneyError> {
    let mut results = Results::default();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let game = parse_line(line).ok_or_else(|| TourneyError::MalformedResultLine(line.to_string()))?;
        for player in [&game.player1, &game.player2] {
            let next = results.players.len() + 1;
            results.players.entry(player.clone()).or_insert(next);
        }
        results.games.push(game);
    }
    results.games.sort_by_key(|g| g.round);
    Ok(results)
}

pub fn load_results(path: &Path) -> Result<Results> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read results file: {}", path.display()))?;
    Ok(parse_results(&text)?)
}

/// Render one `.t` line per player in player-number order: padded name,
/// the literal `1`, opponent numbers, and scores.
pub fn to_t_file(results: &Results) -> String {
    let mut opponents: Vec<Vec<usize>> = vec![Vec::new(); results.players.len()];
    let mut scores: Vec<Vec<i32>> = vec![Vec::new(); results.players.len()];
    for game in &results.games {
        let p1 = results.players[&game.player1] - 1;
        let p2 = results.players[&game.player2] - 1;
        opponents[p1].push(p2 + 1);
        scores[p1].push(game.score1);
        opponents[p2].push(p1 + 1);
        scores[p2].push(game.score2);
    }

    let mut out = String::new();
    for (i, name) in results.players.keys().enumerate() {
        let opps = opponents[i].iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
        let pts = scores[i].iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
        out.push_str(&format!("{name:<24} 1 {opps}; {pts};\n"));
    }
    out
}
