//! In-memory game source for testing the archive walkers without HTTP.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::crosstables::{Game, GameSource};
use crate::error::RemoteError;

/// A fixed set of games keyed by id. Records every range requested.
pub struct MockGameSource {
    games: BTreeMap<u64, Game>,
    fail: bool,
    requests: Mutex<Vec<(u64, u64)>>,
}

impl MockGameSource {
    /// Games for each id with `loseroldrating` 1000 and a winner rated
    /// [`Self::rating_gap`] higher.
    pub fn with_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        let games = ids
            .into_iter()
            .map(|id| {
                let mut game = Game::new();
                game.insert("gameid".into(), Value::from(id));
                game.insert("winneroldrating".into(), Value::from(1000 + Self::rating_gap(id)));
                game.insert("loseroldrating".into(), Value::from(1000));
                (id, game)
            })
            .collect();
        Self {
            games,
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A source whose every request fails with a server error.
    pub fn failing() -> Self {
        Self {
            games: BTreeMap::new(),
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn rating_gap(id: u64) -> i64 {
        (id % 1200) as i64
    }

    /// Ranges requested so far, in order.
    pub fn requests(&self) -> Vec<(u64, u64)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GameSource for MockGameSource {
    async fn max_game_id(&self) -> Result<u64, RemoteError> {
        if self.fail {
            return Err(RemoteError::Network("mock failure".into()));
        }
        Ok(self.games.keys().next_back().copied().unwrap_or(0))
    }

    async fn fetch_games(&self, min_id: u64, max_id: u64) -> Result<Vec<Game>, RemoteError> {
        self.requests.lock().unwrap().push((min_id, max_id));
        if self.fail {
            return Err(RemoteError::Http {
                status: 500,
                url: "mock".into(),
            });
        }
        Ok(self.games.range(min_id..=max_id).map(|(_, g)| g.clone()).collect())
    }
}
