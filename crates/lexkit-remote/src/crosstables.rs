//! Client for the cross-tables game-database REST API.
//!
//! The API exposes the archive by numeric game id (`games.php`), player
//! histories (`player.php`), and an index of annotated games
//! (`allanno.php`, served as CSV). Game objects are kept as ordered maps of
//! raw JSON values so an export preserves every column the server sends.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::config::CrossTablesConfig;
use crate::error::RemoteError;
use crate::http;

/// A game as returned by `games.php`, in server key order.
pub type Game = IndexMap<String, Value>;

/// A row of the annotated-games index, keyed by trimmed header.
pub type AnnotatedGame = IndexMap<String, String>;

/// Ids requested per call by [`scan_max_rating_difference`].
pub const SCAN_CHUNK: u64 = 500;

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-\w.]").expect("valid filename regex"));

/// Anything that can serve games by id range.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Highest game id in the archive.
    async fn max_game_id(&self) -> Result<u64, RemoteError>;

    /// Games with ids in `min_id..=max_id`. One attempt, no retries.
    async fn fetch_games(&self, min_id: u64, max_id: u64) -> Result<Vec<Game>, RemoteError>;
}

/// How often and how patiently to retry a failed chunk request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl From<&CrossTablesConfig> for RetryPolicy {
    fn from(config: &CrossTablesConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: config.retry_delay(),
        }
    }
}

/// A player's tournament, as listed in their results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TournamentResult {
    #[serde(deserialize_with = "string_or_number")]
    pub tourneyid: String,
    pub tourneyname: String,
    pub date: String,
}

#[derive(Deserialize)]
struct PlayerResponse {
    player: PlayerData,
}

#[derive(Deserialize)]
struct PlayerData {
    #[serde(default)]
    results: Option<Vec<TournamentResult>>,
}

#[derive(Deserialize)]
struct GamesResponse {
    games: Vec<Game>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Read an integer field that the API may send as a number or a string.
pub fn int_field(game: &Game, key: &str) -> Option<i64> {
    match game.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// HTTP client for the game-database API.
pub struct CrossTablesClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl CrossTablesClient {
    pub fn new(config: &CrossTablesConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: http::build_client(&config.user_agent, config.timeout_secs)?,
            timeout_secs: config.timeout_secs,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Tournaments from a player's result history.
    #[instrument(skip(self))]
    pub async fn player_results(&self, player_id: i64) -> Result<Vec<TournamentResult>, RemoteError> {
        let url = self.endpoint(&format!("player.php?player={player_id}&results=1"));
        info!("fetching tournament history for player {player_id}");
        let response: PlayerResponse = http::get_json(&self.client, &url, self.timeout_secs).await?;
        response.player.results.ok_or(RemoteError::MissingField("results"))
    }

    /// The annotated-games index.
    #[instrument(skip(self))]
    pub async fn annotated_games(&self) -> Result<Vec<AnnotatedGame>, RemoteError> {
        let url = self.endpoint("allanno.php");
        info!("fetching annotated game index");
        let body = http::get_bytes(&self.client, &url, self.timeout_secs).await?;
        parse_annotated_index(&body).map_err(|e| RemoteError::Decode {
            url,
            message: e.to_string(),
        })
    }

    /// Download any URL as text with this client's headers.
    #[instrument(skip(self))]
    pub async fn download_text(&self, url: &str) -> Result<String, RemoteError> {
        http::get_text(&self.client, url, self.timeout_secs).await
    }
}

#[async_trait]
impl GameSource for CrossTablesClient {
    #[instrument(skip(self))]
    async fn max_game_id(&self) -> Result<u64, RemoteError> {
        let url = self.endpoint("info.php");
        info!("querying {url}");
        let data: Value = http::get_json(&self.client, &url, self.timeout_secs).await?;
        let id = match data.get("maxgameid") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        id.ok_or(RemoteError::MissingField("maxgameid"))
    }

    #[instrument(skip(self))]
    async fn fetch_games(&self, min_id: u64, max_id: u64) -> Result<Vec<Game>, RemoteError> {
        let url = self.endpoint(&format!("games.php?minid={min_id}&maxid={max_id}"));
        info!("querying {url}");
        let body = http::get_bytes(&self.client, &url, self.timeout_secs).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            warn!("received an empty response");
            return Ok(Vec::new());
        }
        let response: GamesResponse = serde_json::from_slice(&body).map_err(|e| RemoteError::Decode {
            url,
            message: e.to_string(),
        })?;
        Ok(response.games)
    }
}

fn parse_annotated_index(body: &[u8]) -> Result<Vec<AnnotatedGame>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(body);
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
        );
    }
    Ok(rows)
}

/// Fetch a chunk, retrying transient failures. Gives up with no games once
/// retries run out or the failure is not worth retrying.
pub async fn games_with_retry<S: GameSource + ?Sized>(
    source: &S,
    min_id: u64,
    max_id: u64,
    policy: &RetryPolicy,
) -> Vec<Game> {
    let attempts = policy.max_retries.max(1);
    for attempt in 1..=attempts {
        match source.fetch_games(min_id, max_id).await {
            Ok(games) => return games,
            Err(e) if e.is_transient() && attempt < attempts => {
                warn!("request error: {e}. attempt {attempt}/{attempts}");
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => {
                warn!("giving up on games {min_id} to {max_id}: {e}");
                return Vec::new();
            }
        }
    }
    Vec::new()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Writes games as CSV. The header is taken from the first game written;
/// later games missing a column get an empty cell.
pub struct GameCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    header: Option<Vec<String>>,
    written: usize,
}

impl<W: Write> GameCsvWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(inner),
            header: None,
            written: 0,
        }
    }

    pub fn write_games(&mut self, games: &[Game]) -> Result<()> {
        for game in games {
            let header = match self.header.take() {
                Some(header) => header,
                None => {
                    let header: Vec<String> = game.keys().cloned().collect();
                    self.writer.write_record(&header)?;
                    header
                }
            };
            self.writer
                .write_record(header.iter().map(|key| cell(game.get(key))))?;
            self.header = Some(header);
            self.written += 1;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Games written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush CSV output: {}", e.error()))
    }
}

/// Walk down from `highest` in chunks, writing up to `count` games.
///
/// Each step requests `max = current - 1` down to `max(max - chunk + 1, 1)`.
/// Chunks that come back empty are skipped. Stops when `count` games are
/// written or ids run out. Returns the number written.
pub async fn collect_games<S, W>(
    source: &S,
    highest: u64,
    count: usize,
    chunk: u64,
    policy: &RetryPolicy,
    out: &mut GameCsvWriter<W>,
) -> Result<usize>
where
    S: GameSource + ?Sized,
    W: Write,
{
    anyhow::ensure!(chunk > 0, "chunk size must be at least 1");
    let mut remaining = count;
    let mut current = highest;
    while remaining > 0 && current > 1 {
        let max_id = current - 1;
        let min_id = max_id.saturating_sub(chunk - 1).max(1);
        let batch = games_with_retry(source, min_id, max_id, policy).await;
        current = min_id;
        if batch.is_empty() {
            info!("no games found in range {min_id} to {max_id}");
            continue;
        }
        let take = batch.len().min(remaining);
        out.write_games(&batch[..take])?;
        remaining -= take;
        info!("wrote {take} games ({} of {count})", count - remaining);
    }
    Ok(count - remaining)
}

/// Scan every id from 1 to `highest` and return the game with the largest
/// rating difference between the players, with that difference. A failed
/// request aborts the scan.
pub async fn scan_max_rating_difference<S: GameSource + ?Sized>(
    source: &S,
    highest: u64,
    chunk: u64,
) -> Result<Option<(Game, i64)>> {
    anyhow::ensure!(chunk > 0, "chunk size must be at least 1");
    let mut best: Option<(Game, i64)> = None;
    let mut min_id = 1;
    while min_id <= highest {
        let max_id = (min_id + chunk - 1).min(highest);
        info!("request: {min_id} - {max_id}");
        let games = source
            .fetch_games(min_id, max_id)
            .await
            .with_context(|| format!("request for games {min_id} to {max_id} failed"))?;
        for game in games {
            let (Some(winner), Some(loser)) = (
                int_field(&game, "winneroldrating"),
                int_field(&game, "loseroldrating"),
            ) else {
                warn!("skipping game without ratings: {:?}", game.get("gameid"));
                continue;
            };
            let diff = (winner - loser).abs();
            if diff > best.as_ref().map_or(0, |(_, d)| *d) {
                best = Some((game, diff));
            }
        }
        min_id += chunk;
    }
    Ok(best)
}

/// A tournament selected for annotation download.
#[derive(Debug, Clone, PartialEq)]
pub struct Tournament {
    /// Name with path separators replaced by `-`.
    pub name: String,
    pub date: String,
}

/// Tournaments dated within `start..=end`, keyed by tournament id.
pub fn tournaments_in_range(
    results: &[TournamentResult],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<IndexMap<String, Tournament>> {
    let mut selected = IndexMap::new();
    for result in results {
        let date = NaiveDate::parse_from_str(&result.date, "%Y-%m-%d")
            .with_context(|| format!("error processing tournament data: bad date '{}'", result.date))?;
        if start <= date && date <= end {
            selected.insert(
                result.tourneyid.clone(),
                Tournament {
                    name: result.tourneyname.replace(['/', '\\'], "-"),
                    date: result.date.clone(),
                },
            );
        }
    }
    if selected.is_empty() {
        return Err(RemoteError::NoTournaments.into());
    }
    Ok(selected)
}

/// Strip spaces and any character outside `[-\w.]`.
pub fn sanitize_filename(name: &str) -> String {
    UNSAFE_FILENAME_CHARS
        .replace_all(&name.replace(' ', ""), "")
        .into_owned()
}

/// Folder name for a player's annotation download.
pub fn annotations_root(player_id: i64, start: NaiveDate, end: NaiveDate) -> String {
    format!("{player_id}_annos_{start}_to_{end}")
}

/// One annotated game to fetch and where to save it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDownload {
    pub game_id: Option<String>,
    pub url: String,
    pub path: PathBuf,
}

fn field<'a>(game: &'a AnnotatedGame, key: &str) -> Result<&'a str> {
    game.get(key)
        .map(|v| v.trim())
        .with_context(|| format!("error processing game: missing '{key}'"))
}

/// Pick the annotated games from `tournaments` that `player_id` played,
/// laid out as `{root}/{date}-{tourney}/r{round}_{opponent}.gcg`.
pub fn plan_annotation_downloads(
    index: &[AnnotatedGame],
    player_id: i64,
    tournaments: &IndexMap<String, Tournament>,
    root: &Path,
) -> Result<Vec<AnnotationDownload>> {
    let mut plan = Vec::new();
    for game in index {
        let Some(tourney) = tournaments.get(field(game, "tourneyID")?) else {
            continue;
        };
        let url = field(game, "url")?;
        if url.is_empty() {
            continue;
        }
        let parse_id = |key: &str| -> Result<i64> {
            let raw = field(game, key)?;
            raw.parse()
                .with_context(|| format!("error processing game: bad {key} '{raw}'"))
        };
        let (p1, p2) = (parse_id("player1ID")?, parse_id("player2ID")?);
        let opponent = if player_id == p1 {
            field(game, "player2Name")?
        } else if player_id == p2 {
            field(game, "player1Name")?
        } else {
            continue;
        };
        let folder = root.join(format!("{}-{}", tourney.date, sanitize_filename(&tourney.name)));
        let file = format!("r{}_{}.gcg", field(game, "round")?, sanitize_filename(opponent));
        plan.push(AnnotationDownload {
            game_id: game.get("ID").cloned(),
            url: url.to_string(),
            path: folder.join(file),
        });
    }
    Ok(plan)
}

/// Download every annotated game `player_id` played in tournaments dated
/// `start..=end` into `{out_dir}/{player}_annos_{start}_to_{end}/`.
pub async fn download_annotations(
    client: &CrossTablesClient,
    player_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if start > end {
        return Err(RemoteError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        }
        .into());
    }
    let results = client.player_results(player_id).await?;
    let tournaments = tournaments_in_range(&results, start, end)?;
    info!("found {} tournaments in the specified date range", tournaments.len());

    let index = client.annotated_games().await?;
    info!("processing {} annotated games", index.len());
    let root = out_dir.join(annotations_root(player_id, start, end));
    let plan = plan_annotation_downloads(&index, player_id, &tournaments, &root)?;

    let mut saved = Vec::new();
    for item in plan {
        if let Some(parent) = item.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = client.download_text(&item.url).await?;
        std::fs::write(&item.path, text)
            .with_context(|| format!("failed to write {}", item.path.display()))?;
        info!(
            "saved game {} to '{}'",
            item.game_id.as_deref().unwrap_or("?"),
            item.path.display()
        );
        saved.push(item.path);
    }
    if saved.is_empty() {
        return Err(RemoteError::NoAnnotatedGames.into());
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGameSource;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CrossTablesClient {
        let config = CrossTablesConfig {
            base_url: format!("{}/rest/", server.uri()),
            ..Default::default()
        };
        CrossTablesClient::new(&config).unwrap()
    }

    fn no_wait(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            delay: Duration::ZERO,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn max_game_id_accepts_string_or_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/info.php"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"maxgameid": "41234"})),
            )
            .mount(&server)
            .await;
        assert_eq!(client_for(&server).max_game_id().await.unwrap(), 41234);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/info.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"maxgameid": 7})))
            .mount(&server)
            .await;
        assert_eq!(client_for(&server).max_game_id().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn max_game_id_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/info.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        let err = client_for(&server).max_game_id().await.unwrap_err();
        assert!(matches!(err, RemoteError::MissingField("maxgameid")));
    }

    #[tokio::test]
    async fn fetch_games_keeps_key_order() {
        let server = MockServer::start().await;
        let body = r#"{"games":[{"gameid":"5","winnerscore":"400","date":"2020-01-01"}]}"#;
        Mock::given(method("GET"))
            .and(path("/rest/games.php"))
            .and(query_param("minid", "1"))
            .and(query_param("maxid", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
        let games = client_for(&server).fetch_games(1, 10).await.unwrap();
        let keys: Vec<_> = games[0].keys().cloned().collect();
        assert_eq!(keys, vec!["gameid", "winnerscore", "date"]);
        assert_eq!(int_field(&games[0], "winnerscore"), Some(400));
    }

    #[tokio::test]
    async fn empty_body_means_no_games() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/games.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
            .mount(&server)
            .await;
        assert!(client_for(&server).fetch_games(1, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn retry_recovers_from_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/games.php"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/games.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"games":[{"gameid":1}]}"#))
            .mount(&server)
            .await;
        let client = client_for(&server);
        let games = games_with_retry(&client, 1, 1, &no_wait(3)).await;
        assert_eq!(games.len(), 1);
    }

    #[tokio::test]
    async fn retry_gives_up_with_no_games() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/games.php"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;
        let client = client_for(&server);
        assert!(games_with_retry(&client, 1, 1, &no_wait(2)).await.is_empty());
    }

    #[tokio::test]
    async fn decode_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/games.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);
        assert!(games_with_retry(&client, 1, 1, &no_wait(5)).await.is_empty());
    }

    #[tokio::test]
    async fn collect_walks_down_in_chunks() {
        let source = MockGameSource::with_ids(1..=25);
        let mut out = GameCsvWriter::new(Vec::new());
        let written = collect_games(&source, 25, 12, 10, &no_wait(1), &mut out)
            .await
            .unwrap();
        assert_eq!(written, 12);
        assert_eq!(source.requests(), vec![(15, 24), (5, 14)]);

        let csv = String::from_utf8(out.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "gameid,winneroldrating,loseroldrating");
        assert_eq!(lines.len(), 13);
        assert!(lines[1].starts_with("15,"));
    }

    #[tokio::test]
    async fn collect_stops_when_ids_run_out() {
        let source = MockGameSource::with_ids(1..=3);
        let mut out = GameCsvWriter::new(Vec::new());
        let written = collect_games(&source, 25, 100, 10, &no_wait(1), &mut out)
            .await
            .unwrap();
        assert_eq!(written, 3);
        assert_eq!(source.requests(), vec![(15, 24), (5, 14), (1, 4)]);
    }

    #[tokio::test]
    async fn scan_finds_largest_gap() {
        let source = MockGameSource::with_ids(1..=1200);
        let (game, diff) = scan_max_rating_difference(&source, 1200, SCAN_CHUNK)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(int_field(&game, "gameid"), Some(1199));
        assert_eq!(diff, MockGameSource::rating_gap(1199));
        assert_eq!(source.requests(), vec![(1, 500), (501, 1000), (1001, 1200)]);
    }

    #[tokio::test]
    async fn scan_fails_on_request_error() {
        let source = MockGameSource::failing();
        assert!(scan_max_rating_difference(&source, 10, 5).await.is_err());
    }

    #[test]
    fn csv_writer_fills_missing_columns() {
        let mut first = Game::new();
        first.insert("a".into(), Value::from(1));
        first.insert("b".into(), Value::from("x"));
        let mut second = Game::new();
        second.insert("b".into(), Value::Null);
        let mut out = GameCsvWriter::new(Vec::new());
        out.write_games(&[first, second]).unwrap();
        assert_eq!(out.written(), 2);
        let csv = String::from_utf8(out.into_inner().unwrap()).unwrap();
        assert_eq!(csv, "a,b\n1,x\n,\n");
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_filename("Jane O'Doe"), "JaneODoe");
        assert_eq!(sanitize_filename("Nationals (2024)"), "Nationals2024");
        assert_eq!(sanitize_filename("a-b_c.d"), "a-b_c.d");
    }

    fn results() -> Vec<TournamentResult> {
        vec![
            TournamentResult {
                tourneyid: "10".into(),
                tourneyname: "Spring/Open".into(),
                date: "2024-03-01".into(),
            },
            TournamentResult {
                tourneyid: "11".into(),
                tourneyname: "Winter".into(),
                date: "2023-12-01".into(),
            },
        ]
    }

    #[test]
    fn tournaments_filtered_by_date() {
        let selected = tournaments_in_range(&results(), date("2024-01-01"), date("2024-12-31")).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected["10"].name, "Spring-Open");

        let err = tournaments_in_range(&results(), date("2020-01-01"), date("2020-12-31")).unwrap_err();
        assert!(err.to_string().contains("no tournaments"));
    }

    #[test]
    fn plan_picks_players_games() {
        let index = parse_annotated_index(
            b"ID, tourneyID ,url,player1ID,player2ID,player1Name,player2Name,round\n\
1,10,http://x/1.gcg,42,7,Me,Sam Smith,3\n\
2,10,,42,8,Me,Nobody,4\n\
3,10,http://x/3.gcg,5,6,A,B,5\n\
4,99,http://x/4.gcg,42,9,Me,Elsewhere,1\n\
5,10,http://x/5.gcg,9,42,Pat Lee,Me,6\n",
        )
        .unwrap();
        let tournaments = tournaments_in_range(&results(), date("2024-01-01"), date("2024-12-31")).unwrap();
        let plan = plan_annotation_downloads(&index, 42, &tournaments, Path::new("root")).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].path, Path::new("root/2024-03-01-Spring-Open/r3_SamSmith.gcg"));
        assert_eq!(plan[1].path, Path::new("root/2024-03-01-Spring-Open/r6_PatLee.gcg"));
        assert_eq!(plan[1].game_id.as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn downloads_annotations_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/player.php"))
            .and(query_param("player", "42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "player": {"results": [
                    {"tourneyid": 10, "tourneyname": "Spring Open", "date": "2024-03-01"}
                ]}
            })))
            .mount(&server)
            .await;
        let index = format!(
            "ID,tourneyID,url,player1ID,player2ID,player1Name,player2Name,round\n\
1,10,{}/games/1.gcg,42,7,Me,Sam,3\n",
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/rest/allanno.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string(index))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/games/1.gcg"))
            .respond_with(ResponseTemplate::new(200).set_body_string("#player1 me Me\n"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&server);
        let saved = download_annotations(&client, 42, date("2024-01-01"), date("2024-12-31"), dir.path())
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].ends_with("42_annos_2024-01-01_to_2024-12-31/2024-03-01-SpringOpen/r3_Sam.gcg"));
        assert_eq!(std::fs::read_to_string(&saved[0]).unwrap(), "#player1 me Me\n");
    }

    #[tokio::test]
    async fn missing_results_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/player.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"player": {}})))
            .mount(&server)
            .await;
        let err = client_for(&server).player_results(1).await.unwrap_err();
        assert!(matches!(err, RemoteError::MissingField("results")));
    }

    #[tokio::test]
    async fn reversed_date_range_is_rejected() {
        let server = MockServer::start().await;
        let client = client_for(&server);
        let dir = tempfile::tempdir().unwrap();
        let err = download_annotations(&client, 1, date("2024-02-01"), date("2024-01-01"), dir.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("after end date"));
    }
}
