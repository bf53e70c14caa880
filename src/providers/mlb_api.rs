// MLB Stats API client: daily schedule, probable pitchers, hydrated lineups.
//
// One GET per date against the public schedule endpoint, hydrated with
// probable pitchers and lineups, parsed into `ProbableStart`s and lineup
// name lists. The parsed payload is cached per date so the probable-start
// pass and the per-team lineup lookups share a single request.

use crate::providers::{LineupProvider, ProbableStart, ProviderError};
use crate::teams::{is_team_abbreviation, team_abbreviation};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_MLB_API_BASE: &str = "https://statsapi.mlb.com/api/v1";

const SCHEDULE_HYDRATION: &str = "probablePitcher,lineups";

// ---------------------------------------------------------------------------
// MlbApiClient
// ---------------------------------------------------------------------------

/// Client for the public MLB Stats API schedule endpoint.
pub struct MlbApiClient {
    http: reqwest::Client,
    base_url: String,
    schedule_cache: Mutex<HashMap<NaiveDate, Arc<Value>>>,
}

impl MlbApiClient {
    /// Create a client against the given API base (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            schedule_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch (or reuse) the hydrated schedule payload for a date.
    async fn day_schedule(&self, date: NaiveDate) -> Result<Arc<Value>, ProviderError> {
        let mut cache = self.schedule_cache.lock().await;
        if let Some(payload) = cache.get(&date) {
            return Ok(Arc::clone(payload));
        }

        let url = format!(
            "{}/schedule?sportId=1&date={}&hydrate={}",
            self.base_url,
            date.format("%Y-%m-%d"),
            SCHEDULE_HYDRATION
        );
        debug!("fetching MLB schedule: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Upstream(format!("schedule request failed: {e}")))?
            .error_for_status()
            .map_err(|e| ProviderError::Upstream(format!("schedule request failed: {e}")))?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Upstream(format!("schedule payload not JSON: {e}")))?;

        let payload = Arc::new(payload);
        cache.insert(date, Arc::clone(&payload));
        Ok(payload)
    }

    /// All team-sides with a listed probable pitcher on `date`, one entry
    /// per side. A game with both probables listed yields two entries.
    pub async fn probable_starts(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ProbableStart>, ProviderError> {
        let payload = self.day_schedule(date).await?;
        Ok(parse_probable_starts(&payload))
    }
}

#[async_trait]
impl LineupProvider for MlbApiClient {
    async fn lineup(&self, team: &str, date: NaiveDate) -> Result<Vec<String>, ProviderError> {
        let payload = self.day_schedule(date).await?;
        Ok(parse_lineup(&payload, team))
    }
}

// ---------------------------------------------------------------------------
// Schedule JSON parsing helpers
// ---------------------------------------------------------------------------

/// Iterate every game under `dates[].games[]`.
fn scheduled_games(payload: &Value) -> impl Iterator<Item = &Value> {
    payload
        .get("dates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|d| d.get("games").and_then(Value::as_array))
        .flatten()
}

/// Full club name for one side of a game.
///
/// Expected shape: `{ "teams": { "<side>": { "team": { "name": "..." } } } }`
fn side_team_name(game: &Value, side: &str) -> Option<String> {
    game.get("teams")?
        .get(side)?
        .get("team")?
        .get("name")?
        .as_str()
        .map(|s| s.to_string())
}

/// Probable pitcher name for one side, when hydrated.
///
/// Expected shape: `{ "teams": { "<side>": { "probablePitcher": { "fullName": "..." } } } }`
fn side_probable_pitcher(game: &Value, side: &str) -> Option<String> {
    game.get("teams")?
        .get(side)?
        .get("probablePitcher")?
        .get("fullName")?
        .as_str()
        .map(|s| s.to_string())
}

/// Canonical abbreviation for a schedule team string. Abbreviations pass
/// through untouched (lineup lookups key on them); full club names map
/// through the table; anything else is kept verbatim so an unrecognized
/// club degrades to neutral park handling instead of dropping the start.
fn abbr_or_raw(name: &str) -> String {
    if is_team_abbreviation(name) {
        return name.to_string();
    }
    match team_abbreviation(name) {
        Some(abbr) => abbr.to_string(),
        None => {
            debug!("club '{}' is outside the abbreviation table, keeping it verbatim", name);
            name.to_string()
        }
    }
}

/// Extract every probable start from a hydrated schedule payload.
pub(crate) fn parse_probable_starts(payload: &Value) -> Vec<ProbableStart> {
    let mut starts = Vec::new();
    for game in scheduled_games(payload) {
        let (Some(home_name), Some(away_name)) = (
            side_team_name(game, "home"),
            side_team_name(game, "away"),
        ) else {
            warn!("skipping schedule entry with missing team names");
            continue;
        };
        let home = abbr_or_raw(&home_name);
        let away = abbr_or_raw(&away_name);
        let game_time = game
            .get("gameDate")
            .and_then(Value::as_str)
            .map(|s| s.to_string());

        for (side, is_home) in [("home", true), ("away", false)] {
            let Some(pitcher_name) = side_probable_pitcher(game, side) else {
                continue;
            };
            starts.push(ProbableStart {
                pitcher_name,
                team: if is_home { home.clone() } else { away.clone() },
                opponent: if is_home { away.clone() } else { home.clone() },
                is_home,
                game_time: game_time.clone(),
            });
        }
    }
    starts
}

/// Pull the hydrated lineup for `team` (name or abbreviation) out of the
/// day's schedule. Missing hydration or no game for the team yields an
/// empty list: valid "no lineup published" data, not an error.
///
/// Expected shape: `{ "lineups": { "homePlayers": [ { "fullName": "..." } ] } }`
pub(crate) fn parse_lineup(payload: &Value, team: &str) -> Vec<String> {
    let target = abbr_or_raw(team);
    for game in scheduled_games(payload) {
        for (side, players_key) in [("home", "homePlayers"), ("away", "awayPlayers")] {
            let Some(name) = side_team_name(game, side) else {
                continue;
            };
            if abbr_or_raw(&name) != target {
                continue;
            }
            return game
                .get("lineups")
                .and_then(|l| l.get(players_key))
                .and_then(Value::as_array)
                .map(|players| {
                    players
                        .iter()
                        .filter_map(|p| p.get("fullName").and_then(Value::as_str))
                        .map(|s| s.to_string())
                        .collect()
                })
                .unwrap_or_default();
        }
    }
    warn!("no scheduled game found for team '{}'", team);
    Vec::new()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Value {
        serde_json::from_str(
            r#"{
                "dates": [
                    {
                        "date": "2025-06-01",
                        "games": [
                            {
                                "gamePk": 745001,
                                "gameDate": "2025-06-01T17:05:00Z",
                                "teams": {
                                    "home": {
                                        "team": { "id": 147, "name": "New York Yankees" },
                                        "probablePitcher": { "id": 543037, "fullName": "Gerrit Cole" }
                                    },
                                    "away": {
                                        "team": { "id": 111, "name": "Boston Red Sox" },
                                        "probablePitcher": { "id": 678394, "fullName": "Brayan Bello" }
                                    }
                                },
                                "lineups": {
                                    "homePlayers": [
                                        { "id": 1, "fullName": "Aaron Judge" },
                                        { "id": 2, "fullName": "Juan Soto" }
                                    ],
                                    "awayPlayers": [
                                        { "id": 3, "fullName": "Rafael Devers" }
                                    ]
                                }
                            },
                            {
                                "gamePk": 745002,
                                "gameDate": "2025-06-01T20:10:00Z",
                                "teams": {
                                    "home": {
                                        "team": { "id": 136, "name": "Seattle Mariners" },
                                        "probablePitcher": { "id": 669302, "fullName": "Logan Gilbert" }
                                    },
                                    "away": {
                                        "team": { "id": 117, "name": "Houston Astros" }
                                    }
                                }
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    // -- Probable start parsing --

    #[test]
    fn parse_probable_starts_both_sides() {
        let starts = parse_probable_starts(&sample_schedule());
        assert_eq!(starts.len(), 3);

        let cole = &starts[0];
        assert_eq!(cole.pitcher_name, "Gerrit Cole");
        assert_eq!(cole.team, "NYY");
        assert_eq!(cole.opponent, "BOS");
        assert!(cole.is_home);
        assert_eq!(cole.game_time.as_deref(), Some("2025-06-01T17:05:00Z"));

        let bello = &starts[1];
        assert_eq!(bello.pitcher_name, "Brayan Bello");
        assert_eq!(bello.team, "BOS");
        assert_eq!(bello.opponent, "NYY");
        assert!(!bello.is_home);
    }

    #[test]
    fn parse_probable_starts_skips_side_without_probable() {
        let starts = parse_probable_starts(&sample_schedule());
        // Second game lists only the home probable.
        let seattle: Vec<_> = starts.iter().filter(|s| s.opponent == "HOU").collect();
        assert_eq!(seattle.len(), 1);
        assert_eq!(seattle[0].pitcher_name, "Logan Gilbert");
        assert!(!starts.iter().any(|s| s.team == "HOU"));
    }

    #[test]
    fn parse_probable_starts_empty_schedule() {
        let payload: Value = serde_json::from_str(r#"{ "dates": [] }"#).unwrap();
        assert!(parse_probable_starts(&payload).is_empty());
    }

    #[test]
    fn parse_probable_starts_unknown_team_keeps_raw_name() {
        let payload: Value = serde_json::from_str(
            r#"{
                "dates": [{ "games": [{
                    "gameDate": "2025-03-15T18:00:00Z",
                    "teams": {
                        "home": {
                            "team": { "name": "Sultanes de Monterrey" },
                            "probablePitcher": { "fullName": "Jose Urquidy" }
                        },
                        "away": { "team": { "name": "New York Yankees" } }
                    }
                }] }]
            }"#,
        )
        .unwrap();

        let starts = parse_probable_starts(&payload);
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].team, "Sultanes de Monterrey");
        assert_eq!(starts[0].opponent, "NYY");
    }

    #[test]
    fn team_strings_normalize_by_kind() {
        assert_eq!(abbr_or_raw("Minnesota Twins"), "MIN");
        assert_eq!(abbr_or_raw("MIN"), "MIN");
        assert_eq!(abbr_or_raw("Sultanes de Monterrey"), "Sultanes de Monterrey");
    }

    // -- Lineup parsing --

    #[test]
    fn parse_lineup_home_side() {
        let names = parse_lineup(&sample_schedule(), "NYY");
        assert_eq!(names, vec!["Aaron Judge", "Juan Soto"]);
    }

    #[test]
    fn parse_lineup_away_side_by_full_name() {
        let names = parse_lineup(&sample_schedule(), "Boston Red Sox");
        assert_eq!(names, vec!["Rafael Devers"]);
    }

    #[test]
    fn parse_lineup_missing_hydration_is_empty() {
        // Second game has no lineups block at all.
        assert!(parse_lineup(&sample_schedule(), "SEA").is_empty());
    }

    #[test]
    fn parse_lineup_team_without_game_is_empty() {
        assert!(parse_lineup(&sample_schedule(), "COL").is_empty());
    }

    // -- Transport against a mock HTTP server --

    async fn spawn_schedule_server(status_line: &'static str, body: String) -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        });

        addr
    }

    #[tokio::test]
    async fn client_fetches_and_caches_schedule() {
        let body = sample_schedule().to_string();
        let addr = spawn_schedule_server("HTTP/1.1 200 OK", body).await;
        let client = MlbApiClient::new(format!("http://{addr}"));
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let starts = client.probable_starts(date).await.unwrap();
        assert_eq!(starts.len(), 3);

        // The server accepts exactly one connection; this only works because
        // the lineup call reuses the cached payload.
        let lineup = client.lineup("NYY", date).await.unwrap();
        assert_eq!(lineup, vec!["Aaron Judge", "Juan Soto"]);
    }

    #[tokio::test]
    async fn client_maps_http_error_to_upstream() {
        let addr = spawn_schedule_server(
            "HTTP/1.1 503 Service Unavailable",
            "{\"message\":\"maintenance\"}".to_string(),
        )
        .await;
        let client = MlbApiClient::new(format!("http://{addr}"));
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let err = client.probable_starts(date).await.unwrap_err();
        match err {
            ProviderError::Upstream(msg) => assert!(msg.contains("503"), "got: {msg}"),
            other => panic!("expected Upstream, got: {other}"),
        }
    }

    #[tokio::test]
    async fn client_maps_bad_json_to_upstream() {
        let addr = spawn_schedule_server("HTTP/1.1 200 OK", "<html>not json</html>".to_string()).await;
        let client = MlbApiClient::new(format!("http://{addr}"));
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let err = client.probable_starts(date).await.unwrap_err();
        assert!(matches!(err, ProviderError::Upstream(_)));
    }
}
