// External data capabilities: season stats, lineups, betting lines.
//
// The engine consumes these three traits and nothing else about the outside
// world. Retrieval policy (retries, rate limits, caching beyond the season
// snapshot) belongs to implementations, never to the engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::snapshot::{BatterPopulation, PitcherPopulation};

pub mod lines_csv;
pub mod mlb_api;
pub mod stats_csv;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("no statistics loaded for season {0}")]
    MissingSeason(i32),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("malformed upstream payload: {0}")]
    Payload(String),
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Season-level statistical populations.
///
/// Implementations must hand back the same snapshot for repeated calls with
/// the same season: scoring a slate against a population that shifts
/// mid-batch would make z-scores incomparable across pitchers.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn pitcher_population(&self, season: i32)
        -> Result<Arc<PitcherPopulation>, ProviderError>;

    async fn batter_population(&self, season: i32) -> Result<Arc<BatterPopulation>, ProviderError>;
}

/// Starting lineups by team and date.
#[async_trait]
pub trait LineupProvider: Send + Sync {
    /// Batter display names in batting order, up to nine. An empty list is
    /// valid data ("no lineup posted yet"), not an error.
    async fn lineup(&self, team: &str, date: NaiveDate) -> Result<Vec<String>, ProviderError>;
}

/// Strikeout prop lines for a slate date.
///
/// Lines are joined to pitchers downstream by exact cleaned-name plus team
/// abbreviation equality. That join is deliberately narrow: a line whose
/// feed spells the pitcher differently simply goes unmatched rather than
/// being fuzzily attached to the wrong arm.
#[async_trait]
pub trait BettingLineProvider: Send + Sync {
    async fn lines(&self, date: NaiveDate) -> Result<Vec<BettingLine>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Shared data shapes
// ---------------------------------------------------------------------------

/// One sportsbook strikeout prop.
#[derive(Debug, Clone, PartialEq)]
pub struct BettingLine {
    /// Pitcher name as the feed spells it, after input cleaning.
    pub pitcher: String,
    /// Team abbreviation.
    pub team: String,
    /// The strikeout line (e.g. 6.5).
    pub line: f64,
    /// American odds for the over, when the feed carries them.
    pub over_odds: Option<i32>,
    /// American odds for the under, when the feed carries them.
    pub under_odds: Option<i32>,
    /// Book name ("FanDuel", "DraftKings", ...).
    pub book: String,
}

/// One probable start on the slate: the schedule-side context the engine
/// needs before any stats are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbableStart {
    pub pitcher_name: String,
    pub team: String,
    pub opponent: String,
    pub is_home: bool,
    /// Scheduled first pitch, UTC ISO-8601 as the schedule API reports it.
    pub game_time: Option<String>,
}
