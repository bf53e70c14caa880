// Strikeout prop lines from the hand-maintained daily CSV.
//
// Books publish prop names in inconsistent shapes ("Framber Valdez Over 5.5",
// trailing generational suffixes), so pitcher names are cleaned at ingest;
// everything downstream joins on the cleaned form.

use crate::model::resolve::clean_name;
use crate::providers::{BettingLine, BettingLineProvider, ProviderError};
use crate::teams::normalize_team;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// One row of the props CSV. Odds cells are blank when the book only lists
/// one side. Extra columns (some sheets keep an opponent column) flow into
/// `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawPropLine {
    pitcher: String,
    team: String,
    line: f64,
    #[serde(default)]
    over_odds: Option<i32>,
    #[serde(default)]
    under_odds: Option<i32>,
    #[serde(default)]
    book: String,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_lines_from_reader<R: Read>(rdr: R) -> Result<Vec<BettingLine>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut lines = Vec::new();
    for result in reader.deserialize::<RawPropLine>() {
        match result {
            Ok(raw) => {
                if !raw.line.is_finite() || raw.line <= 0.0 {
                    warn!(
                        "skipping prop for '{}': implausible line {}",
                        raw.pitcher.trim(),
                        raw.line
                    );
                    continue;
                }
                let team_raw = raw.team.trim();
                let team = normalize_team(team_raw)
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| team_raw.to_string());
                lines.push(BettingLine {
                    pitcher: clean_name(&raw.pitcher),
                    team,
                    line: raw.line,
                    over_odds: raw.over_odds,
                    under_odds: raw.under_odds,
                    book: raw.book.trim().to_string(),
                });
            }
            Err(e) => {
                warn!("skipping malformed prop row: {}", e);
            }
        }
    }
    Ok(lines)
}

/// Load strikeout prop lines from a CSV file.
pub fn load_betting_lines(path: &Path) -> Result<Vec<BettingLine>, ProviderError> {
    let file = std::fs::File::open(path).map_err(|e| ProviderError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_lines_from_reader(file).map_err(|e| ProviderError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// [`BettingLineProvider`] over the daily props file.
///
/// The file itself is the day's slate by convention; it is re-read per call
/// so an analyst can update odds between runs without restarting anything.
pub struct CsvLineProvider {
    path: PathBuf,
}

impl CsvLineProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BettingLineProvider for CsvLineProvider {
    async fn lines(&self, date: NaiveDate) -> Result<Vec<BettingLine>, ProviderError> {
        let lines = load_betting_lines(&self.path)?;
        debug!(
            "loaded {} prop lines from {} for {}",
            lines.len(),
            self.path.display(),
            date
        );
        Ok(lines)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
