// Season stat loading from FanGraphs CSV exports.
//
// Reads two files per season: a pitcher export carrying Stuff+/Location+ and
// Pitch Info usage columns, and a batter export carrying Statcast per-pitch
// run values and usage. Percentage columns may be on any consistent scale
// (fraction or 0-100): pitch usage is renormalized and every other rate stat
// only ever feeds a z-score.

use crate::model::pitch::{BatterPitchProfile, PitchExposure, PitchMix, PitchType};
use crate::model::snapshot::{BatterPopulation, BatterSeason, PitcherPopulation, PitcherSeason};
use crate::providers::{ProviderError, StatsProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private): FanGraphs export format
// ---------------------------------------------------------------------------

/// FanGraphs pitcher export row. Counting stats are f64 because exports of
/// projected seasons carry fractional values. The rating and pitch-usage
/// columns are optional: not every export includes them, and blank cells are
/// common for low-sample arms. Extra columns are absorbed via
/// `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawFangraphsPitcher {
    #[serde(alias = "playerid")]
    IDfg: i64,
    Name: String,
    #[serde(default)]
    Team: String,
    G: f64,
    IP: f64,
    SO: f64,
    BB: f64,
    H: f64,
    #[serde(rename = "Stuff+", default)]
    stuff_plus: Option<f64>,
    #[serde(rename = "Location+", default)]
    location_plus: Option<f64>,
    #[serde(rename = "FA% (pi)", default)]
    fastball_pct: Option<f64>,
    #[serde(rename = "FC% (pi)", default)]
    cutter_pct: Option<f64>,
    #[serde(rename = "SL% (pi)", default)]
    slider_pct: Option<f64>,
    #[serde(rename = "CH% (pi)", default)]
    changeup_pct: Option<f64>,
    #[serde(rename = "CU% (pi)", default)]
    curveball_pct: Option<f64>,
    #[serde(rename = "SI% (pi)", default)]
    sinker_pct: Option<f64>,
    /// Absorb the rest of the FanGraphs export.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

/// FanGraphs batter export row. The Statcast tracking columns exist for five
/// pitch types only (no sinker split on the batter side); each is optional
/// because blank cells mean the batter never saw enough of that pitch.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawFangraphsBatter {
    #[serde(alias = "playerid")]
    IDfg: i64,
    Name: String,
    #[serde(default)]
    Team: String,
    PA: f64,
    SO: f64,
    #[serde(default)]
    wOBA: Option<f64>,
    #[serde(default)]
    ISO: Option<f64>,
    #[serde(rename = "SwStr%", default)]
    swinging_strike_pct: Option<f64>,
    #[serde(rename = "Contact% (sc)", default)]
    contact_pct: Option<f64>,
    #[serde(rename = "wFA (sc)", default)]
    fastball_value: Option<f64>,
    #[serde(rename = "wSL (sc)", default)]
    slider_value: Option<f64>,
    #[serde(rename = "wCH (sc)", default)]
    changeup_value: Option<f64>,
    #[serde(rename = "wCU (sc)", default)]
    curveball_value: Option<f64>,
    #[serde(rename = "wFC (sc)", default)]
    cutter_value: Option<f64>,
    #[serde(rename = "FA% (sc)", default)]
    fastball_seen_pct: Option<f64>,
    #[serde(rename = "SL% (sc)", default)]
    slider_seen_pct: Option<f64>,
    #[serde(rename = "CH% (sc)", default)]
    changeup_seen_pct: Option<f64>,
    #[serde(rename = "CU% (sc)", default)]
    curveball_seen_pct: Option<f64>,
    #[serde(rename = "FC% (sc)", default)]
    cutter_seen_pct: Option<f64>,
    /// Absorb the rest of the FanGraphs export.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns true if all given f64 values are finite (not NaN or Infinity).
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Drop a non-finite optional metric so it imputes instead of poisoning a
/// population mean.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_pitchers_from_reader<R: Read>(rdr: R) -> Result<Vec<PitcherSeason>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut pitchers = Vec::new();
    for result in reader.deserialize::<RawFangraphsPitcher>() {
        match result {
            Ok(raw) => {
                if !all_finite(&[raw.G, raw.IP, raw.SO, raw.BB, raw.H]) {
                    warn!(
                        "skipping pitcher '{}': non-finite counting stat",
                        raw.Name.trim()
                    );
                    continue;
                }
                let pitch_mix = PitchMix::from_raw([
                    (PitchType::Fastball, raw.fastball_pct.unwrap_or(0.0)),
                    (PitchType::Cutter, raw.cutter_pct.unwrap_or(0.0)),
                    (PitchType::Slider, raw.slider_pct.unwrap_or(0.0)),
                    (PitchType::Changeup, raw.changeup_pct.unwrap_or(0.0)),
                    (PitchType::Curveball, raw.curveball_pct.unwrap_or(0.0)),
                    (PitchType::Sinker, raw.sinker_pct.unwrap_or(0.0)),
                ]);
                pitchers.push(PitcherSeason {
                    id: raw.IDfg,
                    name: raw.Name.trim().to_string(),
                    team: raw.Team.trim().to_string(),
                    games: raw.G.round() as u32,
                    innings_pitched: raw.IP,
                    strikeouts: raw.SO.round() as u32,
                    walks: raw.BB.round() as u32,
                    hits: raw.H.round() as u32,
                    stuff_rating: finite(raw.stuff_plus),
                    location_rating: finite(raw.location_plus),
                    pitch_mix,
                });
            }
            Err(e) => {
                warn!("skipping malformed pitcher row: {}", e);
            }
        }
    }
    Ok(pitchers)
}

fn load_batters_from_reader<R: Read>(rdr: R) -> Result<Vec<BatterSeason>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut batters = Vec::new();
    for result in reader.deserialize::<RawFangraphsBatter>() {
        match result {
            Ok(raw) => {
                if !all_finite(&[raw.PA, raw.SO]) {
                    warn!(
                        "skipping batter '{}': non-finite counting stat",
                        raw.Name.trim()
                    );
                    continue;
                }
                let mut per_pitch = HashMap::new();
                for (pitch, value, seen) in [
                    (PitchType::Fastball, raw.fastball_value, raw.fastball_seen_pct),
                    (PitchType::Slider, raw.slider_value, raw.slider_seen_pct),
                    (PitchType::Changeup, raw.changeup_value, raw.changeup_seen_pct),
                    (
                        PitchType::Curveball,
                        raw.curveball_value,
                        raw.curveball_seen_pct,
                    ),
                    (PitchType::Cutter, raw.cutter_value, raw.cutter_seen_pct),
                ] {
                    let exposure = PitchExposure {
                        weighted_value: finite(value),
                        pct_seen: finite(seen),
                    };
                    // A pitch the tracking data never saw him face stays
                    // absent so the matchup overlap rule can skip it.
                    if exposure.weighted_value.is_some() || exposure.pct_seen.is_some() {
                        per_pitch.insert(pitch, exposure);
                    }
                }
                batters.push(BatterSeason {
                    id: raw.IDfg,
                    name: raw.Name.trim().to_string(),
                    team: raw.Team.trim().to_string(),
                    plate_appearances: raw.PA.round() as u32,
                    strikeouts: raw.SO.round() as u32,
                    woba: finite(raw.wOBA),
                    iso: finite(raw.ISO),
                    profile: BatterPitchProfile {
                        per_pitch,
                        swinging_strike_rate: finite(raw.swinging_strike_pct),
                        contact_rate: finite(raw.contact_pct),
                    },
                });
            }
            Err(e) => {
                warn!("skipping malformed batter row: {}", e);
            }
        }
    }
    Ok(batters)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load pitcher season stats from a FanGraphs CSV export.
pub fn load_pitcher_seasons(path: &Path) -> Result<Vec<PitcherSeason>, ProviderError> {
    let file = std::fs::File::open(path).map_err(|e| ProviderError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_pitchers_from_reader(file).map_err(|e| ProviderError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load batter season stats from a FanGraphs CSV export.
pub fn load_batter_seasons(path: &Path) -> Result<Vec<BatterSeason>, ProviderError> {
    let file = std::fs::File::open(path).map_err(|e| ProviderError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_batters_from_reader(file).map_err(|e| ProviderError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// [`StatsProvider`] backed by a pair of CSV exports for one season.
///
/// Both populations are built eagerly at construction, so every slate scored
/// through this provider sees the same frozen z-score baselines.
pub struct CsvStatsProvider {
    season: i32,
    pitchers: Arc<PitcherPopulation>,
    batters: Arc<BatterPopulation>,
}

impl CsvStatsProvider {
    /// Build populations directly from already-loaded season rows.
    pub fn new(season: i32, pitchers: Vec<PitcherSeason>, batters: Vec<BatterSeason>) -> Self {
        CsvStatsProvider {
            season,
            pitchers: Arc::new(PitcherPopulation::new(season, pitchers)),
            batters: Arc::new(BatterPopulation::new(season, batters)),
        }
    }

    /// Load both exports and build the season's populations.
    pub fn from_paths(
        season: i32,
        pitchers_path: &Path,
        batters_path: &Path,
    ) -> Result<Self, ProviderError> {
        let pitchers = load_pitcher_seasons(pitchers_path)?;
        if pitchers.is_empty() {
            return Err(ProviderError::Payload(format!(
                "pitcher CSV {} produced zero valid rows",
                pitchers_path.display()
            )));
        }
        let batters = load_batter_seasons(batters_path)?;
        if batters.is_empty() {
            return Err(ProviderError::Payload(format!(
                "batter CSV {} produced zero valid rows",
                batters_path.display()
            )));
        }
        Ok(CsvStatsProvider::new(season, pitchers, batters))
    }
}

#[async_trait]
impl StatsProvider for CsvStatsProvider {
    async fn pitcher_population(&self, season: i32) -> Result<Arc<PitcherPopulation>, ProviderError> {
        if season == self.season {
            Ok(Arc::clone(&self.pitchers))
        } else {
            Err(ProviderError::MissingSeason(season))
        }
    }

    async fn batter_population(&self, season: i32) -> Result<Arc<BatterPopulation>, ProviderError> {
        if season == self.season {
            Ok(Arc::clone(&self.batters))
        } else {
            Err(ProviderError::MissingSeason(season))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
