// Season population snapshots and the statistics derived over them.
//
// Populations are built once per season from the loaded stat records, then
// handed around by shared reference. Every z-score the engine consumes is
// precomputed here against the full population, so scoring a slate never
// mutates or extends the snapshot.

use std::collections::HashMap;

use crate::model::pitch::{BatterPitchProfile, MatchupZProfile, PitchMix, PitchType, PitchZScores};
use crate::model::resolve::{NameResolver, PlayerIdentity};
use crate::model::zscore::NormalizedSeries;

/// League-average wOBA, the anchor for the innings adjustment.
pub const LEAGUE_AVG_WOBA: f64 = 0.320;

/// Quality ratings are league-indexed at 100; one rating point is a
/// twentieth of the mapped score.
const RATING_BASELINE: f64 = 100.0;
const RATING_SCALE: f64 = 20.0;

// ---------------------------------------------------------------------------
// Season records
// ---------------------------------------------------------------------------

/// One pitcher's season line as loaded from the stat export.
#[derive(Debug, Clone)]
pub struct PitcherSeason {
    pub id: i64,
    pub name: String,
    pub team: String,
    pub games: u32,
    pub innings_pitched: f64,
    pub strikeouts: u32,
    pub walks: u32,
    pub hits: u32,
    /// League-indexed stuff rating (100 = average), when published.
    pub stuff_rating: Option<f64>,
    /// League-indexed location rating (100 = average), when published.
    pub location_rating: Option<f64>,
    pub pitch_mix: PitchMix,
}

impl PitcherSeason {
    /// Strikeouts per nine innings. `None` without positive innings; a
    /// required stat, so callers treat `None` as a hard per-pitcher failure.
    pub fn k_per_9(&self) -> Option<f64> {
        if self.innings_pitched > 0.0 {
            Some(self.strikeouts as f64 * 9.0 / self.innings_pitched)
        } else {
            None
        }
    }

    /// Average innings per appearance. `None` without positive games.
    pub fn base_innings_per_start(&self) -> Option<f64> {
        if self.games > 0 {
            Some(self.innings_pitched / self.games as f64)
        } else {
            None
        }
    }

    /// The K-rate fed to the population z-score:
    /// `(SO * 9) / (IP * 9 + BB + H)`.
    ///
    /// The denominator is not a textbook batters-faced count, but the value
    /// only ever feeds a z-score, so only the ordering matters; preserved
    /// exactly as the source pipeline computes it.
    pub fn k_rate(&self) -> Option<f64> {
        let denom = self.innings_pitched * 9.0 + self.walks as f64 + self.hits as f64;
        if denom > 0.0 {
            Some(self.strikeouts as f64 * 9.0 / denom)
        } else {
            None
        }
    }

    /// Blended pitch quality score in [-1, 1]: 60% stuff, 40% location,
    /// each mapped as `(rating - 100) / 20`, clamped.
    ///
    /// A missing rating imputes at the 100 baseline. The ratings are
    /// league-indexed, so that is mean imputation expressed in the rating's
    /// own scale and contributes exactly 0.
    pub fn pitch_quality_score(&self) -> f64 {
        let stuff = (self.stuff_rating.unwrap_or(RATING_BASELINE) - RATING_BASELINE) / RATING_SCALE;
        let location =
            (self.location_rating.unwrap_or(RATING_BASELINE) - RATING_BASELINE) / RATING_SCALE;
        (0.6 * stuff + 0.4 * location).clamp(-1.0, 1.0)
    }
}

/// One batter's season line as loaded from the stat export.
#[derive(Debug, Clone)]
pub struct BatterSeason {
    pub id: i64,
    pub name: String,
    pub team: String,
    pub plate_appearances: u32,
    pub strikeouts: u32,
    pub woba: Option<f64>,
    pub iso: Option<f64>,
    pub profile: BatterPitchProfile,
}

impl BatterSeason {
    /// Strikeouts per plate appearance. `None` without plate appearances
    /// (then imputed at the population mean like any missing metric).
    pub fn k_pct(&self) -> Option<f64> {
        if self.plate_appearances > 0 {
            Some(self.strikeouts as f64 / self.plate_appearances as f64)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Pitcher population
// ---------------------------------------------------------------------------

/// Read-only snapshot of a season's pitcher universe.
#[derive(Debug)]
pub struct PitcherPopulation {
    season: i32,
    players: Vec<PitcherSeason>,
    k_rate: NormalizedSeries,
    by_id: HashMap<i64, usize>,
}

impl PitcherPopulation {
    pub fn new(season: i32, players: Vec<PitcherSeason>) -> Self {
        let k_rates: Vec<Option<f64>> = players.iter().map(|p| p.k_rate()).collect();
        let k_rate = NormalizedSeries::from_optional(&k_rates);
        let mut by_id = HashMap::new();
        for (i, player) in players.iter().enumerate() {
            by_id.entry(player.id).or_insert(i);
        }
        PitcherPopulation {
            season,
            players,
            k_rate,
            by_id,
        }
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PitcherSeason] {
        &self.players
    }

    pub fn get(&self, id: i64) -> Option<&PitcherSeason> {
        self.by_id.get(&id).map(|&i| &self.players[i])
    }

    /// Population z-score of the pitcher's K-rate.
    pub fn k_rate_z(&self, id: i64) -> Option<f64> {
        self.by_id.get(&id).map(|&i| self.k_rate.member_z(i))
    }

    pub fn identities(&self) -> Vec<PlayerIdentity> {
        self.players
            .iter()
            .map(|p| PlayerIdentity {
                id: p.id,
                name: p.name.clone(),
            })
            .collect()
    }

    /// A fresh resolver over this population's display names.
    pub fn resolver(&self) -> NameResolver {
        NameResolver::new(self.identities())
    }
}

// ---------------------------------------------------------------------------
// Batter population
// ---------------------------------------------------------------------------

/// Read-only snapshot of a season's batter universe, with the
/// susceptibility z-scores and per-pitch matchup profiles precomputed.
#[derive(Debug)]
pub struct BatterPopulation {
    season: i32,
    players: Vec<BatterSeason>,
    susceptibility_z: Vec<f64>,
    woba: NormalizedSeries,
    matchup_profiles: Vec<MatchupZProfile>,
    by_id: HashMap<i64, usize>,
}

impl BatterPopulation {
    pub fn new(season: i32, players: Vec<BatterSeason>) -> Self {
        let n = players.len();

        let woba = NormalizedSeries::from_optional(
            &players.iter().map(|b| b.woba).collect::<Vec<_>>(),
        );
        let k_pct = NormalizedSeries::from_optional(
            &players.iter().map(|b| b.k_pct()).collect::<Vec<_>>(),
        );
        let iso = NormalizedSeries::from_optional(
            &players.iter().map(|b| b.iso).collect::<Vec<_>>(),
        );

        // Susceptibility blends strikeout proneness, (inverted) overall
        // production, and power, then is re-normalized so the blend itself
        // reads as a z-score.
        let susceptibility_raw: Vec<f64> = (0..n)
            .map(|i| {
                0.7 * k_pct.member_z(i) + 0.2 * (-woba.member_z(i)) + 0.1 * iso.member_z(i)
            })
            .collect();
        let susceptibility = NormalizedSeries::from_values(susceptibility_raw);
        let susceptibility_z: Vec<f64> = (0..n).map(|i| susceptibility.member_z(i)).collect();

        let matchup_profiles = build_matchup_profiles(&players);

        let mut by_id = HashMap::new();
        for (i, player) in players.iter().enumerate() {
            by_id.entry(player.id).or_insert(i);
        }

        BatterPopulation {
            season,
            players,
            susceptibility_z,
            woba,
            matchup_profiles,
            by_id,
        }
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[BatterSeason] {
        &self.players
    }

    pub fn get(&self, id: i64) -> Option<&BatterSeason> {
        self.by_id.get(&id).map(|&i| &self.players[i])
    }

    /// Re-normalized susceptibility z-score for one batter.
    pub fn susceptibility_z(&self, id: i64) -> Option<f64> {
        self.by_id.get(&id).map(|&i| self.susceptibility_z[i])
    }

    /// The batter's wOBA after population-mean imputation.
    pub fn woba(&self, id: i64) -> Option<f64> {
        self.by_id.get(&id).map(|&i| self.woba.member_value(i))
    }

    /// The precomputed matchup profile for one batter.
    pub fn matchup_profile(&self, id: i64) -> Option<&MatchupZProfile> {
        self.by_id.get(&id).map(|&i| &self.matchup_profiles[i])
    }

    pub fn identities(&self) -> Vec<PlayerIdentity> {
        self.players
            .iter()
            .map(|b| PlayerIdentity {
                id: b.id,
                name: b.name.clone(),
            })
            .collect()
    }

    /// A fresh resolver over this population's display names.
    pub fn resolver(&self) -> NameResolver {
        NameResolver::new(self.identities())
    }
}

/// Z-score every per-pitch exposure metric within its pitch type's
/// population, plus the batter-general swing metrics across all batters.
///
/// A batter's profile only carries z-scores for the pitch types his raw
/// profile covers; the imputed series still counts him (at the mean) so
/// population statistics stay stable, but coverage drives the matchup
/// overlap rule.
fn build_matchup_profiles(players: &[BatterSeason]) -> Vec<MatchupZProfile> {
    let n = players.len();

    let swstr = NormalizedSeries::from_optional(
        &players
            .iter()
            .map(|b| b.profile.swinging_strike_rate)
            .collect::<Vec<_>>(),
    );
    let contact = NormalizedSeries::from_optional(
        &players
            .iter()
            .map(|b| b.profile.contact_rate)
            .collect::<Vec<_>>(),
    );

    // One (weighted value, pct seen) series pair per pitch type that anyone
    // in the population covers.
    let covered: Vec<PitchType> = PitchType::ALL
        .into_iter()
        .filter(|pitch| players.iter().any(|b| b.profile.per_pitch.contains_key(pitch)))
        .collect();

    let mut value_series = HashMap::new();
    let mut seen_series = HashMap::new();
    for pitch in &covered {
        let values: Vec<Option<f64>> = players
            .iter()
            .map(|b| b.profile.per_pitch.get(pitch).and_then(|e| e.weighted_value))
            .collect();
        let seen: Vec<Option<f64>> = players
            .iter()
            .map(|b| b.profile.per_pitch.get(pitch).and_then(|e| e.pct_seen))
            .collect();
        value_series.insert(*pitch, NormalizedSeries::from_optional(&values));
        seen_series.insert(*pitch, NormalizedSeries::from_optional(&seen));
    }

    (0..n)
        .map(|i| {
            let mut per_pitch = HashMap::new();
            for pitch in &covered {
                if players[i].profile.per_pitch.contains_key(pitch) {
                    per_pitch.insert(
                        *pitch,
                        PitchZScores {
                            weighted_value_z: value_series[pitch].member_z(i),
                            pct_seen_z: seen_series[pitch].member_z(i),
                        },
                    );
                }
            }
            MatchupZProfile {
                per_pitch,
                swinging_strike_z: swstr.member_z(i),
                contact_z: contact.member_z(i),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
