// Pitch types, usage distributions, batter pitch profiles, and the
// pitch-mix matchup scorer.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Pitch types
// ---------------------------------------------------------------------------

/// The pitch taxonomy the engine models. Fixed; anything the tracking data
/// tags outside these six is ignored at ingest rather than lumped into a
/// catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchType {
    Fastball,
    Cutter,
    Slider,
    Changeup,
    Curveball,
    Sinker,
}

impl PitchType {
    pub const ALL: [PitchType; 6] = [
        PitchType::Fastball,
        PitchType::Cutter,
        PitchType::Slider,
        PitchType::Changeup,
        PitchType::Curveball,
        PitchType::Sinker,
    ];
}

// ---------------------------------------------------------------------------
// Pitch mix
// ---------------------------------------------------------------------------

/// A pitcher's usage distribution over pitch types.
///
/// Invariants: every stored fraction is finite and positive, and the
/// fractions sum to 1.0 (renormalized at construction). An empty mix is
/// valid and means "no pitch data for this pitcher"; downstream scoring
/// treats it as neutral, not as an error.
#[derive(Debug, Clone, Default)]
pub struct PitchMix {
    usage: HashMap<PitchType, f64>,
}

impl PitchMix {
    /// Build a mix from raw usage fractions. Non-finite and non-positive
    /// entries are dropped; whatever survives is renormalized to sum to 1.
    pub fn from_raw(entries: impl IntoIterator<Item = (PitchType, f64)>) -> Self {
        let mut usage: HashMap<PitchType, f64> = HashMap::new();
        for (pitch, fraction) in entries {
            if fraction.is_finite() && fraction > 0.0 {
                *usage.entry(pitch).or_insert(0.0) += fraction;
            }
        }
        let total: f64 = usage.values().sum();
        if total > 0.0 {
            for fraction in usage.values_mut() {
                *fraction /= total;
            }
        }
        PitchMix { usage }
    }

    pub fn empty() -> Self {
        PitchMix::default()
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }

    pub fn len(&self) -> usize {
        self.usage.len()
    }

    pub fn usage(&self, pitch: PitchType) -> Option<f64> {
        self.usage.get(&pitch).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PitchType, f64)> + '_ {
        self.usage.iter().map(|(p, u)| (*p, *u))
    }
}

// ---------------------------------------------------------------------------
// Batter pitch profiles
// ---------------------------------------------------------------------------

/// Raw season exposure of one batter to one pitch type: the weighted run
/// value the batter produced against it and how often he saw it. Either can
/// be missing from the source; population imputation fills the gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct PitchExposure {
    pub weighted_value: Option<f64>,
    pub pct_seen: Option<f64>,
}

/// One batter's per-pitch exposures plus his batter-general swing metrics.
/// Immutable once built for a season.
///
/// The tracking data carries per-pitch columns for five of the six modeled
/// types (no sinker split exists for batters); the matchup scorer's
/// both-sides-present rule absorbs the asymmetry.
#[derive(Debug, Clone, Default)]
pub struct BatterPitchProfile {
    pub per_pitch: HashMap<PitchType, PitchExposure>,
    pub swinging_strike_rate: Option<f64>,
    pub contact_rate: Option<f64>,
}

/// Population-normalized view of a batter's profile: everything the matchup
/// scorer consumes, z-scored once at snapshot construction.
///
/// `weighted_value_z` and `pct_seen_z` are normalized within that pitch
/// type's batter population; the swinging-strike and contact z-scores are
/// batter-general (one pair per batter, shared by every pitch type).
#[derive(Debug, Clone, Default)]
pub struct MatchupZProfile {
    pub per_pitch: HashMap<PitchType, PitchZScores>,
    pub swinging_strike_z: f64,
    pub contact_z: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct PitchZScores {
    pub weighted_value_z: f64,
    pub pct_seen_z: f64,
}

// ---------------------------------------------------------------------------
// Matchup scoring
// ---------------------------------------------------------------------------

/// Weight on the (negated) per-pitch run value z-score.
const PITCH_VALUE_WEIGHT: f64 = 0.30;
/// Weight on the per-pitch exposure z-score.
const PCT_SEEN_WEIGHT: f64 = 0.07;
/// Weight on the batter-general swinging-strike z-score.
const SWINGING_STRIKE_WEIGHT: f64 = 0.42;
/// Weight on the batter-general contact z-score (subtracted).
const CONTACT_WEIGHT: f64 = 0.21;

/// Score one pitch type for one batter. Higher means more strikeout-prone
/// against that pitch.
///
/// The z-score of a negated metric equals the negated z-score, so the
/// "value against the pitch" term is computed as `-weighted_value_z`.
fn pitch_score(pitch_z: &PitchZScores, profile: &MatchupZProfile) -> f64 {
    PITCH_VALUE_WEIGHT * (-pitch_z.weighted_value_z)
        + PCT_SEEN_WEIGHT * pitch_z.pct_seen_z
        + SWINGING_STRIKE_WEIGHT * profile.swinging_strike_z
        - CONTACT_WEIGHT * profile.contact_z
}

/// Usage-weighted matchup score for one batter against one pitcher's mix.
///
/// Only pitch types present on both sides contribute; the result is the
/// weighted mean over the overlapping usage. No overlap at all (including
/// an empty mix or an empty profile) scores exactly 0.0: neutral, not
/// missing.
pub fn matchup_score(mix: &PitchMix, profile: &MatchupZProfile) -> f64 {
    let mut total_score = 0.0;
    let mut total_weight = 0.0;

    for (pitch, usage) in mix.iter() {
        if let Some(pitch_z) = profile.per_pitch.get(&pitch) {
            total_score += pitch_score(pitch_z, profile) * usage;
            total_weight += usage;
        }
    }

    if total_weight > 0.0 {
        total_score / total_weight
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
