// Composite strikeout projection model.
//
// A pure function of already-resolved, already-normalized inputs: no I/O,
// no lookups, no hidden state. The engine gathers the inputs (and fails a
// pitcher upstream when a required stat is missing); this module only does
// the arithmetic.

use crate::model::snapshot::LEAGUE_AVG_WOBA;

/// Weight of the pitch-mix side of the combined factor.
const MIX_WEIGHT: f64 = 0.65;
/// Weight of the susceptibility-vs-pitcher side of the combined factor.
const MATCHUP_WEIGHT: f64 = 0.35;
/// Scale applied to the pitch-mix score inside its factor.
const MIX_SCORE_SCALE: f64 = 0.2;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Tunable sensitivities, carried explicitly rather than baked into
/// duplicate code paths.
///
/// Two presets exist: `default()` is the conservative base calibration, and
/// `slate()` is the hotter calibration the daily pipeline runs with (same
/// formula, stronger alpha/gamma).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    /// Sensitivity of the matchup factor to the lineup-minus-pitcher z gap.
    /// Must be positive: the projection is strictly increasing in lineup
    /// susceptibility only when it is.
    pub alpha: f64,
    /// Sensitivity of estimated innings to lineup wOBA above league average.
    pub beta: f64,
    /// Sensitivity of the final projection to pitch quality.
    pub gamma: f64,
    /// League-average wOBA anchor for the innings adjustment.
    pub league_avg_woba: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            alpha: 0.06,
            beta: 0.02,
            gamma: 0.06,
            league_avg_woba: LEAGUE_AVG_WOBA,
        }
    }
}

impl ModelParams {
    /// The daily-slate calibration.
    pub fn slate() -> Self {
        ModelParams {
            alpha: 0.15,
            gamma: 0.15,
            ..ModelParams::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and output
// ---------------------------------------------------------------------------

/// Everything the composite model consumes for one pitcher-vs-lineup start.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInputs {
    pub k_per_9: f64,
    pub base_innings_per_start: f64,
    /// Population z-score of the pitcher's K-rate.
    pub pitcher_k_z: f64,
    /// Blended quality score in [-1, 1].
    pub pitch_quality_score: f64,
    /// Lineup-mean pitch-mix matchup score (0.0 when neutral/no data).
    pub pitch_mix_score: f64,
    /// Lineup-mean susceptibility z-score.
    pub lineup_susceptibility_z: f64,
    /// Lineup-mean wOBA (population-imputed).
    pub lineup_woba: f64,
}

/// The model output, with the intermediate steps kept visible for the
/// report and for tests.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub estimated_innings: f64,
    pub base_strikeouts: f64,
    pub combined_factor: f64,
    pub projected_strikeouts: f64,
}

// ---------------------------------------------------------------------------
// The model
// ---------------------------------------------------------------------------

/// Project strikeouts for one start.
///
/// ```text
/// matchup_factor    = 1 + (lineup_susceptibility_z - pitcher_k_z) * alpha
/// combined          = 0.65 * (1 + pitch_mix_score * 0.2) + 0.35 * matchup_factor
/// estimated_innings = base_innings_per_start * (1 - beta * (lineup_woba - league_woba))
/// base_strikeouts   = k_per_9 * estimated_innings / 9
/// core              = base_strikeouts * combined
/// final             = core * (1 + gamma * pitch_quality_score)
/// ```
pub fn project_strikeouts(inputs: &ProjectionInputs, params: &ModelParams) -> Projection {
    let matchup_factor =
        1.0 + (inputs.lineup_susceptibility_z - inputs.pitcher_k_z) * params.alpha;
    let combined_factor = MIX_WEIGHT * (1.0 + inputs.pitch_mix_score * MIX_SCORE_SCALE)
        + MATCHUP_WEIGHT * matchup_factor;

    let estimated_innings = inputs.base_innings_per_start
        * (1.0 - params.beta * (inputs.lineup_woba - params.league_avg_woba));
    let base_strikeouts = inputs.k_per_9 * estimated_innings / 9.0;

    let core = base_strikeouts * combined_factor;
    let projected_strikeouts = core * (1.0 + params.gamma * inputs.pitch_quality_score);

    Projection {
        estimated_innings,
        base_strikeouts,
        combined_factor,
        projected_strikeouts,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
