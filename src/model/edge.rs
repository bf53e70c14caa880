// Edge and confidence against the book line, and the bet/no-bet policy.

use statrs::distribution::{ContinuousCDF, Normal};

/// Assumed scale (in strikeouts) of the projection error distribution. Both
/// the edge percentage and the confidence z share it.
pub const STRIKEOUT_SCALE: f64 = 1.5;

/// Minimum edge (strict) before a bet is recommended.
pub const EDGE_THRESHOLD_PCT: f64 = 7.0;

/// Minimum confidence (inclusive) before a bet is recommended.
pub const CONFIDENCE_THRESHOLD_PCT: f64 = 70.0;

/// Standard normal CDF.
fn norm_cdf(x: f64) -> f64 {
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.cdf(x)
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// The betting verdict for one prop. Always recomputed from edge and
/// confidence; never stored independently of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    BetOver,
    BetUnder,
    Skip,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::BetOver => "Bet Over",
            Recommendation::BetUnder => "Bet Under",
            Recommendation::Skip => "Skip",
        }
    }

    pub fn is_bet(&self) -> bool {
        !matches!(self, Recommendation::Skip)
    }
}

/// Apply the fixed policy thresholds.
///
/// The edge comparison is strict: an edge of exactly +/-7.0 stays a skip.
pub fn recommend(edge_pct: f64, confidence_pct: f64) -> Recommendation {
    if edge_pct > EDGE_THRESHOLD_PCT && confidence_pct >= CONFIDENCE_THRESHOLD_PCT {
        Recommendation::BetOver
    } else if edge_pct < -EDGE_THRESHOLD_PCT && confidence_pct >= CONFIDENCE_THRESHOLD_PCT {
        Recommendation::BetUnder
    } else {
        Recommendation::Skip
    }
}

// ---------------------------------------------------------------------------
// Edge assessment
// ---------------------------------------------------------------------------

/// Edge, confidence, and verdict for one projection against one line.
#[derive(Debug, Clone, Copy)]
pub struct EdgeAssessment {
    /// `((projection - line) / 1.5) * 100`; signed, over-positive.
    pub edge_pct: f64,
    /// `(projection - line) / 1.5`.
    pub z: f64,
    /// Probability (in percent) that the projected side of the line hits,
    /// under a normal error of scale 1.5.
    pub confidence_pct: f64,
    pub recommendation: Recommendation,
}

/// Assess a projection against the book line.
///
/// Confidence takes the CDF from the projected side: `100 * Phi(z)` when
/// the projection clears the line, `100 * (1 - Phi(z))` otherwise, so it
/// always reads as "confidence in the indicated direction" and lands at
/// exactly 50.0 when the projection sits on the line.
pub fn assess_edge(projected: f64, line: f64) -> EdgeAssessment {
    let z = (projected - line) / STRIKEOUT_SCALE;
    let edge_pct = z * 100.0;
    let confidence_pct = if projected > line {
        100.0 * norm_cdf(z)
    } else {
        100.0 * (1.0 - norm_cdf(z))
    };
    EdgeAssessment {
        edge_pct,
        z,
        confidence_pct,
        recommendation: recommend(edge_pct, confidence_pct),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
