// Population z-score normalization with mean imputation for missing values.

// ---------------------------------------------------------------------------
// Population statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single metric across a player population.
#[derive(Debug, Clone, Copy)]
pub struct PopulationStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PopulationStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator): the input is the
/// full relevant player universe, not a sample, and the player being scored
/// is always part of it.
pub fn compute_population_stats(values: &[f64]) -> PopulationStats {
    if values.is_empty() {
        return PopulationStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PopulationStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and population stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (guarding
/// against division by zero). A degenerate population therefore normalizes
/// every member to exactly 0, never NaN or infinity.
pub fn zscore(value: f64, stats: &PopulationStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

// ---------------------------------------------------------------------------
// Missing-value imputation
// ---------------------------------------------------------------------------

/// Replace missing entries with the mean of the present entries.
///
/// The returned series has the same length as the input. Stats computed over
/// it therefore weight the imputed players into N, which matches how the
/// source data pipeline fills gaps before normalizing; an imputed player's
/// z-score comes out 0 by construction. A series with no present values
/// imputes everything to 0.0.
pub fn impute_population_mean(values: &[Option<f64>]) -> Vec<f64> {
    let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    let fill = if present.is_empty() {
        0.0
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    };
    values.iter().map(|v| v.unwrap_or(fill)).collect()
}

/// A metric series normalized over its (imputed) population.
///
/// Bundles the imputed values with the stats computed over them so callers
/// can ask for any member's z-score, or the z-score of an out-of-population
/// value measured against the same distribution.
#[derive(Debug, Clone)]
pub struct NormalizedSeries {
    values: Vec<f64>,
    stats: PopulationStats,
}

impl NormalizedSeries {
    /// Build from a series where some players may be missing the metric.
    pub fn from_optional(values: &[Option<f64>]) -> Self {
        let values = impute_population_mean(values);
        let stats = compute_population_stats(&values);
        NormalizedSeries { values, stats }
    }

    /// Build from a fully-present series.
    pub fn from_values(values: Vec<f64>) -> Self {
        let stats = compute_population_stats(&values);
        NormalizedSeries { values, stats }
    }

    pub fn stats(&self) -> &PopulationStats {
        &self.stats
    }

    /// Z-score of the population member at `index`.
    pub fn member_z(&self, index: usize) -> f64 {
        zscore(self.values[index], &self.stats)
    }

    /// Z-score of an arbitrary value against this population's distribution.
    pub fn value_z(&self, value: f64) -> f64 {
        zscore(value, &self.stats)
    }

    /// The (imputed) raw value at `index`.
    pub fn member_value(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
