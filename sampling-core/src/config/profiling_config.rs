//! Population profiling configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Thresholds used by the profiler and the risk-scoring engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProfilingConfig {
    /// Benford digit deviation (percentage points) that marks a digit suspicious. Default: 5.0.
    pub benford_deviation_threshold: Option<f64>,
    /// Tukey upper-fence multiplier. Default: 1.5.
    pub iqr_multiplier: Option<f64>,
    /// Risk scoring outlier cut-off in standard deviations above the mean. Default: 2.0.
    pub outlier_sigma_multiplier: Option<f64>,
}

impl ProfilingConfig {
    pub fn effective_benford_deviation_threshold(&self) -> f64 {
        self.benford_deviation_threshold
            .unwrap_or(constants::DEFAULT_BENFORD_DEVIATION_THRESHOLD)
    }

    pub fn effective_iqr_multiplier(&self) -> f64 {
        self.iqr_multiplier
            .unwrap_or(constants::DEFAULT_IQR_MULTIPLIER)
    }

    pub fn effective_outlier_sigma_multiplier(&self) -> f64 {
        self.outlier_sigma_multiplier
            .unwrap_or(constants::DEFAULT_OUTLIER_SIGMA_MULTIPLIER)
    }
}
