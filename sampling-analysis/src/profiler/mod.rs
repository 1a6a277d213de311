//! Population Profiler.
//!
//! Descriptive statistics plus a forensic summary (Benford first digits,
//! upper-fence outliers, duplicates, zeros, negatives, round numbers).
//! Every entry point is total: empty input yields an all-zero profile.

pub mod benford;
pub mod descriptive;
pub mod forensics;
pub mod iqr;

use sampling_core::config::ProfilingConfig;
use sampling_core::models::{AdvancedAnalysis, DescriptiveStats};

pub use descriptive::{compute_stats, sample_std_dev};
pub use iqr::IqrFence;

/// Profiler with configurable forensic thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profiler {
    benford_deviation_threshold: f64,
    iqr_multiplier: f64,
    outlier_sigma_multiplier: f64,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new(&ProfilingConfig::default())
    }
}

impl Profiler {
    pub fn new(config: &ProfilingConfig) -> Self {
        Self {
            benford_deviation_threshold: config.effective_benford_deviation_threshold(),
            iqr_multiplier: config.effective_iqr_multiplier(),
            outlier_sigma_multiplier: config.effective_outlier_sigma_multiplier(),
        }
    }

    pub fn iqr_multiplier(&self) -> f64 {
        self.iqr_multiplier
    }

    /// Standard deviations above the mean beyond which risk scoring flags
    /// a row as an outlier.
    pub fn outlier_sigma_multiplier(&self) -> f64 {
        self.outlier_sigma_multiplier
    }

    pub fn compute_stats(&self, values: &[f64]) -> DescriptiveStats {
        descriptive::compute_stats(values)
    }

    /// Upper Tukey fence under this profiler's multiplier.
    pub fn fence(&self, values: &[f64]) -> IqrFence {
        IqrFence::compute(values, self.iqr_multiplier)
    }

    pub fn compute_advanced_analysis(&self, values: &[f64]) -> AdvancedAnalysis {
        if values.is_empty() {
            return AdvancedAnalysis {
                benford: benford::analyze(values, self.benford_deviation_threshold),
                ..AdvancedAnalysis::default()
            };
        }

        // Fence and count come from the same sorted array.
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let fence = IqrFence::from_sorted(&sorted, self.iqr_multiplier);
        let outliers_count = values.iter().filter(|&&v| fence.is_outlier(v)).count();

        let analysis = AdvancedAnalysis {
            benford: benford::analyze(values, self.benford_deviation_threshold),
            outliers_count,
            outliers_threshold: fence.threshold,
            duplicates_count: forensics::count_duplicates(values),
            zeros_count: values.iter().filter(|&&v| v == 0.0).count(),
            negatives_count: values.iter().filter(|&&v| v < 0.0).count(),
            round_numbers_count: values
                .iter()
                .filter(|&&v| forensics::is_round_number(v))
                .count(),
        };

        tracing::debug!(
            values = values.len(),
            outliers = analysis.outliers_count,
            duplicates = analysis.duplicates_count,
            benford_anomaly = analysis.has_benford_anomaly(),
            "advanced analysis computed"
        );

        analysis
    }
}

/// Forensic summary under default thresholds.
pub fn compute_advanced_analysis(values: &[f64]) -> AdvancedAnalysis {
    Profiler::default().compute_advanced_analysis(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_yield_zero_analysis() {
        let analysis = compute_advanced_analysis(&[]);
        assert_eq!(analysis.outliers_count, 0);
        assert_eq!(analysis.outliers_threshold, 0.0);
        assert_eq!(analysis.duplicates_count, 0);
        assert_eq!(analysis.benford.len(), 9);
        assert!(!analysis.has_benford_anomaly());
    }

    #[test]
    fn test_counts_zeros_negatives_round_numbers() {
        let values = [0.0, -5.0, 100.0, 2_000.0, 2_500.0, 37.0, 0.0];
        let analysis = compute_advanced_analysis(&values);
        assert_eq!(analysis.zeros_count, 2);
        assert_eq!(analysis.negatives_count, 1);
        assert_eq!(analysis.round_numbers_count, 2);
        assert_eq!(analysis.duplicates_count, 1);
    }

    #[test]
    fn test_custom_threshold_changes_suspicion() {
        let values: Vec<f64> = (1..=9).map(|d| f64::from(d) * 10.0).collect();
        let strict = Profiler::new(&ProfilingConfig {
            benford_deviation_threshold: Some(1.0),
            ..Default::default()
        });
        let lax = Profiler::new(&ProfilingConfig {
            benford_deviation_threshold: Some(50.0),
            ..Default::default()
        });
        assert!(strict.compute_advanced_analysis(&values).has_benford_anomaly());
        assert!(!lax.compute_advanced_analysis(&values).has_benford_anomaly());
    }
}
