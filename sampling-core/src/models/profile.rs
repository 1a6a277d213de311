//! Population profile: descriptive statistics and forensic indicators.

use serde::{Deserialize, Serialize};

use super::recommendation::AiRecommendation;

/// Descriptive statistics over a population's value column.
///
/// `std_dev` is the population standard deviation (divides by `n`).
/// `coefficient_of_variation` is `std_dev / |avg|`, or 0 when `avg == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveStats {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
}

/// One row of the Benford first-digit table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenfordDigit {
    /// Leading digit, 1..=9.
    pub digit: u8,
    /// Expected frequency (%) under Benford's law.
    pub expected_freq: f64,
    /// Observed frequency (%) among nonzero values.
    pub actual_freq: f64,
    pub actual_count: usize,
    /// `|actual_freq - expected_freq|`, in percentage points.
    pub deviation: f64,
    pub is_suspicious: bool,
}

/// Forensic summary of a population.
///
/// `outliers_threshold` is the upper Tukey fence from which
/// `outliers_count` was derived; both come from the same sorted values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedAnalysis {
    pub benford: Vec<BenfordDigit>,
    pub outliers_count: usize,
    pub outliers_threshold: f64,
    pub duplicates_count: usize,
    pub zeros_count: usize,
    pub negatives_count: usize,
    pub round_numbers_count: usize,
}

impl AdvancedAnalysis {
    /// True when any leading digit deviates beyond the suspicion threshold.
    pub fn has_benford_anomaly(&self) -> bool {
        self.benford.iter().any(|b| b.is_suspicious)
    }

    /// Digits flagged as suspicious, ascending.
    pub fn suspicious_digits(&self) -> Vec<u8> {
        self.benford
            .iter()
            .filter(|b| b.is_suspicious)
            .map(|b| b.digit)
            .collect()
    }

    /// Number of values that contributed to the Benford table.
    pub fn benford_sample_count(&self) -> usize {
        self.benford.iter().map(|b| b.actual_count).sum()
    }
}

/// Everything the profiling stage produces for one population load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationProfile {
    pub stats: DescriptiveStats,
    pub analysis: AdvancedAnalysis,
    pub recommendation: AiRecommendation,
    /// Fingerprint of the profiled population.
    pub fingerprint: String,
}
