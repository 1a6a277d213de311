//! Per-row risk scores.
//!
//! | signal                              | score | flag          |
//! |-------------------------------------|-------|---------------|
//! | `abs(v) > avg + k * std_dev`        | +2    | `Outlier`     |
//! | first digit 7, 8 or 9               | +0.5  | none          |
//! | nonzero multiple of 100             | +1    | `RoundNumber` |
//! | ... and also a multiple of 1000     | +1    |               |
//! | repeated nonzero value              | +1    | `Duplicate`   |

use rustc_hash::FxHashMap;

use sampling_core::constants::DEFAULT_OUTLIER_SIGMA_MULTIPLIER;
use sampling_core::models::{PopulationRow, RiskFactor, RiskLevel};

use crate::profiler::benford::first_significant_digit;
use crate::profiler::descriptive::compute_stats;
use crate::profiler::forensics::{is_multiple_of, value_key, value_occurrences};

/// Population-level inputs shared by every row's score.
#[derive(Debug, Clone)]
pub struct RiskContext {
    avg: f64,
    std_dev: f64,
    sigma_multiplier: f64,
    occurrences: FxHashMap<u64, usize>,
}

impl RiskContext {
    pub fn from_rows(rows: &[PopulationRow]) -> Self {
        Self::with_sigma_multiplier(rows, DEFAULT_OUTLIER_SIGMA_MULTIPLIER)
    }

    pub fn with_sigma_multiplier(rows: &[PopulationRow], sigma_multiplier: f64) -> Self {
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        let stats = compute_stats(&values);
        Self {
            avg: stats.avg,
            std_dev: stats.std_dev,
            sigma_multiplier,
            occurrences: value_occurrences(&values),
        }
    }

    /// `avg + k * std_dev`.
    pub fn outlier_cutoff(&self) -> f64 {
        self.avg + self.sigma_multiplier * self.std_dev
    }

    fn is_duplicate(&self, value: f64) -> bool {
        value != 0.0
            && self
                .occurrences
                .get(&value_key(value))
                .is_some_and(|&n| n > 1)
    }
}

/// Score and triggered categories of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRisk {
    pub score: f64,
    /// Deduplicated, in table order.
    pub flags: Vec<RiskFactor>,
}

impl RowRisk {
    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }

    /// Work-paper text for the triggered flags.
    pub fn justification(&self) -> String {
        if self.flags.is_empty() {
            return format!("Risk score {:.1}", self.score);
        }
        let flags: Vec<&str> = self.flags.iter().map(RiskFactor::name).collect();
        format!("Risk score {:.1}: {}", self.score, flags.join(", "))
    }
}

pub fn score_row(row: &PopulationRow, ctx: &RiskContext) -> RowRisk {
    score_value(row.value, ctx)
}

pub fn score_value(value: f64, ctx: &RiskContext) -> RowRisk {
    let mut score = 0.0;
    let mut flags = Vec::new();

    if value.abs() > ctx.outlier_cutoff() {
        score += 2.0;
        flags.push(RiskFactor::Outlier);
    }

    if matches!(first_significant_digit(value), Some(7..=9)) {
        score += 0.5;
    }

    if is_multiple_of(value, 100.0) {
        score += 1.0;
        flags.push(RiskFactor::RoundNumber);
        if is_multiple_of(value, 1_000.0) {
            score += 1.0;
        }
    }

    if ctx.is_duplicate(value) {
        score += 1.0;
        flags.push(RiskFactor::Duplicate);
    }

    RowRisk { score, flags }
}
