//! Sample-Size Calculators.
//!
//! Common contract: `calculate(params, rows, seed) -> AuditResults`. Every
//! calculator re-validates its parameters and reports an infeasible run as
//! a zero-size result with an explanatory note instead of failing.

pub mod attribute;
pub mod cav;
pub mod mus;
pub mod non_statistical;
pub mod poisson;
pub mod stratified;

use tracing::{info, warn};

use sampling_core::errors::{AuditErrorCode, ParamsError};
use sampling_core::models::{fingerprint_rows, AuditResults, PopulationRow, SamplingMethod, SamplingParams};

use crate::profiler::Profiler;

/// Run the calculator for `params` with default profiling thresholds.
pub fn calculate(params: &SamplingParams, rows: &[PopulationRow], seed: u64) -> AuditResults {
    calculate_with(&Profiler::default(), params, rows, seed)
}

/// Run the calculator for `params`, using `profiler` for fences and risk
/// cut-offs.
pub fn calculate_with(
    profiler: &Profiler,
    params: &SamplingParams,
    rows: &[PopulationRow],
    seed: u64,
) -> AuditResults {
    let results = match params {
        SamplingParams::Attribute(p) => attribute::calculate(p, rows, seed),
        SamplingParams::Mus(p) => mus::calculate(p, rows, seed),
        SamplingParams::Cav(p) => cav::calculate(p, rows, seed),
        SamplingParams::Stratified(p) => stratified::calculate_with(profiler, p, rows, seed),
        SamplingParams::NonStatistical(p) => {
            non_statistical::calculate_with(profiler, p, rows, seed)
        }
    };

    info!(
        method = results.method.name(),
        rows = rows.len(),
        seed,
        sample_size = results.sample_size,
        selected = results.sample.len(),
        "sampling run complete"
    );
    results
}

/// Empty result stamped with the population fingerprint.
pub(crate) fn new_results(method: SamplingMethod, rows: &[PopulationRow]) -> AuditResults {
    let mut results = AuditResults::new(method);
    results.population_fingerprint = fingerprint_rows(rows);
    results
}

/// Zero-size result explaining a parameter failure.
pub(crate) fn infeasible(
    method: SamplingMethod,
    rows: &[PopulationRow],
    error: &ParamsError,
) -> AuditResults {
    warn!(method = method.name(), code = error.error_code(), error = %error, "sampling infeasible");
    stamped_infeasible(method, rows, format!("Sampling is not feasible: {error}."))
}

/// Zero-size result for a reason other than invalid parameters.
pub(crate) fn infeasible_because(
    method: SamplingMethod,
    rows: &[PopulationRow],
    reason: &str,
) -> AuditResults {
    warn!(method = method.name(), reason, "sampling infeasible");
    stamped_infeasible(method, rows, reason)
}

fn stamped_infeasible(
    method: SamplingMethod,
    rows: &[PopulationRow],
    reason: impl Into<String>,
) -> AuditResults {
    let mut results = AuditResults::infeasible(method, reason);
    results.population_fingerprint = fingerprint_rows(rows);
    results
}

/// Round a computed size up to a whole item, ignoring floating-point noise
/// just above an integer. Negative and non-finite inputs give 0.
pub fn ceil_size(x: f64) -> usize {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    (x - 1e-9).ceil().max(0.0) as usize
}

/// Round a computed count down, ignoring floating-point noise just below
/// an integer.
pub fn floor_size(x: f64) -> usize {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    (x + 1e-9).floor() as usize
}

pub(crate) const EMPTY_POPULATION_NOTE: &str =
    "Population is empty; the computed size could not be drawn.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_size_tolerates_noise() {
        assert_eq!(ceil_size(75.0), 75);
        assert_eq!(ceil_size(75.000_000_000_1), 75);
        assert_eq!(ceil_size(75.01), 76);
        assert_eq!(ceil_size(-3.0), 0);
        assert_eq!(ceil_size(f64::NAN), 0);
        assert_eq!(floor_size(2.999_999_999_999_999_6), 3);
        assert_eq!(floor_size(2.5), 2);
    }

    #[test]
    fn test_dispatch_stamps_fingerprint() {
        let rows = vec![PopulationRow::new("A", 10.0), PopulationRow::new("B", 20.0)];
        let results = calculate(&SamplingParams::default_for(SamplingMethod::Attribute), &rows, 1);
        assert_eq!(results.population_fingerprint, fingerprint_rows(&rows));
        assert_eq!(results.method, SamplingMethod::Attribute);
    }

    #[test]
    fn test_infeasible_results_are_stamped() {
        let rows = vec![PopulationRow::new("A", 0.0), PopulationRow::new("B", 0.0)];
        let results = calculate(&SamplingParams::default_for(SamplingMethod::Mus), &rows, 1);
        assert!(results.is_infeasible());
        assert_eq!(results.method, SamplingMethod::Mus);
        assert_eq!(results.population_fingerprint, fingerprint_rows(&rows));
        assert_eq!(results.methodology_notes.len(), 1);
    }
}
