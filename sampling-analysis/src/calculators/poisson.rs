//! Poisson upper-limit factors for monetary evaluation.
//!
//! `λ_U(k, c) = χ²⁻¹(c; 2(k + 1)) / 2` is the upper confidence bound on
//! the Poisson mean after observing `k` errors at confidence `c`.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Upper-limit factor for `errors` observed errors at `confidence` in
/// `(0, 1)`. Out-of-range confidence is clamped.
pub fn upper_limit_factor(errors: usize, confidence: f64) -> f64 {
    let c = if confidence.is_finite() {
        confidence.clamp(0.5, 0.9999)
    } else {
        0.95
    };
    if errors == 0 {
        return -(1.0 - c).ln();
    }

    let dof = 2.0 * (errors as f64 + 1.0);
    match ChiSquared::new(dof) {
        Ok(dist) => {
            let q = dist.inverse_cdf(c) / 2.0;
            if q.is_finite() && q > 0.0 {
                q
            } else {
                wilson_hilferty(errors, c)
            }
        }
        Err(_) => wilson_hilferty(errors, c),
    }
}

/// Closed-form approximation used when the quantile search misbehaves.
fn wilson_hilferty(errors: usize, c: f64) -> f64 {
    let m = errors as f64 + 1.0;
    let z = Normal::standard().inverse_cdf(c);
    let z = if z.is_finite() { z } else { 1.645 };
    let term = 1.0 - 1.0 / (9.0 * m) + z * (1.0 / (9.0 * m)).sqrt();
    m * term.powi(3)
}

/// MUS evaluation components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusEvaluation {
    pub projected_misstatement: f64,
    pub basic_precision: f64,
    pub incremental_allowance: f64,
    pub upper_error_limit: f64,
}

/// Evaluate a MUS plan with `expected_error` spread over full intervals.
///
/// `upper_error_limit = BP + PM + IA`, so it never falls below the
/// projected misstatement.
pub fn evaluate_mus(expected_error: f64, interval: f64, confidence: f64) -> MusEvaluation {
    let projected = expected_error.max(0.0);
    if interval <= 0.0 || !interval.is_finite() {
        return MusEvaluation {
            projected_misstatement: projected,
            basic_precision: 0.0,
            incremental_allowance: 0.0,
            upper_error_limit: projected,
        };
    }

    let basic_precision = upper_limit_factor(0, confidence) * interval;

    let expected_errors = (projected / interval).ceil() as usize;
    let mut incremental = 0.0;
    if expected_errors > 0 {
        let tainting = projected / (expected_errors as f64 * interval);
        let mut previous = upper_limit_factor(0, confidence);
        for k in 1..=expected_errors {
            let current = upper_limit_factor(k, confidence);
            incremental += (current - previous - 1.0).max(0.0) * tainting * interval;
            previous = current;
        }
    }

    MusEvaluation {
        projected_misstatement: projected,
        basic_precision,
        incremental_allowance: incremental,
        upper_error_limit: basic_precision + projected + incremental,
    }
}
