//! Sampling parameter errors.
//!
//! Calculators never return these across the boundary; they render them
//! into a methodology note on a zero-size result.

use super::error_code::{self, AuditErrorCode};

/// Parameter-consistency failures for a sampling run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("expected ({expected}) must be strictly less than tolerable ({tolerable})")]
    ExpectedNotBelowTolerable { expected: f64, tolerable: f64 },

    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must not be NaN or infinite")]
    NotFinite { field: &'static str },
}

impl AuditErrorCode for ParamsError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_PARAMS
    }
}
