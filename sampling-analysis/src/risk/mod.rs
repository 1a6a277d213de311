//! Risk-Scoring Engine.
//!
//! An additive heuristic ranking of rows, not a probability.

pub mod scoring;

pub use scoring::{score_row, RiskContext, RowRisk};
