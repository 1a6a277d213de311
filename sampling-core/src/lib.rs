//! sampling-core: Foundation crate for the audit sampling engine.
//!
//! Owns the domain models (population, profiles, parameters, results),
//! the error enums, layered configuration, tracing setup, shared
//! constants, and the `Recommender` capability trait. Algorithms live in
//! `sampling-analysis`.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing;
pub mod traits;
