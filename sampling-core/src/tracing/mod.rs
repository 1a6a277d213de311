//! Observability for the sampling engine.
//! `tracing` crate with `EnvFilter`, per-module log levels.

pub mod setup;

pub use setup::{init_tracing, DEFAULT_DIRECTIVE, LOG_ENV_VAR};
