//! Configuration system for the sampling engine.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod profiling_config;
pub mod recommender_config;
pub mod sampling_config;
pub mod selection_config;

pub use profiling_config::ProfilingConfig;
pub use recommender_config::RecommenderConfig;
pub use sampling_config::{CliOverrides, SamplingConfig};
pub use selection_config::SelectionConfig;
