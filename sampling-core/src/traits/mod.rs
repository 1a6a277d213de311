//! Capability traits implemented by the analysis engine.

pub mod recommender;

pub use recommender::Recommender;
