//! Audit sampling engine.
//!
//! Seeded selection, population profiling, method recommendation, the five
//! sample-size calculators, stop-or-go expansion, and row risk scoring.
//! Everything here is synchronous CPU-bound computation over rows that the
//! caller has already materialized.

pub mod calculators;
pub mod profiler;
pub mod recommend;
pub mod risk;
pub mod sampler;
pub mod sequential;
pub mod workbench;

pub use calculators::calculate;
pub use profiler::Profiler;
pub use recommend::RecommendationEngine;
pub use sampler::{select_items, Lcg};
pub use workbench::SamplingWorkbench;
