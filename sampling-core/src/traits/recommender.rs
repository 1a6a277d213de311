//! Recommender trait.
//!
//! A deterministic heuristic implementation always exists in the analysis
//! crate. A networked implementation may be injected ahead of it; callers
//! fall back to the heuristic whenever the injected one returns `Err`.

use crate::errors::RecommendError;
use crate::models::{AdvancedAnalysis, AiRecommendation, DescriptiveStats};

/// Produces an advisory sampling-method recommendation from a population
/// profile.
pub trait Recommender: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn recommend(
        &self,
        stats: &DescriptiveStats,
        analysis: &AdvancedAnalysis,
    ) -> Result<AiRecommendation, RecommendError>;
}
