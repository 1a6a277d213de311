//! RecommendationEngine: optional external recommender ahead of the
//! deterministic heuristic.

use tracing::{info, warn};

use sampling_core::config::RecommenderConfig;
use sampling_core::errors::{AuditErrorCode, RecommendError};
use sampling_core::models::{AdvancedAnalysis, AiRecommendation, DescriptiveStats};
use sampling_core::traits::Recommender;

use super::heuristic::HeuristicRecommender;
use super::remote::HttpRecommender;

/// Selects between an injected recommender and the heuristic fallback.
///
/// `recommend` is total: a failing primary is logged and discarded in
/// favour of the heuristic result.
pub struct RecommendationEngine {
    primary: Option<Box<dyn Recommender>>,
    fallback: HeuristicRecommender,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::heuristic_only()
    }
}

impl RecommendationEngine {
    pub fn heuristic_only() -> Self {
        Self {
            primary: None,
            fallback: HeuristicRecommender,
        }
    }

    /// Use `primary` first, the heuristic on any failure.
    pub fn with_primary(primary: Box<dyn Recommender>) -> Self {
        Self {
            primary: Some(primary),
            fallback: HeuristicRecommender,
        }
    }

    /// Build from config. A configured endpoint that cannot be used (for
    /// instance a missing credential) degrades to heuristic-only.
    pub fn from_config(config: &RecommenderConfig) -> Self {
        if !config.is_remote_enabled() {
            return Self::heuristic_only();
        }
        match HttpRecommender::from_config(config) {
            Ok(remote) => {
                info!(endpoint = remote.endpoint(), "remote recommender enabled");
                Self::with_primary(Box::new(remote))
            }
            Err(e) => {
                warn!(error = %e.boundary_string(), "remote recommender unavailable; using heuristic");
                Self::heuristic_only()
            }
        }
    }

    /// Name of the recommender tried first.
    pub fn active_recommender_name(&self) -> &'static str {
        self.primary
            .as_ref()
            .map_or_else(|| self.fallback.name(), |p| p.name())
    }

    pub fn recommend(&self, stats: &DescriptiveStats, analysis: &AdvancedAnalysis) -> AiRecommendation {
        if let Some(primary) = &self.primary {
            match primary.recommend(stats, analysis) {
                Ok(rec) => return rec,
                Err(e) => log_fallback(primary.name(), &e),
            }
        }
        self.fallback.evaluate(stats, analysis)
    }
}

fn log_fallback(name: &str, error: &RecommendError) {
    warn!(
        recommender = name,
        code = error.error_code(),
        error = %error,
        "recommender failed; falling back to heuristic"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling_core::models::SamplingMethod;

    struct Failing;

    impl Recommender for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn recommend(
            &self,
            _: &DescriptiveStats,
            _: &AdvancedAnalysis,
        ) -> Result<AiRecommendation, RecommendError> {
            Err(RecommendError::Status { status: 503 })
        }
    }

    struct Fixed;

    impl Recommender for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn recommend(
            &self,
            _: &DescriptiveStats,
            _: &AdvancedAnalysis,
        ) -> Result<AiRecommendation, RecommendError> {
            Ok(AiRecommendation {
                recommended_method: SamplingMethod::Cav,
                confidence_score: 42,
                reasoning: vec!["fixed".into()],
                risk_factors: vec![],
                directed_selection_advice: String::new(),
            })
        }
    }

    fn clean_stats() -> DescriptiveStats {
        DescriptiveStats {
            count: 10,
            sum: 1_000.0,
            min: 50.0,
            max: 150.0,
            avg: 100.0,
            std_dev: 30.0,
            coefficient_of_variation: 0.3,
        }
    }

    #[test]
    fn test_failing_primary_falls_back_to_heuristic() {
        let engine = RecommendationEngine::with_primary(Box::new(Failing));
        let rec = engine.recommend(&clean_stats(), &AdvancedAnalysis::default());
        assert_eq!(rec.recommended_method, SamplingMethod::Mus);
        assert_eq!(rec.confidence_score, 95);
    }

    #[test]
    fn test_successful_primary_wins() {
        let engine = RecommendationEngine::with_primary(Box::new(Fixed));
        assert_eq!(engine.active_recommender_name(), "fixed");
        let rec = engine.recommend(&clean_stats(), &AdvancedAnalysis::default());
        assert_eq!(rec.confidence_score, 42);
    }

    #[test]
    fn test_unconfigured_is_heuristic_only() {
        let engine = RecommendationEngine::from_config(&RecommenderConfig::default());
        assert_eq!(engine.active_recommender_name(), "heuristic");
    }
}
