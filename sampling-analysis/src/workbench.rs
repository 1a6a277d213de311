//! SamplingWorkbench: the pipeline façade.
//!
//! Owns the resolved configuration, a profiler built from it, and the
//! recommendation engine. Each stage takes only the population slice and
//! parameters it needs; nothing is cached between calls.

use tracing::{info, warn};

use sampling_core::config::SamplingConfig;
use sampling_core::models::{
    AttributeParams, AuditResults, ExpansionPlan, Population, PopulationProfile, PopulationRow,
    SamplingParams,
};

use crate::calculators;
use crate::profiler::Profiler;
use crate::recommend::RecommendationEngine;
use crate::sequential;

pub struct SamplingWorkbench {
    config: SamplingConfig,
    profiler: Profiler,
    recommender: RecommendationEngine,
}

impl SamplingWorkbench {
    /// Build from a resolved config. A configured recommendation service
    /// that cannot be constructed degrades to the heuristic.
    pub fn new(config: SamplingConfig) -> Self {
        let recommender = RecommendationEngine::from_config(&config.recommender);
        Self::with_recommender(config, recommender)
    }

    pub fn with_recommender(config: SamplingConfig, recommender: RecommendationEngine) -> Self {
        Self {
            profiler: Profiler::new(&config.profiling),
            config,
            recommender,
        }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    pub fn profiler(&self) -> &Profiler {
        &self.profiler
    }

    /// Freeze rows into a population, keeping at most the configured batch.
    pub fn load_population(&self, mut rows: Vec<PopulationRow>) -> Population {
        let cap = self.config.selection.effective_max_population_rows();
        if rows.len() > cap {
            warn!(
                supplied = rows.len(),
                cap,
                "population exceeds the batch cap; truncating"
            );
            rows.truncate(cap);
        }
        let population = Population::new(rows);
        info!(
            rows = population.len(),
            fingerprint = %population.fingerprint(),
            "population loaded"
        );
        population
    }

    /// Descriptive statistics, forensic analysis, and a method recommendation.
    pub fn profile(&self, population: &Population) -> PopulationProfile {
        let values = population.values();
        let stats = self.profiler.compute_stats(&values);
        let analysis = self.profiler.compute_advanced_analysis(&values);
        let recommendation = self.recommender.recommend(&stats, &analysis);
        info!(
            rows = population.len(),
            recommended = recommendation.recommended_method.name(),
            confidence = recommendation.confidence_score,
            source = self.recommender.active_recommender_name(),
            "population profiled"
        );
        PopulationProfile {
            stats,
            analysis,
            recommendation,
            fingerprint: population.fingerprint(),
        }
    }

    /// Run one calculator. `seed` falls back to the configured default.
    pub fn calculate(
        &self,
        population: &Population,
        params: &SamplingParams,
        seed: Option<u64>,
    ) -> AuditResults {
        let seed = seed.unwrap_or_else(|| self.config.selection.effective_default_seed());
        calculators::calculate_with(&self.profiler, params, population.rows(), seed)
    }

    /// Stop-or-go plan for an attribute pilot.
    pub fn plan_attribute_expansion(
        &self,
        params: &AttributeParams,
        current: &AuditResults,
        errors_found: usize,
    ) -> ExpansionPlan {
        sequential::calculate_stop_or_go_expansion(
            current.sample_size,
            errors_found,
            params.confidence_level,
            params.tolerable_deviation,
        )
    }

    /// Full-sample plan for a MUS or CAV pilot.
    pub fn plan_variable_expansion(
        &self,
        params: &SamplingParams,
        current: &AuditResults,
        errors_found: usize,
        population: &Population,
    ) -> ExpansionPlan {
        sequential::calculate_variable_expansion(params, current, errors_found, population.rows())
    }

    /// Append `additional` items using the configured seed offset.
    pub fn expand(
        &self,
        current: &AuditResults,
        additional: usize,
        seed: Option<u64>,
        population: &Population,
    ) -> AuditResults {
        let seed = seed.unwrap_or_else(|| self.config.selection.effective_default_seed());
        sequential::expand_audit_sample_with_offset(
            current,
            additional,
            seed,
            self.config.selection.effective_expansion_seed_offset(),
            population.rows(),
        )
    }
}

impl Default for SamplingWorkbench {
    fn default() -> Self {
        Self::with_recommender(SamplingConfig::default(), RecommendationEngine::heuristic_only())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling_core::config::SelectionConfig;

    #[test]
    fn test_load_population_applies_cap() {
        let config = SamplingConfig {
            selection: SelectionConfig {
                max_population_rows: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let bench = SamplingWorkbench::with_recommender(config, RecommendationEngine::heuristic_only());
        let rows = (0..8).map(|i| PopulationRow::new(format!("R{i}"), 1.0)).collect();
        assert_eq!(bench.load_population(rows).len(), 5);
    }

    #[test]
    fn test_default_seed_from_config() {
        let bench = SamplingWorkbench::default();
        let population = bench.load_population(
            (0..100).map(|i| PopulationRow::new(format!("R{i}"), 10.0 + i as f64)).collect(),
        );
        let params = SamplingParams::default_for(sampling_core::models::SamplingMethod::Attribute);
        let implicit = bench.calculate(&population, &params, None);
        let explicit = bench.calculate(&population, &params, Some(12_345));
        assert_eq!(implicit, explicit);
    }
}
