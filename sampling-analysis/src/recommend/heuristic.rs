//! Deterministic method recommendation.
//!
//! First matching branch wins:
//! 1. no monetary values            -> Attribute (100)
//! 2. no negatives, no zeros, cv<=3 -> MUS (95)
//! 3. cv > 1.5                      -> Stratified (90)
//! 4. negatives present             -> CAV (85)
//! 5. Benford anomaly               -> Non-statistical (80)
//! 6. otherwise                     -> Stratified (70)

use sampling_core::constants::{EXTREME_VOLATILITY_CV, HIGH_VOLATILITY_CV};
use sampling_core::errors::RecommendError;
use sampling_core::models::{
    AdvancedAnalysis, AiRecommendation, DescriptiveStats, RiskIndicator, SamplingMethod,
};
use sampling_core::traits::Recommender;

/// Rule-based recommender. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRecommender;

impl HeuristicRecommender {
    pub fn new() -> Self {
        Self
    }

    /// Infallible form of [`Recommender::recommend`].
    pub fn evaluate(&self, stats: &DescriptiveStats, analysis: &AdvancedAnalysis) -> AiRecommendation {
        let cv = stats.coefficient_of_variation;
        let high_volatility = cv > HIGH_VOLATILITY_CV;
        let extreme_volatility = cv > EXTREME_VOLATILITY_CV;
        let has_negatives = analysis.negatives_count > 0;
        let has_zeros = analysis.zeros_count > 0;
        let has_outliers = analysis.outliers_count > 0;
        let benford_anomaly = analysis.has_benford_anomaly();

        let mut risk_factors = Vec::new();
        if high_volatility {
            risk_factors.push(RiskIndicator::HighVolatility);
        }
        if has_negatives {
            risk_factors.push(RiskIndicator::NegativeValues);
        }
        if has_zeros {
            risk_factors.push(RiskIndicator::ZeroValues);
        }
        if has_outliers {
            risk_factors.push(RiskIndicator::Outliers);
        }
        if benford_anomaly {
            risk_factors.push(RiskIndicator::BenfordAnomaly);
        }

        let advice = directed_advice(analysis, has_outliers, benford_anomaly);

        let (method, confidence, reasoning): (SamplingMethod, u8, Vec<String>) =
            if stats.sum == 0.0 && stats.max == 0.0 {
                (
                    SamplingMethod::Attribute,
                    100,
                    vec![
                        "Population is defined by qualitative attributes only.".into(),
                        "No monetary values are present (sum = 0), so substantive methods \
                         cannot project an error amount."
                            .into(),
                    ],
                )
            } else if !has_negatives && !has_zeros && !extreme_volatility {
                (
                    SamplingMethod::Mus,
                    95,
                    vec![
                        "Population has no negative or zero values, which suits \
                         probability-proportional-to-size selection."
                            .into(),
                        "MUS targets overstatement, the primary risk for assets and revenue."
                            .into(),
                    ],
                )
            } else if high_volatility {
                (
                    SamplingMethod::Stratified,
                    90,
                    vec![
                        format!(
                            "Coefficient of variation {cv:.2} exceeds {HIGH_VOLATILITY_CV}: \
                             the mean is not representative."
                        ),
                        "Stratifying into homogeneous groups reduces variance and makes the \
                         sample more efficient."
                            .into(),
                    ],
                )
            } else if has_negatives {
                (
                    SamplingMethod::Cav,
                    85,
                    vec![
                        format!(
                            "{} negative values detected; MUS cannot select them without \
                             segregation.",
                            analysis.negatives_count
                        ),
                        "Classical variables sampling handles mixed signs and estimates the \
                         total value directly."
                            .into(),
                    ],
                )
            } else if benford_anomaly {
                (
                    SamplingMethod::NonStatistical,
                    80,
                    vec![
                        "First-digit distribution deviates from Benford's law, suggesting \
                         targeted manipulation risk."
                            .into(),
                        "A purely statistical draw could dilute these items; a risk-directed \
                         selection is preferred."
                            .into(),
                    ],
                )
            } else {
                (
                    SamplingMethod::Stratified,
                    70,
                    vec!["Data structure is mixed; stratification offers the best balance of \
                          risk reduction."
                        .into()],
                )
            };

        AiRecommendation {
            recommended_method: method,
            confidence_score: confidence,
            reasoning,
            risk_factors,
            directed_selection_advice: advice,
        }
    }
}

fn directed_advice(analysis: &AdvancedAnalysis, has_outliers: bool, benford_anomaly: bool) -> String {
    let mut parts = Vec::new();
    if has_outliers {
        parts.push(format!(
            "{} values lie above the outlier threshold of {:.2}; extract them by directed \
             selection before sampling the remainder.",
            analysis.outliers_count, analysis.outliers_threshold
        ));
    }
    if benford_anomaly {
        let digits: Vec<String> = analysis
            .suspicious_digits()
            .iter()
            .map(u8::to_string)
            .collect();
        parts.push(format!(
            "Leading digits {} deviate from Benford's law; review amounts just below \
             authorization thresholds manually.",
            digits.join(", ")
        ));
    }
    parts.join(" ")
}

impl Recommender for HeuristicRecommender {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn recommend(
        &self,
        stats: &DescriptiveStats,
        analysis: &AdvancedAnalysis,
    ) -> Result<AiRecommendation, RecommendError> {
        Ok(self.evaluate(stats, analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling_core::models::BenfordDigit;

    fn stats(sum: f64, max: f64, cv: f64) -> DescriptiveStats {
        DescriptiveStats {
            count: 100,
            sum,
            min: 0.0,
            max,
            avg: sum / 100.0,
            std_dev: cv * (sum / 100.0).abs(),
            coefficient_of_variation: cv,
        }
    }

    fn suspicious_benford() -> Vec<BenfordDigit> {
        vec![BenfordDigit {
            digit: 9,
            expected_freq: 4.6,
            actual_freq: 20.0,
            actual_count: 20,
            deviation: 15.4,
            is_suspicious: true,
        }]
    }

    #[test]
    fn test_attribute_when_no_monetary_values() {
        let analysis = AdvancedAnalysis {
            zeros_count: 100,
            ..Default::default()
        };
        let rec = HeuristicRecommender.evaluate(&stats(0.0, 0.0, 0.0), &analysis);
        assert_eq!(rec.recommended_method, SamplingMethod::Attribute);
        assert_eq!(rec.confidence_score, 100);
    }

    #[test]
    fn test_stratified_for_volatile_population_with_zeros() {
        let analysis = AdvancedAnalysis {
            zeros_count: 3,
            ..Default::default()
        };
        let rec = HeuristicRecommender.evaluate(&stats(1e6, 9e5, 2.0), &analysis);
        assert_eq!(rec.recommended_method, SamplingMethod::Stratified);
        assert_eq!(rec.confidence_score, 90);
        assert!(rec.risk_factors.contains(&RiskIndicator::HighVolatility));
    }

    #[test]
    fn test_cav_for_negatives_with_moderate_volatility() {
        let analysis = AdvancedAnalysis {
            negatives_count: 4,
            ..Default::default()
        };
        let rec = HeuristicRecommender.evaluate(&stats(1e5, 5e3, 0.9), &analysis);
        assert_eq!(rec.recommended_method, SamplingMethod::Cav);
        assert_eq!(rec.risk_factors, vec![RiskIndicator::NegativeValues]);
    }

    #[test]
    fn test_non_statistical_for_benford_with_zeros() {
        let analysis = AdvancedAnalysis {
            zeros_count: 2,
            benford: suspicious_benford(),
            ..Default::default()
        };
        let rec = HeuristicRecommender.evaluate(&stats(1e5, 5e3, 0.9), &analysis);
        assert_eq!(rec.recommended_method, SamplingMethod::NonStatistical);
        assert!(rec.directed_selection_advice.contains('9'));
    }

    #[test]
    fn test_default_fallback_is_moderate_stratified() {
        let analysis = AdvancedAnalysis {
            zeros_count: 2,
            ..Default::default()
        };
        let rec = HeuristicRecommender.evaluate(&stats(1e5, 5e3, 0.9), &analysis);
        assert_eq!(rec.recommended_method, SamplingMethod::Stratified);
        assert_eq!(rec.confidence_score, 70);
        assert!(rec.directed_selection_advice.is_empty());
    }

    #[test]
    fn test_outliers_produce_advice_and_factor() {
        let analysis = AdvancedAnalysis {
            outliers_count: 3,
            outliers_threshold: 1_234.5,
            ..Default::default()
        };
        let rec = HeuristicRecommender.evaluate(&stats(1e5, 5e3, 0.5), &analysis);
        assert_eq!(rec.recommended_method, SamplingMethod::Mus);
        assert_eq!(rec.risk_factors, vec![RiskIndicator::Outliers]);
        assert!(!rec.directed_selection_advice.is_empty());
    }
}
