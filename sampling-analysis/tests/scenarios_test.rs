//! End-to-end sampling scenarios: profile, recommend, calculate.

use sampling_analysis::calculators::cav;
use sampling_analysis::profiler::Profiler;
use sampling_analysis::recommend::HeuristicRecommender;
use sampling_analysis::{calculate, SamplingWorkbench};
use sampling_core::models::{
    AttributeParams, CavParams, MusParams, NonStatisticalParams, PopulationRow, RiskCriterion,
    RiskLevel, SamplingMethod, SamplingParams, SelectionKind,
};

fn rows_from(values: impl IntoIterator<Item = f64>) -> Vec<PopulationRow> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| PopulationRow::new(format!("TX-{i:05}"), v))
        .collect()
}

// 1,000 positive amounts spread log-uniformly over one decade: first digits
// follow Benford, no value clears the IQR fence, cv is about 0.64 -> MUS.
#[test]
fn scenario_clean_population_recommends_mus() {
    let values: Vec<f64> = (0..1_000)
        .map(|i| 1_000.0 * 10f64.powf(i as f64 / 1_000.0))
        .collect();
    let profiler = Profiler::default();
    let stats = profiler.compute_stats(&values);
    let analysis = profiler.compute_advanced_analysis(&values);

    assert_eq!(stats.count, 1_000);
    assert!(stats.coefficient_of_variation > 0.5 && stats.coefficient_of_variation < 0.8);
    assert_eq!(analysis.benford_sample_count(), 1_000);
    assert!(!analysis.has_benford_anomaly());
    assert_eq!(analysis.outliers_count, 0);
    assert_eq!(analysis.negatives_count, 0);
    assert_eq!(analysis.zeros_count, 0);

    let rec = HeuristicRecommender::new().evaluate(&stats, &analysis);
    assert_eq!(rec.recommended_method, SamplingMethod::Mus);
    assert!(rec.risk_factors.is_empty());
    assert!(!rec.reasoning.is_empty());
    assert!(rec.directed_selection_advice.is_empty());
}

// NC 95, ET 5, PE 1 -> R = 3.00, n = ceil(300 / 4) = 75.
#[test]
fn scenario_attribute_standard_parameters() {
    let rows = rows_from((0..2_000).map(|i| (i % 17) as f64));
    let params = SamplingParams::Attribute(AttributeParams {
        confidence_level: 95.0,
        tolerable_deviation: 5.0,
        expected_deviation: 1.0,
        ..Default::default()
    });
    let results = calculate(&params, &rows, 12_345);
    assert_eq!(results.sample_size, 75);
    assert_eq!(results.sample.len(), 75);
    assert!(results.methodology_notes.iter().any(|n| n.contains("3.00")));
}

// (1000 x 1.96 x 1500 / 50000)^2 = 3457.44 -> clamped to 200.
#[test]
fn scenario_cav_clamps_to_ceiling() {
    assert_eq!(cav::clamped_size(cav::raw_size(1_000, 1_500.0, 50_000.0)), 200);

    let rows = rows_from((0..1_000).map(|i| 500.0 + (i % 40) as f64 * 25.0));
    let params = SamplingParams::Cav(CavParams {
        sigma: 1_500.0,
        tolerable_error: 50_000.0,
        ..Default::default()
    });
    let results = calculate(&params, &rows, 7);
    assert_eq!(results.sample_size, 200);
    assert_eq!(results.sample.len(), 200);
}

// 45 identical round amounts among 155 small irregular ones: the 45 score
// round-thousand (+2) and duplicate (+1), everything else scores 0.
#[test]
fn scenario_combined_risk_sizes_to_high_risk_count() {
    let rows = rows_from(
        std::iter::repeat(5_000.0)
            .take(45)
            .chain((0..155).map(|i| 101.25 + i as f64)),
    );
    let params = SamplingParams::NonStatistical(NonStatisticalParams {
        criterion: RiskCriterion::CombinedRisk,
        ..Default::default()
    });
    let results = calculate(&params, &rows, 1);
    assert_eq!(results.sample_size, 45);
    assert!(results.sample.iter().all(|i| i.value == 5_000.0));
    assert!(results
        .sample
        .iter()
        .all(|i| i.risk_flag == Some(RiskLevel::High) && i.risk_score == Some(3.0)));
}

#[test]
fn workbench_pipeline_profiles_then_samples() {
    let bench = SamplingWorkbench::default();
    let population = bench.load_population(rows_from((0..500).map(|i| 50.0 + i as f64 * 13.7)));
    let profile = bench.profile(&population);

    assert_eq!(profile.fingerprint, population.fingerprint());
    assert_eq!(profile.stats.count, 500);
    assert_eq!(profile.recommendation.recommended_method, SamplingMethod::Mus);

    let params = SamplingParams::default_for(profile.recommendation.recommended_method);
    let results = bench.calculate(&population, &params, Some(99));
    assert_eq!(results.method, SamplingMethod::Mus);
    assert_eq!(results.population_fingerprint, population.fingerprint());
    assert!(results.upper_error_limit >= results.total_error_projection);
    assert!(results.sample_size > 0);
}

#[test]
fn invalid_parameters_yield_zero_size_with_note() {
    let rows = rows_from((0..50).map(|i| i as f64));
    let params = SamplingParams::Attribute(AttributeParams {
        expected_deviation: 6.0,
        tolerable_deviation: 5.0,
        ..Default::default()
    });
    let results = calculate(&params, &rows, 1);
    assert_eq!(results.sample_size, 0);
    assert!(results.is_infeasible());
    assert!(results
        .methodology_notes
        .iter()
        .any(|n| n.contains("strictly less")));
}

#[test]
fn key_items_are_reported_as_such() {
    let mut values: Vec<f64> = (0..400).map(|i| 100.0 + i as f64).collect();
    values[10] = 90_000.0;
    let rows = rows_from(values);
    let params = SamplingParams::Mus(MusParams {
        high_value_threshold: Some(50_000.0),
        ..Default::default()
    });
    let results = calculate(&params, &rows, 5);
    assert!(results
        .sample
        .iter()
        .any(|i| i.selection == SelectionKind::KeyItem && i.id == "TX-00010"));
}
