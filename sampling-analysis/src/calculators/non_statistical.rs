//! Non-statistical (judgmental) sampling.
//!
//! Single-criterion mode draws a fixed number of items from the rows that
//! match the criterion, or from the whole population when none match.
//! Combined mode ranks every row by its risk score and takes the top
//! `max(30, min(high_risk, 60))`.

use tracing::debug;

use sampling_core::constants::{HIGH_RISK_SCORE, RISK_SCORE_MAX_SAMPLE, RISK_SCORE_MIN_SAMPLE};
use sampling_core::models::{
    AuditResults, AuditSampleItem, NonStatisticalParams, PopulationRow, RiskCriterion, RiskFactor,
    RiskLevel, SamplingMethod, SelectionKind,
};

use super::{infeasible_because, new_results};
use crate::profiler::benford::first_significant_digit;
use crate::profiler::forensics::{is_round_number, value_key, value_occurrences};
use crate::profiler::Profiler;
use crate::risk::{score_row, RiskContext};
use crate::sampler::select_from_frame;

/// The single risk factor a criterion tags its items with.
fn criterion_factor(criterion: RiskCriterion) -> Option<RiskFactor> {
    match criterion {
        RiskCriterion::Benford => Some(RiskFactor::Benford),
        RiskCriterion::Outliers => Some(RiskFactor::Outlier),
        RiskCriterion::Duplicates => Some(RiskFactor::Duplicate),
        RiskCriterion::RoundNumbers => Some(RiskFactor::RoundNumber),
        RiskCriterion::CombinedRisk => None,
    }
}

/// Indices of rows matching a single criterion, in frame order.
pub fn matching_rows(
    profiler: &Profiler,
    criterion: RiskCriterion,
    rows: &[PopulationRow],
) -> Vec<usize> {
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let matches: Box<dyn Fn(f64) -> bool> = match criterion {
        RiskCriterion::Benford => {
            let suspicious = profiler.compute_advanced_analysis(&values).suspicious_digits();
            Box::new(move |v| first_significant_digit(v).is_some_and(|d| suspicious.contains(&d)))
        }
        RiskCriterion::Outliers => {
            let fence = profiler.fence(&values);
            Box::new(move |v| fence.is_outlier(v))
        }
        RiskCriterion::Duplicates => {
            let occurrences = value_occurrences(&values);
            Box::new(move |v| occurrences.get(&value_key(v)).is_some_and(|&n| n > 1))
        }
        RiskCriterion::RoundNumbers => Box::new(is_round_number),
        RiskCriterion::CombinedRisk => Box::new(|_| false),
    };
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| matches(v))
        .map(|(i, _)| i)
        .collect()
}

/// `max(30, min(high_risk, 60))`, never more than the population.
pub fn combined_sample_size(high_risk: usize, population: usize) -> usize {
    RISK_SCORE_MIN_SAMPLE
        .max(high_risk.min(RISK_SCORE_MAX_SAMPLE))
        .min(population)
}

pub fn calculate(params: &NonStatisticalParams, rows: &[PopulationRow], seed: u64) -> AuditResults {
    calculate_with(&Profiler::default(), params, rows, seed)
}

pub fn calculate_with(
    profiler: &Profiler,
    params: &NonStatisticalParams,
    rows: &[PopulationRow],
    seed: u64,
) -> AuditResults {
    if rows.is_empty() {
        return infeasible_because(
            SamplingMethod::NonStatistical,
            rows,
            "Population is empty; there is nothing to select.",
        );
    }

    let mut results = new_results(SamplingMethod::NonStatistical, rows);
    match (params.criterion.fixed_sample_size(), criterion_factor(params.criterion)) {
        (Some(fixed), Some(factor)) => {
            single_criterion(profiler, params.criterion, fixed, factor, rows, seed, &mut results)
        }
        _ => combined_risk(profiler, rows, &mut results),
    }

    if !params.criteria.trim().is_empty() {
        results.note(format!("Selection criteria: {}", params.criteria.trim()));
    }
    if !params.justification.trim().is_empty() {
        results.note(format!("Justification: {}", params.justification.trim()));
    }
    results.note("Judgmental selection: results cannot be projected statistically to the population.");

    debug!(
        criterion = params.criterion.name(),
        sample_size = results.sample_size,
        "non-statistical sample selected"
    );
    results
}

fn single_criterion(
    profiler: &Profiler,
    criterion: RiskCriterion,
    fixed: usize,
    factor: RiskFactor,
    rows: &[PopulationRow],
    seed: u64,
    results: &mut AuditResults,
) {
    let subset = matching_rows(profiler, criterion, rows);
    let (frame, from_subset) = if subset.is_empty() {
        ((0..rows.len()).collect::<Vec<_>>(), false)
    } else {
        (subset, true)
    };
    let n = fixed.min(frame.len());

    let justification = if from_subset {
        format!("Directed selection: matches the {} criterion.", criterion.name())
    } else {
        format!(
            "Directed selection under the {} criterion; no row matched, drawn from the full population.",
            criterion.name()
        )
    };
    results.sample = select_from_frame(n, seed, rows, &frame, |_, item| {
        item.selection = SelectionKind::Directed;
        item.risk_factors = vec![factor];
        item.risk_flag = Some(RiskLevel::Medium);
        item.risk_justification = Some(justification.clone());
    });
    results.sample_size = results.sample.len();

    if from_subset {
        results.note(format!(
            "Criterion {}: {} matching rows, {} selected (fixed size {fixed}).",
            criterion.name(),
            frame.len(),
            results.sample_size
        ));
    } else {
        results.note(format!(
            "Criterion {}: no matching rows; {} items drawn from the full population.",
            criterion.name(),
            results.sample_size
        ));
    }
}

fn combined_risk(profiler: &Profiler, rows: &[PopulationRow], results: &mut AuditResults) {
    let ctx = RiskContext::with_sigma_multiplier(rows, profiler.outlier_sigma_multiplier());
    let mut scored: Vec<(usize, _)> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i, score_row(row, &ctx)))
        .collect();
    // Stable: ties keep frame order.
    scored.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));

    let high_risk = scored
        .iter()
        .filter(|(_, risk)| risk.score >= HIGH_RISK_SCORE)
        .count();
    let n = combined_sample_size(high_risk, rows.len());

    results.sample = scored
        .into_iter()
        .take(n)
        .map(|(i, risk)| {
            let row = &rows[i];
            let mut item = AuditSampleItem::new(row.display_id(i), row.value)
                .with_selection(SelectionKind::Directed)
                .with_risk(risk.level(), risk.justification());
            item.risk_score = Some(risk.score);
            item.risk_factors = risk.flags;
            item
        })
        .collect();
    results.sample_size = results.sample.len();
    results.note(format!(
        "Combined risk scoring: {high_risk} rows score {HIGH_RISK_SCORE} or more; top {n} selected \
         (max({RISK_SCORE_MIN_SAMPLE}, min(high risk, {RISK_SCORE_MAX_SAMPLE})))."
    ));
    results.note(format!(
        "Outlier cut-off for scoring: {:.2}.",
        ctx.outlier_cutoff()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[f64]) -> Vec<PopulationRow> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| PopulationRow::new(format!("N{i}"), v))
            .collect()
    }

    #[test]
    fn test_combined_size_bounds() {
        assert_eq!(combined_sample_size(0, 500), 30);
        assert_eq!(combined_sample_size(45, 500), 45);
        assert_eq!(combined_sample_size(200, 500), 60);
        assert_eq!(combined_sample_size(0, 12), 12);
    }

    #[test]
    fn test_duplicates_drawn_from_matching_rows() {
        let mut values: Vec<f64> = (0..100).map(|i| 11.0 + i as f64 * 3.0).collect();
        values[5] = 42.42;
        values[50] = 42.42;
        values[70] = 42.42;
        let params = NonStatisticalParams {
            criterion: RiskCriterion::Duplicates,
            ..Default::default()
        };
        let results = calculate(&params, &rows(&values), 9);
        assert_eq!(results.sample_size, 3);
        assert!(results.sample.iter().all(|i| i.value == 42.42));
        assert!(results
            .sample
            .iter()
            .all(|i| i.risk_factors == vec![RiskFactor::Duplicate]));
    }

    #[test]
    fn test_no_match_falls_back_to_population() {
        let values: Vec<f64> = (0..50).map(|i| 11.0 + i as f64).collect();
        let params = NonStatisticalParams {
            criterion: RiskCriterion::RoundNumbers,
            ..Default::default()
        };
        let results = calculate(&params, &rows(&values), 9);
        assert_eq!(results.sample_size, 20);
        assert!(results
            .sample
            .iter()
            .all(|i| i.selection == SelectionKind::Directed));
    }

    #[test]
    fn test_combined_risk_takes_highest_scores_first() {
        let mut values: Vec<f64> = (0..100).map(|i| 11.0 + i as f64 * 1.5).collect();
        values[3] = 5_000.0;
        values[40] = 5_000.0;
        let results = calculate(&NonStatisticalParams::default(), &rows(&values), 1);
        assert_eq!(results.sample_size, 30);
        assert_eq!(results.sample[0].value, 5_000.0);
        assert_eq!(results.sample[1].value, 5_000.0);
        assert_eq!(results.sample[0].risk_flag, Some(RiskLevel::Critical));
        let scores: Vec<f64> = results.sample.iter().filter_map(|i| i.risk_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_work_paper_text_recorded() {
        let params = NonStatisticalParams {
            criterion: RiskCriterion::Outliers,
            criteria: "Year-end manual journals".to_string(),
            justification: "Management override risk".to_string(),
        };
        let results = calculate(&params, &rows(&[1.0, 2.0, 3.0]), 1);
        assert!(results
            .methodology_notes
            .iter()
            .any(|n| n.contains("Year-end manual journals")));
        assert!(results
            .methodology_notes
            .iter()
            .any(|n| n.contains("Management override risk")));
    }
}
