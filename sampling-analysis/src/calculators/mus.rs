//! Monetary Unit Sampling.
//!
//! Interval `J = TE / CF` with `CF = 3.0` when `RIA <= 5%`, else `2.31`;
//! `n = ceil(V / J)`. With top-stratum optimization the largest items that
//! make up roughly 5% of value become key items and the remaining 95% is
//! sampled at the same interval.

use rustc_hash::FxHashSet;
use tracing::debug;

use sampling_core::constants::MUS_PILOT_SIZE;
use sampling_core::models::{
    AuditResults, AuditSampleItem, MusParams, NegativeTreatment, PilotKind, PilotMetrics,
    PopulationRow, RiskLevel, SamplingMethod, SelectionKind,
};

use super::poisson::evaluate_mus;
use super::{ceil_size, floor_size, infeasible, infeasible_because, new_results, EMPTY_POPULATION_NOTE};
use crate::sampler::select_from_frame;

/// Confidence factor for a risk of incorrect acceptance (%).
pub fn confidence_factor(risk_of_incorrect_acceptance: f64) -> f64 {
    if risk_of_incorrect_acceptance <= 5.0 {
        3.0
    } else {
        2.31
    }
}

/// `TE / CF`.
pub fn sampling_interval(params: &MusParams) -> f64 {
    params.tolerable_error / confidence_factor(params.risk_of_incorrect_acceptance)
}

/// Rows eligible for monetary selection, with the amount each contributes.
#[derive(Debug, Clone, Default)]
pub struct SelectionFrame {
    pub indices: Vec<usize>,
    pub total_value: f64,
    /// Negative rows left out of the frame.
    pub excluded_negatives: usize,
}

pub fn selection_frame(params: &MusParams, rows: &[PopulationRow]) -> SelectionFrame {
    let mut frame = SelectionFrame::default();
    for (i, row) in rows.iter().enumerate() {
        let amount = unit_value(params.handle_negatives, row.value);
        match amount {
            Some(a) => {
                frame.indices.push(i);
                frame.total_value += a;
            }
            None => frame.excluded_negatives += 1,
        }
    }
    frame
}

/// Monetary amount a row carries in the frame; `None` when excluded.
fn unit_value(treatment: NegativeTreatment, value: f64) -> Option<f64> {
    if value >= 0.0 {
        return Some(value);
    }
    match treatment {
        NegativeTreatment::Absolute => Some(value.abs()),
        NegativeTreatment::Separate | NegativeTreatment::Zero => None,
    }
}

/// Book value used for sizing: the declared value, else the frame total.
pub fn effective_population_value(params: &MusParams, frame: &SelectionFrame) -> f64 {
    if params.population_value > 0.0 {
        params.population_value
    } else {
        frame.total_value
    }
}

pub fn calculate(params: &MusParams, rows: &[PopulationRow], seed: u64) -> AuditResults {
    if let Err(e) = params.validate() {
        return infeasible(SamplingMethod::Mus, rows, &e);
    }

    let frame = selection_frame(params, rows);
    let value = effective_population_value(params, &frame);
    if value <= 0.0 {
        return infeasible_because(
            SamplingMethod::Mus,
            rows,
            "Population carries no positive monetary value; MUS cannot be applied.",
        );
    }

    let cf = confidence_factor(params.risk_of_incorrect_acceptance);
    let interval = params.tolerable_error / cf;
    let absolute = params.handle_negatives == NegativeTreatment::Absolute;
    let mut results = new_results(SamplingMethod::Mus, rows);

    match params.handle_negatives {
        NegativeTreatment::Separate if frame.excluded_negatives > 0 => results.note(format!(
            "{} negative items segregated from the MUS frame for separate testing.",
            frame.excluded_negatives
        )),
        NegativeTreatment::Zero if frame.excluded_negatives > 0 => results.note(format!(
            "{} negative items carry zero monetary units and cannot be selected.",
            frame.excluded_negatives
        )),
        NegativeTreatment::Absolute => {
            results.note("Negative items are sampled at their absolute value.")
        }
        _ => {}
    }

    if params.use_pilot_sample {
        results.sample_size = MUS_PILOT_SIZE;
        results.sample = select_from_frame(MUS_PILOT_SIZE, seed, rows, &frame.indices, |draw, item| {
            item.selection = SelectionKind::Pilot;
            item.is_pilot_item = true;
            item.risk_justification = Some("Initial calibration item.".to_string());
            if absolute {
                item.value = draw.row.value.abs();
            }
        });
        let mut metrics = PilotMetrics::new(PilotKind::Mus, MUS_PILOT_SIZE);
        metrics.initial_expected_error = Some(params.expected_error);
        results.pilot_metrics = Some(metrics);
        results.note(format!(
            "Phase 1: pilot of {MUS_PILOT_SIZE} items drawn to calibrate monetary parameters."
        ));
    } else {
        let mut key_items: Vec<usize> = Vec::new();
        let mut key_set: FxHashSet<usize> = FxHashSet::default();

        if let Some(threshold) = params.high_value_threshold {
            for &i in &frame.indices {
                if unit_value(params.handle_negatives, rows[i].value).is_some_and(|a| a >= threshold)
                    && key_set.insert(i)
                {
                    key_items.push(i);
                }
            }
        }

        let random_size = if params.optimize_top_stratum {
            let top_count = floor_size(0.05 * value / interval).min(frame.indices.len());
            let mut by_value: Vec<usize> = frame
                .indices
                .iter()
                .copied()
                .filter(|i| !key_set.contains(i))
                .collect();
            by_value.sort_by(|&a, &b| {
                let va = unit_value(params.handle_negatives, rows[a].value).unwrap_or(0.0);
                let vb = unit_value(params.handle_negatives, rows[b].value).unwrap_or(0.0);
                vb.total_cmp(&va)
            });
            for i in by_value.into_iter().take(top_count) {
                key_set.insert(i);
                key_items.push(i);
            }
            results.note(format!(
                "Top stratum: {top_count} key items cover ~5% of value (floor(0.05 x V / J)); \
                 the remaining 95% is sampled at the same interval."
            ));
            ceil_size(0.95 * value / interval)
        } else {
            ceil_size(value / interval)
        };

        for &i in &key_items {
            let row = &rows[i];
            let shown = if absolute { row.value.abs() } else { row.value };
            let justification = if params.high_value_threshold.is_some_and(|t| shown >= t) {
                format!("Key item: value {shown:.2} at or above the high-value threshold.")
            } else {
                format!(
                    "Key item: value {shown:.2} falls in the top stratum for sampling interval \
                     {interval:.2}."
                )
            };
            results.sample.push(
                AuditSampleItem::new(row.display_id(i), shown)
                    .with_selection(SelectionKind::KeyItem)
                    .with_risk(RiskLevel::High, justification),
            );
        }

        let mut remainder: Vec<usize> = frame
            .indices
            .iter()
            .copied()
            .filter(|i| !key_set.contains(i))
            .collect();
        if remainder.is_empty() && random_size > 0 {
            // Key items cover the frame; the interval draws still refill from it.
            remainder = frame.indices.clone();
            results.note(
                "Key items exhaust the frame; interval selections are drawn from the full frame \
                 with replacement.",
            );
        }

        results.sample.extend(select_from_frame(random_size, seed, rows, &remainder, |draw, item| {
            if absolute {
                item.value = draw.row.value.abs();
            }
        }));
        results.sample_size = key_items.len() + random_size;
        results.note(format!(
            "J = TE / CF = {:.2} / {cf:.2} = {interval:.2}; {} key items + {random_size} \
             interval selections.",
            params.tolerable_error,
            key_items.len()
        ));
    }

    if rows.is_empty() {
        results.note(EMPTY_POPULATION_NOTE);
    }

    let confidence = 1.0 - params.risk_of_incorrect_acceptance / 100.0;
    let evaluation = evaluate_mus(params.expected_error, interval, confidence);
    results.total_error_projection = evaluation.projected_misstatement;
    results.upper_error_limit = evaluation.upper_error_limit;

    debug!(
        value,
        interval,
        confidence_factor = cf,
        sample_size = results.sample_size,
        pilot = params.use_pilot_sample,
        "mus sample sized"
    );
    results
}
