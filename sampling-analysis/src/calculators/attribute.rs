//! Attribute (control-deviation) sampling.

use tracing::debug;

use sampling_core::constants::ATTRIBUTE_PILOT_SIZE;
use sampling_core::models::{
    AttributeParams, AuditResults, PilotKind, PilotMetrics, PopulationRow, SamplingMethod,
    SelectionKind,
};

use super::{ceil_size, infeasible, new_results, EMPTY_POPULATION_NOTE};
use crate::sampler::select_items;

/// Reliability factor for zero expected deviations at confidence `nc` (%).
pub fn reliability_factor(confidence_level: f64) -> f64 {
    if confidence_level >= 99.0 {
        4.61
    } else if confidence_level >= 98.0 {
        3.91
    } else if confidence_level >= 95.0 {
        3.00
    } else if confidence_level >= 92.0 {
        2.53
    } else {
        2.31
    }
}

/// `n = ceil(R * 100 / (ET - PE))`.
pub fn formula_size(params: &AttributeParams) -> usize {
    let r = reliability_factor(params.confidence_level);
    ceil_size(r * 100.0 / (params.tolerable_deviation - params.expected_deviation))
}

pub fn calculate(params: &AttributeParams, rows: &[PopulationRow], seed: u64) -> AuditResults {
    if let Err(e) = params.validate() {
        return infeasible(SamplingMethod::Attribute, rows, &e);
    }

    let r = reliability_factor(params.confidence_level);
    let mut results = new_results(SamplingMethod::Attribute, rows);
    let population_size = if params.population_size > 0 {
        params.population_size
    } else {
        rows.len()
    };

    if params.use_sequential {
        results.sample_size = ATTRIBUTE_PILOT_SIZE;
        results.sample = select_items(ATTRIBUTE_PILOT_SIZE, seed, rows, |_, item| {
            item.selection = SelectionKind::Pilot;
            item.is_pilot_item = true;
            item.risk_justification = Some("Stop-or-go pilot item.".to_string());
        });
        results.pilot_metrics = Some(PilotMetrics::new(PilotKind::StopOrGo, ATTRIBUTE_PILOT_SIZE));
        results.note(format!(
            "Stop-or-go procedure started with a pilot of {ATTRIBUTE_PILOT_SIZE} items."
        ));
    } else {
        let n = formula_size(params);
        results.sample_size = n;
        results.sample = select_items(n, seed, rows, |_, _| {});
        results.note(format!(
            "n = ceil(R x 100 / (ET - PE)) = ceil({r:.2} x 100 / ({} - {})) = {n}",
            params.tolerable_deviation, params.expected_deviation
        ));
    }

    if rows.is_empty() {
        results.note(EMPTY_POPULATION_NOTE);
    } else if population_size > 0 && results.sample_size > population_size {
        results.note(format!(
            "Sample size {} exceeds the population of {population_size}; items repeat once the \
             population is exhausted.",
            results.sample_size
        ));
    }

    // Planned deviation limits, in percent.
    results.total_error_projection = params.expected_deviation;
    if results.sample_size > 0 {
        results.upper_error_limit =
            params.expected_deviation + r * 100.0 / results.sample_size as f64;
    }

    debug!(
        confidence = params.confidence_level,
        reliability = r,
        sample_size = results.sample_size,
        sequential = params.use_sequential,
        "attribute sample sized"
    );
    results
}
