//! MUS and CAV pilot expansion.
//!
//! MUS narrows the interval by half a confidence-factor point per pilot
//! error: `J = TE / (CF + 0.5 x errors)`, `n = ceil(V / J)`.
//! CAV inflates the calibrated sigma by 20% per pilot error and re-runs
//! the CAV size formula.

use tracing::debug;

use sampling_core::models::{
    AuditResults, CavParams, ExpansionPlan, MusParams, PopulationRow, SamplingParams,
};

use crate::calculators::cav::{clamped_size, raw_size};
use crate::calculators::ceil_size;
use crate::calculators::mus::{confidence_factor, effective_population_value, selection_frame};

/// Full-sample target after a pilot with `errors_found` errors.
pub fn calculate_variable_expansion(
    params: &SamplingParams,
    current: &AuditResults,
    errors_found: usize,
    rows: &[PopulationRow],
) -> ExpansionPlan {
    let plan = match params {
        SamplingParams::Mus(p) => mus_plan(p, current, errors_found, rows),
        SamplingParams::Cav(p) => cav_plan(p, current, errors_found, rows),
        other => ExpansionPlan {
            recommended_expansion: 0,
            justification: format!(
                "Pilot expansion applies to MUS and CAV only, not {}.",
                other.method().name()
            ),
            new_total: current.sample_size,
            formula: String::new(),
        },
    };

    debug!(
        method = params.method().name(),
        errors_found,
        current = current.sample_size,
        new_total = plan.new_total,
        expansion = plan.recommended_expansion,
        "variable expansion planned"
    );
    plan
}

fn mus_plan(
    params: &MusParams,
    current: &AuditResults,
    errors_found: usize,
    rows: &[PopulationRow],
) -> ExpansionPlan {
    let cf = confidence_factor(params.risk_of_incorrect_acceptance);
    let adjusted = cf + 0.5 * errors_found as f64;
    let interval = params.tolerable_error / adjusted;
    let value = effective_population_value(params, &selection_frame(params, rows));
    let target = if interval > 0.0 {
        ceil_size(value / interval)
    } else {
        0
    };
    let expansion = target.saturating_sub(current.sample_size);

    let justification = if errors_found == 0 {
        format!(
            "Pilot clean (0 errors). Covering a population value of {value:.2} at the planned \
             materiality requires {target} items in total."
        )
    } else {
        format!(
            "{errors_found} misstatements found in the pilot. The sample grows to {target} items \
             to cover the projected error."
        )
    };

    ExpansionPlan {
        recommended_expansion: expansion,
        justification,
        new_total: current.sample_size + expansion,
        formula: format!(
            "J = TE / (CF + 0.5 x errors) = {:.2} / {adjusted:.2} = {interval:.2}; \
             n = ceil(V / J) = ceil({value:.2} / {interval:.2}) = {target}",
            params.tolerable_error
        ),
    }
}

fn cav_plan(
    params: &CavParams,
    current: &AuditResults,
    errors_found: usize,
    rows: &[PopulationRow],
) -> ExpansionPlan {
    let sigma = current
        .pilot_metrics
        .as_ref()
        .and_then(|m| m.calibrated_sigma)
        .filter(|s| *s > 0.0)
        .unwrap_or(params.sigma);
    let adjustment = 1.0 + 0.2 * errors_found as f64;
    let population_size = rows.len();
    let raw = raw_size(population_size, sigma * adjustment, params.tolerable_error);
    let target = clamped_size(raw);
    let expansion = target.saturating_sub(current.sample_size);

    let justification = if errors_found == 0 {
        format!("Sigma calibration complete. The definitive sample size is {target} items.")
    } else {
        format!(
            "Pilot variability and {errors_found} findings require {target} items in total to \
             reach the planned precision."
        )
    };

    ExpansionPlan {
        recommended_expansion: expansion,
        justification,
        new_total: current.sample_size + expansion,
        formula: format!(
            "n = ceil((N x Z x sigma x (1 + 0.2 x errors) / TE)^2) = ceil(({population_size} x \
             1.96 x {sigma:.2} x {adjustment:.1} / {:.2})^2) = {}, clamped to {target}",
            params.tolerable_error,
            ceil_size(raw)
        ),
    }
}
