//! Attribute stop-or-go expansion.

use tracing::debug;

use sampling_core::models::ExpansionPlan;

use crate::calculators::attribute::reliability_factor;
use crate::calculators::ceil_size;
use crate::calculators::poisson::upper_limit_factor;

const FORMULA: &str = "n = ceil(R(k, NC) x 100 / ET)";

/// Confidence bucket (fraction) for a confidence level in percent.
fn confidence_bucket(confidence_level: f64) -> f64 {
    if confidence_level >= 99.0 {
        0.99
    } else if confidence_level >= 98.0 {
        0.98
    } else if confidence_level >= 95.0 {
        0.95
    } else if confidence_level >= 92.0 {
        0.92
    } else {
        0.90
    }
}

/// Reliability factor after `errors` observed deviations.
///
/// Zero errors reuse the attribute table; every further error takes the
/// Poisson upper limit at the same confidence, which grows by well over
/// one per error.
pub fn stop_or_go_factor(errors: usize, confidence_level: f64) -> f64 {
    if errors == 0 {
        reliability_factor(confidence_level)
    } else {
        upper_limit_factor(errors, confidence_bucket(confidence_level))
    }
}

pub fn calculate_stop_or_go_expansion(
    current_size: usize,
    errors_found: usize,
    confidence_level: f64,
    tolerable_deviation: f64,
) -> ExpansionPlan {
    if errors_found == 0 {
        return ExpansionPlan {
            recommended_expansion: 0,
            justification: "No deviations found. The pilot is sufficient to conclude without \
                            enlarging the sample."
                .to_string(),
            new_total: current_size,
            formula: FORMULA.to_string(),
        };
    }
    if !(tolerable_deviation > 0.0 && tolerable_deviation.is_finite()) {
        return ExpansionPlan {
            recommended_expansion: 0,
            justification: format!(
                "Tolerable deviation {tolerable_deviation} is not positive; no target size can \
                 be computed."
            ),
            new_total: current_size,
            formula: FORMULA.to_string(),
        };
    }

    let factor = stop_or_go_factor(errors_found, confidence_level);
    let target = ceil_size(factor / (tolerable_deviation / 100.0));
    let expansion = target.saturating_sub(current_size);

    debug!(
        current_size,
        errors_found,
        factor,
        target,
        expansion,
        "stop-or-go expansion planned"
    );

    let justification = if expansion == 0 {
        format!(
            "{errors_found} deviations found. The current {current_size} items already meet the \
             target of {target} at {confidence_level}% confidence."
        )
    } else {
        format!(
            "{errors_found} deviations found. The sample must grow to {target} items to \
             validate the control at {confidence_level}% confidence."
        )
    };

    ExpansionPlan {
        recommended_expansion: expansion,
        justification,
        new_total: current_size + expansion,
        formula: format!(
            "{FORMULA} = ceil({factor:.2} x 100 / {tolerable_deviation}) = {target}"
        ),
    }
}
