//! Classical Variables Sampling.

use tracing::debug;

use sampling_core::constants::{CAV_MAX_SAMPLE, CAV_MIN_SAMPLE, CAV_PILOT_SIZE, CAV_Z};
use sampling_core::models::{
    AuditResults, CavParams, PilotKind, PilotMetrics, PopulationRow, RiskFactor, RiskLevel,
    SamplingMethod, SelectionKind,
};

use super::{ceil_size, infeasible, infeasible_because, new_results};
use crate::profiler::descriptive::{mean, sample_std_dev};
use crate::sampler::select_items;

/// Unclamped `(N * Z * sigma / TE)^2`.
pub fn raw_size(population_size: usize, sigma: f64, tolerable_error: f64) -> f64 {
    if tolerable_error <= 0.0 {
        return 0.0;
    }
    (population_size as f64 * CAV_Z * sigma / tolerable_error).powi(2)
}

/// `ceil(raw)` clamped to the 30..=200 window.
pub fn clamped_size(raw: f64) -> usize {
    ceil_size(raw).clamp(CAV_MIN_SAMPLE, CAV_MAX_SAMPLE)
}

pub fn calculate(params: &CavParams, rows: &[PopulationRow], seed: u64) -> AuditResults {
    if let Err(e) = params.validate() {
        return infeasible(SamplingMethod::Cav, rows, &e);
    }
    if rows.is_empty() {
        return infeasible_because(
            SamplingMethod::Cav,
            rows,
            "Population is empty; CAV needs the population size N.",
        );
    }

    let population_size = rows.len();
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let population_mean = mean(&values);
    let mut results = new_results(SamplingMethod::Cav, rows);
    results.note(format!(
        "Estimation technique: {}.",
        params.estimation_technique.name()
    ));

    let sigma = if params.use_pilot_sample {
        results.sample_size = CAV_PILOT_SIZE;
        results.sample = select_items(CAV_PILOT_SIZE, seed, rows, |_, item| {
            item.selection = SelectionKind::Pilot;
            item.is_pilot_item = true;
            item.risk_justification = Some("Variance calibration item.".to_string());
        });

        let pilot_values: Vec<f64> = results.sample.iter().map(|i| i.value).collect();
        let calibrated = sample_std_dev(&pilot_values);
        let pilot_mean = mean(&pilot_values);

        let mut metrics = PilotMetrics::new(PilotKind::Cav, CAV_PILOT_SIZE);
        metrics.initial_sigma = (params.sigma > 0.0).then_some(params.sigma);
        metrics.calibrated_sigma = Some(calibrated);
        metrics.projected_total = Some(pilot_mean * population_size as f64);
        results.pilot_metrics = Some(metrics);
        results.note(format!(
            "Phase 1: pilot of {CAV_PILOT_SIZE} items; calibrated sigma (n - 1) = {calibrated:.2}."
        ));
        calibrated
    } else {
        let raw = raw_size(population_size, params.sigma, params.tolerable_error);
        let n = clamped_size(raw);
        results.sample_size = n;
        results.sample = select_items(n, seed, rows, |_, _| {});
        results.note(format!(
            "n = ceil((N x Z x sigma / TE)^2) = ceil(({population_size} x {CAV_Z} x {:.2} / {:.2})^2) \
             = {}, clamped to [{CAV_MIN_SAMPLE}, {CAV_MAX_SAMPLE}] = {n}",
            params.sigma,
            params.tolerable_error,
            ceil_size(raw)
        ));
        params.sigma
    };

    let band = 3.0 * sigma;
    let mut flagged = 0usize;
    if sigma > 0.0 {
        for item in &mut results.sample {
            let distance = (item.value - population_mean).abs();
            if distance > band {
                item.risk_flag = Some(RiskLevel::High);
                item.risk_factors.push(RiskFactor::SignificantDeviation);
                item.risk_justification = Some(format!(
                    "Significant deviation: {distance:.2} from the mean exceeds 3 sigma ({band:.2})."
                ));
                flagged += 1;
            }
        }
    }
    if flagged > 0 {
        results.note(format!("{flagged} items deviate more than 3 sigma from the mean."));
    }

    if results.sample_size > 0 {
        results.upper_error_limit =
            population_size as f64 * CAV_Z * sigma / (results.sample_size as f64).sqrt();
    }

    debug!(
        population_size,
        sigma,
        sample_size = results.sample_size,
        pilot = params.use_pilot_sample,
        "cav sample sized"
    );
    results
}
