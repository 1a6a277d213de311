//! Stratified sampling.
//!
//! Allocation is bottom-up sufficiency: every stratum gets between 30 and
//! 45 items (capped at its size), with the allocation method deciding
//! where inside that window each stratum lands. Items above the certainty
//! threshold are always selected.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use tracing::debug;

use sampling_core::constants::{STRATUM_MAX_ALLOCATION, STRATUM_MIN_ALLOCATION};
use sampling_core::models::{
    AllocationMethod, AuditResults, AuditSampleItem, PopulationRow, RiskLevel, SamplingMethod,
    SelectionKind, StratificationBasis, StratifiedParams,
};

use super::{infeasible, infeasible_because, new_results};
use crate::profiler::descriptive::compute_stats;
use crate::profiler::Profiler;
use crate::sampler::select_from_frame;

const UNCATEGORIZED: &str = "Uncategorized";
const CERTAINTY_LABEL: &str = "Certainty";

/// One group of the population frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Stratum {
    pub label: String,
    pub indices: Vec<usize>,
    pub std_dev: f64,
}

impl Stratum {
    fn new(label: String, indices: Vec<usize>, rows: &[PopulationRow]) -> Self {
        let values: Vec<f64> = indices.iter().map(|&i| rows[i].value).collect();
        Self {
            label,
            std_dev: compute_stats(&values).std_dev,
            indices,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Group `frame` (indices into `rows`) by the chosen basis. Empty strata
/// are dropped.
pub fn build_strata(
    basis: StratificationBasis,
    strata_count: usize,
    rows: &[PopulationRow],
    frame: &[usize],
) -> Vec<Stratum> {
    match basis {
        StratificationBasis::Monetary => monetary_bands(strata_count.max(1), rows, frame),
        StratificationBasis::Category => group_by(rows, frame, |r| r.category.as_deref()),
        StratificationBasis::Subcategory => group_by(rows, frame, |r| r.subcategory.as_deref()),
    }
}

fn monetary_bands(count: usize, rows: &[PopulationRow], frame: &[usize]) -> Vec<Stratum> {
    let mut sorted = frame.to_vec();
    sorted.sort_by(|&a, &b| rows[a].value.total_cmp(&rows[b].value));

    let len = sorted.len();
    (0..count)
        .filter_map(|band| {
            let start = band * len / count;
            let end = (band + 1) * len / count;
            let slice = sorted.get(start..end)?;
            let (&first, &last) = (slice.first()?, slice.last()?);
            let label = format!(
                "Band {}: {:.2} to {:.2}",
                band + 1,
                rows[first].value,
                rows[last].value
            );
            Some(Stratum::new(label, slice.to_vec(), rows))
        })
        .collect()
}

fn group_by<F>(rows: &[PopulationRow], frame: &[usize], key: F) -> Vec<Stratum>
where
    F: Fn(&PopulationRow) -> Option<&str>,
{
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for &i in frame {
        let label = key(&rows[i])
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(UNCATEGORIZED);
        groups.entry(label.to_string()).or_default().push(i);
    }
    groups
        .into_iter()
        .map(|(label, indices)| Stratum::new(label, indices, rows))
        .collect()
}

/// Per-stratum sample sizes inside the sufficiency window.
pub fn allocate(method: AllocationMethod, strata: &[Stratum]) -> Vec<usize> {
    let spread = (STRATUM_MAX_ALLOCATION - STRATUM_MIN_ALLOCATION) as f64;
    let weights: Vec<f64> = strata
        .iter()
        .map(|s| match method {
            AllocationMethod::Equal => 0.0,
            AllocationMethod::Proportional => s.len() as f64,
            AllocationMethod::Neyman => s.len() as f64 * s.std_dev,
        })
        .collect();
    let max_weight = weights.iter().copied().fold(0.0_f64, f64::max);

    strata
        .iter()
        .zip(weights)
        .map(|(stratum, weight)| {
            let extra = if max_weight > 0.0 {
                (spread * weight / max_weight).round() as usize
            } else {
                0
            };
            (STRATUM_MIN_ALLOCATION + extra).min(stratum.len())
        })
        .collect()
}

pub fn calculate(params: &StratifiedParams, rows: &[PopulationRow], seed: u64) -> AuditResults {
    calculate_with(&Profiler::default(), params, rows, seed)
}

pub fn calculate_with(
    profiler: &Profiler,
    params: &StratifiedParams,
    rows: &[PopulationRow],
    seed: u64,
) -> AuditResults {
    if let Err(e) = params.validate() {
        return infeasible(SamplingMethod::Stratified, rows, &e);
    }
    if rows.is_empty() {
        return infeasible_because(
            SamplingMethod::Stratified,
            rows,
            "Population is empty; there is nothing to stratify.",
        );
    }

    let mut results = new_results(SamplingMethod::Stratified, rows);

    let mut certainty: FxHashSet<usize> = FxHashSet::default();
    if params.certainty_stratum_threshold > 0.0 {
        certainty.extend(
            rows.iter()
                .enumerate()
                .filter(|(_, r)| r.value > params.certainty_stratum_threshold)
                .map(|(i, _)| i),
        );
    }
    let mut outlier_count = 0usize;
    if params.detect_outliers {
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        let fence = profiler.fence(&values);
        for (i, &v) in values.iter().enumerate() {
            if fence.is_outlier(v) && certainty.insert(i) {
                outlier_count += 1;
            }
        }
    }

    let mut certainty_indices: Vec<usize> = certainty.iter().copied().collect();
    certainty_indices.sort_unstable();
    for &i in &certainty_indices {
        let row = &rows[i];
        let justification = if row.value > params.certainty_stratum_threshold
            && params.certainty_stratum_threshold > 0.0
        {
            format!(
                "Certainty item: value {:.2} exceeds the threshold of {:.2}.",
                row.value, params.certainty_stratum_threshold
            )
        } else {
            format!("Certainty item: value {:.2} lies above the outlier fence.", row.value)
        };
        let mut item = AuditSampleItem::new(row.display_id(i), row.value)
            .with_selection(SelectionKind::Certainty)
            .with_risk(RiskLevel::High, justification);
        item.stratum_label = Some(CERTAINTY_LABEL.to_string());
        results.sample.push(item);
    }
    if !certainty_indices.is_empty() {
        results.note(format!(
            "Certainty stratum: {} items always selected ({} by threshold, {outlier_count} outliers).",
            certainty_indices.len(),
            certainty_indices.len() - outlier_count
        ));
    }

    let frame: Vec<usize> = (0..rows.len()).filter(|i| !certainty.contains(i)).collect();
    let strata = build_strata(params.basis, params.strata_count, rows, &frame);
    let allocation = allocate(params.allocation_method, &strata);

    let mut drawn = 0usize;
    for (h, (stratum, &n_h)) in strata.iter().zip(&allocation).enumerate() {
        let label = stratum.label.clone();
        let items = select_from_frame(
            n_h,
            seed.wrapping_add(h as u64),
            rows,
            &stratum.indices,
            |_, item| {
                item.stratum = Some(h);
                item.stratum_label = Some(label.clone());
            },
        );
        drawn += items.len();
        results.sample.extend(items);
        results.note(format!(
            "Stratum {} ({}): {} items, {n_h} selected.",
            h + 1,
            stratum.label,
            stratum.len()
        ));
    }

    results.sample_size = certainty_indices.len() + drawn;
    results.note(format!(
        "Allocation: {:?}, {} to {} items per stratum.",
        params.allocation_method, STRATUM_MIN_ALLOCATION, STRATUM_MAX_ALLOCATION
    ));

    debug!(
        strata = strata.len(),
        certainty = certainty_indices.len(),
        sample_size = results.sample_size,
        "stratified sample sized"
    );
    results
}
