//! Additive sample expansion.

use rustc_hash::FxHashSet;
use tracing::{info, warn};

use sampling_core::constants::DEFAULT_EXPANSION_SEED_OFFSET;
use sampling_core::models::{
    fingerprint_rows, AuditResults, PilotPhase, PopulationRow, SelectionKind,
};

use crate::sampler::select_from_frame;

/// Append `additional` items drawn with `seed + 888`.
pub fn expand_audit_sample(
    current: &AuditResults,
    additional: usize,
    seed: u64,
    rows: &[PopulationRow],
) -> AuditResults {
    expand_audit_sample_with_offset(current, additional, seed, DEFAULT_EXPANSION_SEED_OFFSET, rows)
}

/// Append `additional` items drawn with `seed + offset`.
///
/// Rows already in the sample are left out of the draw while any other
/// rows remain. Existing items, their order, and their metadata are never
/// touched.
pub fn expand_audit_sample_with_offset(
    current: &AuditResults,
    additional: usize,
    seed: u64,
    offset: u64,
    rows: &[PopulationRow],
) -> AuditResults {
    let mut expanded = current.clone();
    if additional == 0 {
        return expanded;
    }

    let fingerprint = fingerprint_rows(rows);
    if !current.population_fingerprint.is_empty() && current.population_fingerprint != fingerprint {
        warn!(
            expected = %current.population_fingerprint,
            actual = %fingerprint,
            "expanding a sample against a different population"
        );
        expanded.note(format!(
            "Warning: expansion rows (fingerprint {fingerprint}) differ from the sampled \
             population ({}).",
            current.population_fingerprint
        ));
    }

    let sampled: FxHashSet<&str> = current.sample.iter().map(|i| i.id.as_str()).collect();
    let unsampled: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(i, row)| !sampled.contains(row.display_id(*i).as_str()))
        .map(|(i, _)| i)
        .collect();
    let frame = if unsampled.is_empty() {
        (0..rows.len()).collect()
    } else {
        unsampled
    };

    let items = select_from_frame(additional, seed.wrapping_add(offset), rows, &frame, |_, item| {
        item.selection = SelectionKind::Expansion;
        item.risk_justification =
            Some("Selected to complete the representative sample size.".to_string());
    });

    let added = items.len();
    expanded.sample.extend(items);
    expanded.sample_size += added;
    if let Some(metrics) = expanded.pilot_metrics.as_mut() {
        metrics.phase = PilotPhase::Expanded;
    }
    if added < additional {
        expanded.note(format!(
            "Expansion requested {additional} items but the population supplied {added}."
        ));
    }
    expanded.note(format!(
        "Sample completed with {added} additional items to reach statistical representativeness."
    ));

    info!(
        previous = current.sample_size,
        added,
        total = expanded.sample_size,
        "sample expanded"
    );
    expanded
}
