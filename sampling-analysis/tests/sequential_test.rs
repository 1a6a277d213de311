//! Pilot -> plan -> expand flows for attribute, MUS and CAV.

use sampling_analysis::sequential::{
    calculate_stop_or_go_expansion, calculate_variable_expansion, expand_audit_sample,
};
use sampling_analysis::{calculate, SamplingWorkbench};
use sampling_core::models::{
    AttributeParams, CavParams, MusParams, PilotPhase, PopulationRow, SamplingParams,
    SelectionKind,
};

fn population(n: usize) -> Vec<PopulationRow> {
    (0..n)
        .map(|i| PopulationRow::new(format!("INV-{i}"), 250.0 + (i % 97) as f64 * 31.5))
        .collect()
}

#[test]
fn stop_or_go_clean_pilot_stops() {
    let rows = population(1_000);
    let params = AttributeParams {
        use_sequential: true,
        ..Default::default()
    };
    let pilot = calculate(&SamplingParams::Attribute(params.clone()), &rows, 3);
    assert_eq!(pilot.sample_size, 25);

    let plan = calculate_stop_or_go_expansion(
        pilot.sample_size,
        0,
        params.confidence_level,
        params.tolerable_deviation,
    );
    assert_eq!(plan.recommended_expansion, 0);
    assert_eq!(plan.new_total, 25);
}

#[test]
fn stop_or_go_errors_expand_and_keep_pilot() {
    let rows = population(1_000);
    let params = AttributeParams {
        use_sequential: true,
        ..Default::default()
    };
    let bench = SamplingWorkbench::default();
    let frame = bench.load_population(rows);
    let pilot = bench.calculate(&frame, &SamplingParams::Attribute(params.clone()), Some(3));

    let one = bench.plan_attribute_expansion(&params, &pilot, 1);
    let two = bench.plan_attribute_expansion(&params, &pilot, 2);
    assert!(one.recommended_expansion > 0);
    assert!(two.new_total > one.new_total);

    let expanded = bench.expand(&pilot, one.recommended_expansion, Some(3), &frame);
    assert_eq!(expanded.sample_size, one.new_total);
    assert_eq!(&expanded.sample[..25], &pilot.sample[..]);
    assert_eq!(expanded.pilot_items().count(), 25);
    assert!(expanded.sample[25..]
        .iter()
        .all(|i| i.selection == SelectionKind::Expansion));
    assert_eq!(
        expanded.pilot_metrics.as_ref().map(|m| m.phase),
        Some(PilotPhase::Expanded)
    );

    let mut ids: Vec<&str> = expanded.sample.iter().map(|i| i.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), expanded.sample.len());
}

#[test]
fn mus_pilot_completes_to_full_sample() {
    let rows = population(800);
    let params = SamplingParams::Mus(MusParams {
        use_pilot_sample: true,
        ..Default::default()
    });
    let pilot = calculate(&params, &rows, 21);
    assert_eq!(pilot.sample_size, 30);

    let clean = calculate_variable_expansion(&params, &pilot, 0, &rows);
    let dirty = calculate_variable_expansion(&params, &pilot, 3, &rows);
    assert!(dirty.new_total > clean.new_total);
    assert!(clean.formula.contains("J = TE"));

    let expanded = expand_audit_sample(&pilot, dirty.recommended_expansion, 21, &rows);
    assert_eq!(expanded.sample_size, dirty.new_total);
    assert!(expanded.methodology_notes.len() > pilot.methodology_notes.len());
}

#[test]
fn cav_pilot_sigma_drives_expansion() {
    let rows = population(1_000);
    let params = SamplingParams::Cav(CavParams {
        tolerable_error: 200_000.0,
        use_pilot_sample: true,
        ..Default::default()
    });
    let pilot = calculate(&params, &rows, 4);
    let sigma = pilot
        .pilot_metrics
        .as_ref()
        .and_then(|m| m.calibrated_sigma)
        .unwrap();
    assert!(sigma > 0.0);

    let clean = calculate_variable_expansion(&params, &pilot, 0, &rows);
    let dirty = calculate_variable_expansion(&params, &pilot, 2, &rows);
    assert!((30..=200).contains(&clean.new_total));
    assert!(dirty.new_total >= clean.new_total);
}
