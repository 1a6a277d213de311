//! Sampling benchmarks on a 10,000-row population.
//!
//! Run with: cargo bench -p sampling-analysis --bench sampling_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use sampling_analysis::calculators::non_statistical;
use sampling_analysis::profiler::Profiler;
use sampling_analysis::sampler::select_indices;
use sampling_core::models::{NonStatisticalParams, PopulationRow};

/// Deterministic skewed amounts with some repeats and round values.
fn make_rows(count: usize) -> Vec<PopulationRow> {
    (0..count)
        .map(|i| {
            let value = match i % 50 {
                0 => 10_000.0,
                1 => 1_250.0,
                _ => ((i * 7_919) % 100_003) as f64 / 7.0 + 1.0,
            };
            PopulationRow::new(format!("INV-{i:06}"), value)
        })
        .collect()
}

fn bench_profile(c: &mut Criterion) {
    let rows = make_rows(10_000);
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let profiler = Profiler::default();

    c.bench_function("profile_10k", |b| {
        b.iter(|| {
            let stats = profiler.compute_stats(&values);
            let analysis = profiler.compute_advanced_analysis(&values);
            (stats, analysis)
        });
    });
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection_10k");
    for count in [75, 200, 1_000] {
        group.bench_with_input(BenchmarkId::new("select_indices", count), &count, |b, &n| {
            b.iter(|| select_indices(n, 12_345, 10_000));
        });
    }
    group.finish();
}

fn bench_combined_risk(c: &mut Criterion) {
    let rows = make_rows(10_000);
    let params = NonStatisticalParams::default();
    c.bench_function("combined_risk_10k", |b| {
        b.iter(|| non_statistical::calculate(&params, &rows, 12_345));
    });
}

criterion_group!(benches, bench_profile, bench_selection, bench_combined_risk);
criterion_main!(benches);
