//! Benchmarks for the per-tick hot path: status derivation and snapshot building.

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fleetwatch::monitor::{
    derive_status, AlertThresholds, HealthRecord, ProbeError, ProbeReport, SystemStatus,
    TargetKind,
};

fn bench_derive_status(c: &mut Criterion) {
    let thresholds = AlertThresholds::default();

    c.bench_function("derive_status", |b| {
        b.iter(|| {
            derive_status(
                black_box(TargetKind::Model),
                black_box(false),
                black_box(1500),
                black_box(0.02),
                &thresholds,
            )
        });
    });
}

fn bench_apply_outcome(c: &mut Criterion) {
    let thresholds = AlertThresholds::default();
    let now = Utc::now();
    let success = Ok(ProbeReport::ok(120));
    let failure = Err(ProbeError::Connection("refused".to_string()));

    c.bench_function("apply_outcome_success", |b| {
        let mut record = HealthRecord::new("gpt-4o", TargetKind::Model, now);
        b.iter(|| record.apply_outcome(black_box(&success), &thresholds, now));
    });

    c.bench_function("apply_outcome_failure", |b| {
        let mut record = HealthRecord::new("database", TargetKind::Service, now);
        b.iter(|| record.apply_outcome(black_box(&failure), &thresholds, now));
    });
}

fn bench_snapshot_build(c: &mut Criterion) {
    let thresholds = AlertThresholds::default();
    let now = Utc::now();
    let mut group = c.benchmark_group("snapshot_build");

    for size in [10usize, 100, 1000] {
        let records: Vec<_> = (0..size)
            .map(|i| {
                let kind = if i % 2 == 0 {
                    TargetKind::Model
                } else {
                    TargetKind::Service
                };
                let mut record = HealthRecord::new(format!("target-{}", i), kind, now);
                // Every tenth target slow, every seventh failing
                let outcome = if i % 7 == 0 {
                    Err(ProbeError::Timeout(5000))
                } else if i % 10 == 0 {
                    Ok(ProbeReport::ok(2500))
                } else {
                    Ok(ProbeReport::ok(100))
                };
                record.apply_outcome(&outcome, &thresholds, now);
                record
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| SystemStatus::build(records.clone(), Vec::new(), &thresholds, now));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_derive_status,
    bench_apply_outcome,
    bench_snapshot_build
);
criterion_main!(benches);
