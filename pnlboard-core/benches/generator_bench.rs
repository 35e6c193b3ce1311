//! Criterion benchmarks for the daily PnL generator.
//!
//! Benchmarks:
//! 1. Full-month generation under the default policy
//! 2. Full-month generation under the observed January policy
//! 3. Two-phase allocation alone

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pnlboard_core::allocator::allocate_exact_total;
use pnlboard_core::{GeneratorParams, MonthKey, PnlGenerator, PolicyTable, RngSource};

fn bench_generate(c: &mut Criterion) {
    let generator = PnlGenerator::default();
    let mut group = c.benchmark_group("generate_month");

    let dec = MonthKey::new(2025, 12).unwrap();
    let default_policy = PolicyTable::new().resolve(dec);
    group.bench_function("default_policy", |b| {
        let mut rng = RngSource::seeded(1);
        b.iter(|| generator.generate(black_box(dec), black_box(14.65), &default_policy, &mut rng))
    });

    let jan = MonthKey::new(2026, 1).unwrap();
    let observed = PolicyTable::observed().resolve(jan);
    group.bench_function("observed_january", |b| {
        let mut rng = RngSource::seeded(2);
        b.iter(|| generator.generate(black_box(jan), black_box(8.30), &observed, &mut rng))
    });

    group.finish();
}

fn bench_allocate(c: &mut Criterion) {
    let params = GeneratorParams::default();
    let mut group = c.benchmark_group("allocate_exact_total");
    for count in [10usize, 31, 365] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &n| {
            let mut rng = RngSource::seeded(3);
            b.iter(|| allocate_exact_total(black_box(20.0), n, &params, &mut rng))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_allocate);
criterion_main!(benches);
