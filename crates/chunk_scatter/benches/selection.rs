mod common;

use std::hint::black_box;

use chunk_scatter::prelude::{CategorySelector, WeightShape};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn selection_pick_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/pick");

    for &n in &[2usize, 8, 64, 256, 1024, 4096] {
        let categories = common::make_categories(n);
        let selector = CategorySelector::try_new(&categories, WeightShape::Raw).unwrap();
        group.throughput(common::elements_throughput(1));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
            b.iter(|| {
                let sel = selector.pick(&mut rng);
                black_box(sel);
            });
        });
    }

    for &n in &[8usize, 256] {
        let mut categories = common::make_categories(n);
        for c in &mut categories {
            c.weight = 50.0 / n as f32;
        }
        let selector = CategorySelector::try_new(&categories, WeightShape::Percent).unwrap();

        group.bench_with_input(BenchmarkId::new("percent_half_empty", n), &n, |b, _| {
            let mut rng = StdRng::seed_from_u64(0xBADC0DE);
            b.iter(|| {
                let sel = selector.pick(&mut rng);
                black_box(sel);
            });
        });
    }

    group.finish();
}

fn selection_build_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/build");

    for &n in &[64usize, 4096] {
        group.throughput(common::elements_throughput(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || common::make_categories(n),
                |categories| {
                    let selector = CategorySelector::try_new(&categories, WeightShape::Raw);
                    black_box(selector.is_ok());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = selection_pick_benches, selection_build_benches
}
criterion_main!(benches);
