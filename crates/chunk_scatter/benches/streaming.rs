mod common;

use std::hint::black_box;

use chunk_scatter::prelude::{ChunkStreamer, MemoryFactory};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use glam::Vec2;

fn streaming_walk_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming/walk");

    for &visible in &[1u32, 2, 4] {
        let steps = 50usize;
        group.throughput(common::elements_throughput(steps));

        group.bench_with_input(BenchmarkId::from_parameter(visible), &visible, |b, &visible| {
            b.iter_batched(
                || {
                    (
                        ChunkStreamer::try_new(common::forest_config(10, visible)).unwrap(),
                        MemoryFactory::new(),
                    )
                },
                |(mut streamer, mut factory)| {
                    for step in 0..steps {
                        let viewer = Vec2::new(step as f32 * 3.0, step as f32 * 1.5);
                        black_box(streamer.tick(&viewer, &mut factory));
                    }
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn streaming_revisit_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming/revisit");

    group.bench_function("oscillate", |b| {
        let mut streamer = ChunkStreamer::try_new(common::forest_config(10, 1)).unwrap();
        let mut factory = MemoryFactory::new();
        let a = Vec2::new(5.0, 5.0);
        let far = Vec2::new(105.0, 5.0);
        streamer.tick(&a, &mut factory);
        streamer.tick(&far, &mut factory);

        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let viewer = if flip { a } else { far };
            black_box(streamer.tick(&viewer, &mut factory));
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = streaming_walk_benches, streaming_revisit_benches
}
criterion_main!(benches);
