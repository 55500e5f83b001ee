#![allow(dead_code)]

use std::time::Duration;

use chunk_scatter::prelude::{Category, SpacingClass, SpacingRules, StreamConfig};
use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// `count` open categories with varied weights.
pub fn make_categories(count: usize) -> Vec<Category> {
    (0..count)
        .map(|i| Category::new(format!("C{i}"), 0.25 + ((i % 7) as f32) / 7.0, SpacingClass::Open))
        .collect()
}

/// Trees, rocks and lakes on chunks of `chunk_size`.
pub fn forest_config(chunk_size: u32, visible_chunks: u32) -> StreamConfig {
    StreamConfig::new(chunk_size, visible_chunks)
        .with_categories([Category::tree(50.0), Category::rock(30.0), Category::lake(20.0)])
        .with_spacing(SpacingRules::new(1.5, 3.0, 4.0))
        .with_seed(0xC0FFEE)
}
