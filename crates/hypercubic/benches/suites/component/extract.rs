//! Extraction benchmark: GridEx vs HEx over grid depth and thread count.
//!
//! Run with: `cargo bench --bench extract`

#[path = "../../common/mod.rs"]
mod common;

use std::num::NonZeroUsize;

use common::criterion_config::default_criterion;

use hypercubic::predictor::from_fn;
use hypercubic::testing::{three_steps, uniform_dataset};
use hypercubic::{ExtractionConfig, Extractor, Grid, GridEx, HEx, Strategy};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// =============================================================================
// Dataset Configuration
// =============================================================================

const DATASET: (usize, usize) = (5_000, 4);
const LEVELS: [usize; 2] = [1, 2];
const THREAD_COUNTS: [usize; 2] = [1, 4];

fn config(levels: usize, n_threads: usize) -> ExtractionConfig {
    ExtractionConfig::builder()
        .grid(Grid::new(levels, Strategy::fixed(2)))
        .min_examples(50)
        .threshold(0.05)
        .maybe_n_threads(NonZeroUsize::new(n_threads))
        .build()
        .unwrap()
}

// =============================================================================
// Extraction Benchmark
// =============================================================================

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("component/extract");

    let (rows, cols) = DATASET;
    let dataset = uniform_dataset(rows, cols, 42);
    let predictor = from_fn(three_steps);
    group.throughput(Throughput::Elements(rows as u64));

    for levels in LEVELS {
        for n_threads in THREAD_COUNTS {
            let id = format!("levels={levels}/threads={n_threads}");

            let gridex = GridEx::new(config(levels, n_threads));
            group.bench_function(BenchmarkId::new("gridex", &id), |b| {
                b.iter(|| black_box(gridex.extract(black_box(&dataset), &predictor).unwrap()))
            });

            let hex = HEx::new(config(levels, n_threads));
            group.bench_function(BenchmarkId::new("hex", &id), |b| {
                b.iter(|| black_box(hex.extract(black_box(&dataset), &predictor).unwrap()))
            });
        }
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_extract
}
criterion_main!(benches);
