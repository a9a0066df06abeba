//! GridEx / GridREx integration tests.
//!
//! Focused on the extracted partition, not on logging or config defaults.

use std::num::NonZeroUsize;

use approx::assert_abs_diff_eq;
use ndarray::ArrayView2;

use hypercubic::data::Dataset;
use hypercubic::predictor::{from_fn, Predictions};
use hypercubic::testing::{doubling_step, grid_dataset, half_labels, plane, uniform_dataset, with_targets_from};
use hypercubic::{
    CubeOutput, ExtractedCubes, ExtractionConfig, Extractor, Grid, GridEx, HyperCube, Metric, OutputKind,
    Strategy, Verbosity,
};

fn config(levels: usize, threshold: f64, min_examples: usize) -> ExtractionConfig {
    ExtractionConfig::builder()
        .grid(Grid::new(levels, Strategy::fixed(2)))
        .min_examples(min_examples)
        .threshold(threshold)
        .build()
        .unwrap()
}

fn constant(cube: &HyperCube) -> f64 {
    match cube.output() {
        CubeOutput::Constant(v) => *v,
        other => panic!("expected a constant output, got {other}"),
    }
}

fn outputs(cubes: &ExtractedCubes) -> Vec<String> {
    cubes.iter().map(|c| c.output().to_string()).collect()
}

#[test]
fn doubling_target_yields_four_leaf_cubes_without_tolerance() {
    let ds = grid_dataset(10);
    let predictor = from_fn(doubling_step);

    let cubes = GridEx::new(config(1, 0.0, 0)).extract(&ds, &predictor).unwrap();
    assert_eq!(cubes.len(), 4);

    let (left, right): (Vec<&HyperCube>, Vec<&HyperCube>) =
        cubes.iter().partition(|c| c.get("x").unwrap().upper() <= 0.5 + 1e-9);
    assert_eq!(left.len(), 2);
    assert_eq!(right.len(), 2);
    for (l, r) in left.iter().zip(&right) {
        assert_abs_diff_eq!(constant(r), 2.0 * constant(l), epsilon = 1e-12);
    }
    for cube in &cubes {
        assert_abs_diff_eq!(cube.diversity(), 0.0, epsilon = 1e-12);
    }
    assert!(cubes.covers(&ds).unwrap());
}

#[test]
fn tolerance_merges_equal_halves() {
    let ds = grid_dataset(10);
    let predictor = from_fn(doubling_step);

    let cubes = GridEx::new(config(1, 0.1, 0)).extract(&ds, &predictor).unwrap();
    assert_eq!(outputs(&cubes), vec!["1", "2"]);
    assert_eq!(cubes.score(&ds, &predictor, Metric::mae()).unwrap(), 0.0);
}

#[test]
fn extraction_is_repeatable() {
    let ds = uniform_dataset(80, 2, 5);
    let predictor = from_fn(doubling_step);
    let extractor = GridEx::new(config(2, 0.05, 30));

    let first = extractor.extract(&ds, &predictor).unwrap();
    let second = extractor.extract(&ds, &predictor).unwrap();
    assert_eq!(first.cubes(), second.cubes());
    assert_eq!(outputs(&first), outputs(&second));
}

#[test]
fn thread_count_does_not_change_the_result() {
    let ds = uniform_dataset(120, 3, 9);
    let predictor = from_fn(doubling_step);
    let with_threads = |n: usize| {
        let config = ExtractionConfig {
            n_threads: NonZeroUsize::new(n),
            ..config(2, 0.05, 20)
        };
        GridEx::new(config).extract(&ds, &predictor).unwrap()
    };

    let sequential = with_threads(1);
    let parallel = with_threads(4);
    assert_eq!(sequential.cubes(), parallel.cubes());
    assert_eq!(outputs(&sequential), outputs(&parallel));
    for (a, b) in sequential.iter().zip(parallel.iter()) {
        assert_eq!(a.diversity(), b.diversity());
    }
}

#[test]
fn gridrex_fits_a_plane_with_one_cube() {
    let ds = grid_dataset(10);
    let predictor = from_fn(plane);

    let cubes = GridEx::regression(config(1, 0.1, 0)).extract(&ds, &predictor).unwrap();
    assert_eq!(cubes.output_kind(), OutputKind::Regression);
    assert_eq!(cubes.len(), 1);
    assert!(matches!(cubes.cubes()[0].output(), CubeOutput::Linear(_)));
    assert!(cubes.score(&ds, &predictor, Metric::mae()).unwrap() < 1e-6);
    assert!(cubes.score(&ds, &predictor, Metric::r2()).unwrap() > 1.0 - 1e-9);
}

#[test]
fn gridrex_is_exact_on_a_narrow_lattice() {
    let lattice = grid_dataset(10);
    let ds = Dataset::new(lattice.feature_names().to_vec(), lattice.features().mapv(|v| v * 1e-5), None).unwrap();
    let predictor = from_fn(|rows: ArrayView2<'_, f64>| {
        Predictions::Values(rows.outer_iter().map(|r| 1000.0 * r[0] - 500.0 * r[1]).collect())
    });

    let cubes = GridEx::regression(config(1, 0.1, 0)).extract(&ds, &predictor).unwrap();
    for cube in &cubes {
        assert!(cube.diversity() < 1e-9, "diversity {}", cube.diversity());
    }
    assert!(cubes.score(&ds, &predictor, Metric::mae()).unwrap() < 1e-9);
}

#[test]
fn labels_are_scored_by_accuracy() {
    let ds = with_targets_from(&grid_dataset(10), &from_fn(half_labels));
    let predictor = from_fn(half_labels);

    let cubes = GridEx::new(config(1, 0.1, 0)).extract(&ds, &predictor).unwrap();
    assert_eq!(cubes.output_kind(), OutputKind::Classification);
    assert_eq!(outputs(&cubes), vec!["A", "B"]);
    assert_eq!(cubes.score_targets(&ds, Metric::accuracy()).unwrap(), 1.0);
}

#[test]
fn synthetic_samples_keep_sparse_data_covered() {
    let ds = uniform_dataset(25, 2, 17);
    let predictor = from_fn(doubling_step);

    let cubes = GridEx::new(config(3, 0.05, 40)).extract(&ds, &predictor).unwrap();
    assert!(cubes.covers(&ds).unwrap());
    let predictions = cubes.predict(ds.features()).unwrap();
    assert!(predictions.iter().all(Option::is_some));
}

#[test]
fn verbose_runs_emit_events() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let ds = grid_dataset(6);
    let predictor = from_fn(doubling_step);
    let config = ExtractionConfig {
        verbosity: Verbosity::Debug,
        ..config(2, 0.1, 10)
    };

    let cubes = GridEx::new(config).extract(&ds, &predictor).unwrap();
    assert!(cubes.covers(&ds).unwrap());
}
