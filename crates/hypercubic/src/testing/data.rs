use ndarray::Array2;
use rand::prelude::*;

use crate::data::{Dataset, Targets};
use crate::predictor::{Predictions, Predictor};

/// Regular `per_axis × per_axis` lattice over `[0, 1]²`, features `x` and `y`.
///
/// Both axes include 0 and 1, so the surrounding cube splits exactly at the
/// lattice midpoints. An even `per_axis` keeps every point off `0.5`.
pub fn grid_dataset(per_axis: usize) -> Dataset {
    let step = if per_axis > 1 { 1.0 / (per_axis - 1) as f64 } else { 0.0 };
    let features = Array2::from_shape_fn((per_axis * per_axis, 2), |(row, col)| {
        let (i, j) = (row / per_axis, row % per_axis);
        if col == 0 {
            i as f64 * step
        } else {
            j as f64 * step
        }
    });
    Dataset::new(vec!["x".into(), "y".into()], features, None)
        .unwrap_or_else(|_| unreachable!("two names for two columns"))
}

/// Uniform samples in `[0, 1)`, features `x0, x1, ...`.
pub fn uniform_dataset(rows: usize, cols: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let features = Array2::from_shape_simple_fn((rows, cols), || rng.r#gen::<f64>());
    let names = (0..cols).map(|c| format!("x{c}")).collect();
    Dataset::new(names, features, None).unwrap_or_else(|_| unreachable!("distinct generated names"))
}

/// `dataset` labelled with the outputs of `predictor`.
pub fn with_targets_from<P: Predictor + ?Sized>(dataset: &Dataset, predictor: &P) -> Dataset {
    let targets = match predictor.predict(dataset.features()) {
        Predictions::Values(v) => Targets::Values(v),
        Predictions::Labels(l) => Targets::Labels(l),
    };
    Dataset::new(dataset.feature_names().to_vec(), dataset.features().to_owned(), Some(targets))
        .unwrap_or_else(|_| unreachable!("one output per row"))
}
