//! Closed-form predictors over the first two columns.
//!
//! Each one is a plain function, so `from_fn(doubling_step)` is a
//! [`Predictor`](crate::predictor::Predictor).

use ndarray::ArrayView2;

use crate::predictor::Predictions;

/// 1 where the first feature is below 0.5, 2 elsewhere.
pub fn doubling_step(rows: ArrayView2<'_, f64>) -> Predictions {
    Predictions::Values(rows.column(0).mapv(|x| if x < 0.5 { 1.0 } else { 2.0 }))
}

/// 1 below `x = 0.5`; right of it 2 below `x = 0.75` and 3 above.
pub fn three_steps(rows: ArrayView2<'_, f64>) -> Predictions {
    Predictions::Values(rows.column(0).mapv(|x| {
        if x < 0.5 {
            1.0
        } else if x < 0.75 {
            2.0
        } else {
            3.0
        }
    }))
}

/// `1 + 2 x0 - x1`.
pub fn plane(rows: ArrayView2<'_, f64>) -> Predictions {
    Predictions::Values(
        rows.outer_iter()
            .map(|row| 1.0 + 2.0 * row[0] - row[1])
            .collect(),
    )
}

/// "A" where the first feature is below 0.5, "B" elsewhere.
pub fn half_labels(rows: ArrayView2<'_, f64>) -> Predictions {
    Predictions::Labels(
        rows.column(0)
            .iter()
            .map(|&x| if x < 0.5 { "A" } else { "B" }.to_string())
            .collect(),
    )
}

/// "A" everywhere.
pub fn constant_label(rows: ArrayView2<'_, f64>) -> Predictions {
    Predictions::Labels(vec!["A".to_string(); rows.nrows()])
}
