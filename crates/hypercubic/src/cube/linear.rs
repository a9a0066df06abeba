//! Least-squares linear output of regression cubes.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Linear function `intercept + coefficients · x`.
///
/// Coefficients follow the column order of the dataset the model was fit on,
/// which is also the dimension order of the owning cube.
///
/// # Example
///
/// ```
/// use hypercubic::LinearModel;
/// use ndarray::array;
///
/// let x = array![[0.0], [1.0], [2.0], [3.0]];
/// let y = array![1.0, 3.0, 5.0, 7.0];
/// let model = LinearModel::fit(x.view(), y.view());
///
/// assert!((model.intercept() - 1.0).abs() < 1e-6);
/// assert!((model.coefficients()[0] - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }

    /// Constant zero function over `n_features` inputs.
    pub fn zeros(n_features: usize) -> Self {
        Self::new(0.0, vec![0.0; n_features])
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Ordinary least-squares fit of `targets` on `features` (`[n_samples, n_features]`).
    ///
    /// Rank-deficient inputs get the minimum-norm solution, so columns without
    /// variance get a zero coefficient. An empty input yields
    /// [`LinearModel::zeros`].
    pub fn fit(features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Self {
        let (n_samples, n_features) = features.dim();
        if n_samples == 0 || n_samples != targets.len() {
            return Self::zeros(n_features);
        }

        let y_mean = targets.mean().unwrap_or(0.0);
        if n_features == 0 {
            return Self::new(y_mean, Vec::new());
        }
        let x_mean = features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));

        let centered = &features - &x_mean.view().insert_axis(Axis(0));
        let x = DMatrix::from_fn(n_samples, n_features, |i, j| centered[[i, j]]);
        let y = DVector::from_iterator(n_samples, targets.iter().map(|v| v - y_mean));

        let coefficients: Array1<f64> = match lstsq(x, &y) {
            Some(solution) => solution.iter().copied().collect(),
            None => Array1::zeros(n_features),
        };
        let intercept = y_mean - x_mean.dot(&coefficients);

        Self::new(intercept, coefficients.to_vec())
    }

    /// Evaluate at one row.
    #[inline]
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    /// Evaluate at every row of `features`.
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Array1<f64> {
        features
            .axis_iter(Axis(0))
            .map(|row| self.predict_row(row))
            .collect()
    }
}

/// Minimum-norm least-squares solution of `x · b = y` through the SVD.
///
/// Singular values below `max(σ) · max(rows, cols) · ε` are treated as zero.
fn lstsq(x: DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let (rows, cols) = x.shape();
    let svd = x.svd(true, true);
    let cutoff = svd.singular_values.max() * rows.max(cols) as f64 * f64::EPSILON;
    svd.solve(y, cutoff).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    #[test]
    fn recovers_plane() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.5, 0.2]];
        let y = x.map_axis(Axis(1), |r| 0.5 + 2.0 * r[0] - 3.0 * r[1]);
        let model = LinearModel::fit(x.view(), y.view());

        assert_abs_diff_eq!(model.intercept(), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(model.coefficients()[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.coefficients()[1], -3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.predict_row(array![1.0, 2.0].view()), -3.5, epsilon = 1e-6);
    }

    #[test]
    fn constant_column_gets_zero_coefficient() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let y = array![2.0, 4.0, 6.0];
        let model = LinearModel::fit(x.view(), y.view());

        assert_abs_diff_eq!(model.coefficients()[1], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.coefficients()[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.intercept(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn narrow_feature_is_fit_exactly() {
        let x = Array2::from_shape_fn((10, 1), |(i, _)| i as f64 * 1e-5);
        let y = x.column(0).mapv(|v| 1000.0 * v);
        let model = LinearModel::fit(x.view(), y.view());

        assert_abs_diff_eq!(model.coefficients()[0], 1000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.intercept(), 0.0, epsilon = 1e-12);
        let residual = (&model.predict(x.view()) - &y).mapv(f64::abs).mean().unwrap();
        assert!(residual < 1e-12, "residual {residual}");
    }

    #[test]
    fn duplicated_columns_share_the_weight() {
        let x = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]];
        let y = array![1.0, 3.0, 5.0];
        let model = LinearModel::fit(x.view(), y.view());

        assert_abs_diff_eq!(model.coefficients()[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.coefficients()[1], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.intercept(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_input_is_zero_model() {
        let x = Array2::<f64>::zeros((0, 3));
        let y = Array1::<f64>::zeros(0);
        assert_eq!(LinearModel::fit(x.view(), y.view()), LinearModel::zeros(3));
    }
}
