//! Dataset container and builder.
//!
//! This module provides [`Dataset`] and [`DatasetBuilder`].

use ndarray::{concatenate, Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::error::DatasetError;
use crate::cube::Point;

/// Target column of a labelled dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    /// Numeric targets (regression, or class ids encoded as numbers).
    Values(Array1<f64>),
    /// Categorical targets.
    Labels(Vec<String>),
}

impl Targets {
    /// Number of target values.
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Labels(l) => l.len(),
        }
    }

    /// Returns `true` if there are no target values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep the targets whose mask entry is `true`.
    fn select(&self, mask: &[bool]) -> Self {
        match self {
            Self::Values(v) => Self::Values(
                v.iter()
                    .zip(mask)
                    .filter_map(|(&x, &keep)| keep.then_some(x))
                    .collect(),
            ),
            Self::Labels(l) => Self::Labels(
                l.iter()
                    .zip(mask)
                    .filter_map(|(x, &keep)| keep.then(|| x.clone()))
                    .collect(),
            ),
        }
    }
}

/// A table of named numeric feature columns with an optional target column.
///
/// # Storage Layout
///
/// Features are stored sample-major: `[n_samples, n_features]`.
/// Column order is significant: cubes built from a dataset keep its column
/// order for their dimensions, and linear cube outputs use it for their
/// coefficients.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature names, one per column.
    feature_names: Vec<String>,

    /// Feature data: `[n_samples, n_features]`.
    features: Array2<f64>,

    /// Target values, one per sample.
    targets: Option<Targets>,
}

impl Dataset {
    /// Create a dataset from sample-major features.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::FeatureCountMismatch`] if names and columns disagree
    /// - [`DatasetError::TargetCountMismatch`] if targets and rows disagree
    /// - [`DatasetError::DuplicateFeature`] if a name is repeated
    pub fn new(
        feature_names: Vec<String>,
        features: Array2<f64>,
        targets: Option<Targets>,
    ) -> Result<Self, DatasetError> {
        if feature_names.len() != features.ncols() {
            return Err(DatasetError::FeatureCountMismatch {
                expected: features.ncols(),
                got: feature_names.len(),
            });
        }
        for (i, name) in feature_names.iter().enumerate() {
            if feature_names[..i].contains(name) {
                return Err(DatasetError::DuplicateFeature(name.clone()));
            }
        }
        if let Some(t) = &targets {
            if t.len() != features.nrows() {
                return Err(DatasetError::TargetCountMismatch {
                    samples: features.nrows(),
                    targets: t.len(),
                });
            }
        }

        Ok(Self {
            feature_names,
            features,
            targets,
        })
    }

    /// Create a builder for column-by-column construction.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Returns `true` if the dataset has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    /// Feature names in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Column index of a feature.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|n| n == name)
    }

    /// Feature data `[n_samples, n_features]`.
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    /// Target column, if any.
    pub fn targets(&self) -> Option<&Targets> {
        self.targets.as_ref()
    }

    /// One sample.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_samples()`.
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.features.row(index)
    }

    /// One sample as a named [`Point`].
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_samples()`.
    pub fn point(&self, index: usize) -> Point {
        Point::new(self.feature_names.iter().cloned(), self.row(index).iter().copied())
    }

    /// Minimum and maximum of one column. `None` when the dataset is empty.
    pub fn column_bounds(&self, column: usize) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let col = self.features.column(column);
        let min = col.iter().copied().fold(f64::INFINITY, f64::min);
        let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Per-column means. Empty datasets yield NaN means.
    pub fn column_means(&self) -> Array1<f64> {
        self.features
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::from_elem(self.n_features(), f64::NAN))
    }

    // =========================================================================
    // Derived datasets
    // =========================================================================

    /// Keep the rows whose mask entry is `true`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that the mask has one entry per sample.
    pub fn select(&self, mask: &[bool]) -> Dataset {
        debug_assert_eq!(mask.len(), self.n_samples(), "mask length must match n_samples");
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();

        Dataset {
            feature_names: self.feature_names.clone(),
            features: self.features.select(Axis(0), &indices),
            targets: self.targets.as_ref().map(|t| t.select(mask)),
        }
    }

    /// Append unlabelled samples, returning a new dataset.
    ///
    /// Synthetic samples carry no target, so the returned dataset has none.
    ///
    /// # Errors
    ///
    /// [`DatasetError::FeatureCountMismatch`] if `samples` has a different
    /// number of columns.
    pub fn with_samples<'a>(&'a self, samples: ArrayView2<'a, f64>) -> Result<Dataset, DatasetError> {
        if samples.ncols() != self.n_features() {
            return Err(DatasetError::FeatureCountMismatch {
                expected: self.n_features(),
                got: samples.ncols(),
            });
        }
        let features = concatenate(Axis(0), &[self.features.view(), samples]).map_err(|_| {
            DatasetError::FeatureCountMismatch {
                expected: self.n_features(),
                got: samples.ncols(),
            }
        })?;

        Ok(Dataset {
            feature_names: self.feature_names.clone(),
            features,
            targets: None,
        })
    }

    /// Drop the target column.
    pub fn without_targets(&self) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: self.features.clone(),
            targets: None,
        }
    }
}

/// Builder for column-by-column dataset construction.
///
/// # Example
///
/// ```
/// use hypercubic::data::DatasetBuilder;
/// use ndarray::array;
///
/// let ds = DatasetBuilder::new()
///     .add_feature("age", array![25.0, 30.0, 35.0].view())
///     .add_feature("income", array![1.0, 2.0, 3.0].view())
///     .labels(vec!["a".into(), "b".into(), "a".into()])
///     .build()
///     .unwrap();
///
/// assert_eq!(ds.n_features(), 2);
/// assert_eq!(ds.n_samples(), 3);
/// ```
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    names: Vec<String>,
    columns: Vec<Array1<f64>>,
    targets: Option<Targets>,
}

impl DatasetBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric feature column.
    pub fn add_feature(mut self, name: &str, values: ArrayView1<'_, f64>) -> Self {
        self.names.push(name.to_string());
        self.columns.push(values.to_owned());
        self
    }

    /// Set numeric targets.
    pub fn targets(mut self, values: ArrayView1<'_, f64>) -> Self {
        self.targets = Some(Targets::Values(values.to_owned()));
        self
    }

    /// Set categorical targets.
    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.targets = Some(Targets::Labels(labels));
        self
    }

    /// Build the dataset.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::Empty`] if no feature was added
    /// - [`DatasetError::ColumnLength`] if columns have different lengths
    /// - any error of [`Dataset::new`]
    pub fn build(self) -> Result<Dataset, DatasetError> {
        let n_samples = self.columns.first().map(|c| c.len()).ok_or(DatasetError::Empty)?;
        for (name, col) in self.names.iter().zip(&self.columns) {
            if col.len() != n_samples {
                return Err(DatasetError::ColumnLength {
                    name: name.clone(),
                    expected: n_samples,
                    got: col.len(),
                });
            }
        }

        let n_features = self.columns.len();
        let features = Array2::from_shape_fn((n_samples, n_features), |(i, j)| self.columns[j][i]);
        Dataset::new(self.names, features, self.targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["x".into(), "y".into()],
            array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]],
            Some(Targets::Labels(vec!["a".into(), "b".into(), "c".into()])),
        )
        .unwrap()
    }

    #[test]
    fn rejects_mismatched_names() {
        let err = Dataset::new(vec!["x".into()], array![[0.0, 1.0]], None).unwrap_err();
        assert_eq!(err, DatasetError::FeatureCountMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Dataset::new(vec!["x".into(), "x".into()], array![[0.0, 1.0]], None).unwrap_err();
        assert_eq!(err, DatasetError::DuplicateFeature("x".into()));
    }

    #[test]
    fn rejects_wrong_target_count() {
        let err = Dataset::new(
            vec!["x".into()],
            array![[0.0], [1.0]],
            Some(Targets::Values(array![1.0])),
        )
        .unwrap_err();
        assert_eq!(err, DatasetError::TargetCountMismatch { samples: 2, targets: 1 });
    }

    #[test]
    fn select_keeps_targets_aligned() {
        let ds = sample().select(&[true, false, true]);
        assert_eq!(ds.n_samples(), 2);
        assert_eq!(ds.row(1).to_vec(), vec![4.0, 5.0]);
        assert_eq!(
            ds.targets(),
            Some(&Targets::Labels(vec!["a".into(), "c".into()]))
        );
    }

    #[test]
    fn with_samples_appends_rows_and_drops_targets() {
        let ds = sample().with_samples(array![[9.0, 9.0]].view()).unwrap();
        assert_eq!(ds.n_samples(), 4);
        assert_eq!(ds.row(3).to_vec(), vec![9.0, 9.0]);
        assert!(ds.targets().is_none());

        assert!(sample().with_samples(array![[1.0]].view()).is_err());
    }

    #[test]
    fn column_bounds_and_means() {
        let ds = sample();
        assert_eq!(ds.column_bounds(0), Some((0.0, 4.0)));
        assert_eq!(ds.column_means().to_vec(), vec![2.0, 3.0]);
        assert_eq!(ds.select(&[false, false, false]).column_bounds(0), None);
    }

    #[test]
    fn builder_transposes_columns() {
        let ds = DatasetBuilder::new()
            .add_feature("a", array![1.0, 2.0].view())
            .add_feature("b", array![3.0, 4.0].view())
            .build()
            .unwrap();
        assert_eq!(ds.features(), array![[1.0, 3.0], [2.0, 4.0]]);

        let err = DatasetBuilder::new()
            .add_feature("a", array![1.0, 2.0].view())
            .add_feature("b", array![3.0].view())
            .build()
            .unwrap_err();
        assert!(matches!(err, DatasetError::ColumnLength { .. }));
    }
}
