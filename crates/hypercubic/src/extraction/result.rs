//! The outcome of an extraction run.

use ndarray::ArrayView2;

use super::metrics::{Metric, MetricFn};
use super::{uncovered_rows, ExtractionError};
use crate::cube::{HyperCube, OutputKind, Point, Prediction};
use crate::data::{Dataset, Targets};
use crate::predictor::Predictor;

/// Ordered cubes approximating a predictor.
///
/// Order is significant: [`predict`](Self::predict) answers with the first
/// cube containing a row, so earlier cubes shadow later ones. A trailing
/// surrounding cube, if any, only answers rows nothing else covers.
#[derive(Debug, Clone)]
pub struct ExtractedCubes {
    cubes: Vec<HyperCube>,
    feature_names: Vec<String>,
    output: OutputKind,
    ignored: Vec<String>,
}

impl ExtractedCubes {
    pub(crate) fn new(
        cubes: Vec<HyperCube>,
        feature_names: Vec<String>,
        output: OutputKind,
        ignored: Vec<String>,
    ) -> Self {
        Self {
            cubes,
            feature_names,
            output,
            ignored,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn cubes(&self) -> &[HyperCube] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HyperCube> {
        self.cubes.iter()
    }

    pub fn into_cubes(self) -> Vec<HyperCube> {
        self.cubes
    }

    /// Output discipline the cubes were extracted with.
    pub fn output_kind(&self) -> OutputKind {
        self.output
    }

    /// Features that some grid level never split.
    pub fn ignored_features(&self) -> &[String] {
        &self.ignored
    }

    /// Column order expected by [`predict`](Self::predict).
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Output of the first cube containing each row, `None` where no cube does.
    ///
    /// Rows follow [`feature_names`](Self::feature_names) column order.
    pub fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Vec<Option<Prediction>>, ExtractionError> {
        if rows.ncols() != self.feature_names.len() {
            return Err(ExtractionError::FeatureCountMismatch {
                expected: self.feature_names.len(),
                got: rows.ncols(),
            });
        }

        rows.outer_iter()
            .map(|row| -> Result<Option<Prediction>, ExtractionError> {
                let point = Point::new(self.feature_names.iter().cloned(), row.iter().copied());
                for cube in &self.cubes {
                    if cube.contains(&point)? {
                        return Ok(Some(cube.output().evaluate(row)));
                    }
                }
                Ok(None)
            })
            .collect()
    }

    /// Whether every row of `dataset` lies in some cube.
    pub fn covers(&self, dataset: &Dataset) -> Result<bool, ExtractionError> {
        Ok(uncovered_rows(&self.cubes, dataset)? == 0)
    }

    // =========================================================================
    // Fidelity
    // =========================================================================

    /// Agreement with `predictor` on the rows of `dataset` covered by a cube.
    pub fn score<P: Predictor + ?Sized>(
        &self,
        dataset: &Dataset,
        predictor: &P,
        metric: Metric,
    ) -> Result<f64, ExtractionError> {
        let expected = predictor.predict(dataset.features()).to_vec();
        self.score_against(dataset, expected, metric)
    }

    /// Agreement with the dataset targets on the rows covered by a cube.
    ///
    /// # Errors
    ///
    /// [`ExtractionError::MissingTargets`] if the dataset carries no targets.
    pub fn score_targets(&self, dataset: &Dataset, metric: Metric) -> Result<f64, ExtractionError> {
        let expected = match dataset.targets() {
            Some(Targets::Values(v)) => v.iter().map(|&x| Prediction::Value(x)).collect(),
            Some(Targets::Labels(l)) => l.iter().cloned().map(Prediction::Label).collect(),
            None => return Err(ExtractionError::MissingTargets),
        };
        self.score_against(dataset, expected, metric)
    }

    fn score_against(
        &self,
        dataset: &Dataset,
        expected: Vec<Prediction>,
        metric: Metric,
    ) -> Result<f64, ExtractionError> {
        let predicted = self.predict(dataset.features())?;
        let (predicted, expected): (Vec<Prediction>, Vec<Prediction>) = predicted
            .into_iter()
            .zip(expected)
            .filter_map(|(p, e)| p.map(|p| (p, e)))
            .unzip();
        metric
            .compute(&predicted, &expected)
            .ok_or(ExtractionError::IncompatibleMetric {
                metric: metric.name(),
            })
    }
}

impl<'a> IntoIterator for &'a ExtractedCubes {
    type Item = &'a HyperCube;
    type IntoIter = std::slice::Iter<'a, HyperCube>;

    fn into_iter(self) -> Self::IntoIter {
        self.cubes.iter()
    }
}
