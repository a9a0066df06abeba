//! Extraction engines.
//!
//! Both engines start from the cube surrounding the dataset and refine it
//! level by level along a [`Grid`](crate::grid::Grid), querying the predictor
//! inside every candidate region.
//!
//! # Engines
//!
//! - [`GridEx`]: accepts cubes whose diversity falls below the threshold,
//!   splits the others and merges adjacent children (`GridREx` with
//!   [`GridEx::regression`])
//! - [`HEx`]: builds a partition tree and keeps a child only when it gains
//!   over its nearest kept ancestor
//!
//! # Key Types
//!
//! - [`Extractor`]: Common entry point of both engines
//! - [`ExtractionConfig`]: Shared configuration (bon builder)
//! - [`ExtractedCubes`]: Ordered result with prediction and fidelity scoring
//! - [`ExtractionLogger`] / [`Verbosity`]: Progress events through `tracing`

mod config;
mod gridex;
mod hex;
mod logger;
mod metrics;
mod result;
mod workspace;

pub use config::{ConfigError, ExtractionConfig};
pub use gridex::GridEx;
pub use hex::HEx;
pub use logger::{ExtractionLogger, Verbosity};
pub use metrics::{Accuracy, Mae, Metric, MetricFn, Mse, R2};
pub use result::ExtractedCubes;

use crate::cube::{CubeError, HyperCube, OutputKind};
use crate::data::{Dataset, DatasetError};
use crate::predictor::Predictor;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised by an extraction run or by its result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Cube(#[from] CubeError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Scoring against targets needs a labelled dataset.
    #[error("dataset has no targets")]
    MissingTargets,

    /// The metric cannot compare the outputs at hand, e.g. MAE on labels.
    #[error("metric '{metric}' does not apply to these outputs")]
    IncompatibleMetric { metric: &'static str },

    /// Rows do not have the extracted feature count.
    #[error("expected {expected} features, got {got}")]
    FeatureCountMismatch { expected: usize, got: usize },
}

// =============================================================================
// Extractor
// =============================================================================

/// An algorithm approximating a predictor with hypercubes.
pub trait Extractor {
    /// Approximate `predictor` over the region spanned by `dataset`.
    ///
    /// The returned cubes cover every row of `dataset`.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::Empty`] if the dataset has no rows
    /// - [`CubeError`] if the predictor's outputs do not fit the cube discipline
    fn extract<P: Predictor + ?Sized>(
        &self,
        dataset: &Dataset,
        predictor: &P,
    ) -> Result<ExtractedCubes, ExtractionError>;
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Output discipline of a run. `Constant` becomes `Classification` when the
/// predictor answers the first row with a label.
pub(crate) fn resolve_output<P: Predictor + ?Sized>(
    configured: OutputKind,
    dataset: &Dataset,
    predictor: &P,
) -> Result<OutputKind, ExtractionError> {
    if dataset.is_empty() {
        return Err(DatasetError::Empty.into());
    }
    if configured != OutputKind::Constant {
        return Ok(configured);
    }
    let first = predictor.predict(dataset.features().slice(ndarray::s![0..1, ..]));
    Ok(if first.is_labels() {
        OutputKind::Classification
    } else {
        OutputKind::Constant
    })
}

/// Apply the coverage fallback to the cubes of a run.
///
/// No cube at all yields the surrounding cube alone. Cubes leaving some real
/// row uncovered get the surrounding cube appended as a catch-all.
pub(crate) fn finalize(
    mut cubes: Vec<HyperCube>,
    surrounding: HyperCube,
    real: &Dataset,
    output: OutputKind,
    ignored: Vec<String>,
    logger: &ExtractionLogger,
) -> Result<ExtractedCubes, ExtractionError> {
    if cubes.is_empty() {
        cubes.push(surrounding);
    } else {
        let uncovered = uncovered_rows(&cubes, real)?;
        if uncovered > 0 {
            logger.log_fallback(uncovered);
            cubes.push(surrounding);
        }
    }
    Ok(ExtractedCubes::new(cubes, real.feature_names().to_vec(), output, ignored))
}

/// Number of rows of `dataset` outside every cube.
pub(crate) fn uncovered_rows(cubes: &[HyperCube], dataset: &Dataset) -> Result<usize, CubeError> {
    let mut covered = vec![false; dataset.n_samples()];
    for cube in cubes {
        for (flag, inside) in covered.iter_mut().zip(cube.filter_indices(dataset)?) {
            *flag |= inside;
        }
    }
    Ok(covered.iter().filter(|c| !**c).count())
}
