//! Geometry and statistics errors.

use super::OutputKind;
use crate::data::DatasetError;

/// Errors raised by cube operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CubeError {
    /// A cube, point or dataset lacks a feature the operation addresses.
    #[error("feature '{0}' not found")]
    FeatureNotFound(String),

    /// More than one limit per direction was recorded for a feature.
    #[error("too many limits for feature '{feature}' ({count})")]
    TooManyLimits { feature: String, count: usize },

    /// An expansion still overlaps a neighbour after clamping.
    #[error("expansion along '{feature}' left an unresolved overlap")]
    UnresolvedOverlap { feature: String },

    /// The predictor returned outputs the cube discipline cannot summarise.
    #[error("{kind:?} cube cannot summarise {got} predictions")]
    UnexpectedPredictions { kind: OutputKind, got: &'static str },

    /// A sample has no target value to build an output from.
    #[error("no target for row {row}")]
    MissingTarget { row: usize },

    /// The predictor returned a different number of outputs than rows.
    #[error("predictor returned {got} outputs for {expected} rows")]
    PredictionCount { expected: usize, got: usize },

    /// Dataset construction failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
