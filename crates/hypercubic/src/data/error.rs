//! Dataset construction errors.

/// Errors raised while building or extending a [`Dataset`](super::Dataset).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// Number of feature names does not match the number of feature columns.
    #[error("expected {expected} feature names, got {got}")]
    FeatureCountMismatch { expected: usize, got: usize },

    /// Targets do not have one value per sample.
    #[error("targets have {targets} values but features have {samples} samples")]
    TargetCountMismatch { samples: usize, targets: usize },

    /// A column has a different length than the others.
    #[error("column '{name}' has {got} values, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        got: usize,
    },

    /// The same feature name appears twice.
    #[error("duplicate feature name '{0}'")]
    DuplicateFeature(String),

    /// The dataset has no samples or no features.
    #[error("dataset is empty")]
    Empty,
}
