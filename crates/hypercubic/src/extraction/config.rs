//! Extraction configuration with builder pattern.
//!
//! [`ExtractionConfig`] is shared by [`GridEx`](super::GridEx) and
//! [`HEx`](super::HEx). It uses the `bon` crate for builder generation and
//! validates at build time.
//!
//! # Example
//!
//! ```
//! use hypercubic::{ExtractionConfig, Grid, OutputKind, Strategy};
//!
//! // All defaults
//! let config = ExtractionConfig::builder().build().unwrap();
//! assert_eq!(config.seed, 42);
//!
//! let config = ExtractionConfig::builder()
//!     .grid(Grid::new(3, Strategy::fixed(2)))
//!     .min_examples(50)
//!     .threshold(0.05)
//!     .output(OutputKind::Regression)
//!     .build()
//!     .unwrap();
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use super::Verbosity;
use crate::cube::{BoundaryKind, OutputKind};
use crate::grid::{Grid, Strategy};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Threshold must be finite and non-negative.
    InvalidThreshold(f64),
    /// The grid must have at least one level.
    EmptyGrid,
    /// A fixed strategy must split in at least one part.
    InvalidSplitCount { level: usize },
    /// Adaptive partitions must be sorted by threshold with at least one part each.
    InvalidPartitions { level: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold(v) => {
                write!(f, "threshold must be finite and non-negative, got {}", v)
            }
            Self::EmptyGrid => write!(f, "grid must have at least one level"),
            Self::InvalidSplitCount { level } => {
                write!(f, "fixed strategy at level {} must split in at least 1 part", level)
            }
            Self::InvalidPartitions { level } => write!(
                f,
                "adaptive partitions at level {} must be sorted by threshold and split in at least 1 part",
                level
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// ExtractionConfig
// =============================================================================

/// Configuration of an extraction run.
///
/// # Structure
///
/// - **Grid**: refinement levels and their per-feature split counts
/// - **Tolerance**: `min_examples` per cube and the error `threshold`
/// - **Disciplines**: cube [`OutputKind`] and [`BoundaryKind`]
/// - **Resources**: seed, threads and logging
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct ExtractionConfig {
    // === Grid ===
    /// Refinement levels. Default: one level splitting every feature in 2.
    #[builder(default)]
    pub grid: Grid,

    // === Tolerance ===
    /// Cubes with fewer real samples are topped up with synthetic samples
    /// drawn uniformly inside them. Default: 100.
    #[builder(default = 100)]
    pub min_examples: usize,

    /// Error tolerance. GridEx accepts a cube whose diversity is below it and
    /// merges adjacent cubes whose union stays below it; HEx keeps a child
    /// when it improves the error by more than `0.6 * threshold`.
    /// Default: 0.1.
    #[builder(default = 0.1)]
    pub threshold: f64,

    // === Disciplines ===
    /// Output model of the cubes. Default: `Constant`, switched to
    /// `Classification` when the predictor returns labels.
    #[builder(default)]
    pub output: OutputKind,

    /// Membership rule of the cubes. Default: `HalfOpen`.
    #[builder(default)]
    pub boundary: BoundaryKind,

    // === Resource control ===
    /// Random seed of the synthetic samples. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Number of threads. `None` uses all available cores.
    pub n_threads: Option<NonZeroUsize>,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: extraction_config_builder::IsComplete> ExtractionConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is invalid:
    /// - negative or non-finite `threshold`
    /// - a grid without levels
    /// - a fixed strategy splitting in 0 parts
    /// - unsorted adaptive partitions
    pub fn build(self) -> Result<ExtractionConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl ExtractionConfig {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }

        if self.grid.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }

        for (level, strategy) in self.grid.strategies().iter().enumerate() {
            match strategy {
                Strategy::Fixed(0) => return Err(ConfigError::InvalidSplitCount { level }),
                Strategy::Fixed(_) => {}
                Strategy::Adaptive(adaptive) => {
                    let table = adaptive.partition_table();
                    let sorted = table.windows(2).all(|w| w[0].0 <= w[1].0);
                    if !sorted || table.iter().any(|&(_, parts)| parts == 0) {
                        return Err(ConfigError::InvalidPartitions { level });
                    }
                }
            }
        }

        Ok(())
    }

    /// Thread count in `run_with_threads` form: 0 = auto.
    pub(crate) fn thread_count(&self) -> usize {
        self.n_threads.map_or(0, NonZeroUsize::get)
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            min_examples: 100,
            threshold: 0.1,
            output: OutputKind::default(),
            boundary: BoundaryKind::default(),
            seed: 42,
            n_threads: None,
            verbosity: Verbosity::default(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
