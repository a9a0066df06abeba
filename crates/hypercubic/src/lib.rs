//! hypercubic: hypercube-based surrogate extraction for black-box predictors.
//!
//! A trained predictor is approximated by a finite set of axis-aligned
//! hypercubes, each carrying a simple output model (a constant, a class label
//! or a linear function). Cubes are found by repeatedly splitting a cube that
//! surrounds the whole dataset and querying the predictor inside each region.
//!
//! # Key Types
//!
//! - [`HyperCube`] - The N-dimensional box with its output and diversity
//! - [`Grid`] / [`Strategy`] - Refinement levels and per-feature split counts
//! - [`GridEx`] / [`HEx`] - The grid-driven and the gain-pruned extractors
//! - [`ExtractionConfig`] - Configuration builder shared by both extractors
//! - [`Dataset`] / [`Predictor`] - Inputs of an extraction run
//!
//! # Extraction
//!
//! Use `ExtractionConfig::builder()` to configure, then call
//! [`Extractor::extract`] on [`GridEx`] or [`HEx`].
//!
//! ```
//! use hypercubic::{Dataset, ExtractionConfig, Extractor, Grid, GridEx, Predictions, Strategy};
//! use hypercubic::predictor::from_fn;
//! use ndarray::{array, Array1, ArrayView2};
//!
//! let features = array![[0.1, 0.2], [0.4, 0.9], [0.6, 0.3], [0.9, 0.7]];
//! let dataset = Dataset::new(vec!["x".into(), "y".into()], features, None).unwrap();
//! let predictor = from_fn(|rows: ArrayView2<'_, f64>| {
//!     Predictions::Values(rows.column(0).mapv(|x| if x < 0.5 { 1.0 } else { 2.0 }))
//! });
//!
//! let config = ExtractionConfig::builder()
//!     .grid(Grid::new(1, Strategy::fixed(2)))
//!     .min_examples(0)
//!     .threshold(0.1)
//!     .build()
//!     .unwrap();
//! let cubes = GridEx::new(config).extract(&dataset, &predictor).unwrap();
//! assert_eq!(cubes.len(), 2);
//! ```

// Re-export approx traits for users who want to compare cube geometry
pub use approx;

pub mod cube;
pub mod data;
pub mod extraction;
pub mod grid;
pub mod predictor;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Geometry
pub use cube::{
    BoundaryKind, CubeError, CubeOutput, Direction, Expansion, HyperCube, Interval, Limit,
    LimitState, LinearModel, MinUpdate, OutputKind, Point, Prediction,
};

// Inputs
pub use data::{Dataset, DatasetError, Targets};
pub use predictor::{Predictions, Predictor};

// Grid configuration
pub use grid::{AdaptiveStrategy, Grid, GridLevel, Strategy};

// Extraction
pub use extraction::{
    ConfigError, ExtractedCubes, ExtractionConfig, ExtractionError, ExtractionLogger, Extractor,
    GridEx, HEx, Metric, MetricFn, Verbosity,
};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
