//! Dataset container for extraction runs.
//!
//! # Key Types
//!
//! - [`Dataset`]: Named feature columns plus an optional target column
//! - [`DatasetBuilder`]: Column-by-column construction
//! - [`Targets`]: Numeric or categorical target values
//! - [`DatasetError`]: Construction errors
//!
//! # Storage Layout
//!
//! Features are stored **sample-major**: `[n_samples, n_features]`. Every
//! operation of an extraction run filters whole rows (cube membership) and
//! hands row blocks to the predictor, so rows are kept contiguous.
//!
//! The target column plays the role of the "last column" of a labelled table:
//! it is never used as a feature and is never constrained by a cube.
//!
//! # Example
//!
//! ```
//! use hypercubic::data::{Dataset, Targets};
//! use ndarray::array;
//!
//! let features = array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]; // 3 samples, 2 features
//! let targets = Targets::Values(array![0.0, 1.0, 0.0]);
//! let ds = Dataset::new(vec!["a".into(), "b".into()], features, Some(targets)).unwrap();
//!
//! assert_eq!(ds.n_samples(), 3);
//! assert_eq!(ds.n_features(), 2);
//! ```

mod dataset;
mod error;

pub use dataset::{Dataset, DatasetBuilder, Targets};
pub use error::DatasetError;
