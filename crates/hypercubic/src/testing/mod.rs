//! Synthetic datasets and predictors shared by unit tests, integration tests
//! and doctests.
//!
//! Everything here is deterministic: random generators take an explicit seed.

mod data;
mod predictors;

pub use data::{grid_dataset, uniform_dataset, with_targets_from};
pub use predictors::{constant_label, doubling_step, half_labels, plane, three_steps};
