//! Hypercube geometry and statistics.
//!
//! # Key Types
//!
//! - [`HyperCube`]: Axis-aligned box with an output model and a diversity
//! - [`Interval`]: Bounds of one dimension
//! - [`Point`]: Named N-dimensional coordinate
//! - [`Limit`] / [`LimitState`]: Faces pinned against the surrounding cube
//! - [`Expansion`] / [`MinUpdate`]: Requested growth of a cube
//! - [`OutputKind`] / [`BoundaryKind`]: The two orthogonal cube disciplines
//! - [`LinearModel`]: Least-squares output of regression cubes
//!
//! # Disciplines
//!
//! A cube carries two independent tags. [`OutputKind`] selects how
//! [`HyperCube::update`] summarises the predictor inside the cube (mean,
//! modal label or linear fit) and how gain is judged. [`BoundaryKind`] selects
//! the membership rule: half-open `lower <= v < upper` or closed
//! `lower <= v <= upper`.

mod error;
mod expansion;
mod hypercube;
mod interval;
mod limit;
mod linear;
mod output;
mod point;

pub use error::CubeError;
pub use expansion::{Expansion, MinUpdate};
pub use hypercube::HyperCube;
pub use interval::Interval;
pub use limit::{Direction, Limit, LimitState};
pub use linear::LinearModel;
pub use output::{BoundaryKind, CubeOutput, OutputKind, Prediction};
pub use point::Point;

/// Precision used when comparing bounds, points and cubes.
pub const EPSILON: f64 = 1e-6;

/// Number of decimal digits kept when a cube is constructed.
pub const INT_PRECISION: i32 = 6;

/// Round to [`INT_PRECISION`] decimal digits.
#[inline]
pub(crate) fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(INT_PRECISION);
    (value * scale).round() / scale
}
