//! One-sided boundary locks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a cube face along one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Towards lower values (`-`).
    Negative,
    /// Towards higher values (`+`).
    Positive,
}

impl Direction {
    /// The other direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Positive => Self::Negative,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative => write!(f, "-"),
            Self::Positive => write!(f, "+"),
        }
    }
}

/// A face of a cube pinned against the surrounding cube.
///
/// The face must not be expanded further in `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Limit {
    pub feature: String,
    pub direction: Direction,
}

impl Limit {
    pub fn new(feature: impl Into<String>, direction: Direction) -> Self {
        Self {
            feature: feature.into(),
            direction,
        }
    }
}

/// Limits recorded for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitState {
    /// No face is pinned.
    None,
    /// One face is pinned.
    Single(Direction),
    /// Both faces are pinned.
    Both,
}

impl LimitState {
    /// Returns `true` if the face in `direction` is pinned.
    pub fn blocks(self, direction: Direction) -> bool {
        match self {
            Self::None => false,
            Self::Single(d) => d == direction,
            Self::Both => true,
        }
    }
}
