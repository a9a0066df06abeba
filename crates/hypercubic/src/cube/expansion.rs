//! Requested cube growth.

use serde::{Deserialize, Serialize};

use super::{CubeError, Direction, HyperCube, Interval};

/// A request to grow one dimension of a cube towards a target face.
///
/// Growing in [`Direction::Negative`] moves the lower bound to
/// `target.lower()`, growing in [`Direction::Positive`] moves the upper bound
/// to `target.upper()`. `distance` ranks competing expansions of one cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    feature: String,
    direction: Direction,
    target: Interval,
    distance: f64,
}

impl Expansion {
    pub fn new(
        feature: impl Into<String>,
        direction: Direction,
        target: Interval,
        distance: f64,
    ) -> Self {
        Self {
            feature: feature.into(),
            direction,
            target,
            distance,
        }
    }

    /// Expansion towards the face of a probe cube on `feature`.
    ///
    /// # Errors
    ///
    /// [`CubeError::FeatureNotFound`] if `probe` lacks `feature`.
    pub fn towards(
        probe: &HyperCube,
        feature: &str,
        direction: Direction,
        distance: f64,
    ) -> Result<Self, CubeError> {
        Ok(Self::new(feature, direction, probe.get(feature)?, distance))
    }

    /// Expansion of `cube` on `feature` by `amount` in `direction`.
    ///
    /// # Errors
    ///
    /// [`CubeError::FeatureNotFound`] if `cube` lacks `feature`.
    pub fn by_amount(
        cube: &HyperCube,
        feature: &str,
        direction: Direction,
        amount: f64,
    ) -> Result<Self, CubeError> {
        let current = cube.get(feature)?;
        let target = match direction {
            Direction::Negative => Interval::new(current.lower() - amount, current.lower()),
            Direction::Positive => Interval::new(current.upper(), current.upper() + amount),
        };
        Ok(Self::new(feature, direction, target, amount))
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Bounds of `current` after the expansion.
    pub fn boundaries(&self, current: Interval) -> Interval {
        match self.direction {
            Direction::Negative => Interval::new(self.target.lower(), current.upper()),
            Direction::Positive => Interval::new(current.lower(), self.target.upper()),
        }
    }
}

/// Minimum-width correction of one dimension.
///
/// Applied symmetrically by [`HyperCube::expand_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinUpdate {
    pub feature: String,
    pub value: f64,
}

impl MinUpdate {
    pub fn new(feature: impl Into<String>, value: f64) -> Self {
        Self {
            feature: feature.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_follow_direction() {
        let current = Interval::new(2.3, 6.4);
        let down = Expansion::new("x", Direction::Negative, Interval::new(0.5, 2.3), 0.0);
        assert_eq!(down.boundaries(current), Interval::new(0.5, 6.4));
        let up = Expansion::new("x", Direction::Positive, Interval::new(6.4, 12.9), 0.0);
        assert_eq!(up.boundaries(current), Interval::new(2.3, 12.9));
    }

    #[test]
    fn by_amount_targets_adjacent_slab() {
        let cube = HyperCube::constant([("x", (1.0, 2.0))], 0.0);
        let e = Expansion::by_amount(&cube, "x", Direction::Negative, 0.5).unwrap();
        assert_eq!(e.boundaries(cube.get("x").unwrap()), Interval::new(0.5, 2.0));
        assert!(Expansion::by_amount(&cube, "y", Direction::Negative, 0.5).is_err());
    }
}
