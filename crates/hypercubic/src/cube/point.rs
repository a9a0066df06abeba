//! Named N-dimensional points.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::{CubeError, EPSILON};

/// An N-dimensional point whose coordinates are tagged by feature name.
///
/// Coordinates keep their insertion order. Two points are equal when every
/// coordinate of the left-hand point is within [`EPSILON`] of the coordinate
/// with the same name on the right.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Point {
    coords: Vec<(String, f64)>,
}

impl Point {
    /// Create a point from parallel name and value sequences.
    pub fn new<N, V, S>(names: N, values: V) -> Self
    where
        N: IntoIterator<Item = S>,
        V: IntoIterator<Item = f64>,
        S: Into<String>,
    {
        Self {
            coords: names.into_iter().map(Into::into).zip(values).collect(),
        }
    }

    /// Number of coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Returns `true` if the point has no coordinate.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinate of `feature`.
    ///
    /// # Errors
    ///
    /// [`CubeError::FeatureNotFound`] if the point has no such coordinate.
    pub fn get(&self, feature: &str) -> Result<f64, CubeError> {
        self.coords
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, v)| *v)
            .ok_or_else(|| CubeError::FeatureNotFound(feature.to_string()))
    }

    /// Replace (or append) the coordinate of `feature`.
    pub fn set(&mut self, feature: &str, value: f64) {
        match self.coords.iter_mut().find(|(name, _)| name == feature) {
            Some((_, v)) => *v = value,
            None => self.coords.push((feature.to_string(), value)),
        }
    }

    /// Copy of this point with the coordinate of `feature` replaced.
    pub fn with(&self, feature: &str, value: f64) -> Point {
        let mut point = self.clone();
        point.set(feature, value);
        point
    }

    /// Feature names in coordinate order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.coords.iter().map(|(name, _)| name.as_str())
    }

    /// `(feature, value)` pairs in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.coords.iter().map(|(name, v)| (name.as_str(), *v))
    }

    /// Coordinates as a row, in coordinate order.
    pub fn to_array(&self) -> Array1<f64> {
        self.coords.iter().map(|(_, v)| *v).collect()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.coords.iter().all(|(name, v)| {
            other
                .get(name)
                .map(|o| (v - o).abs() < EPSILON)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_missing_feature() {
        let p = Point::new(["x", "y"], [1.0, 2.0]);
        assert_eq!(p.get("y").unwrap(), 2.0);
        assert_eq!(p.get("z"), Err(CubeError::FeatureNotFound("z".into())));
    }

    #[test]
    fn with_replaces_a_single_slot() {
        let p = Point::new(["x", "y"], [1.0, 2.0]);
        let q = p.with("x", 5.0);
        assert_eq!(p.get("x").unwrap(), 1.0);
        assert_eq!(q.get("x").unwrap(), 5.0);
        assert_eq!(q.get("y").unwrap(), 2.0);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn equality_uses_epsilon() {
        let p = Point::new(["x"], [1.0]);
        assert_eq!(p, Point::new(["x"], [1.0 + EPSILON / 2.0]));
        assert_ne!(p, Point::new(["x"], [1.0 + EPSILON * 2.0]));
        assert_ne!(p, Point::new(["y"], [1.0]));
    }
}
