//! Bounds of one cube dimension.

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use super::{round_to_precision, BoundaryKind, EPSILON};

/// A closed pair of bounds `lower <= upper`.
///
/// Zero-width intervals are valid and represent a fixed coordinate, e.g. the
/// dimensions of a cube built from a single point. Whether the upper bound
/// itself belongs to the interval is decided by a [`BoundaryKind`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl Interval {
    /// Create an interval. Bounds given in the wrong order are swapped.
    #[inline]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    /// Zero-width interval at `value`.
    #[inline]
    pub fn point(value: f64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Both bounds rounded to the cube precision.
    pub(crate) fn rounded(&self) -> Self {
        Self::new(round_to_precision(self.lower), round_to_precision(self.upper))
    }

    /// Membership under a boundary discipline.
    #[inline]
    pub fn contains(&self, value: f64, boundary: BoundaryKind) -> bool {
        match boundary {
            BoundaryKind::HalfOpen => self.lower <= value && value < self.upper,
            BoundaryKind::Closed => self.lower <= value && value <= self.upper,
        }
    }

    /// Open-interval intersection test: touching intervals do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Interval) -> bool {
        !(other.upper <= self.lower || self.upper <= other.lower)
    }

    /// Returns `true` if the intervals share exactly one face.
    #[inline]
    pub fn touches(&self, other: &Interval) -> bool {
        self.upper == other.lower || other.upper == self.lower
    }

    /// Smallest interval covering both.
    #[inline]
    pub fn union(&self, other: &Interval) -> Interval {
        Interval {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Grow by `amount` on both sides, without leaving `bounds`.
    pub fn widen_within(&self, amount: f64, bounds: &Interval) -> Interval {
        Interval::new(
            (self.lower - amount).max(bounds.lower),
            (self.upper + amount).min(bounds.upper),
        )
    }

    /// Split into `n` equal consecutive parts. The last part ends exactly at `upper`.
    pub fn split(&self, n: usize) -> Vec<Interval> {
        let n = n.max(1);
        let size = self.width() / n as f64;
        (0..n)
            .map(|i| {
                let lower = self.lower + size * i as f64;
                let upper = if i + 1 == n {
                    self.upper
                } else {
                    self.lower + size * (i + 1) as f64
                };
                Interval { lower, upper }
            })
            .collect()
    }

    /// `n` evenly spaced values from `lower` to `upper`, or the midpoint if `n == 1`.
    pub fn linspace(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.midpoint()],
            _ => {
                let step = self.width() / (n - 1) as f64;
                (0..n)
                    .map(|i| if i + 1 == n { self.upper } else { self.lower + step * i as f64 })
                    .collect()
            }
        }
    }
}

impl From<(f64, f64)> for Interval {
    fn from((a, b): (f64, f64)) -> Self {
        Interval::new(a, b)
    }
}

impl AbsDiffEq for Interval {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.lower - other.lower).abs() < epsilon && (self.upper - other.upper).abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn new_orders_bounds() {
        let i = Interval::new(3.0, 1.0);
        assert_eq!((i.lower(), i.upper()), (1.0, 3.0));
        assert_eq!(Interval::point(2.0).width(), 0.0);
    }

    #[test]
    fn half_open_and_closed_membership() {
        let i = Interval::new(0.0, 1.0);
        assert!(i.contains(0.0, BoundaryKind::HalfOpen));
        assert!(!i.contains(1.0, BoundaryKind::HalfOpen));
        assert!(i.contains(0.0, BoundaryKind::Closed));
        assert!(i.contains(1.0, BoundaryKind::Closed));
        assert!(!i.contains(1.5, BoundaryKind::Closed));
    }

    #[test]
    fn touching_intervals_do_not_intersect() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(1.0, 2.0);
        assert!(!a.intersects(&b));
        assert!(a.touches(&b));
        assert!(a.intersects(&Interval::new(0.5, 2.0)));
    }

    #[test]
    fn split_covers_interval() {
        let parts = Interval::new(0.0, 1.0).split(3);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].lower(), 0.0);
        assert_eq!(parts[2].upper(), 1.0);
        for w in parts.windows(2) {
            assert_eq!(w[0].upper(), w[1].lower());
        }
    }

    #[test]
    fn linspace_matches_endpoints() {
        let i = Interval::new(0.0, 1.0);
        assert_eq!(i.linspace(1), vec![0.5]);
        let v = i.linspace(5);
        assert_eq!(v.len(), 5);
        assert_abs_diff_eq!(v[1], 0.25);
        assert_eq!(v[4], 1.0);
    }

    #[test]
    fn widen_within_clamps() {
        let bounds = Interval::new(0.0, 0.8);
        let w = Interval::new(0.1, 0.2).widen_within(0.2, &bounds);
        assert_abs_diff_eq!(w, Interval::new(0.0, 0.4));
    }
}
