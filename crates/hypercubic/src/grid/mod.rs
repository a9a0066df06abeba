//! Refinement levels of the extraction engines.
//!
//! A [`Grid`] is a finite sequence of levels, each one a [`Strategy`] telling
//! how many equal parts every feature is split into. Engines walk the levels
//! with [`Grid::iterate`], which hands out a fresh iterator per run.

mod strategy;

pub use strategy::{AdaptiveStrategy, Strategy};

use serde::{Deserialize, Serialize};

/// Sequence of refinement levels.
///
/// # Example
///
/// ```
/// use hypercubic::{Grid, Strategy};
///
/// let grid = Grid::new(2, Strategy::fixed(3));
/// assert_eq!(grid.n_levels(), 2);
/// assert_eq!(grid.get("x", 1), 3);
///
/// let levels: Vec<usize> = grid.iterate().map(|level| level.index()).collect();
/// assert_eq!(levels, vec![0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    levels: Vec<Strategy>,
}

impl Grid {
    /// `iterations` levels sharing one strategy.
    pub fn new(iterations: usize, strategy: Strategy) -> Self {
        Self {
            levels: vec![strategy; iterations],
        }
    }

    /// One strategy per level.
    pub fn with_levels(levels: Vec<Strategy>) -> Self {
        Self { levels }
    }

    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.levels
    }

    /// Parts of `feature` at `level`. Levels past the end do not split.
    pub fn get(&self, feature: &str, level: usize) -> usize {
        self.levels
            .get(level)
            .map_or(1, |strategy| strategy.partitions(feature))
    }

    /// Lazy walk over the levels.
    pub fn iterate(&self) -> GridLevels<'_> {
        GridLevels { grid: self, next: 0 }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(1, Strategy::default())
    }
}

/// One refinement level.
#[derive(Debug, Clone, Copy)]
pub struct GridLevel<'a> {
    index: usize,
    strategy: &'a Strategy,
}

impl<'a> GridLevel<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn strategy(&self) -> &'a Strategy {
        self.strategy
    }

    /// Parts of `feature` at this level.
    pub fn partitions(&self, feature: &str) -> usize {
        self.strategy.partitions(feature)
    }
}

/// Iterator returned by [`Grid::iterate`].
#[derive(Debug, Clone)]
pub struct GridLevels<'a> {
    grid: &'a Grid,
    next: usize,
}

impl<'a> Iterator for GridLevels<'a> {
    type Item = GridLevel<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let strategy = self.grid.levels.get(self.next)?;
        let level = GridLevel {
            index: self.next,
            strategy,
        };
        self.next += 1;
        Some(level)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.levels.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridLevels<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterate_is_finite_and_fresh() {
        let grid = Grid::with_levels(vec![Strategy::fixed(2), Strategy::fixed(3)]);
        let mut levels = grid.iterate();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels.next().map(|l| l.partitions("x")), Some(2));
        assert_eq!(levels.next().map(|l| l.partitions("x")), Some(3));
        assert!(levels.next().is_none());

        // a new walk starts from the first level again
        assert_eq!(grid.iterate().count(), 2);
    }

    #[test]
    fn get_past_last_level_does_not_split() {
        let grid = Grid::new(1, Strategy::fixed(4));
        assert_eq!(grid.get("x", 0), 4);
        assert_eq!(grid.get("x", 1), 1);
        assert!(Grid::with_levels(Vec::new()).is_empty());
    }
}
