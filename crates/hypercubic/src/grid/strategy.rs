//! Per-feature split counts.

use serde::{Deserialize, Serialize};

/// Default importance thresholds of [`AdaptiveStrategy`].
const DEFAULT_PARTITIONS: [(f64, usize); 2] = [(0.33, 2), (0.67, 3)];

/// How many parts each feature is split into at one refinement level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// Every feature is split into the same number of parts.
    Fixed(usize),
    /// Split counts follow feature importances.
    Adaptive(AdaptiveStrategy),
}

impl Strategy {
    /// Split every feature into `n` parts.
    pub fn fixed(n: usize) -> Self {
        Self::Fixed(n)
    }

    /// Importance-driven splits with the default partitions.
    pub fn adaptive<I, S>(importances: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self::Adaptive(AdaptiveStrategy::new(importances))
    }

    /// Number of parts for `feature`. A feature split in one part is left as is.
    pub fn partitions(&self, feature: &str) -> usize {
        match self {
            Self::Fixed(n) => *n,
            Self::Adaptive(adaptive) => adaptive.partitions(feature),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Fixed(2)
    }
}

/// Maps feature importances to split counts.
///
/// `partitions` holds `(importance_threshold, n_parts)` pairs sorted by
/// threshold. A feature gets the parts of the last threshold its importance
/// reaches; features below the first threshold, or without a recorded
/// importance, are not split.
///
/// ```
/// use hypercubic::AdaptiveStrategy;
///
/// let strategy = AdaptiveStrategy::new([("x", 0.9), ("y", 0.5), ("z", 0.1)]);
/// assert_eq!(strategy.partitions("x"), 3);
/// assert_eq!(strategy.partitions("y"), 2);
/// assert_eq!(strategy.partitions("z"), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveStrategy {
    importances: Vec<(String, f64)>,
    partitions: Vec<(f64, usize)>,
}

impl AdaptiveStrategy {
    pub fn new<I, S>(importances: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            importances: importances
                .into_iter()
                .map(|(name, importance)| (name.into(), importance))
                .collect(),
            partitions: DEFAULT_PARTITIONS.to_vec(),
        }
    }

    /// Replace the `(importance_threshold, n_parts)` table.
    pub fn with_partitions(mut self, partitions: Vec<(f64, usize)>) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn importances(&self) -> &[(String, f64)] {
        &self.importances
    }

    pub fn partition_table(&self) -> &[(f64, usize)] {
        &self.partitions
    }

    pub fn partitions(&self, feature: &str) -> usize {
        let Some(importance) = self
            .importances
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, importance)| *importance)
        else {
            return 1;
        };

        let mut n = 1;
        for &(threshold, parts) in &self.partitions {
            if importance >= threshold {
                n = parts;
            } else {
                break;
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 1)]
    #[case(0.33, 2)]
    #[case(0.5, 2)]
    #[case(0.67, 3)]
    #[case(1.0, 3)]
    fn default_partitions(#[case] importance: f64, #[case] expected: usize) {
        let strategy = AdaptiveStrategy::new([("x", importance)]);
        assert_eq!(strategy.partitions("x"), expected);
    }

    #[test]
    fn custom_table_and_unknown_feature() {
        let strategy =
            AdaptiveStrategy::new([("x", 0.5)]).with_partitions(vec![(0.1, 4), (0.4, 6), (0.9, 8)]);
        assert_eq!(strategy.partitions("x"), 6);
        assert_eq!(strategy.partitions("missing"), 1);
        assert_eq!(Strategy::Adaptive(strategy).partitions("x"), 6);
        assert_eq!(Strategy::fixed(3).partitions("anything"), 3);
    }
}
