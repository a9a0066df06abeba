//! Fidelity metrics of extracted cubes.
//!
//! Metrics compare the predictions of an [`ExtractedCubes`](super::ExtractedCubes)
//! with reference outputs, either the predictor's or the dataset targets.
//! Only rows matched by some cube take part.
//!
//! # Available Metrics
//!
//! - [`Mae`]: Mean Absolute Error
//! - [`Mse`]: Mean Squared Error
//! - [`R2`]: Coefficient of determination
//! - [`Accuracy`]: Fraction of equal outputs

use crate::cube::Prediction;

/// Trait of a fidelity metric.
pub trait MetricFn {
    /// Compute the metric. `None` if the outputs have a kind the metric does
    /// not handle. Empty inputs yield `0.0`.
    fn compute(&self, predicted: &[Prediction], expected: &[Prediction]) -> Option<f64>;

    /// Whether higher values indicate better fidelity.
    fn higher_is_better(&self) -> bool;

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

/// Numeric pairs, `None` if any side holds a label.
fn numeric_pairs(predicted: &[Prediction], expected: &[Prediction]) -> Option<Vec<(f64, f64)>> {
    predicted
        .iter()
        .zip(expected)
        .map(|(p, e)| Some((p.as_value()?, e.as_value()?)))
        .collect()
}

// =============================================================================
// MAE (Mean Absolute Error)
// =============================================================================

/// Mean Absolute Error: mean(|pred - expected|)
///
/// Lower is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl MetricFn for Mae {
    fn compute(&self, predicted: &[Prediction], expected: &[Prediction]) -> Option<f64> {
        let pairs = numeric_pairs(predicted, expected)?;
        if pairs.is_empty() {
            return Some(0.0);
        }
        Some(pairs.iter().map(|(p, e)| (p - e).abs()).sum::<f64>() / pairs.len() as f64)
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}

// =============================================================================
// MSE (Mean Squared Error)
// =============================================================================

/// Mean Squared Error: mean((pred - expected)²)
///
/// Lower is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mse;

impl MetricFn for Mse {
    fn compute(&self, predicted: &[Prediction], expected: &[Prediction]) -> Option<f64> {
        let pairs = numeric_pairs(predicted, expected)?;
        if pairs.is_empty() {
            return Some(0.0);
        }
        Some(pairs.iter().map(|(p, e)| (p - e) * (p - e)).sum::<f64>() / pairs.len() as f64)
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "mse"
    }
}

// =============================================================================
// R2
// =============================================================================

/// Coefficient of determination: 1 - SS_res / SS_tot
///
/// Higher is better. Constant references score 1 when matched exactly and 0
/// otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2;

impl MetricFn for R2 {
    fn compute(&self, predicted: &[Prediction], expected: &[Prediction]) -> Option<f64> {
        let pairs = numeric_pairs(predicted, expected)?;
        if pairs.is_empty() {
            return Some(0.0);
        }
        let mean = pairs.iter().map(|(_, e)| e).sum::<f64>() / pairs.len() as f64;
        let ss_res: f64 = pairs.iter().map(|(p, e)| (e - p) * (e - p)).sum();
        let ss_tot: f64 = pairs.iter().map(|(_, e)| (e - mean) * (e - mean)).sum();
        if ss_tot == 0.0 {
            return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
        }
        Some(1.0 - ss_res / ss_tot)
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "r2"
    }
}

// =============================================================================
// Accuracy
// =============================================================================

/// Fraction of rows whose outputs are equal.
///
/// Higher is better. Works on labels and on numeric class ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl MetricFn for Accuracy {
    fn compute(&self, predicted: &[Prediction], expected: &[Prediction]) -> Option<f64> {
        if predicted.is_empty() {
            return Some(0.0);
        }
        let hits = predicted.iter().zip(expected).filter(|(p, e)| p == e).count();
        Some(hits as f64 / predicted.len() as f64)
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "accuracy"
    }
}

// =============================================================================
// Metric Enum (Convenience wrapper)
// =============================================================================

/// A dynamically-selected fidelity metric.
///
/// # Example
///
/// ```
/// use hypercubic::{Metric, MetricFn, Prediction};
///
/// let predicted = [Prediction::Value(1.0), Prediction::Value(3.0)];
/// let expected = [Prediction::Value(1.0), Prediction::Value(2.0)];
/// assert_eq!(Metric::mae().compute(&predicted, &expected), Some(0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Mae,
    Mse,
    R2,
    Accuracy,
}

impl Metric {
    pub fn mae() -> Self {
        Self::Mae
    }

    pub fn mse() -> Self {
        Self::Mse
    }

    pub fn r2() -> Self {
        Self::R2
    }

    pub fn accuracy() -> Self {
        Self::Accuracy
    }

    fn inner(&self) -> &dyn MetricFn {
        match self {
            Self::Mae => &Mae,
            Self::Mse => &Mse,
            Self::R2 => &R2,
            Self::Accuracy => &Accuracy,
        }
    }
}

impl MetricFn for Metric {
    fn compute(&self, predicted: &[Prediction], expected: &[Prediction]) -> Option<f64> {
        self.inner().compute(predicted, expected)
    }

    fn higher_is_better(&self) -> bool {
        self.inner().higher_is_better()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn values(v: &[f64]) -> Vec<Prediction> {
        v.iter().map(|&x| Prediction::Value(x)).collect()
    }

    fn labels(v: &[&str]) -> Vec<Prediction> {
        v.iter().map(|s| Prediction::Label(s.to_string())).collect()
    }

    #[test]
    fn regression_metrics() {
        let p = values(&[1.0, 2.0, 4.0]);
        let e = values(&[1.0, 3.0, 3.0]);
        assert_abs_diff_eq!(Metric::mae().compute(&p, &e).unwrap(), 2.0 / 3.0);
        assert_abs_diff_eq!(Metric::mse().compute(&p, &e).unwrap(), 2.0 / 3.0);
        // mean 7/3, SS_tot = 16/9 + 4/9 + 4/9 = 24/9
        assert_abs_diff_eq!(Metric::r2().compute(&p, &e).unwrap(), 1.0 - 2.0 / (24.0 / 9.0), epsilon = 1e-12);
        assert_eq!(Metric::r2().compute(&e, &e), Some(1.0));
    }

    #[test]
    fn constant_reference_r2() {
        let e = values(&[2.0, 2.0]);
        assert_eq!(Metric::r2().compute(&e, &e), Some(1.0));
        assert_eq!(Metric::r2().compute(&values(&[1.0, 2.0]), &e), Some(0.0));
    }

    #[test]
    fn accuracy_on_labels() {
        let p = labels(&["a", "b", "b", "a"]);
        let e = labels(&["a", "b", "a", "a"]);
        assert_eq!(Metric::accuracy().compute(&p, &e), Some(0.75));
        assert!(Metric::accuracy().higher_is_better());
    }

    #[test]
    fn numeric_metric_rejects_labels() {
        let p = labels(&["a"]);
        assert_eq!(Metric::mae().compute(&p, &p), None);
        assert_eq!(Metric::mse().compute(&[], &[]), Some(0.0));
        assert_eq!(Metric::mae().name(), "mae");
    }
}
