//! The black-box model being approximated.
//!
//! Extraction only ever calls [`Predictor::predict`] on row subsets of the
//! dataset (plus synthetic rows drawn inside cubes). The predictor is shared
//! read-only for the whole run and may be queried from several threads.

use ndarray::{Array1, ArrayView2};

use crate::cube::Prediction;

/// Outputs of one predictor call, one entry per input row.
#[derive(Debug, Clone, PartialEq)]
pub enum Predictions {
    Values(Array1<f64>),
    Labels(Vec<String>),
}

impl Predictions {
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Labels(l) => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for categorical outputs.
    pub fn is_labels(&self) -> bool {
        matches!(self, Self::Labels(_))
    }

    /// One [`Prediction`] per row.
    pub fn to_vec(&self) -> Vec<Prediction> {
        match self {
            Self::Values(v) => v.iter().map(|&x| Prediction::Value(x)).collect(),
            Self::Labels(l) => l.iter().cloned().map(Prediction::Label).collect(),
        }
    }

    /// Short name of the output type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Values(_) => "numeric",
            Self::Labels(_) => "label",
        }
    }
}

/// A deterministic function from feature rows to outputs.
///
/// Rows are sample-major `[n_samples, n_features]` in the dataset's column
/// order. Implementations must return exactly one output per row.
pub trait Predictor: Sync {
    fn predict(&self, samples: ArrayView2<'_, f64>) -> Predictions;
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, samples: ArrayView2<'_, f64>) -> Predictions {
        (**self).predict(samples)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, samples: ArrayView2<'_, f64>) -> Predictions {
        (**self).predict(samples)
    }
}

/// Predictor backed by a closure. See [`from_fn`].
pub struct FnPredictor<F>(F);

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Predictions + Sync,
{
    fn predict(&self, samples: ArrayView2<'_, f64>) -> Predictions {
        (self.0)(samples)
    }
}

/// Wrap a closure as a [`Predictor`].
///
/// ```
/// use hypercubic::predictor::{from_fn, Predictor};
/// use hypercubic::Predictions;
/// use ndarray::{array, ArrayView2};
///
/// let p = from_fn(|rows: ArrayView2<'_, f64>| Predictions::Values(rows.column(0).to_owned()));
/// let out = p.predict(array![[1.0, 2.0], [3.0, 4.0]].view());
/// assert_eq!(out, Predictions::Values(array![1.0, 3.0]));
/// ```
pub fn from_fn<F>(f: F) -> FnPredictor<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Predictions + Sync,
{
    FnPredictor(f)
}
