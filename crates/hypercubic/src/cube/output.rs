//! Output and boundary disciplines of a cube.

use std::fmt;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::LinearModel;

/// How a cube summarises the predictor inside its region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Mean prediction, diversity is the standard deviation.
    #[default]
    Constant,
    /// Modal label, diversity is the misclassification fraction.
    Classification,
    /// Linear fit, diversity is the mean absolute residual.
    Regression,
}

/// Membership rule of a cube.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// `lower <= v < upper`
    #[default]
    HalfOpen,
    /// `lower <= v <= upper`
    Closed,
}

/// Output value of a cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CubeOutput {
    Constant(f64),
    Label(String),
    Linear(LinearModel),
}

impl CubeOutput {
    /// Initial output of a fresh cube of `kind` over `n_features` dimensions.
    pub fn empty(kind: OutputKind, n_features: usize) -> Self {
        match kind {
            OutputKind::Constant => Self::Constant(0.0),
            OutputKind::Classification => Self::Label(String::new()),
            OutputKind::Regression => Self::Linear(LinearModel::zeros(n_features)),
        }
    }

    /// The discipline this output belongs to.
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::Constant(_) => OutputKind::Constant,
            Self::Label(_) => OutputKind::Classification,
            Self::Linear(_) => OutputKind::Regression,
        }
    }

    /// Output for one row, in the owning cube's dimension order.
    pub fn evaluate(&self, row: ArrayView1<'_, f64>) -> Prediction {
        match self {
            Self::Constant(v) => Prediction::Value(*v),
            Self::Label(l) => Prediction::Label(l.clone()),
            Self::Linear(m) => Prediction::Value(m.predict_row(row)),
        }
    }
}

impl fmt::Display for CubeOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => write!(f, "{v}"),
            Self::Label(l) => write!(f, "{l}"),
            Self::Linear(m) => {
                write!(f, "{}", m.intercept())?;
                for (i, c) in m.coefficients().iter().enumerate() {
                    write!(f, " + {c} * x{i}")?;
                }
                Ok(())
            }
        }
    }
}

/// A single prediction of an extracted cube set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prediction {
    Value(f64),
    Label(String),
}

impl Prediction {
    /// Numeric value, if this is not a label.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Label(_) => None,
        }
    }

    /// Label, if this is not a numeric value.
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Value(_) => None,
            Self::Label(l) => Some(l),
        }
    }
}
