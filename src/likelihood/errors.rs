//! likelihood::errors — configuration failures for likelihood blocks.
//!
//! Only configuration problems are errors here: mismatched column lengths,
//! non-monotone model grids, mismatched bandpower bins, malformed
//! covariance matrices. Points that fall outside model support or carry a
//! non-positive σ are masked, never reported as errors.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type LikelihoodResult<T> = Result<T, LikelihoodError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LikelihoodError {
    /// Parallel columns differ in length.
    LengthMismatch { what: &'static str, expected: usize, actual: usize },

    /// A dataset or model curve has no points.
    EmptyData { what: &'static str },

    /// A table does not have the expected number of columns.
    ColumnCount { expected: usize, actual: usize },

    /// A coordinate (ℓ or z) or observed value is NaN/±inf.
    NonFiniteInput { what: &'static str, index: usize, value: f64 },

    /// The model abscissa is not strictly increasing.
    NonMonotoneGrid { index: usize, previous: f64, value: f64 },

    /// Data and model bandpower bins differ.
    GridMismatch { index: usize, data: f64, model: f64 },

    /// A bandpower lies outside model support in a block that cannot mask.
    OutsideModelSupport { index: usize, ell: f64 },

    /// Covariance matrix has the wrong shape.
    CovarianceShape { rows: usize, cols: usize, expected: usize },

    /// Covariance inversion produced no usable matrix.
    SingularCovariance { reason: &'static str },

    /// Degrees of freedom left for a goodness-of-fit statistic are not positive.
    InvalidDegreesOfFreedom { dof: usize, n_params: usize },
}

impl std::error::Error for LikelihoodError {}

impl std::fmt::Display for LikelihoodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LikelihoodError::LengthMismatch { what, expected, actual } => {
                write!(f, "Length mismatch for {what}: expected {expected}, got {actual}")
            }
            LikelihoodError::EmptyData { what } => {
                write!(f, "{what} must contain at least one point")
            }
            LikelihoodError::ColumnCount { expected, actual } => {
                write!(f, "Expected a table with {expected} columns, got {actual}")
            }
            LikelihoodError::NonFiniteInput { what, index, value } => {
                write!(f, "Non-finite {what} at index {index}: {value}")
            }
            LikelihoodError::NonMonotoneGrid { index, previous, value } => write!(
                f,
                "Model grid must be strictly increasing: x[{index}] = {value} follows {previous}"
            ),
            LikelihoodError::GridMismatch { index, data, model } => write!(
                f,
                "Model ell grid must match data bins: bin {index} has ell {data}, model has {model}"
            ),
            LikelihoodError::OutsideModelSupport { index, ell } => {
                write!(f, "Bandpower {index} at ell = {ell} lies outside model support")
            }
            LikelihoodError::CovarianceShape { rows, cols, expected } => write!(
                f,
                "Covariance must be {expected}x{expected}, got {rows}x{cols}"
            ),
            LikelihoodError::SingularCovariance { reason } => {
                write!(f, "Covariance could not be inverted: {reason}")
            }
            LikelihoodError::InvalidDegreesOfFreedom { dof, n_params } => write!(
                f,
                "Goodness of fit needs dof > n_params (dof = {dof}, n_params = {n_params})"
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<LikelihoodError> for PyErr {
    fn from(err: LikelihoodError) -> PyErr {
        PyValueError::new_err(format!("LikelihoodError: {err}"))
    }
}
