//! cosmology::errors — invalid background parameters and evaluation points.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type CosmologyResult<T> = Result<T, CosmologyError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CosmologyError {
    /// A background parameter is non-finite or out of range.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// Distances are defined for z ≥ 0 only.
    InvalidRedshift { z: f64 },

    /// Growth is defined for finite a > 0 only.
    InvalidScaleFactor { a: f64 },
}

impl std::error::Error for CosmologyError {}

impl std::fmt::Display for CosmologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CosmologyError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid cosmological parameter {name} = {value}: {reason}")
            }
            CosmologyError::InvalidRedshift { z } => {
                write!(f, "Redshift must be finite and non-negative, got {z}")
            }
            CosmologyError::InvalidScaleFactor { a } => {
                write!(f, "Scale factor must be finite and positive, got {a}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<CosmologyError> for PyErr {
    fn from(err: CosmologyError) -> PyErr {
        PyValueError::new_err(format!("CosmologyError: {err}"))
    }
}
