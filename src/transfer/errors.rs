//! transfer::errors — configuration failures for the transfer layer.
//!
//! The transfer functions themselves are pure arithmetic and never fail;
//! the only fallible surface is [`ModulationConfig`](super::bundle::ModulationConfig)
//! construction, where a fixed phenomenological constant is rejected before it
//! can silently poison every spectrum evaluation.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type TransferResult<T> = Result<T, TransferError>;

/// Error conditions for transfer-bundle configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferError {
    /// A modulation constant is non-finite or outside its admissible range.
    InvalidConstant { name: &'static str, value: f64, reason: &'static str },
}

impl std::error::Error for TransferError {}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferError::InvalidConstant { name, value, reason } => {
                write!(f, "Invalid modulation constant {name} = {value}: {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<TransferError> for PyErr {
    fn from(err: TransferError) -> PyErr {
        PyValueError::new_err(format!("TransferError: {err}"))
    }
}
