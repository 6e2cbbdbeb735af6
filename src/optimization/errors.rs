//! optimization::errors — configuration, posterior and backend failures of
//! best-fit refinement.

use crate::mcmc::errors::McmcError;
use argmin::core::{ArgminError, Error};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for refinement operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- RefineOptions ----
    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: u64, reason: &'static str },

    /// Simplex standard-deviation tolerance needs to be positive and finite.
    InvalidSdTolerance { tol: f64, reason: &'static str },

    /// Initial simplex step needs to be in (0, 1].
    InvalidStepFraction { value: f64, reason: &'static str },

    // ---- Starting point ----
    /// Start vector and prior box disagree in dimension.
    DimensionMismatch { theta0: usize, priors: usize },

    /// Start vector lies outside the prior box.
    StartOutsidePrior { index: usize, value: f64 },

    /// Log posterior at the start is -∞.
    NonFiniteStart { value: f64 },

    // ---- Posterior ----
    /// The log-likelihood broke its contract during refinement.
    Posterior(McmcError),

    // ---- Outcome ----
    /// Solver finished without a best parameter.
    MissingThetaHat,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- RefineOptions ----
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidSdTolerance { tol, reason } => {
                write!(f, "Invalid simplex tolerance {tol}: {reason}")
            }
            OptError::InvalidStepFraction { value, reason } => {
                write!(f, "Invalid initial step fraction {value}: {reason}")
            }

            // ---- Starting point ----
            OptError::DimensionMismatch { theta0, priors } => write!(
                f,
                "Start vector has {theta0} entries but {priors} prior intervals were given"
            ),
            OptError::StartOutsidePrior { index, value } => {
                write!(f, "Start value {value} at index {index} lies outside the prior box")
            }
            OptError::NonFiniteStart { value } => {
                write!(f, "Log posterior at the start point is {value}")
            }

            // ---- Posterior ----
            OptError::Posterior(err) => write!(f, "Posterior evaluation failed: {err}"),

            // ---- Outcome ----
            OptError::MissingThetaHat => write!(f, "Missing best-fit parameters"),

            // ---- Argmin ----
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),

            // ---- Fallback ----
            OptError::UnknownError => write!(f, "Unknown error"),
        }
    }
}

impl From<McmcError> for OptError {
    fn from(err: McmcError) -> Self {
        OptError::Posterior(err)
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(format!("OptError: {err}"))
    }
}
