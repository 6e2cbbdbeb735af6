//! diagnostics::errors — failures and "unavailable" outcomes of
//! convergence diagnostics.
//!
//! A diagnostic that cannot be computed is reported as an error value, not
//! as a placeholder number. Callers that want a best-effort report convert
//! these into `None` (see `diagnostics::report`).

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type DiagnosticsResult<T> = Result<T, DiagnosticsError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticsError {
    /// The diagnostic is undefined for this input.
    Unavailable { diagnostic: &'static str, reason: &'static str },

    /// Between-chain statistics need at least `required` chains.
    InsufficientChains { found: usize, required: usize },

    /// Empty input series.
    EmptySeries,

    /// NaN or ±∞ in an input series.
    NonFiniteInput { index: usize, value: f64 },

    /// The chain is shorter than `tolerance · tau` steps, so `tau` is not
    /// trustworthy.
    ChainTooShort { n: usize, tau: f64, tolerance: f64 },

    /// Autocorrelation and R-hat are meaningless for independent draws.
    NotMarkovChain,

    /// A supplied autocorrelation time is not finite and positive.
    InvalidTau { tau: f64 },
}

impl std::error::Error for DiagnosticsError {}

impl std::fmt::Display for DiagnosticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticsError::Unavailable { diagnostic, reason } => {
                write!(f, "{diagnostic} unavailable: {reason}")
            }
            DiagnosticsError::InsufficientChains { found, required } => {
                write!(f, "At least {required} chains are required, got {found}")
            }
            DiagnosticsError::EmptySeries => write!(f, "Series contains no samples"),
            DiagnosticsError::NonFiniteInput { index, value } => {
                write!(f, "Non-finite sample at index {index}: {value}")
            }
            DiagnosticsError::ChainTooShort { n, tau, tolerance } => write!(
                f,
                "Chain of {n} steps is shorter than {tolerance} times the autocorrelation time \
                 estimate tau = {tau:.2}"
            ),
            DiagnosticsError::NotMarkovChain => write!(
                f,
                "Chain consists of independent prior draws; Markov-chain diagnostics do not apply"
            ),
            DiagnosticsError::InvalidTau { tau } => {
                write!(f, "Autocorrelation time must be finite and positive, got {tau}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DiagnosticsError> for PyErr {
    fn from(err: DiagnosticsError) -> PyErr {
        PyValueError::new_err(format!("DiagnosticsError: {err}"))
    }
}
