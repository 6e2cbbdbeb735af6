//! mcmc::errors — configuration and contract failures of the sampler.
//!
//! Prior violations are not errors: they are represented as a -∞ log
//! posterior inside the sampling loop. Errors here are configuration
//! mistakes (bad priors, bad options, dimension mismatches) and breaches of
//! the log-likelihood contract (NaN or +∞ returned).

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type McmcResult<T> = Result<T, McmcError>;

#[derive(Debug, Clone, PartialEq)]
pub enum McmcError {
    /// No parameters to sample.
    EmptyParameters,

    /// `theta0` and the prior list disagree in dimension.
    DimensionMismatch { theta0: usize, priors: usize },

    /// A prior interval is non-finite or reversed.
    InvalidPrior { index: usize, low: f64, high: f64, reason: &'static str },

    /// A sampler option is out of range.
    InvalidOption { name: &'static str, value: f64, reason: &'static str },

    /// The ensemble move needs at least 2·ndim walkers.
    TooFewWalkers { nwalkers: usize, ndim: usize },

    /// Burn-in must leave at least one retained step.
    BurnInTooLong { nburn: usize, nsteps: usize },

    /// The log-likelihood returned NaN or +∞ instead of a finite value or -∞.
    InvalidLogLikelihood { value: f64, theta: Vec<f64> },

    /// Parallel chain arrays disagree in length.
    LengthMismatch { what: &'static str, expected: usize, actual: usize },

    /// A chain operation needs at least one sample.
    EmptyChain,
}

impl std::error::Error for McmcError {}

impl std::fmt::Display for McmcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            McmcError::EmptyParameters => write!(f, "At least one parameter is required"),
            McmcError::DimensionMismatch { theta0, priors } => write!(
                f,
                "Initial vector has {theta0} entries but {priors} prior intervals were given"
            ),
            McmcError::InvalidPrior { index, low, high, reason } => {
                write!(f, "Invalid prior {index} = ({low}, {high}): {reason}")
            }
            McmcError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid sampler option {name} = {value}: {reason}")
            }
            McmcError::TooFewWalkers { nwalkers, ndim } => write!(
                f,
                "Ensemble sampling needs at least {} walkers for {ndim} parameters, got {nwalkers}",
                2 * ndim
            ),
            McmcError::BurnInTooLong { nburn, nsteps } => {
                write!(f, "Burn-in ({nburn}) must be shorter than the run ({nsteps} steps)")
            }
            McmcError::InvalidLogLikelihood { value, theta } => write!(
                f,
                "Log-likelihood returned {value} at theta = {theta:?}; use -inf for invalid points"
            ),
            McmcError::LengthMismatch { what, expected, actual } => {
                write!(f, "Length mismatch for {what}: expected {expected}, got {actual}")
            }
            McmcError::EmptyChain => write!(f, "Chain contains no samples"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<McmcError> for PyErr {
    fn from(err: McmcError) -> PyErr {
        PyValueError::new_err(format!("McmcError: {err}"))
    }
}
