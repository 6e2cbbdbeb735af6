//! spectra::errors — validation failures for spectrum sets.
//!
//! A [`SpectrumSet`](super::SpectrumSet) is validated once, at construction
//! or insertion; the modulator then works on trusted data and cannot fail.

use crate::spectra::channel::Channel;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SpectrumResult<T> = Result<T, SpectrumError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SpectrumError {
    /// The multipole array is empty.
    EmptyMultipoles,

    /// A multipole is NaN/±inf or negative.
    InvalidMultipole { index: usize, value: f64, reason: &'static str },

    /// Multipoles must be strictly increasing.
    NonMonotoneMultipoles { index: usize, previous: f64, value: f64 },

    /// A channel's length differs from the multipole array's length.
    ChannelLengthMismatch { channel: Channel, expected: usize, actual: usize },

    /// A channel label could not be parsed.
    UnknownChannel { label: String },
}

impl std::error::Error for SpectrumError {}

impl std::fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpectrumError::EmptyMultipoles => write!(f, "Multipole array must be non-empty"),
            SpectrumError::InvalidMultipole { index, value, reason } => {
                write!(f, "Invalid multipole at index {index}: {value} ({reason})")
            }
            SpectrumError::NonMonotoneMultipoles { index, previous, value } => write!(
                f,
                "Multipoles must be strictly increasing: ell[{index}] = {value} follows {previous}"
            ),
            SpectrumError::ChannelLengthMismatch { channel, expected, actual } => write!(
                f,
                "Channel {channel} has {actual} values but the multipole array has {expected}"
            ),
            SpectrumError::UnknownChannel { label } => {
                write!(f, "Unknown spectrum channel label: {label:?}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SpectrumError> for PyErr {
    fn from(err: SpectrumError) -> PyErr {
        PyValueError::new_err(format!("SpectrumError: {err}"))
    }
}
