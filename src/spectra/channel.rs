//! Polarization-channel labels for angular power spectra.

use crate::spectra::errors::SpectrumError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Spectrum channel: temperature/E/B auto- and cross-spectra plus the
/// lensing potential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    TT,
    TE,
    EE,
    BB,
    PP,
}

impl Channel {
    pub const ALL: [Channel; 5] = [Channel::TT, Channel::TE, Channel::EE, Channel::BB, Channel::PP];

    /// Channels that receive the high-ℓ lensing-amplitude factor.
    pub fn is_lensing_modulated(self) -> bool {
        matches!(self, Channel::TT | Channel::EE)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::TT => "TT",
            Channel::TE => "TE",
            Channel::EE => "EE",
            Channel::BB => "BB",
            Channel::PP => "PP",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = SpectrumError;

    /// Case-insensitive; `"PHIPHI"` is accepted as an alias for `PP`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TT" => Ok(Channel::TT),
            "TE" => Ok(Channel::TE),
            "EE" => Ok(Channel::EE),
            "BB" => Ok(Channel::BB),
            "PP" | "PHIPHI" => Ok(Channel::PP),
            _ => Err(SpectrumError::UnknownChannel { label: s.to_string() }),
        }
    }
}
