//! spectra::spectrum_set — validated multipole grid with per-channel spectra.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ell` is non-empty, finite, non-negative and strictly increasing.
//! - Every channel array has exactly `ell.len()` entries.
//! - Channel values themselves are not checked; a baseline may legitimately
//!   carry zeros (e.g. BB) or negative values (TE).
//!
//! Conventions
//! -----------
//! - Values are stored in the C_ℓ convention. Conversion to band powers is
//!   done by `spectra::modulator::{cl_to_dl, dl_to_cl}`.
//! - Channels are kept in a `BTreeMap`, so iteration order is the fixed
//!   `Channel` order (TT, TE, EE, BB, PP) regardless of insertion order.

use crate::spectra::{
    channel::Channel,
    errors::{SpectrumError, SpectrumResult},
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSet {
    ell: Array1<f64>,
    channels: BTreeMap<Channel, Array1<f64>>,
}

impl SpectrumSet {
    /// Create an empty set over a validated multipole grid.
    ///
    /// Errors
    /// ------
    /// - `EmptyMultipoles` for an empty grid.
    /// - `InvalidMultipole` for non-finite or negative entries.
    /// - `NonMonotoneMultipoles` when the grid is not strictly increasing.
    pub fn new(ell: Array1<f64>) -> SpectrumResult<Self> {
        validate_multipoles(&ell)?;
        Ok(Self { ell, channels: BTreeMap::new() })
    }

    /// Build a set from a grid and `(channel, values)` pairs.
    pub fn from_channels<I>(ell: Array1<f64>, channels: I) -> SpectrumResult<Self>
    where
        I: IntoIterator<Item = (Channel, Array1<f64>)>,
    {
        let mut set = Self::new(ell)?;
        for (channel, values) in channels {
            set.insert(channel, values)?;
        }
        Ok(set)
    }

    /// Insert or replace a channel.
    ///
    /// Errors
    /// ------
    /// - `ChannelLengthMismatch` when `values.len() != ell.len()`.
    pub fn insert(&mut self, channel: Channel, values: Array1<f64>) -> SpectrumResult<()> {
        if values.len() != self.ell.len() {
            return Err(SpectrumError::ChannelLengthMismatch {
                channel,
                expected: self.ell.len(),
                actual: values.len(),
            });
        }
        self.channels.insert(channel, values);
        Ok(())
    }

    pub fn with_channel(mut self, channel: Channel, values: Array1<f64>) -> SpectrumResult<Self> {
        self.insert(channel, values)?;
        Ok(self)
    }

    pub fn ell(&self) -> &Array1<f64> {
        &self.ell
    }

    pub fn get(&self, channel: Channel) -> Option<&Array1<f64>> {
        self.channels.get(&channel)
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.channels.contains_key(&channel)
    }

    pub fn channels(&self) -> impl Iterator<Item = (Channel, &Array1<f64>)> {
        self.channels.iter().map(|(c, v)| (*c, v))
    }

    pub fn channel_labels(&self) -> Vec<Channel> {
        self.channels.keys().copied().collect()
    }

    /// Number of multipoles.
    pub fn len(&self) -> usize {
        self.ell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ell.is_empty()
    }

    /// Build a new set on the same grid by mapping every channel.
    ///
    /// The closure must return an array of the grid's length; this is an
    /// internal invariant of the modulator and is not re-validated.
    pub(crate) fn map_channels<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Channel, &Array1<f64>) -> Array1<f64>,
    {
        let channels = self.channels.iter().map(|(c, v)| (*c, f(*c, v))).collect();
        Self { ell: self.ell.clone(), channels }
    }
}

fn validate_multipoles(ell: &Array1<f64>) -> SpectrumResult<()> {
    if ell.is_empty() {
        return Err(SpectrumError::EmptyMultipoles);
    }
    for (index, &value) in ell.iter().enumerate() {
        if !value.is_finite() {
            return Err(SpectrumError::InvalidMultipole { index, value, reason: "must be finite" });
        }
        if value < 0.0 {
            return Err(SpectrumError::InvalidMultipole {
                index,
                value,
                reason: "must be non-negative",
            });
        }
    }
    for (index, pair) in ell.windows(2).into_iter().enumerate() {
        if pair[1] <= pair[0] {
            return Err(SpectrumError::NonMonotoneMultipoles {
                index: index + 1,
                previous: pair[0],
                value: pair[1],
            });
        }
    }
    Ok(())
}
