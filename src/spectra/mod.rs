//! spectra — spectrum sets and the spectrum modulator.
//!
//! Purpose
//! -------
//! Hold baseline CMB angular power spectra on a validated multipole grid
//! and apply the decoherence damping, lensing and clustering modifications
//! carried by a [`TransferBundle`](crate::transfer::TransferBundle).
//!
//! Key behaviors
//! -------------
//! - [`SpectrumSet`] validates its grid and channel lengths up front.
//! - [`apply_modifications`] is a pure function returning a new set.
//!
//! Conventions
//! -----------
//! - Stored values use the C_ℓ convention; D_ℓ is only an intermediate.
//! - Channels: TT, TE, EE, BB, PP (lensing potential).
//!
//! Testing notes
//! -------------
//! - GR recovery, composition order and the ℓ-mask boundary are tested in
//!   `modulator`; grid validation in `spectrum_set`.

pub mod channel;
pub mod errors;
pub mod modulator;
pub mod spectrum_set;

pub use self::channel::Channel;
pub use self::errors::{SpectrumError, SpectrumResult};
pub use self::modulator::{apply_modifications, cl_to_dl, dl_to_cl, modulation_factor, window};
pub use self::spectrum_set::SpectrumSet;

pub mod prelude {
    pub use super::channel::Channel;
    pub use super::errors::{SpectrumError, SpectrumResult};
    pub use super::modulator::apply_modifications;
    pub use super::spectrum_set::SpectrumSet;
}
