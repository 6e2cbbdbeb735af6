//! cosmology — background expansion and linear growth.
//!
//! Purpose
//! -------
//! Supporting utilities consumed by the BAO, SNe and growth likelihood
//! blocks: distances from a wCDM background ([`background`]) and the linear
//! growth factor with an optional clustering modification ([`growth`]).
//!
//! Conventions
//! -----------
//! - Distances in Mpc; H0 in km/s/Mpc.
//! - Inputs outside the physical domain (z < 0 for distances, a ≤ 0 for
//!   growth) are [`CosmologyError`]s. Likelihood closures are expected to
//!   map them to NaN (masked) or to -∞ for the sampler.

pub mod background;
pub mod errors;
pub mod growth;

pub use self::background::{Lcdm, SPEED_OF_LIGHT, w_eff};
pub use self::errors::{CosmologyError, CosmologyResult};
pub use self::growth::{GrowthModel, GrowthPoint};

pub mod prelude {
    pub use super::background::Lcdm;
    pub use super::errors::{CosmologyError, CosmologyResult};
    pub use super::growth::GrowthModel;
}
