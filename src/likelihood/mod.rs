//! likelihood — observational datasets and multi-probe χ² aggregation.
//!
//! Purpose
//! -------
//! Compare model predictions against binned CMB bandpowers and
//! redshift-indexed BAO, SNe and growth measurements, accumulating a total
//! χ² with per-block provenance.
//!
//! Key behaviors
//! -------------
//! - [`dataset`]: validated three-column datasets.
//! - [`interp`]: linear interpolation returning NaN outside model support.
//! - [`covariance`]: rᵀC⁻¹r with a pseudo-inverse fallback.
//! - [`aggregator`]: [`LikelihoodAggregator`] and [`ChiSquareSummary`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration errors fail fast with a [`LikelihoodError`].
//! - Numerical masking is not an error; it shows up only as a reduced dof
//!   count in the block provenance.
//!
//! Testing notes
//! -------------
//! - The masking boundary (inclusive support endpoints, σ = 0) is covered
//!   explicitly in `aggregator` tests.

pub mod aggregator;
pub mod covariance;
pub mod dataset;
pub mod errors;
pub mod interp;

pub use self::aggregator::{BlockContribution, ChiSquareSummary, LikelihoodAggregator, Probe};
pub use self::covariance::covariance_chi2;
pub use self::dataset::{BandpowerData, RedshiftData};
pub use self::errors::{LikelihoodError, LikelihoodResult};
pub use self::interp::interp_or_nan;

pub mod prelude {
    pub use super::aggregator::{ChiSquareSummary, LikelihoodAggregator, Probe};
    pub use super::dataset::{BandpowerData, RedshiftData};
    pub use super::errors::{LikelihoodError, LikelihoodResult};
}
