//! optimization — best-fit refinement of a sampled posterior.
//!
//! Purpose
//! -------
//! Polish the highest-posterior point found by the sampler with an
//! Argmin-backed Nelder–Mead search, so reported best-fit values and
//! χ²_min do not depend on how finely the chain happened to visit the
//! peak.
//!
//! Key behaviors
//! -------------
//! - [`adapter::PosteriorCost`] turns ln p(θ) into the Argmin cost -ln p(θ),
//!   walling off the prior box with +∞.
//! - [`refine::refine_best_fit`] and [`refine::refine_from_chain`] run the
//!   solver and return a [`refine::BestFit`].
//! - Backend and posterior failures are normalized into
//!   [`errors::OptError`] with the `OptResult<T>` alias.
//!
//! Conventions
//! -----------
//! - Solvers minimize the cost internally; every user-facing value is
//!   expressed as a log posterior.
//! - With the `obs_slog` feature, `RefineOptions::verbose` attaches Argmin's
//!   terminal slog observer.

pub mod adapter;
pub mod errors;
pub mod refine;

pub use self::adapter::PosteriorCost;
pub use self::errors::{OptError, OptResult};
pub use self::refine::{BestFit, RefineOptions, refine_best_fit, refine_from_chain};

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::refine::{BestFit, RefineOptions, refine_best_fit, refine_from_chain};
}
