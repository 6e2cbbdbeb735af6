//! diagnostics — convergence diagnostics for sampler output.
//!
//! Purpose
//! -------
//! Post-hoc checks on chains produced by `mcmc`: integrated
//! autocorrelation time, Gelman–Rubin R̂ (multi-chain, split and
//! segmented), effective sample size and a per-parameter report.
//!
//! Key behaviors
//! -------------
//! - A diagnostic that cannot be computed is an explicit
//!   [`DiagnosticsError`] (single chain for R̂, constant or too-short
//!   series for τ), logged with `warn!`, and never a fabricated number.
//! - Prior-scan chains are refused by Markov-chain diagnostics with
//!   [`DiagnosticsError::NotMarkovChain`].
//! - [`effective_sample_size`] without a τ estimate uses the τ = 20
//!   heuristic and tags the result.
//!
//! Testing notes
//! -------------
//! - Estimators are checked against white noise and AR(1) processes with
//!   known τ, and R̂ against same/different-distribution chains.

pub mod autocorr;
pub mod errors;
pub mod ess;
pub mod report;
pub mod rhat;

pub use self::autocorr::{
    DEFAULT_TOLERANCE, DEFAULT_WINDOW_C, autocorrelation_function, chain_autocorrelation_times,
    ensemble_integrated_time, integrated_time, parameter_integrated_time,
};
pub use self::errors::{DiagnosticsError, DiagnosticsResult};
pub use self::ess::{
    DEFAULT_TAU, EffectiveSampleSize, TauSource, effective_sample_size, independent_sample_size,
};
pub use self::report::{ConvergenceReport, LogProbStats, ParameterDiagnostics, Verdict};
pub use self::rhat::{
    gelman_rubin, gelman_rubin_columns, segmented_rhat, split_rhat, split_rhat_columns,
};

pub mod prelude {
    pub use super::autocorr::integrated_time;
    pub use super::errors::{DiagnosticsError, DiagnosticsResult};
    pub use super::ess::effective_sample_size;
    pub use super::report::ConvergenceReport;
    pub use super::rhat::{gelman_rubin, split_rhat};
}
