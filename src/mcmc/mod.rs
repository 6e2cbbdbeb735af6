//! mcmc — box priors, sampler options, sampling strategies and chains.
//!
//! Purpose
//! -------
//! Sample the posterior of a caller-supplied log-likelihood under flat box
//! priors. The algorithm is a pluggable [`SamplingStrategy`] driven by
//! [`McmcEngine`]; results come back as a [`Chain`] that records which
//! algorithm produced it.
//!
//! Key behaviors
//! -------------
//! - [`ensemble`] (feature `ensemble`, on by default): affine-invariant
//!   stretch-move ensemble.
//! - [`prior_scan`]: independent uniform draws from the prior box, used as
//!   the degraded fallback. Its chains are tagged
//!   [`ChainProvenance::IndependentPriorScan`] so convergence diagnostics
//!   can refuse them.
//! - [`chain`]: flattened samples plus log posterior, per-walker views,
//!   posterior summaries and AIC/BIC.
//!
//! Invariants & assumptions
//! ------------------------
//! - Out-of-box points never reach the log-likelihood.
//! - NaN or +∞ from the log-likelihood inside the box is an error.
//! - Seeded options reproduce a run bit for bit.
//!
//! Testing notes
//! -------------
//! - The ensemble sampler is checked on a Gaussian target with a fixed
//!   seed; the prior scan on box coverage and sample count.

pub mod chain;
pub mod engine;
#[cfg(feature = "ensemble")]
pub mod ensemble;
pub mod errors;
pub mod options;
pub mod prior_scan;
pub mod priors;

pub use self::chain::{Chain, ChainProvenance, ModelComparison, ParameterSummary};
pub use self::engine::{
    LogLikelihood, McmcEngine, SamplingStrategy, StrategyKind, Theta, log_posterior, run_mcmc,
};
#[cfg(feature = "ensemble")]
pub use self::ensemble::EnsembleSampler;
pub use self::errors::{McmcError, McmcResult};
pub use self::options::SamplerOptions;
pub use self::prior_scan::PriorScanSampler;
pub use self::priors::BoxPriors;

pub mod prelude {
    pub use super::chain::{Chain, ChainProvenance};
    pub use super::engine::{LogLikelihood, McmcEngine, Theta, run_mcmc};
    pub use super::errors::{McmcError, McmcResult};
    pub use super::options::SamplerOptions;
    pub use super::priors::BoxPriors;
}
