//! diagnostics::ess — effective sample size N / (2τ).
//!
//! When no autocorrelation time is supplied, τ = 20 is used. That value is
//! a rough heuristic, not a measurement: the result is tagged
//! [`TauSource::Default`] and a warning is logged every time.

use crate::diagnostics::errors::{DiagnosticsError, DiagnosticsResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Heuristic τ used when no estimate is available.
pub const DEFAULT_TAU: f64 = 20.0;

/// Where the τ behind an effective sample size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TauSource {
    /// Estimated from the chain.
    Estimated,
    /// Supplied by the caller.
    Supplied,
    /// [`DEFAULT_TAU`]; treat the result as indicative only.
    Default,
    /// Independent draws; N_eff = N.
    Independent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSampleSize {
    pub n_eff: f64,
    pub tau: f64,
    pub source: TauSource,
}

impl EffectiveSampleSize {
    pub fn is_heuristic(&self) -> bool {
        self.source == TauSource::Default
    }
}

/// N / (2τ), with τ = [`DEFAULT_TAU`] when `tau` is `None`.
///
/// Errors
/// ------
/// - `InvalidTau` if a supplied τ is not finite and positive.
pub fn effective_sample_size(n: usize, tau: Option<f64>) -> DiagnosticsResult<EffectiveSampleSize> {
    let (tau, source) = match tau {
        Some(t) if t.is_finite() && t > 0.0 => (t, TauSource::Supplied),
        Some(t) => return Err(DiagnosticsError::InvalidTau { tau: t }),
        None => {
            warn!(
                tau = DEFAULT_TAU,
                "no autocorrelation time supplied; effective sample size uses a heuristic default"
            );
            (DEFAULT_TAU, TauSource::Default)
        }
    };
    Ok(EffectiveSampleSize { n_eff: n as f64 / (2.0 * tau), tau, source })
}

/// N_eff = N for independent draws.
pub fn independent_sample_size(n: usize) -> EffectiveSampleSize {
    EffectiveSampleSize { n_eff: n as f64, tau: 1.0, source: TauSource::Independent }
}
