//! mcmc::engine — sampling strategies and the engine that drives them.
//!
//! Purpose
//! -------
//! Explore parameter space for a caller-supplied log-likelihood under flat
//! box priors and return a [`Chain`]. The sampling algorithm is an injected
//! [`SamplingStrategy`] chosen at construction time:
//!
//! - [`EnsembleSampler`](super::ensemble::EnsembleSampler): affine-invariant
//!   stretch-move ensemble (requires the `ensemble` cargo feature).
//! - [`PriorScanSampler`](super::prior_scan::PriorScanSampler): independent
//!   uniform draws from the prior box; the fallback when the ensemble
//!   sampler is not compiled in.
//!
//! Log-likelihood contract
//! -----------------------
//! Implementations of [`LogLikelihood`] must:
//! - return a finite value for valid parameter combinations;
//! - return `f64::NEG_INFINITY` for physically invalid combinations
//!   (negative rates, models that cannot be evaluated, ...);
//! - never panic and never return NaN or +∞ for points inside the prior
//!   box. A NaN or +∞ aborts the run with
//!   [`McmcError::InvalidLogLikelihood`].
//!
//! Points outside the prior box get a -∞ log posterior without the
//! log-likelihood ever being called.
//!
//! Determinism
//! -----------
//! A seeded [`SamplerOptions`] gives reproducible runs. Without a seed the
//! generator is seeded from the thread-local RNG.

#[cfg(feature = "ensemble")]
use crate::mcmc::ensemble::EnsembleSampler;
#[cfg(any(test, not(feature = "ensemble")))]
use crate::mcmc::prior_scan::PriorScanSampler;
use crate::mcmc::{
    chain::Chain,
    errors::{McmcError, McmcResult},
    options::SamplerOptions,
    priors::BoxPriors,
};
use ndarray::Array1;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::fmt;
use tracing::{debug, warn};

/// Parameter vector.
pub type Theta = Array1<f64>;

/// Scalar log-likelihood ln L(θ).
///
/// Any `Fn(&Theta) -> f64` is a `LogLikelihood`. See the module docs for
/// the -∞ contract.
pub trait LogLikelihood {
    fn log_likelihood(&self, theta: &Theta) -> f64;
}

impl<F> LogLikelihood for F
where
    F: Fn(&Theta) -> f64,
{
    fn log_likelihood(&self, theta: &Theta) -> f64 {
        self(theta)
    }
}

/// ln π(θ) + ln L(θ), short-circuiting outside the prior box.
///
/// Errors
/// ------
/// - `InvalidLogLikelihood` if the likelihood returns NaN or +∞.
pub fn log_posterior(
    loglike: &dyn LogLikelihood, priors: &BoxPriors, theta: &Theta,
) -> McmcResult<f64> {
    let lp = priors.log_prior(theta);
    if !lp.is_finite() {
        return Ok(f64::NEG_INFINITY);
    }
    let ll = loglike.log_likelihood(theta);
    if ll.is_nan() || ll == f64::INFINITY {
        return Err(McmcError::InvalidLogLikelihood { value: ll, theta: theta.to_vec() });
    }
    Ok(lp + ll)
}

/// Which algorithm produced (or will produce) a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Ensemble,
    PriorScan,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Ensemble => f.write_str("ensemble"),
            StrategyKind::PriorScan => f.write_str("prior-scan"),
        }
    }
}

/// A sampling algorithm.
pub trait SamplingStrategy {
    fn kind(&self) -> StrategyKind;

    /// Run the algorithm. Dimensions are already validated by the engine.
    fn sample(
        &self, loglike: &dyn LogLikelihood, theta0: &Theta, priors: &BoxPriors,
        options: &SamplerOptions, rng: &mut Xoshiro256PlusPlus,
    ) -> McmcResult<Chain>;
}

/// Drives a [`SamplingStrategy`] with fixed options.
pub struct McmcEngine {
    strategy: Box<dyn SamplingStrategy>,
    options: SamplerOptions,
}

impl McmcEngine {
    /// Engine with the best strategy compiled in.
    ///
    /// With the `ensemble` feature this is the ensemble sampler. Without it
    /// the engine degrades to the prior scan and logs a warning; chains then
    /// carry `IndependentPriorScan` provenance.
    pub fn new(options: SamplerOptions) -> Self {
        Self { strategy: default_strategy(), options }
    }

    /// Engine with an explicit strategy.
    pub fn with_strategy(strategy: Box<dyn SamplingStrategy>, options: SamplerOptions) -> Self {
        Self { strategy, options }
    }

    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Sample with a generator built from the options' seed.
    pub fn run<L: LogLikelihood>(
        &self, loglike: &L, theta0: &Theta, priors: &BoxPriors,
    ) -> McmcResult<Chain> {
        let mut rng = self.options.make_rng();
        self.run_with_rng(loglike, theta0, priors, &mut rng)
    }

    /// Sample with a caller-owned generator.
    ///
    /// Errors
    /// ------
    /// - `DimensionMismatch` when `theta0` and `priors` differ in length.
    /// - Strategy-specific configuration errors and
    ///   `InvalidLogLikelihood`.
    pub fn run_with_rng<L: LogLikelihood>(
        &self, loglike: &L, theta0: &Theta, priors: &BoxPriors, rng: &mut Xoshiro256PlusPlus,
    ) -> McmcResult<Chain> {
        if theta0.len() != priors.ndim() {
            return Err(McmcError::DimensionMismatch {
                theta0: theta0.len(),
                priors: priors.ndim(),
            });
        }
        let kind = self.strategy.kind();
        debug!(strategy = %kind, ndim = priors.ndim(), "starting sampler");
        let chain = self.strategy.sample(loglike, theta0, priors, &self.options, rng)?;
        debug!(
            strategy = %kind,
            samples = chain.len(),
            acceptance = chain.mean_acceptance().unwrap_or(f64::NAN),
            "sampler finished"
        );
        if !chain.provenance().is_markov() {
            warn!("chain holds independent prior draws; Markov-chain diagnostics do not apply");
        }
        Ok(chain)
    }
}

/// Convenience wrapper: `McmcEngine::new(options).run(...)`.
pub fn run_mcmc<L: LogLikelihood>(
    loglike: &L, theta0: &Theta, priors: &BoxPriors, options: SamplerOptions,
) -> McmcResult<Chain> {
    McmcEngine::new(options).run(loglike, theta0, priors)
}

#[cfg(feature = "ensemble")]
fn default_strategy() -> Box<dyn SamplingStrategy> {
    Box::new(EnsembleSampler)
}

#[cfg(not(feature = "ensemble"))]
fn default_strategy() -> Box<dyn SamplingStrategy> {
    warn!("ensemble sampler not compiled in (feature `ensemble`); falling back to prior scan");
    Box::new(PriorScanSampler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcmc::chain::ChainProvenance;
    use ndarray::array;
    use std::cell::Cell;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The prior short-circuit in `log_posterior`.
    // - The NaN contract breach.
    // - Strategy selection/injection and dimension validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Outside the box the likelihood is never called.
    //
    // Given
    // -----
    // - A likelihood that counts its calls.
    //
    // Expect
    // ------
    // - One call for the inside point, none for the outside point.
    fn log_posterior_skips_likelihood_outside_prior() {
        // Arrange
        let calls = Cell::new(0usize);
        let loglike = |theta: &Theta| {
            calls.set(calls.get() + 1);
            -0.5 * theta[0] * theta[0]
        };
        let priors = BoxPriors::new(vec![(-1.0, 1.0)]).unwrap();

        // Act
        let inside = log_posterior(&loglike, &priors, &array![0.5]).unwrap();
        let outside = log_posterior(&loglike, &priors, &array![1.5]).unwrap();

        // Assert
        assert!((inside + 0.125).abs() < 1e-15);
        assert_eq!(outside, f64::NEG_INFINITY);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    // Purpose
    // -------
    // NaN from the likelihood is a contract breach; -∞ is not.
    fn log_posterior_rejects_nan_but_accepts_neg_inf() {
        let priors = BoxPriors::new(vec![(0.0, 1.0)]).unwrap();
        let nan = |_: &Theta| f64::NAN;
        let neg_inf = |_: &Theta| f64::NEG_INFINITY;

        assert!(matches!(
            log_posterior(&nan, &priors, &array![0.5]),
            Err(McmcError::InvalidLogLikelihood { .. })
        ));
        assert_eq!(log_posterior(&neg_inf, &priors, &array![0.5]).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // An injected strategy is reported and used; dimension mismatches fail
    // before sampling.
    fn injected_strategy_is_reported_and_used() {
        // Arrange
        let options = SamplerOptions::with_run(4, 10, 0).unwrap().seeded(1);
        let engine = McmcEngine::with_strategy(Box::new(PriorScanSampler), options);
        let priors = BoxPriors::new(vec![(0.0, 1.0)]).unwrap();
        let loglike = |_: &Theta| 0.0;

        // Act
        let chain = engine.run(&loglike, &array![0.5], &priors).unwrap();
        let mismatch = engine.run(&loglike, &array![0.5, 0.5], &priors);

        // Assert
        assert_eq!(engine.strategy_kind(), StrategyKind::PriorScan);
        assert_eq!(chain.provenance(), ChainProvenance::IndependentPriorScan);
        assert!(matches!(mismatch, Err(McmcError::DimensionMismatch { theta0: 2, priors: 1 })));
    }

    #[cfg(feature = "ensemble")]
    #[test]
    // Purpose
    // -------
    // With the `ensemble` feature the default engine uses the ensemble
    // sampler.
    fn default_engine_uses_ensemble_when_compiled_in() {
        let engine = McmcEngine::new(SamplerOptions::default());
        assert_eq!(engine.strategy_kind(), StrategyKind::Ensemble);
    }

    #[cfg(not(feature = "ensemble"))]
    #[test]
    // Purpose
    // -------
    // Without the `ensemble` feature the default engine degrades to the
    // prior scan.
    fn default_engine_falls_back_to_prior_scan() {
        let engine = McmcEngine::new(SamplerOptions::default());
        assert_eq!(engine.strategy_kind(), StrategyKind::PriorScan);
    }
}
