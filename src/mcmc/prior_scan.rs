//! mcmc::prior_scan — plain Monte Carlo scan of the prior box.
//!
//! Independent uniform draws from the box, each scored with the log
//! posterior, until `max(nwalkers·nsteps/2, min_scan_samples)` draws are
//! collected. The output is not a Markov chain: samples are mutually
//! independent and the chain is tagged `IndependentPriorScan`, with
//! `nwalkers = 1` and no acceptance fractions.

use crate::mcmc::{
    chain::{Chain, ChainProvenance},
    engine::{LogLikelihood, SamplingStrategy, StrategyKind, Theta, log_posterior},
    errors::McmcResult,
    options::SamplerOptions,
    priors::BoxPriors,
};
use ndarray::{Array1, Array2};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Fallback strategy: independent draws from the prior box.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorScanSampler;

impl SamplingStrategy for PriorScanSampler {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PriorScan
    }

    fn sample(
        &self, loglike: &dyn LogLikelihood, theta0: &Theta, priors: &BoxPriors,
        options: &SamplerOptions, rng: &mut Xoshiro256PlusPlus,
    ) -> McmcResult<Chain> {
        let target = options.scan_target();
        let mut samples = Array2::zeros((target, theta0.len()));
        let mut log_prob = Array1::zeros(target);
        let mut accepted = 0;
        while accepted < target {
            let theta = priors.sample_uniform(rng);
            // Uniform draws always land inside; the check keeps the
            // reject-then-evaluate order explicit.
            if !priors.contains(&theta) {
                continue;
            }
            log_prob[accepted] = log_posterior(loglike, priors, &theta)?;
            samples.row_mut(accepted).assign(&theta);
            accepted += 1;
        }
        Chain::new(samples, log_prob, ChainProvenance::IndependentPriorScan, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcmc::errors::McmcError;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    // Purpose
    // -------
    // Every draw lies in [0, 1] and the count meets the target.
    //
    // Given
    // -----
    // - priors = [(0, 1)], θ₀ = [0.5], 24 walkers × 500 steps.
    //
    // Expect
    // ------
    // - At least max(24·500/2, 2000) = 6000 samples, all inside the box.
    fn draws_stay_in_box_and_meet_target() {
        // Arrange
        let priors = BoxPriors::new(vec![(0.0, 1.0)]).unwrap();
        let loglike = |t: &Theta| -0.5 * ((t[0] - 0.3) / 0.1).powi(2);
        let opts = SamplerOptions::with_run(24, 500, 200).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        // Act
        let chain =
            PriorScanSampler.sample(&loglike, &array![0.5], &priors, &opts, &mut rng).unwrap();

        // Assert
        assert!(chain.len() >= 6000);
        assert!(chain.samples().iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(chain.provenance(), ChainProvenance::IndependentPriorScan);
        assert!(chain.acceptance_fraction().is_none());
        let (best, _) = chain.best().unwrap();
        assert!((best[0] - 0.3).abs() < 0.01);
    }

    #[test]
    // Purpose
    // -------
    // A NaN from the likelihood aborts the scan.
    fn nan_likelihood_aborts() {
        let priors = BoxPriors::new(vec![(0.0, 1.0)]).unwrap();
        let loglike = |_: &Theta| f64::NAN;
        let opts = SamplerOptions::with_run(2, 2, 0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        let result = PriorScanSampler.sample(&loglike, &array![0.5], &priors, &opts, &mut rng);

        assert!(matches!(result, Err(McmcError::InvalidLogLikelihood { .. })));
    }
}
