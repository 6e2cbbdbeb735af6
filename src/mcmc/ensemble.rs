//! mcmc::ensemble — affine-invariant ensemble sampler (stretch move).
//!
//! Purpose
//! -------
//! Goodman & Weare (2010) stretch-move ensemble, with the red/blue split
//! used by `emcee`: walkers are split into two halves, and each walker in
//! the active half proposes a move along the line through a randomly
//! chosen walker of the other half.
//!
//! Key behaviors
//! -------------
//! - Walker starts: θ₀ + `init_scatter` · N(0, 1), independently per walker
//!   and per dimension.
//! - Proposal: y = x_j + z (x_k - x_j), with z drawn from
//!   g(z) ∝ 1/√z on [1/a, a] via z = ((a-1)u + 1)² / a.
//! - Acceptance: ln r < (ndim - 1) ln z + ln p(y) - ln p(x_k).
//! - Proposals outside the prior box get ln p = -∞ without a likelihood
//!   call and are always rejected.
//! - The first `nburn` steps are discarded; the rest are flattened
//!   step-major into the returned chain.
//!
//! Invariants & assumptions
//! ------------------------
//! - `nwalkers ≥ 2·ndim` and `nburn < nsteps`, checked up front.
//! - The complementary half is frozen while the active half updates, so the
//!   order of walkers within a half does not change the target
//!   distribution.

use crate::mcmc::{
    chain::{Chain, ChainProvenance},
    engine::{LogLikelihood, SamplingStrategy, StrategyKind, Theta, log_posterior},
    errors::{McmcError, McmcResult},
    options::SamplerOptions,
    priors::BoxPriors,
};
use ndarray::{Array1, Array2, s};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, warn};

/// Stretch-move ensemble strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsembleSampler;

impl SamplingStrategy for EnsembleSampler {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ensemble
    }

    fn sample(
        &self, loglike: &dyn LogLikelihood, theta0: &Theta, priors: &BoxPriors,
        options: &SamplerOptions, rng: &mut Xoshiro256PlusPlus,
    ) -> McmcResult<Chain> {
        let ndim = theta0.len();
        let nwalkers = options.nwalkers;
        if nwalkers < 2 * ndim {
            return Err(McmcError::TooFewWalkers { nwalkers, ndim });
        }
        if options.nburn >= options.nsteps {
            return Err(McmcError::BurnInTooLong { nburn: options.nburn, nsteps: options.nsteps });
        }

        let mut positions = Array2::from_shape_fn((nwalkers, ndim), |(_, j)| {
            let noise: f64 = StandardNormal.sample(rng);
            theta0[j] + options.init_scatter * noise
        });
        let mut log_probs = Array1::zeros(nwalkers);
        for k in 0..nwalkers {
            log_probs[k] = log_posterior(loglike, priors, &positions.row(k).to_owned())?;
        }
        let outside = log_probs.iter().filter(|v: &&f64| !v.is_finite()).count();
        if outside > 0 {
            warn!(outside, nwalkers, "some initial walkers start with a -inf log posterior");
        }

        let retained = options.nsteps - options.nburn;
        let mut samples = Array2::zeros((retained * nwalkers, ndim));
        let mut sample_log_prob = Array1::zeros(retained * nwalkers);
        let mut accepted = vec![0usize; nwalkers];
        let halves: [Vec<usize>; 2] = [
            (0..nwalkers).step_by(2).collect(),
            (1..nwalkers).step_by(2).collect(),
        ];
        let a = options.stretch_scale;
        let ndim_f = ndim as f64;

        for step in 0..options.nsteps {
            for half in 0..2 {
                let (active, other) = (&halves[half], &halves[1 - half]);
                for &k in active {
                    let j = other[rng.random_range(0..other.len())];
                    let u: f64 = rng.random();
                    let z = ((a - 1.0) * u + 1.0).powi(2) / a;
                    let proposal: Theta =
                        &positions.row(j) + &((&positions.row(k) - &positions.row(j)) * z);
                    let lp_new = log_posterior(loglike, priors, &proposal)?;
                    let log_ratio = (ndim_f - 1.0) * z.ln() + lp_new - log_probs[k];
                    let r: f64 = rng.random();
                    if r.ln() < log_ratio {
                        positions.row_mut(k).assign(&proposal);
                        log_probs[k] = lp_new;
                        accepted[k] += 1;
                    }
                }
            }
            if step >= options.nburn {
                let start = (step - options.nburn) * nwalkers;
                samples.slice_mut(s![start..start + nwalkers, ..]).assign(&positions);
                sample_log_prob.slice_mut(s![start..start + nwalkers]).assign(&log_probs);
            }
        }

        let acceptance: Array1<f64> =
            accepted.iter().map(|&n| n as f64 / options.nsteps as f64).collect();
        debug!(
            mean_acceptance = acceptance.mean().unwrap_or(f64::NAN),
            retained,
            "ensemble run complete"
        );
        Chain::new(samples, sample_log_prob, ChainProvenance::EnsembleMarkov, nwalkers)?
            .with_acceptance(acceptance)
    }
}
