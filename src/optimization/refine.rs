//! optimization::refine — Nelder–Mead polish of a posterior maximum.
//!
//! Purpose
//! -------
//! Sampler output locates the high-posterior region but its best sample is
//! only as good as the chain's resolution. [`refine_best_fit`] runs a
//! derivative-free Nelder–Mead search on -ln p(θ) inside the prior box,
//! starting from a given point; [`refine_from_chain`] starts from the
//! chain's best sample.
//!
//! Key behaviors
//! -------------
//! - The initial simplex is θ₀ plus one vertex per dimension, displaced by
//!   `initial_step_fraction` of the prior width. A displacement that would
//!   leave the box is taken in the opposite direction.
//! - Termination: simplex cost standard deviation below `sd_tolerance`
//!   (converged) or `max_iter` iterations (not converged).
//! - With the `obs_slog` feature and `verbose = true`, argmin's terminal
//!   slog observer reports every iteration.
//!
//! Invariants & assumptions
//! ------------------------
//! - θ₀ lies inside the box with a finite log posterior.
//! - The returned θ is never worse than θ₀.

use crate::{
    mcmc::{
        chain::Chain,
        engine::{LogLikelihood, Theta},
        priors::BoxPriors,
    },
    optimization::{
        adapter::PosteriorCost,
        errors::{OptError, OptResult},
    },
};
use argmin::{
    core::{CostFunction, Executor, State, TerminationReason, TerminationStatus},
    solver::neldermead::NelderMead,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_MAX_ITER: u64 = 2_000;
pub const DEFAULT_SD_TOLERANCE: f64 = 1e-8;
pub const DEFAULT_STEP_FRACTION: f64 = 0.05;

/// Nelder–Mead settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOptions {
    pub max_iter: u64,
    pub sd_tolerance: f64,
    pub initial_step_fraction: f64,
    pub verbose: bool,
}

impl RefineOptions {
    /// Validate and build.
    ///
    /// # Errors
    /// - `InvalidMaxIter` for zero iterations.
    /// - `InvalidSdTolerance` unless finite and positive.
    /// - `InvalidStepFraction` unless in (0, 1].
    pub fn new(
        max_iter: u64, sd_tolerance: f64, initial_step_fraction: f64, verbose: bool,
    ) -> OptResult<Self> {
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        if !sd_tolerance.is_finite() || sd_tolerance <= 0.0 {
            return Err(OptError::InvalidSdTolerance {
                tol: sd_tolerance,
                reason: "Tolerance must be finite and positive.",
            });
        }
        if !(initial_step_fraction > 0.0 && initial_step_fraction <= 1.0) {
            return Err(OptError::InvalidStepFraction {
                value: initial_step_fraction,
                reason: "Step fraction must lie in (0, 1].",
            });
        }
        Ok(Self { max_iter, sd_tolerance, initial_step_fraction, verbose })
    }
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            sd_tolerance: DEFAULT_SD_TOLERANCE,
            initial_step_fraction: DEFAULT_STEP_FRACTION,
            verbose: false,
        }
    }
}

/// Outcome of a refinement.
///
/// - `log_posterior`: ln p at `theta` (not the cost).
/// - `converged`: the simplex met `sd_tolerance` before `max_iter`.
/// - `status`: human-readable termination status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestFit {
    pub theta: Theta,
    pub log_posterior: f64,
    pub iterations: u64,
    pub converged: bool,
    pub status: String,
}

/// Maximize the log posterior from `theta0`.
///
/// # Errors
/// - `DimensionMismatch`, `StartOutsidePrior`, `NonFiniteStart` for a bad
///   start.
/// - `Posterior` if the likelihood breaks its contract.
/// - Backend errors from argmin.
pub fn refine_best_fit<L: LogLikelihood>(
    loglike: &L, theta0: &Theta, priors: &BoxPriors, opts: &RefineOptions,
) -> OptResult<BestFit> {
    if theta0.len() != priors.ndim() {
        return Err(OptError::DimensionMismatch { theta0: theta0.len(), priors: priors.ndim() });
    }
    for (index, (&value, &(lo, hi))) in theta0.iter().zip(priors.bounds()).enumerate() {
        if !(lo..=hi).contains(&value) {
            return Err(OptError::StartOutsidePrior { index, value });
        }
    }
    let problem = PosteriorCost::new(loglike, priors);
    let cost0 = problem.cost(theta0)?;
    if !cost0.is_finite() {
        return Err(OptError::NonFiniteStart { value: -cost0 });
    }

    let simplex = initial_simplex(theta0, priors, opts.initial_step_fraction);
    let solver = NelderMead::new(simplex).with_sd_tolerance(opts.sd_tolerance)?;
    let max_iter = opts.max_iter;
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.max_iters(max_iter));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    #[cfg(not(feature = "obs_slog"))]
    if opts.verbose {
        debug!("verbose refinement requested but the `obs_slog` feature is disabled");
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let termination = result.get_termination_status().clone();
    let best_cost = result.get_best_cost();
    let theta = result.take_best_param().ok_or(OptError::MissingThetaHat)?;

    let converged = matches!(
        termination,
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
    );
    let status = match &termination {
        TerminationStatus::NotTerminated => "Not terminated".to_string(),
        other => format!("{other:?}"),
    };
    debug!(iterations, converged, log_posterior = -best_cost, "refinement finished");
    Ok(BestFit { theta, log_posterior: -best_cost, iterations, converged, status })
}

/// Refine starting from the chain's highest-posterior sample.
///
/// # Errors
/// - `Posterior(EmptyChain)` for an empty chain, otherwise as
///   [`refine_best_fit`].
pub fn refine_from_chain<L: LogLikelihood>(
    loglike: &L, chain: &Chain, priors: &BoxPriors, opts: &RefineOptions,
) -> OptResult<BestFit> {
    let (theta0, _) = chain.best()?;
    refine_best_fit(loglike, &theta0, priors, opts)
}

fn initial_simplex(theta0: &Theta, priors: &BoxPriors, fraction: f64) -> Vec<Theta> {
    let mut simplex = Vec::with_capacity(theta0.len() + 1);
    simplex.push(theta0.clone());
    for (j, &(lo, hi)) in priors.bounds().iter().enumerate() {
        let step = fraction * (hi - lo);
        let mut vertex = theta0.clone();
        vertex[j] = if theta0[j] + step <= hi { theta0[j] + step } else { theta0[j] - step };
        vertex[j] = vertex[j].clamp(lo, hi);
        simplex.push(vertex);
    }
    simplex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcmc::chain::ChainProvenance;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Option validation.
    // - Recovery of a Gaussian peak, including one on the prior edge.
    // - Start-point checks and starting from a chain.
    // -------------------------------------------------------------------------

    fn gaussian(t: &Theta) -> f64 {
        -0.5 * (((t[0] - 0.3) / 0.1).powi(2) + ((t[1] + 1.0) / 0.5).powi(2))
    }

    #[test]
    // Purpose
    // -------
    // Bad options are rejected with the matching variant.
    fn options_validate() {
        let zero_iter = RefineOptions::new(0, 1e-8, 0.1, false);
        let negative_tol = RefineOptions::new(10, -1.0, 0.1, false);
        let wide_step = RefineOptions::new(10, 1e-8, 1.5, false);

        assert!(matches!(zero_iter, Err(OptError::InvalidMaxIter { .. })));
        assert!(matches!(negative_tol, Err(OptError::InvalidSdTolerance { .. })));
        assert!(matches!(wide_step, Err(OptError::InvalidStepFraction { .. })));
        assert_eq!(RefineOptions::default().max_iter, DEFAULT_MAX_ITER);
    }

    #[test]
    // Purpose
    // -------
    // Nelder–Mead finds the peak of a 2-D Gaussian posterior.
    //
    // Given
    // -----
    // - Peak at (0.3, -1.0), box [0, 1] × [-3, 3], start at (0.8, 1.0).
    //
    // Expect
    // ------
    // - Converged, θ within 1e-3 of the peak, ln p ≈ 0.
    fn finds_gaussian_peak() {
        // Arrange
        let priors = BoxPriors::new(vec![(0.0, 1.0), (-3.0, 3.0)]).unwrap();
        let opts = RefineOptions::default();

        // Act
        let fit = refine_best_fit(&gaussian, &array![0.8, 1.0], &priors, &opts).unwrap();

        // Assert
        assert!(fit.converged, "status = {}", fit.status);
        assert!((fit.theta[0] - 0.3).abs() < 1e-3);
        assert!((fit.theta[1] + 1.0).abs() < 1e-3);
        assert!(fit.log_posterior.abs() < 1e-6);
        assert!(fit.iterations > 0);
    }

    #[test]
    // Purpose
    // -------
    // A peak outside the box is pushed against the nearest wall, never past
    // it.
    fn stays_inside_prior_box() {
        let priors = BoxPriors::new(vec![(0.0, 0.2), (-3.0, 3.0)]).unwrap();

        let opts = RefineOptions::default();
        let fit = refine_best_fit(&gaussian, &array![0.1, 0.0], &priors, &opts).unwrap();

        assert!(fit.theta[0] <= 0.2 && fit.theta[0] > 0.18, "theta = {}", fit.theta);
        assert!((fit.theta[1] + 1.0).abs() < 5e-2);
    }

    #[test]
    // Purpose
    // -------
    // Bad starts are rejected; a chain's best sample is a valid start.
    fn start_checks_and_chain_start() {
        let priors = BoxPriors::new(vec![(0.0, 1.0), (-3.0, 3.0)]).unwrap();
        let opts = RefineOptions::default();
        let samples = Array2::from_shape_vec((2, 2), vec![0.9, 2.0, 0.35, -0.8]).unwrap();
        let log_prob: Array1<f64> =
            samples.rows().into_iter().map(|r| gaussian(&r.to_owned())).collect();
        let chain =
            Chain::new(samples, log_prob, ChainProvenance::IndependentPriorScan, 1).unwrap();

        let outside = refine_best_fit(&gaussian, &array![1.5, 0.0], &priors, &opts);
        let mismatch = refine_best_fit(&gaussian, &array![0.5], &priors, &opts);
        let from_chain = refine_from_chain(&gaussian, &chain, &priors, &opts).unwrap();

        assert_eq!(outside.unwrap_err(), OptError::StartOutsidePrior { index: 0, value: 1.5 });
        assert_eq!(mismatch.unwrap_err(), OptError::DimensionMismatch { theta0: 1, priors: 2 });
        assert!((from_chain.theta[0] - 0.3).abs() < 1e-3);
    }
}
