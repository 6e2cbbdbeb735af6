//! Adapter that exposes a log posterior as an `argmin` cost.
//!
//! Maximizing ln p(θ) = ln π(θ) + ln L(θ) is turned into minimizing
//! c(θ) = -ln p(θ). Points outside the prior box, and points where the
//! likelihood reports -∞, cost +∞; Nelder–Mead ranks them last and never
//! needs a gradient. Contract breaches (NaN or +∞ likelihood) become
//! `OptError::Posterior` and abort the run.

use crate::{
    mcmc::{
        engine::{LogLikelihood, Theta, log_posterior},
        priors::BoxPriors,
    },
    optimization::errors::OptError,
};
use argmin::core::{CostFunction, Error};

/// Bridges a [`LogLikelihood`] and its prior box to `argmin`'s
/// `CostFunction`.
pub struct PosteriorCost<'a, L: LogLikelihood> {
    pub loglike: &'a L,
    pub priors: &'a BoxPriors,
}

impl<'a, L: LogLikelihood> PosteriorCost<'a, L> {
    pub fn new(loglike: &'a L, priors: &'a BoxPriors) -> Self {
        Self { loglike, priors }
    }
}

impl<L: LogLikelihood> CostFunction for PosteriorCost<'_, L> {
    type Param = Theta;
    type Output = f64;

    /// Evaluate `c(θ) = -ln p(θ)`.
    ///
    /// # Errors
    /// Returns `OptError::Posterior` if the likelihood returns NaN or +∞.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let lp = log_posterior(self.loglike, self.priors, theta).map_err(OptError::from)?;
        Ok(-lp)
    }
}
