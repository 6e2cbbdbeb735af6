//! mcmc::priors — flat box priors.
//!
//! ln π(θ) = 0 when every θᵢ lies in its closed interval [lowᵢ, highᵢ], and
//! -∞ otherwise. Bounds must be finite so the prior scan can draw uniformly
//! from the box.

use crate::mcmc::{
    engine::Theta,
    errors::{McmcError, McmcResult},
};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPriors {
    bounds: Vec<(f64, f64)>,
}

impl BoxPriors {
    /// Errors
    /// ------
    /// - `EmptyParameters` for an empty list.
    /// - `InvalidPrior` for non-finite bounds or `low > high`.
    pub fn new(bounds: Vec<(f64, f64)>) -> McmcResult<Self> {
        if bounds.is_empty() {
            return Err(McmcError::EmptyParameters);
        }
        for (index, &(low, high)) in bounds.iter().enumerate() {
            if !low.is_finite() || !high.is_finite() {
                return Err(McmcError::InvalidPrior {
                    index,
                    low,
                    high,
                    reason: "bounds must be finite",
                });
            }
            if low > high {
                return Err(McmcError::InvalidPrior {
                    index,
                    low,
                    high,
                    reason: "low exceeds high",
                });
            }
        }
        Ok(Self { bounds })
    }

    pub fn ndim(&self) -> usize {
        self.bounds.len()
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub fn width(&self, index: usize) -> f64 {
        let (low, high) = self.bounds[index];
        high - low
    }

    /// True when every coordinate lies in its closed interval.
    ///
    /// A dimension mismatch, or a NaN coordinate, is outside.
    pub fn contains(&self, theta: &Theta) -> bool {
        theta.len() == self.bounds.len()
            && theta.iter().zip(&self.bounds).all(|(&v, &(low, high))| low <= v && v <= high)
    }

    /// 0 inside the box, -∞ outside.
    pub fn log_prior(&self, theta: &Theta) -> f64 {
        if self.contains(theta) { 0.0 } else { f64::NEG_INFINITY }
    }

    /// One uniform draw from the box.
    pub fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Theta {
        self.bounds.iter().map(|&(low, high)| rng.random_range(low..=high)).collect()
    }

    /// Project θ onto the box.
    pub fn clamp(&self, theta: &Theta) -> Theta {
        theta.iter().zip(&self.bounds).map(|(&v, &(low, high))| v.clamp(low, high)).collect()
    }
}
