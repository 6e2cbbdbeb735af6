//! mcmc::chain — flat posterior chains and their post-processing.
//!
//! Purpose
//! -------
//! Hold the output of one sampler run: an `n × ndim` sample matrix, the
//! parallel log-posterior vector, and the provenance needed to decide
//! which convergence diagnostics are meaningful.
//!
//! Key behaviors
//! -------------
//! - [`ChainProvenance`] distinguishes Markov (ensemble) chains from
//!   independent prior-scan draws.
//! - Ensemble chains are flattened step-major: row `s·nwalkers + w` holds
//!   walker `w` at retained step `s`, so per-walker series can be
//!   recovered with [`Chain::walker_series`].
//! - Reporting helpers: [`Chain::best`], [`Chain::posterior_summary`]
//!   (median and 16th/84th percentiles), [`Chain::model_comparison`]
//!   (AIC/BIC from the maximum log posterior) and
//!   [`Chain::map_parameter`] for derived quantities.
//!
//! Invariants & assumptions
//! ------------------------
//! - `samples.nrows() == log_prob.len()`.
//! - For ensemble provenance, `samples.nrows()` is a multiple of
//!   `nwalkers`.
//! - Chains are immutable after construction.
//!
//! Conventions
//! -----------
//! - Percentiles use linear interpolation between order statistics, the
//!   same rule as `numpy.percentile`'s default.
//! - With flat priors the log posterior equals the log likelihood inside
//!   the box, so AIC/BIC use `max(log_prob)` as ln L_max.

use crate::mcmc::errors::{McmcError, McmcResult};
use ndarray::{Array1, Array2, ArrayView1, Axis, s};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a chain was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainProvenance {
    /// Affine-invariant ensemble run; samples are autocorrelated.
    EnsembleMarkov,
    /// Independent uniform draws from the prior box; no Markov structure.
    IndependentPriorScan,
}

impl ChainProvenance {
    pub fn is_markov(self) -> bool {
        matches!(self, ChainProvenance::EnsembleMarkov)
    }
}

impl fmt::Display for ChainProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainProvenance::EnsembleMarkov => f.write_str("ensemble (Markov chain)"),
            ChainProvenance::IndependentPriorScan => f.write_str("prior scan (independent draws)"),
        }
    }
}

/// Median with a 68% central interval for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub name: String,
    pub median: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ParameterSummary {
    /// (median - p16, p84 - median).
    pub fn errors(&self) -> (f64, f64) {
        (self.median - self.lower, self.upper - self.median)
    }
}

/// Information criteria from the best sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub log_like_max: f64,
    pub chi2_min: f64,
    pub n_params: usize,
    pub n_data: usize,
    /// 2k - 2 ln L_max.
    pub aic: f64,
    /// k ln n - 2 ln L_max.
    pub bic: f64,
}

/// Output of one sampler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    samples: Array2<f64>,
    log_prob: Array1<f64>,
    provenance: ChainProvenance,
    nwalkers: usize,
    acceptance_fraction: Option<Array1<f64>>,
    param_names: Option<Vec<String>>,
}

impl Chain {
    /// Errors
    /// ------
    /// - `LengthMismatch` when `log_prob.len() != samples.nrows()`.
    /// - `InvalidOption` when `nwalkers` is zero or does not divide the
    ///   sample count.
    pub fn new(
        samples: Array2<f64>, log_prob: Array1<f64>, provenance: ChainProvenance, nwalkers: usize,
    ) -> McmcResult<Self> {
        if log_prob.len() != samples.nrows() {
            return Err(McmcError::LengthMismatch {
                what: "log_prob",
                expected: samples.nrows(),
                actual: log_prob.len(),
            });
        }
        if nwalkers == 0 || samples.nrows() % nwalkers != 0 {
            return Err(McmcError::InvalidOption {
                name: "nwalkers",
                value: nwalkers as f64,
                reason: "must be positive and divide the sample count",
            });
        }
        Ok(Self {
            samples,
            log_prob,
            provenance,
            nwalkers,
            acceptance_fraction: None,
            param_names: None,
        })
    }

    /// Attach per-walker acceptance fractions.
    pub fn with_acceptance(mut self, acceptance: Array1<f64>) -> McmcResult<Self> {
        if acceptance.len() != self.nwalkers {
            return Err(McmcError::LengthMismatch {
                what: "acceptance fractions",
                expected: self.nwalkers,
                actual: acceptance.len(),
            });
        }
        self.acceptance_fraction = Some(acceptance);
        Ok(self)
    }

    /// Attach parameter labels for reporting.
    pub fn with_names<S: Into<String>>(mut self, names: Vec<S>) -> McmcResult<Self> {
        if names.len() != self.ndim() {
            return Err(McmcError::LengthMismatch {
                what: "parameter names",
                expected: self.ndim(),
                actual: names.len(),
            });
        }
        self.param_names = Some(names.into_iter().map(Into::into).collect());
        Ok(self)
    }

    pub fn samples(&self) -> &Array2<f64> {
        &self.samples
    }

    pub fn log_prob(&self) -> &Array1<f64> {
        &self.log_prob
    }

    pub fn provenance(&self) -> ChainProvenance {
        self.provenance
    }

    pub fn nwalkers(&self) -> usize {
        self.nwalkers
    }

    pub fn len(&self) -> usize {
        self.samples.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.nrows() == 0
    }

    pub fn ndim(&self) -> usize {
        self.samples.ncols()
    }

    /// Retained steps per walker.
    pub fn nsteps(&self) -> usize {
        self.len() / self.nwalkers
    }

    pub fn acceptance_fraction(&self) -> Option<&Array1<f64>> {
        self.acceptance_fraction.as_ref()
    }

    /// Mean acceptance over walkers, when recorded.
    pub fn mean_acceptance(&self) -> Option<f64> {
        self.acceptance_fraction.as_ref().and_then(|a| a.mean())
    }

    /// Labels, defaulting to `p0`, `p1`, ...
    pub fn param_names(&self) -> Vec<String> {
        match &self.param_names {
            Some(names) => names.clone(),
            None => (0..self.ndim()).map(|j| format!("p{j}")).collect(),
        }
    }

    pub fn parameter(&self, index: usize) -> ArrayView1<'_, f64> {
        self.samples.column(index)
    }

    /// `nsteps × ndim` series of one walker.
    pub fn walker_series(&self, walker: usize) -> Array2<f64> {
        self.samples.slice(s![walker..;self.nwalkers, ..]).to_owned()
    }

    /// `nsteps × nwalkers` matrix of one parameter, for ensemble diagnostics.
    pub fn parameter_by_walker(&self, index: usize) -> Array2<f64> {
        let column = self.samples.column(index);
        let nwalkers = self.nwalkers;
        Array2::from_shape_fn((self.nsteps(), nwalkers), |(t, w)| column[t * nwalkers + w])
    }

    /// Sample with the highest log posterior and that value.
    pub fn best(&self) -> McmcResult<(Array1<f64>, f64)> {
        let (idx, &lp) = self
            .log_prob
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(McmcError::EmptyChain)?;
        Ok((self.samples.row(idx).to_owned(), lp))
    }

    /// Median and 16th/84th percentiles per parameter.
    pub fn posterior_summary(&self) -> McmcResult<Vec<ParameterSummary>> {
        if self.is_empty() {
            return Err(McmcError::EmptyChain);
        }
        let names = self.param_names();
        Ok(self
            .samples
            .axis_iter(Axis(1))
            .zip(names)
            .map(|(column, name)| {
                let mut sorted = column.to_vec();
                sorted.sort_by(f64::total_cmp);
                ParameterSummary {
                    name,
                    median: percentile_sorted(&sorted, 50.0),
                    lower: percentile_sorted(&sorted, 16.0),
                    upper: percentile_sorted(&sorted, 84.0),
                }
            })
            .collect())
    }

    /// AIC and BIC from the maximum log posterior.
    pub fn model_comparison(&self, n_data: usize) -> McmcResult<ModelComparison> {
        let (_, log_like_max) = self.best()?;
        let k = self.ndim();
        let chi2_min = -2.0 * log_like_max;
        Ok(ModelComparison {
            log_like_max,
            chi2_min,
            n_params: k,
            n_data,
            aic: 2.0 * k as f64 + chi2_min,
            bic: k as f64 * (n_data as f64).ln() + chi2_min,
        })
    }

    /// Evaluate a derived quantity on every sample.
    pub fn map_parameter<F>(&self, f: F) -> Array1<f64>
    where
        F: Fn(ArrayView1<'_, f64>) -> f64,
    {
        self.samples.axis_iter(Axis(0)).map(f).collect()
    }

    /// Keep the last `nsteps - discard` retained steps of every walker.
    pub fn discard(&self, discard: usize) -> McmcResult<Chain> {
        let steps = self.nsteps();
        if discard >= steps {
            return Err(McmcError::BurnInTooLong { nburn: discard, nsteps: steps });
        }
        let start = discard * self.nwalkers;
        Ok(Chain {
            samples: self.samples.slice(s![start.., ..]).to_owned(),
            log_prob: self.log_prob.slice(s![start..]).to_owned(),
            provenance: self.provenance,
            nwalkers: self.nwalkers,
            acceptance_fraction: self.acceptance_fraction.clone(),
            param_names: self.param_names.clone(),
        })
    }
}

/// Percentile of pre-sorted data with linear interpolation.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q / 100.0 * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let frac = pos - lo as f64;
            sorted[lo] + frac * (sorted[hi] - sorted[lo])
        }
    }
}
