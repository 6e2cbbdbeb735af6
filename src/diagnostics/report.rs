//! diagnostics::report — per-parameter convergence summary of a chain.
//!
//! Purpose
//! -------
//! Collect the usual convergence numbers for every parameter of a
//! [`Chain`]: median, standard deviation, integrated autocorrelation time,
//! effective sample size and R̂, plus log-probability statistics and
//! overall verdicts.
//!
//! Key behaviors
//! -------------
//! - τ comes from the ensemble estimator with the default tolerance. If it
//!   cannot be computed, τ is `None`, a warning is logged, and N_eff falls
//!   back to the heuristic τ = 20 (tagged as such).
//! - R̂ splits the flattened chain into 4 contiguous segments, and is only
//!   reported when each segment holds more than 100 samples.
//! - Prior-scan chains report τ and R̂ as unavailable and N_eff = N.
//!
//! Conventions
//! -----------
//! - Standard deviations use ddof = 0; N_eff = N_total / (2τ).
//! - Verdict thresholds: R̂ < 1.01 excellent, < 1.05 good; N_eff > 1000
//!   excellent, > 400 good.

use crate::{
    diagnostics::{
        autocorr::{DEFAULT_TOLERANCE, parameter_integrated_time},
        errors::{DiagnosticsError, DiagnosticsResult},
        ess::{EffectiveSampleSize, TauSource, effective_sample_size, independent_sample_size},
        rhat::segmented_rhat,
    },
    mcmc::chain::{Chain, ChainProvenance, percentile_sorted},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

const RHAT_SEGMENTS: usize = 4;
const MIN_SEGMENT_LEN: usize = 100;

/// Convergence quality bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Excellent,
    Good,
    Warning,
}

impl Verdict {
    pub fn from_rhat(rhat: f64) -> Self {
        if rhat < 1.01 {
            Verdict::Excellent
        } else if rhat < 1.05 {
            Verdict::Good
        } else {
            Verdict::Warning
        }
    }

    pub fn from_ess(n_eff: f64) -> Self {
        if n_eff > 1000.0 {
            Verdict::Excellent
        } else if n_eff > 400.0 {
            Verdict::Good
        } else {
            Verdict::Warning
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Excellent => f.write_str("EXCELLENT"),
            Verdict::Good => f.write_str("GOOD"),
            Verdict::Warning => f.write_str("WARNING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDiagnostics {
    pub name: String,
    pub median: f64,
    pub std: f64,
    /// `None` when the autocorrelation time is unavailable.
    pub tau: Option<f64>,
    pub ess: EffectiveSampleSize,
    /// `None` when R̂ is unavailable.
    pub rhat: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogProbStats {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub provenance: ChainProvenance,
    pub n_samples: usize,
    pub parameters: Vec<ParameterDiagnostics>,
    pub log_prob: LogProbStats,
}

impl ConvergenceReport {
    /// Build the report.
    ///
    /// Errors
    /// ------
    /// - `EmptySeries` for an empty chain. Individual diagnostics that
    ///   cannot be computed are `None`, not errors.
    pub fn from_chain(chain: &Chain) -> DiagnosticsResult<Self> {
        if chain.is_empty() {
            return Err(DiagnosticsError::EmptySeries);
        }
        let n = chain.len();
        let markov = chain.provenance().is_markov();
        if !markov {
            warn!("prior-scan chain: autocorrelation time and R-hat reported as unavailable");
        }

        let rhat = if markov {
            segmented_rhat(chain.samples().view(), RHAT_SEGMENTS, MIN_SEGMENT_LEN).ok()
        } else {
            None
        };

        let mut parameters = Vec::with_capacity(chain.ndim());
        for (j, name) in chain.param_names().into_iter().enumerate() {
            let column = chain.parameter(j);
            let mut sorted = column.to_vec();
            sorted.sort_by(f64::total_cmp);

            let (tau, ess) = if markov {
                match parameter_integrated_time(chain, j, DEFAULT_TOLERANCE) {
                    Ok(tau) => {
                        let ess = EffectiveSampleSize {
                            n_eff: n as f64 / (2.0 * tau),
                            tau,
                            source: TauSource::Estimated,
                        };
                        (Some(tau), ess)
                    }
                    Err(err) => {
                        warn!(parameter = %name, %err, "autocorrelation time unavailable");
                        (None, effective_sample_size(n, None)?)
                    }
                }
            } else {
                (None, independent_sample_size(n))
            };

            parameters.push(ParameterDiagnostics {
                name,
                median: percentile_sorted(&sorted, 50.0),
                std: column.std(0.0),
                tau,
                ess,
                rhat: rhat.as_ref().map(|r| r[j]),
            });
        }

        let lp = chain.log_prob();
        let log_prob = LogProbStats {
            mean: lp.sum() / n as f64,
            max: lp.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: lp.iter().copied().fold(f64::INFINITY, f64::min),
        };

        Ok(ConvergenceReport { provenance: chain.provenance(), n_samples: n, parameters, log_prob })
    }

    pub fn max_rhat(&self) -> Option<f64> {
        let rhats = self.parameters.iter().map(|p| p.rhat).collect::<Option<Vec<f64>>>()?;
        rhats.into_iter().reduce(f64::max)
    }

    pub fn min_ess(&self) -> Option<f64> {
        self.parameters.iter().map(|p| p.ess.n_eff).reduce(f64::min)
    }

    pub fn rhat_verdict(&self) -> Option<Verdict> {
        self.max_rhat().map(Verdict::from_rhat)
    }

    pub fn ess_verdict(&self) -> Option<Verdict> {
        self.min_ess().map(Verdict::from_ess)
    }
}

impl fmt::Display for ConvergenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MCMC convergence diagnostics ({})", self.provenance)?;
        writeln!(f, "Total samples: {}", self.n_samples)?;
        writeln!(
            f,
            "{:<15} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Parameter", "Median", "Std", "tau_int", "N_eff", "R-hat"
        )?;
        for p in &self.parameters {
            let tau = p.tau.map_or_else(|| "N/A".to_string(), |t| format!("{t:.1}"));
            let rhat = p.rhat.map_or_else(|| "N/A".to_string(), |r| format!("{r:.4}"));
            let marker = if p.ess.is_heuristic() { "*" } else { "" };
            writeln!(
                f,
                "{:<15} {:>10.4} {:>10.4} {:>10} {:>9.0}{marker:1} {:>10}",
                p.name, p.median, p.std, tau, p.ess.n_eff, rhat
            )?;
        }
        if let (Some(r), Some(v)) = (self.max_rhat(), self.rhat_verdict()) {
            writeln!(f, "Max R-hat = {r:.4} -> {v}")?;
        }
        if let (Some(n), Some(v)) = (self.min_ess(), self.ess_verdict()) {
            writeln!(f, "Min N_eff = {n:.0} -> {v}")?;
        }
        if self.parameters.iter().any(|p| p.ess.is_heuristic()) {
            writeln!(f, "* N_eff uses the default tau = 20 heuristic")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - A well-mixed ensemble chain: every diagnostic present, verdicts good.
    // - A prior-scan chain: τ and R̂ unavailable, N_eff = N.
    // - A short chain: R̂ unavailable.
    // -------------------------------------------------------------------------

    fn white_chain(nsteps: usize, nwalkers: usize, provenance: ChainProvenance) -> Chain {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(99);
        let n = nsteps * nwalkers;
        let samples = Array2::from_shape_fn((n, 2), |(_, j)| {
            let e: f64 = StandardNormal.sample(&mut rng);
            j as f64 + e
        });
        let log_prob: Array1<f64> = samples.rows().into_iter().map(|r| -0.5 * r.dot(&r)).collect();
        Chain::new(samples, log_prob, provenance, nwalkers).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Independent draws labelled as an ensemble chain look perfectly mixed.
    //
    // Given
    // -----
    // - 2000 steps × 8 walkers of N(j, 1) noise for parameters j = 0, 1.
    //
    // Expect
    // ------
    // - τ ≈ 1, R̂ ≈ 1, medians ≈ j, both verdicts excellent.
    fn mixed_ensemble_chain_reports_everything() {
        // Arrange
        let chain = white_chain(2_000, 8, ChainProvenance::EnsembleMarkov);

        // Act
        let report = ConvergenceReport::from_chain(&chain).unwrap();

        // Assert
        assert_eq!(report.n_samples, 16_000);
        for (j, p) in report.parameters.iter().enumerate() {
            assert_eq!(p.name, format!("p{j}"));
            assert!((p.median - j as f64).abs() < 0.05);
            assert!((p.std - 1.0).abs() < 0.05);
            assert!((p.tau.unwrap() - 1.0).abs() < 0.3);
            assert_eq!(p.ess.source, TauSource::Estimated);
            assert!((p.rhat.unwrap() - 1.0).abs() < 0.01);
        }
        assert_eq!(report.ess_verdict(), Some(Verdict::Excellent));
        assert_eq!(report.rhat_verdict(), Some(Verdict::Excellent));
        assert!(report.log_prob.max >= report.log_prob.mean);
        assert!(report.to_string().contains("Max R-hat"));
    }

    #[test]
    // Purpose
    // -------
    // Prior-scan chains never report τ or R̂.
    fn prior_scan_chain_reports_unavailable() {
        let chain = white_chain(3_000, 1, ChainProvenance::IndependentPriorScan);

        let report = ConvergenceReport::from_chain(&chain).unwrap();

        assert!(report.parameters.iter().all(|p| p.tau.is_none() && p.rhat.is_none()));
        assert!(report.parameters.iter().all(|p| p.ess.source == TauSource::Independent));
        assert_eq!(report.max_rhat(), None);
        assert!(report.to_string().contains("N/A"));
    }

    #[test]
    // Purpose
    // -------
    // With 4 × 100 samples or fewer, R̂ is unavailable.
    fn short_chain_has_no_rhat() {
        let chain = white_chain(50, 8, ChainProvenance::EnsembleMarkov);

        let report = ConvergenceReport::from_chain(&chain).unwrap();

        assert!(report.parameters.iter().all(|p| p.rhat.is_none()));
        assert_eq!(report.rhat_verdict(), None);
    }

    #[test]
    // Purpose
    // -------
    // Verdict thresholds are strict on the excellent/good boundaries.
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_rhat(1.009), Verdict::Excellent);
        assert_eq!(Verdict::from_rhat(1.01), Verdict::Good);
        assert_eq!(Verdict::from_rhat(1.05), Verdict::Warning);
        assert_eq!(Verdict::from_ess(1000.0), Verdict::Good);
        assert_eq!(Verdict::from_ess(400.0), Verdict::Warning);
    }
}
