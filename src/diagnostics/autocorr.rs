//! diagnostics::autocorr — FFT autocorrelation and integrated
//! autocorrelation time.
//!
//! Purpose
//! -------
//! Estimate how many sampler steps separate effectively independent
//! samples. Follows the estimator popularized by `emcee`: the normalized
//! ACF is computed by FFT, τ(M) = 1 + 2 Σ_{t=1}^{M} ρ(t), and the window M
//! is chosen with Sokal's rule, the smallest M with M ≥ c·τ(M).
//!
//! Key behaviors
//! -------------
//! - [`autocorrelation_function`]: normalized ACF of one series, ρ(0) = 1.
//! - [`integrated_time`]: τ for one series.
//! - [`ensemble_integrated_time`]: ACF averaged across walkers before
//!   windowing, with a length check N ≥ tolerance·τ.
//! - [`chain_autocorrelation_times`]: τ per parameter of an ensemble chain.
//!
//! Invariants & assumptions
//! ------------------------
//! - Series are zero-padded to twice the next power of two, so the
//!   circular correlation equals the linear one.
//! - A constant series has no defined ACF and yields `Unavailable`.

use crate::{
    diagnostics::errors::{DiagnosticsError, DiagnosticsResult},
    mcmc::chain::Chain,
};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rustfft::{FftPlanner, num_complex::Complex};

/// Sokal window constant.
pub const DEFAULT_WINDOW_C: f64 = 5.0;

/// Minimum chain length in units of τ before τ is trusted.
pub const DEFAULT_TOLERANCE: f64 = 50.0;

/// Normalized autocorrelation function ρ(t), t = 0..n.
///
/// Errors
/// ------
/// - `EmptySeries`, `NonFiniteInput`.
/// - `Unavailable` when the series has zero variance.
pub fn autocorrelation_function(x: ArrayView1<'_, f64>) -> DiagnosticsResult<Array1<f64>> {
    let n = x.len();
    if n == 0 {
        return Err(DiagnosticsError::EmptySeries);
    }
    if let Some((index, &value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(DiagnosticsError::NonFiniteInput { index, value });
    }
    let mean = x.sum() / n as f64;
    let size = 2 * n.next_power_of_two();
    let mut buffer: Vec<Complex<f64>> = x
        .iter()
        .map(|&v| Complex::new(v - mean, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(size)
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(size).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(size).process(&mut buffer);

    let c0 = buffer[0].re;
    if !(c0 > 0.0) {
        return Err(DiagnosticsError::Unavailable {
            diagnostic: "autocorrelation function",
            reason: "series has zero variance",
        });
    }
    Ok(buffer[..n].iter().map(|c| c.re / c0).collect())
}

/// First window M with M ≥ c·τ(M), or the last index.
fn auto_window(taus: &[f64], c: f64) -> usize {
    taus.iter()
        .enumerate()
        .position(|(m, &tau)| (m as f64) >= c * tau)
        .unwrap_or(taus.len().saturating_sub(1))
}

fn windowed_tau(acf: ArrayView1<'_, f64>, c: f64) -> f64 {
    let mut running = 0.0;
    let taus: Vec<f64> = acf
        .iter()
        .map(|&rho| {
            running += rho;
            2.0 * running - 1.0
        })
        .collect();
    taus[auto_window(&taus, c)]
}

/// Integrated autocorrelation time of one series.
pub fn integrated_time(x: ArrayView1<'_, f64>, c: f64) -> DiagnosticsResult<f64> {
    let acf = autocorrelation_function(x)?;
    Ok(windowed_tau(acf.view(), c))
}

/// Integrated autocorrelation time of an ensemble, `walkers` being
/// `nsteps × nwalkers`.
///
/// The per-walker ACFs are averaged before the window is applied.
///
/// Errors
/// ------
/// - Any error of [`autocorrelation_function`] for a single walker.
/// - `ChainTooShort` if `tolerance > 0` and `nsteps < tolerance · τ`.
pub fn ensemble_integrated_time(
    walkers: ArrayView2<'_, f64>, c: f64, tolerance: f64,
) -> DiagnosticsResult<f64> {
    let (nsteps, nwalkers) = walkers.dim();
    if nsteps == 0 || nwalkers == 0 {
        return Err(DiagnosticsError::EmptySeries);
    }
    let mut mean_acf = Array1::<f64>::zeros(nsteps);
    for series in walkers.axis_iter(Axis(1)) {
        mean_acf += &autocorrelation_function(series)?;
    }
    mean_acf /= nwalkers as f64;

    let tau = windowed_tau(mean_acf.view(), c);
    if tolerance > 0.0 && (nsteps as f64) < tolerance * tau {
        return Err(DiagnosticsError::ChainTooShort { n: nsteps, tau, tolerance });
    }
    Ok(tau)
}

/// τ of parameter `index` of an ensemble chain, in steps per walker.
///
/// Errors
/// ------
/// - `NotMarkovChain` for prior-scan chains.
pub fn parameter_integrated_time(
    chain: &Chain, index: usize, tolerance: f64,
) -> DiagnosticsResult<f64> {
    if !chain.provenance().is_markov() {
        return Err(DiagnosticsError::NotMarkovChain);
    }
    let walkers = chain.parameter_by_walker(index);
    ensemble_integrated_time(walkers.view(), DEFAULT_WINDOW_C, tolerance)
}

/// τ for every parameter; fails if any parameter fails.
pub fn chain_autocorrelation_times(
    chain: &Chain, tolerance: f64,
) -> DiagnosticsResult<Array1<f64>> {
    (0..chain.ndim()).map(|j| parameter_integrated_time(chain, j, tolerance)).collect()
}
