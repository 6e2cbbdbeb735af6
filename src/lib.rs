//! lgpd_cosmo — phenomenological modified-gravity cosmology with Python
//! bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the core pipeline to Python via the `_lgpd_cosmo` extension
//! module. The pipeline maps a handful of phenomenological parameters
//! (decoherence damping, clustering μ, lensing Σ) onto modifications of a
//! baseline CMB power spectrum, scores the result against observational
//! data, samples the posterior and checks convergence.
//!
//! Key behaviors
//! -------------
//! - [`transfer`]: parameter records, transfer functions and the
//!   [`TransferBundle`](transfer::TransferBundle).
//! - [`spectra`]: channel-keyed spectrum sets and the modulator.
//! - [`likelihood`]: datasets and the multi-probe χ² aggregator.
//! - [`cosmology`]: background distances and linear growth used by the
//!   BAO, SNe and growth blocks.
//! - [`mcmc`]: box priors, the sampling engine and chains.
//! - [`diagnostics`]: autocorrelation time, R̂, effective sample size and
//!   convergence reports.
//! - [`optimization`]: Nelder–Mead refinement of the best sample.
//! - With `python-bindings`, `#[pyfunction]` wrappers are registered under
//!   `lgpd_cosmo.spectra` and `lgpd_cosmo.inference`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion and error mapping.
//! - The library never installs a `tracing` subscriber; warnings about
//!   sampler fallback or unavailable diagnostics reach whatever subscriber
//!   the host application sets up.
//!
//! Conventions
//! -----------
//! - Errors from core Rust code are rich per-module enums internally and
//!   are converted to `ValueError` at the PyO3 boundary.
//! - Python exceptions raised inside a user log-likelihood are captured and
//!   re-raised unchanged after the sampler stops.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   end-to-end tests under `tests/`.

pub mod cosmology;
pub mod diagnostics;
pub mod likelihood;
pub mod mcmc;
pub mod optimization;
pub mod spectra;
pub mod transfer;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::cell::RefCell;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    prelude::*,
    types::{PyAny, PyDict, PyList},
};

#[cfg(feature = "python-bindings")]
use crate::{
    diagnostics::{ess, rhat},
    mcmc::engine::{self, Theta},
    spectra::modulator,
    utils::{
        build_priors, build_sampler_options, build_transfer_bundle, extract_matrix,
        extract_spectrum_set, extract_vector,
    },
};

/// Apply transfer-function modifications to a baseline spectrum set.
///
/// Parameters
/// ----------
/// - `ell`: multipole grid, strictly increasing and positive.
/// - `spectra`: `{"TT": array, "TE": array, ...}` on the same grid.
/// - `damping_amplitude`, `clustering_amplitude`, `lensing_amplitude`:
///   amplitudes of the fiducial parameter records; all default to 0, which
///   returns the baseline unchanged.
///
/// Returns a new dict with the same channel keys.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        ell, spectra, damping_amplitude = None, clustering_amplitude = None,
        lensing_amplitude = None
    ),
    text_signature = "(ell, spectra, /, damping_amplitude=None, clustering_amplitude=None, \
                      lensing_amplitude=None)"
)]
pub fn apply_modifications<'py>(
    py: Python<'py>, ell: &Bound<'py, PyAny>, spectra: &Bound<'py, PyDict>,
    damping_amplitude: Option<f64>, clustering_amplitude: Option<f64>,
    lensing_amplitude: Option<f64>,
) -> PyResult<Bound<'py, PyDict>> {
    let baseline = extract_spectrum_set(py, ell, spectra)?;
    let bundle = build_transfer_bundle(damping_amplitude, clustering_amplitude, lensing_amplitude);
    let modified = modulator::apply_modifications(&baseline, &bundle);

    let out = PyDict::new(py);
    for (channel, values) in modified.channels() {
        out.set_item(channel.as_str(), values.clone().into_pyarray(py))?;
    }
    Ok(out)
}

/// Sample the posterior of a Python log-likelihood under box priors.
///
/// The callable receives a 1-D float64 array and must return a float, or
/// `-inf` for invalid points. An exception raised by the callable stops the
/// run and is re-raised here.
///
/// Returns `(samples, log_prob, provenance)` with `provenance` either
/// `"ensemble"` or `"prior-scan"`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        loglike, theta0, priors, nwalkers = None, nsteps = None, nburn = None, seed = None
    ),
    text_signature = "(loglike, theta0, priors, /, nwalkers=None, nsteps=None, nburn=None, \
                      seed=None)"
)]
pub fn run_mcmc<'py>(
    py: Python<'py>, loglike: &Bound<'py, PyAny>, theta0: &Bound<'py, PyAny>,
    priors: Vec<(f64, f64)>, nwalkers: Option<usize>, nsteps: Option<usize>,
    nburn: Option<usize>, seed: Option<u64>,
) -> PyResult<(Bound<'py, PyArray2<f64>>, Bound<'py, PyArray1<f64>>, String)> {
    let theta0 = extract_vector(py, theta0, "theta0")?;
    let priors = build_priors(priors)?;
    let options = build_sampler_options(nwalkers, nsteps, nburn, seed)?;

    // The callback must return f64, so the first Python error is parked here
    // and NaN aborts the sampler.
    let raised: RefCell<Option<PyErr>> = RefCell::new(None);
    let callback = |theta: &Theta| -> f64 {
        if raised.borrow().is_some() {
            return f64::NAN;
        }
        let arg = theta.to_vec().into_pyarray(py);
        match loglike.call1((arg,)).and_then(|v| v.extract::<f64>()) {
            Ok(value) => value,
            Err(err) => {
                raised.replace(Some(err));
                f64::NAN
            }
        }
    };

    let result = engine::run_mcmc(&callback, &theta0, &priors, options);
    if let Some(err) = raised.take() {
        return Err(err);
    }
    let chain = result?;
    let provenance = if chain.provenance().is_markov() { "ensemble" } else { "prior-scan" };
    Ok((
        chain.samples().clone().into_pyarray(py),
        chain.log_prob().clone().into_pyarray(py),
        provenance.to_string(),
    ))
}

/// Gelman–Rubin R̂ of one quantity across a list of 1-D chains.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (chains), text_signature = "(chains, /)")]
pub fn gelman_rubin<'py>(py: Python<'py>, chains: &Bound<'py, PyList>) -> PyResult<f64> {
    let owned = chains
        .iter()
        .map(|c| extract_vector(py, &c, "chain"))
        .collect::<PyResult<Vec<_>>>()?;
    let views: Vec<_> = owned.iter().map(|c| c.view()).collect();
    Ok(rhat::gelman_rubin(&views)?)
}

/// Two-halves R̂ for every column of an `n × ndim` sample array.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (samples), text_signature = "(samples, /)")]
pub fn split_rhat<'py>(samples: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let samples = extract_matrix(samples, "samples")?;
    Ok(rhat::split_rhat_columns(samples.view())?.to_vec())
}

/// N / (2τ); τ defaults to 20 (heuristic, logged) when omitted.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (n, tau = None), text_signature = "(n, /, tau=None)")]
pub fn effective_sample_size(n: usize, tau: Option<f64>) -> PyResult<f64> {
    Ok(ess::effective_sample_size(n, tau)?.n_eff)
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _lgpd_cosmo<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let spectra_mod = PyModule::new(_py, "spectra")?;
    let inference_mod = PyModule::new(_py, "inference")?;
    spectra_functions(_py, m, &spectra_mod)?;
    inference_functions(_py, m, &inference_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("lgpd_cosmo.spectra", spectra_mod)?;
    _py.import("sys")?.getattr("modules")?.set_item("lgpd_cosmo.inference", inference_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn spectra_functions<'py>(
    _py: Python, lgpd_cosmo: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(apply_modifications, m)?)?;
    lgpd_cosmo.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn inference_functions<'py>(
    _py: Python, lgpd_cosmo: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(run_mcmc, m)?)?;
    m.add_function(wrap_pyfunction!(gelman_rubin, m)?)?;
    m.add_function(wrap_pyfunction!(split_rhat, m)?)?;
    m.add_function(wrap_pyfunction!(effective_sample_size, m)?)?;
    lgpd_cosmo.add_submodule(m)?;
    Ok(())
}
