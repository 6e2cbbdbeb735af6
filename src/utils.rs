//! Conversion helpers for the Python bindings.

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::{PyAny, PyDict},
};

#[cfg(feature = "python-bindings")]
use crate::{
    mcmc::{options::SamplerOptions, priors::BoxPriors},
    spectra::{channel::Channel, spectrum_set::SpectrumSet},
    transfer::{
        bundle::TransferBundle,
        params::{ClusteringParams, DecoherenceParams, LensingParams},
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned copy of a 1-D array-like.
#[cfg(feature = "python-bindings")]
pub fn extract_vector<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Owned copy of a 2-D float64 array.
#[cfg(feature = "python-bindings")]
pub fn extract_matrix<'py>(
    raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<ndarray::Array2<f64>> {
    let arr = raw_data.extract::<PyReadonlyArray2<f64>>().map_err(|_| {
        PyTypeError::new_err(format!("{name} must be a 2-D numpy.ndarray of float64"))
    })?;
    Ok(arr.as_array().to_owned())
}

/// `{"TT": array, ...}` → `SpectrumSet` on the grid `ell`.
#[cfg(feature = "python-bindings")]
pub fn extract_spectrum_set<'py>(
    py: Python<'py>, ell: &Bound<'py, PyAny>, spectra: &Bound<'py, PyDict>,
) -> PyResult<SpectrumSet> {
    let mut set = SpectrumSet::new(extract_vector(py, ell, "ell")?)?;
    for (key, values) in spectra.iter() {
        let label: String = key.extract()?;
        let channel: Channel = label.parse()?;
        set.insert(channel, extract_vector(py, &values, &label)?)?;
    }
    Ok(set)
}

/// Fiducial bundle with the three amplitudes that matter for modulation.
#[cfg(feature = "python-bindings")]
pub fn build_transfer_bundle(
    damping_amplitude: Option<f64>, clustering_amplitude: Option<f64>,
    lensing_amplitude: Option<f64>,
) -> TransferBundle {
    TransferBundle::new(
        DecoherenceParams::with_damping(damping_amplitude.unwrap_or(0.0)),
        ClusteringParams::with_amplitude(clustering_amplitude.unwrap_or(0.0)),
        LensingParams::with_amplitude(lensing_amplitude.unwrap_or(0.0)),
    )
}

#[cfg(feature = "python-bindings")]
pub fn build_priors(priors: Vec<(f64, f64)>) -> PyResult<BoxPriors> {
    Ok(BoxPriors::new(priors)?)
}

#[cfg(feature = "python-bindings")]
pub fn build_sampler_options(
    nwalkers: Option<usize>, nsteps: Option<usize>, nburn: Option<usize>, seed: Option<u64>,
) -> PyResult<SamplerOptions> {
    let defaults = SamplerOptions::default();
    let opts = SamplerOptions::with_run(
        nwalkers.unwrap_or(defaults.nwalkers),
        nsteps.unwrap_or(defaults.nsteps),
        nburn.unwrap_or(defaults.nburn),
    )?;
    Ok(match seed {
        Some(s) => opts.seeded(s),
        None => opts,
    })
}
