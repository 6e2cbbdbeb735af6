//! likelihood::dataset — column-oriented observational datasets.
//!
//! Purpose
//! -------
//! Hold one probe's observations as parallel arrays, validated once at
//! construction. Loading from files is the caller's job; the only table
//! contract checked here is the three-column layout.
//!
//! Invariants & assumptions
//! ------------------------
//! - All three columns have the same, non-zero length.
//! - Abscissae (ℓ or z) and observed values are finite.
//! - σ is stored as given. Non-positive or non-finite σ is masked at
//!   χ² time, not rejected here.

use crate::likelihood::errors::{LikelihoodError, LikelihoodResult};
use ndarray::{Array1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Binned CMB bandpowers: (ℓ, D_ℓ, σ).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandpowerData {
    pub ell: Array1<f64>,
    pub value: Array1<f64>,
    pub sigma: Array1<f64>,
}

impl BandpowerData {
    pub fn new(ell: Array1<f64>, value: Array1<f64>, sigma: Array1<f64>) -> LikelihoodResult<Self> {
        validate_columns("bandpower", &ell, &value, &sigma)?;
        Ok(Self { ell, value, sigma })
    }

    /// Build from an `n × 3` table of (ℓ, D_ℓ, σ) rows.
    pub fn from_table(table: ArrayView2<'_, f64>) -> LikelihoodResult<Self> {
        let (ell, value, sigma) = split_columns(table)?;
        Self::new(ell, value, sigma)
    }

    pub fn len(&self) -> usize {
        self.ell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ell.is_empty()
    }
}

/// Redshift-indexed observations (BAO D_V/r_d, SNe μ, growth fσ8): (z, obs, σ).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedshiftData {
    pub z: Array1<f64>,
    pub value: Array1<f64>,
    pub sigma: Array1<f64>,
}

impl RedshiftData {
    pub fn new(z: Array1<f64>, value: Array1<f64>, sigma: Array1<f64>) -> LikelihoodResult<Self> {
        validate_columns("redshift", &z, &value, &sigma)?;
        Ok(Self { z, value, sigma })
    }

    /// Build from an `n × 3` table of (z, obs, σ) rows.
    pub fn from_table(table: ArrayView2<'_, f64>) -> LikelihoodResult<Self> {
        let (z, value, sigma) = split_columns(table)?;
        Self::new(z, value, sigma)
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }
}

fn split_columns(
    table: ArrayView2<'_, f64>,
) -> LikelihoodResult<(Array1<f64>, Array1<f64>, Array1<f64>)> {
    if table.ncols() != 3 {
        return Err(LikelihoodError::ColumnCount { expected: 3, actual: table.ncols() });
    }
    Ok((
        table.index_axis(Axis(1), 0).to_owned(),
        table.index_axis(Axis(1), 1).to_owned(),
        table.index_axis(Axis(1), 2).to_owned(),
    ))
}

fn validate_columns(
    what: &'static str, x: &Array1<f64>, value: &Array1<f64>, sigma: &Array1<f64>,
) -> LikelihoodResult<()> {
    if x.is_empty() {
        return Err(LikelihoodError::EmptyData { what });
    }
    if value.len() != x.len() {
        return Err(LikelihoodError::LengthMismatch {
            what: "observed values",
            expected: x.len(),
            actual: value.len(),
        });
    }
    if sigma.len() != x.len() {
        return Err(LikelihoodError::LengthMismatch {
            what: "sigma",
            expected: x.len(),
            actual: sigma.len(),
        });
    }
    if let Some((index, &v)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(LikelihoodError::NonFiniteInput { what: "abscissa", index, value: v });
    }
    if let Some((index, &v)) = value.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(LikelihoodError::NonFiniteInput { what: "observed value", index, value: v });
    }
    Ok(())
}
