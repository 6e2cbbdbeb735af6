//! likelihood::aggregator — multi-probe χ² accumulation with provenance.
//!
//! Purpose
//! -------
//! Accumulate a total χ² across heterogeneous probes (CMB bandpowers, BAO,
//! SNe, growth) while recording, per block, the probe, its χ² and the
//! number of points that survived masking.
//!
//! Key behaviors
//! -------------
//! - CMB blocks interpolate the model curve onto the data ℓ with NaN
//!   outside the model's support; BAO/SNe/growth blocks evaluate the model
//!   function directly at each redshift.
//! - Masking policy, uniform across blocks: a point contributes only when
//!   its model value is finite and its σ is finite and strictly positive.
//!   Masked points are dropped from both χ² and dof.
//! - `summary()` returns totals and the ordered block list.
//!
//! Invariants & assumptions
//! ------------------------
//! - An aggregator represents a single evaluation of the log-likelihood.
//!   Construct a fresh one per parameter vector, or call [`reset`] before
//!   reuse; otherwise earlier blocks are silently double-counted.
//! - Aggregators are plain owned values; parallel walkers each own theirs.
//!
//! Downstream usage
//! ----------------
//! ```ignore
//! let loglike = |theta: &Theta| {
//!     let mut agg = LikelihoodAggregator::new();
//!     agg.add_cmb_block(&bandpowers, model_ell.view(), model_dl.view())?;
//!     agg.add_bao_block(&bao, |z| bg.dv_over_rd(z).unwrap_or(f64::NAN));
//!     agg.summary().log_likelihood()
//! };
//! ```
//!
//! [`reset`]: LikelihoodAggregator::reset

use crate::likelihood::{
    covariance::{covariance_chi2, ensure_matching_grid},
    dataset::{BandpowerData, RedshiftData},
    errors::{LikelihoodError, LikelihoodResult},
    interp::interp_or_nan,
};
use ndarray::{ArrayView1, ArrayView2, Zip};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt;

/// Observational probe that produced a χ² block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Probe {
    /// Binned CMB bandpowers with diagonal errors.
    Cmb,
    /// Binned CMB bandpowers with a full covariance.
    CmbCovariance,
    Bao,
    Sne,
    Growth,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Probe::Cmb => "CMB",
            Probe::CmbCovariance => "CMB (covariance)",
            Probe::Bao => "BAO",
            Probe::Sne => "SNe",
            Probe::Growth => "Growth",
        };
        f.write_str(name)
    }
}

/// One block's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockContribution {
    pub probe: Probe,
    pub chi2: f64,
    /// Number of points that survived masking.
    pub dof: usize,
}

/// Totals plus ordered per-block provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareSummary {
    pub total_chi2: f64,
    pub total_dof: usize,
    pub blocks: Vec<BlockContribution>,
}

impl ChiSquareSummary {
    /// ln L = -χ²/2.
    pub fn log_likelihood(&self) -> f64 {
        -0.5 * self.total_chi2
    }

    /// χ² / (dof - n_params), or `None` when no degrees of freedom remain.
    pub fn reduced_chi2(&self, n_params: usize) -> Option<f64> {
        let nu = self.total_dof.checked_sub(n_params).filter(|&nu| nu > 0)?;
        Some(self.total_chi2 / nu as f64)
    }

    /// Survival probability P(χ²_ν ≥ χ²) with ν = dof - n_params.
    ///
    /// Errors
    /// ------
    /// - `InvalidDegreesOfFreedom` when ν ≤ 0.
    pub fn p_value(&self, n_params: usize) -> LikelihoodResult<f64> {
        let invalid = LikelihoodError::InvalidDegreesOfFreedom { dof: self.total_dof, n_params };
        let nu = self.total_dof.checked_sub(n_params).filter(|&nu| nu > 0).ok_or(invalid.clone())?;
        let dist = ChiSquared::new(nu as f64).map_err(|_| invalid)?;
        Ok(dist.sf(self.total_chi2))
    }

    /// Contribution of the first block of the given probe, if any.
    pub fn block(&self, probe: Probe) -> Option<&BlockContribution> {
        self.blocks.iter().find(|b| b.probe == probe)
    }
}

/// Short-lived χ² accumulator for one likelihood evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LikelihoodAggregator {
    blocks: Vec<BlockContribution>,
}

impl LikelihoodAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every recorded block.
    pub fn reset(&mut self) {
        self.blocks.clear();
    }

    /// Diagonal-error CMB block; returns the block χ².
    ///
    /// The model curve `(model_ell, model_value)` is linearly interpolated
    /// onto `data.ell`. Bandpowers outside `[model_ell[0], model_ell[last]]`
    /// are masked.
    ///
    /// Errors
    /// ------
    /// - `LengthMismatch` when the model columns differ in length.
    /// - `NonMonotoneGrid`, `NonFiniteInput`, `EmptyData` for a malformed
    ///   model grid.
    pub fn add_cmb_block(
        &mut self, data: &BandpowerData, model_ell: ArrayView1<'_, f64>,
        model_value: ArrayView1<'_, f64>,
    ) -> LikelihoodResult<f64> {
        let model_interp = interp_or_nan(data.ell.view(), model_ell, model_value)?;
        let (chi2, dof) = masked_chi2(data.value.view(), model_interp.view(), data.sigma.view());
        Ok(self.record(Probe::Cmb, chi2, dof))
    }

    /// Correlated CMB block: χ² = rᵀC⁻¹r on matching bins.
    ///
    /// Errors
    /// ------
    /// - `GridMismatch`/`LengthMismatch` when the model ℓ grid does not
    ///   match the data bins.
    /// - `OutsideModelSupport` when a model value is non-finite; the
    ///   covariance couples bins, so no point can be masked.
    /// - Covariance errors from [`covariance_chi2`].
    pub fn add_cmb_block_with_covariance(
        &mut self, data: &BandpowerData, model_ell: ArrayView1<'_, f64>,
        model_value: ArrayView1<'_, f64>, cov: ArrayView2<'_, f64>,
    ) -> LikelihoodResult<f64> {
        ensure_matching_grid(data.ell.view(), model_ell)?;
        if model_value.len() != data.len() {
            return Err(LikelihoodError::LengthMismatch {
                what: "model values",
                expected: data.len(),
                actual: model_value.len(),
            });
        }
        if let Some((index, _)) = model_value.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(LikelihoodError::OutsideModelSupport { index, ell: data.ell[index] });
        }
        let residual = &data.value - &model_value;
        let chi2 = covariance_chi2(residual.view(), cov)?;
        Ok(self.record(Probe::CmbCovariance, chi2, data.len()))
    }

    /// BAO block with a model `z ↦ D_V/r_d`.
    pub fn add_bao_block<F: Fn(f64) -> f64>(&mut self, data: &RedshiftData, model: F) -> f64 {
        self.add_redshift_block(Probe::Bao, data, model)
    }

    /// SNe block with a model `z ↦ μ(z)`.
    pub fn add_sne_block<F: Fn(f64) -> f64>(&mut self, data: &RedshiftData, model: F) -> f64 {
        self.add_redshift_block(Probe::Sne, data, model)
    }

    /// Growth block with a model `z ↦ fσ8(z)`.
    pub fn add_growth_block<F: Fn(f64) -> f64>(&mut self, data: &RedshiftData, model: F) -> f64 {
        self.add_redshift_block(Probe::Growth, data, model)
    }

    pub fn blocks(&self) -> &[BlockContribution] {
        &self.blocks
    }

    pub fn total_chi2(&self) -> f64 {
        self.blocks.iter().map(|b| b.chi2).sum()
    }

    pub fn summary(&self) -> ChiSquareSummary {
        ChiSquareSummary {
            total_chi2: self.total_chi2(),
            total_dof: self.blocks.iter().map(|b| b.dof).sum(),
            blocks: self.blocks.clone(),
        }
    }

    fn add_redshift_block<F: Fn(f64) -> f64>(
        &mut self, probe: Probe, data: &RedshiftData, model: F,
    ) -> f64 {
        let predicted = data.z.mapv(model);
        let (chi2, dof) = masked_chi2(data.value.view(), predicted.view(), data.sigma.view());
        self.record(probe, chi2, dof)
    }

    fn record(&mut self, probe: Probe, chi2: f64, dof: usize) -> f64 {
        self.blocks.push(BlockContribution { probe, chi2, dof });
        chi2
    }
}

/// Σ((obs - model)/σ)² over points with finite model and finite σ > 0.
fn masked_chi2(
    observed: ArrayView1<'_, f64>, model: ArrayView1<'_, f64>, sigma: ArrayView1<'_, f64>,
) -> (f64, usize) {
    let mut chi2 = 0.0;
    let mut dof = 0usize;
    Zip::from(&observed).and(&model).and(&sigma).for_each(|&obs, &m, &s| {
        if m.is_finite() && s.is_finite() && s > 0.0 {
            let r = (obs - m) / s;
            chi2 += r * r;
            dof += 1;
        }
    });
    (chi2, dof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Zero χ² for a model that matches the data exactly.
    // - The masking boundary (outside support, σ ≤ 0) and its dof effect.
    // - Direct-evaluation redshift blocks and provenance ordering.
    // - Reset semantics and the goodness-of-fit helpers.
    // -------------------------------------------------------------------------

    fn bandpowers() -> BandpowerData {
        let ell = array![30.0, 100.0, 500.0, 1000.0, 1500.0];
        let value = ell.mapv(|l: f64| 5000.0 * (-l / 1000.0).exp());
        BandpowerData::new(ell, value, Array1::from_elem(5, 10.0)).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // A model identical to the data gives χ² = 0 with dof = data length.
    //
    // Given
    // -----
    // - Model grid equal to the data grid and model values equal to data.
    //
    // Expect
    // ------
    // - χ² = 0, dof = 5.
    fn cmb_block_identical_model_has_zero_chi2() {
        // Arrange
        let data = bandpowers();
        let mut agg = LikelihoodAggregator::new();

        // Act
        let chi2 = agg.add_cmb_block(&data, data.ell.view(), data.value.view()).unwrap();

        // Assert
        let summary = agg.summary();
        assert_eq!(chi2, 0.0);
        assert_eq!(summary.total_dof, 5);
        assert_eq!(summary.blocks[0].probe, Probe::Cmb);
    }

    #[test]
    // Purpose
    // -------
    // Points outside the model support and points with σ ≤ 0 are dropped
    // from both χ² and dof.
    //
    // Given
    // -----
    // - Model support ℓ ∈ [50, 1200]: excludes ℓ = 30 and ℓ = 1500.
    // - σ = 0 at ℓ = 500.
    // - A constant model offset of 10 (one σ) everywhere.
    //
    // Expect
    // ------
    // - Surviving points: ℓ = 100 and ℓ = 1000 → χ² = 2, dof = 2.
    fn cmb_block_masks_outside_support_and_bad_sigma() {
        // Arrange
        let mut data = bandpowers();
        data.sigma[2] = 0.0;
        let model_ell = Array1::linspace(50.0, 1200.0, 2301);
        let model_value = model_ell.mapv(|l: f64| 5000.0 * (-l / 1000.0).exp() + 10.0);
        let mut agg = LikelihoodAggregator::new();

        // Act
        let chi2 = agg.add_cmb_block(&data, model_ell.view(), model_value.view()).unwrap();

        // Assert
        assert!((chi2 - 2.0).abs() < 1e-3);
        assert_eq!(agg.summary().total_dof, 2);
    }

    #[test]
    // Purpose
    // -------
    // The model-support boundary is inclusive at both ends.
    fn cmb_block_support_boundary_is_inclusive() {
        let data = bandpowers();
        let model_ell = array![30.0, 1500.0];
        let model_value = array![0.0, 0.0];
        let mut agg = LikelihoodAggregator::new();

        agg.add_cmb_block(&data, model_ell.view(), model_value.view()).unwrap();

        assert_eq!(agg.summary().total_dof, 5);
    }

    #[test]
    // Purpose
    // -------
    // Redshift blocks evaluate the model directly and keep insertion order;
    // a NaN model value is masked like any other block.
    fn redshift_blocks_accumulate_in_order() {
        // Arrange
        let bao = RedshiftData::new(array![0.3, 0.5], array![8.0, 13.0], array![0.5, 0.5]).unwrap();
        let sne =
            RedshiftData::new(array![0.1, 0.2], array![38.0, 40.0], array![0.2, 0.2]).unwrap();
        let growth =
            RedshiftData::new(array![0.4, 5.0], array![0.45, 0.3], array![0.05, 0.05]).unwrap();
        let mut agg = LikelihoodAggregator::new();

        // Act
        let c_bao = agg.add_bao_block(&bao, |z| if z < 0.4 { 8.5 } else { 13.0 });
        let c_sne = agg.add_sne_block(&sne, |_| 38.0);
        let c_growth = agg.add_growth_block(&growth, |z| if z > 1.0 { f64::NAN } else { 0.45 });
        let summary = agg.summary();

        // Assert
        assert!((c_bao - 1.0).abs() < 1e-12);
        assert!((c_sne - 100.0).abs() < 1e-9);
        assert_eq!(c_growth, 0.0);
        let probes: Vec<Probe> = summary.blocks.iter().map(|b| b.probe).collect();
        assert_eq!(probes, vec![Probe::Bao, Probe::Sne, Probe::Growth]);
        assert_eq!(summary.total_dof, 5);
        assert!((summary.total_chi2 - 101.0).abs() < 1e-9);
        assert_eq!(summary.block(Probe::Growth).unwrap().dof, 1);
    }

    #[test]
    // Purpose
    // -------
    // `reset` clears earlier blocks so a reused aggregator does not
    // double-count.
    fn reset_prevents_double_counting() {
        let bao = RedshiftData::new(array![0.3], array![8.0], array![1.0]).unwrap();
        let mut agg = LikelihoodAggregator::new();

        agg.add_bao_block(&bao, |_| 9.0);
        agg.reset();
        agg.add_bao_block(&bao, |_| 9.0);

        assert_eq!(agg.blocks().len(), 1);
        assert!((agg.total_chi2() - 1.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Goodness-of-fit helpers: ln L = -χ²/2, reduced χ², and the χ²
    // survival p-value (χ² = ν has p ≈ 0.44 for ν = 10).
    fn goodness_of_fit_helpers() {
        let summary = ChiSquareSummary {
            total_chi2: 12.0,
            total_dof: 12,
            blocks: vec![BlockContribution { probe: Probe::Cmb, chi2: 12.0, dof: 12 }],
        };

        assert_eq!(summary.log_likelihood(), -6.0);
        assert!((summary.reduced_chi2(2).unwrap() - 1.2).abs() < 1e-12);
        let p = summary.p_value(2).unwrap();
        assert!((p - 0.2851).abs() < 1e-3);
        assert!(summary.reduced_chi2(12).is_none());
        assert!(matches!(
            summary.p_value(13),
            Err(LikelihoodError::InvalidDegreesOfFreedom { dof: 12, n_params: 13 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The covariance block records dof = n and rejects non-finite model
    // values instead of masking them.
    fn covariance_block_records_full_dof() {
        let data = bandpowers();
        let cov = ndarray::Array2::from_diag(&Array1::from_elem(5, 100.0));
        let shifted = &data.value + 10.0;
        let mut agg = LikelihoodAggregator::new();

        let chi2 = agg
            .add_cmb_block_with_covariance(&data, data.ell.view(), shifted.view(), cov.view())
            .unwrap();
        let mut bad = shifted.clone();
        bad[3] = f64::NAN;
        let err = agg.add_cmb_block_with_covariance(&data, data.ell.view(), bad.view(), cov.view());

        assert!((chi2 - 5.0).abs() < 1e-9);
        assert_eq!(agg.summary().block(Probe::CmbCovariance).unwrap().dof, 5);
        assert!(matches!(err, Err(LikelihoodError::OutsideModelSupport { index: 3, .. })));
    }
}
