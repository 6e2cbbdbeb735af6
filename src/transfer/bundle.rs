//! transfer::bundle — composed parameter bundle and modulation constants.
//!
//! Purpose
//! -------
//! Aggregate one instance each of the decoherence, clustering and lensing
//! parameter records (plus an optional coherence-length record) and expose
//! the derived quantities the spectrum modulator consumes: the damping
//! envelope D(ℓ), the scalar lensing amplitude at a fixed reference point,
//! and the scalar clustering amplitude at a fixed large-scale reference.
//!
//! Key behaviors
//! -------------
//! - [`ModulationConfig`] holds every fixed phenomenological constant used
//!   by the modulator (reference damping multipole, lensing ℓ-cut, reference
//!   wavenumbers/redshifts, window pivot/width/cutoff, window boost, and the
//!   ℓ(ℓ+1) regularizer). [`ModulationConfig::new`] validates them.
//! - [`TransferBundle`] owns no mutable state; every accessor is a pure
//!   function of the stored records and configuration.
//!
//! Invariants & assumptions
//! ------------------------
//! - A bundle built from `Default` records sits exactly in the GR/ΛCDM
//!   limit: unit damping envelope, zero lensing and clustering amplitudes.
//! - The clustering record is a tagged [`ClusteringModel`]; the binned
//!   variant is evaluated with its own law, never by field inspection.
//!
//! Conventions
//! -----------
//! - Multipoles are `f64` to allow direct use of non-integer ℓ grids.
//! - The damping envelope is achromatic: identical for every channel.
//!
//! Downstream usage
//! ----------------
//! - `spectra::modulator::apply_modifications` reads `damping_envelope`,
//!   `lensing_amplitude`, `clustering_reference_amplitude` and `config`.
//! - MCMC likelihood closures build a fresh bundle per parameter vector.
use crate::transfer::{
    errors::{TransferError, TransferResult},
    functions::{
        clustering_modifier, clustering_modifier_binned, coherence_length, lensing_modifier,
    },
    params::{ClusteringModel, CoherenceLengthParams, DecoherenceParams, LensingParams},
};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Fixed phenomenological constants of the spectrum modulation.
///
/// Defaults
/// --------
/// - `damping_scale_ell = 1500`
/// - `lensing_ell_min = 300` (lensing factor applies for ℓ > this)
/// - `lensing_reference_k = 0.1`, `lensing_reference_z = 2.0`
/// - `clustering_reference_k = 0.01`, `clustering_reference_z = 0.0`
/// - `window_pivot_ell = 80`, `window_width_ell = 80`, `window_cutoff_ell = 1200`
/// - `window_boost = 0.2`
/// - `regularizer = 1e-12`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModulationConfig {
    pub damping_scale_ell: f64,
    pub lensing_ell_min: f64,
    pub lensing_reference_k: f64,
    pub lensing_reference_z: f64,
    pub clustering_reference_k: f64,
    pub clustering_reference_z: f64,
    pub window_pivot_ell: f64,
    pub window_width_ell: f64,
    pub window_cutoff_ell: f64,
    pub window_boost: f64,
    pub regularizer: f64,
}

impl ModulationConfig {
    /// Construct and validate a modulation configuration.
    ///
    /// Errors
    /// ------
    /// - `TransferError::InvalidConstant` if any constant is non-finite, if a
    ///   scale (`damping_scale_ell`, `window_width_ell`, `window_cutoff_ell`,
    ///   reference wavenumbers) is not strictly positive, if a reference
    ///   redshift is ≤ -1, or if `regularizer` is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        damping_scale_ell: f64, lensing_ell_min: f64, lensing_reference_k: f64,
        lensing_reference_z: f64, clustering_reference_k: f64, clustering_reference_z: f64,
        window_pivot_ell: f64, window_width_ell: f64, window_cutoff_ell: f64, window_boost: f64,
        regularizer: f64,
    ) -> TransferResult<Self> {
        let config = Self {
            damping_scale_ell,
            lensing_ell_min,
            lensing_reference_k,
            lensing_reference_z,
            clustering_reference_k,
            clustering_reference_z,
            window_pivot_ell,
            window_width_ell,
            window_cutoff_ell,
            window_boost,
            regularizer,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> TransferResult<()> {
        let finite = [
            ("damping_scale_ell", self.damping_scale_ell),
            ("lensing_ell_min", self.lensing_ell_min),
            ("lensing_reference_k", self.lensing_reference_k),
            ("lensing_reference_z", self.lensing_reference_z),
            ("clustering_reference_k", self.clustering_reference_k),
            ("clustering_reference_z", self.clustering_reference_z),
            ("window_pivot_ell", self.window_pivot_ell),
            ("window_width_ell", self.window_width_ell),
            ("window_cutoff_ell", self.window_cutoff_ell),
            ("window_boost", self.window_boost),
            ("regularizer", self.regularizer),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(TransferError::InvalidConstant {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        let positive = [
            ("damping_scale_ell", self.damping_scale_ell),
            ("lensing_reference_k", self.lensing_reference_k),
            ("clustering_reference_k", self.clustering_reference_k),
            ("window_width_ell", self.window_width_ell),
            ("window_cutoff_ell", self.window_cutoff_ell),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(TransferError::InvalidConstant {
                    name,
                    value,
                    reason: "must be strictly positive",
                });
            }
        }
        for (name, value) in [
            ("lensing_reference_z", self.lensing_reference_z),
            ("clustering_reference_z", self.clustering_reference_z),
        ] {
            if value <= -1.0 {
                return Err(TransferError::InvalidConstant {
                    name,
                    value,
                    reason: "redshift must exceed -1",
                });
            }
        }
        if self.regularizer < 0.0 {
            return Err(TransferError::InvalidConstant {
                name: "regularizer",
                value: self.regularizer,
                reason: "must be non-negative",
            });
        }
        Ok(())
    }

    /// Band-pass window `0.5·(1+tanh((ℓ-pivot)/width)) · (1 - exp(-(ℓ/cutoff)²))`.
    #[inline]
    pub fn clustering_window(&self, ell: f64) -> f64 {
        let turn_on = 0.5 * (1.0 + ((ell - self.window_pivot_ell) / self.window_width_ell).tanh());
        let ratio = ell / self.window_cutoff_ell;
        turn_on * (1.0 - (-(ratio * ratio)).exp())
    }

    /// `exp(-ξ · ℓ(ℓ+1) / ℓ_d²)`.
    #[inline]
    pub fn damping_factor(&self, ell: f64, damping_amplitude: f64) -> f64 {
        let scale_sq = self.damping_scale_ell * self.damping_scale_ell;
        (-damping_amplitude * ell * (ell + 1.0) / scale_sq).exp()
    }
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            damping_scale_ell: 1500.0,
            lensing_ell_min: 300.0,
            lensing_reference_k: 0.1,
            lensing_reference_z: 2.0,
            clustering_reference_k: 0.01,
            clustering_reference_z: 0.0,
            window_pivot_ell: 80.0,
            window_width_ell: 80.0,
            window_cutoff_ell: 1200.0,
            window_boost: 0.2,
            regularizer: 1e-12,
        }
    }
}

/// Bundle of physical-effect parameters plus modulation constants.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransferBundle {
    pub decoherence: DecoherenceParams,
    pub clustering: ClusteringModel,
    pub lensing: LensingParams,
    pub coherence: Option<CoherenceLengthParams>,
    pub config: ModulationConfig,
}

impl TransferBundle {
    /// Bundle with default modulation constants and no coherence-length record.
    pub fn new(
        decoherence: DecoherenceParams, clustering: impl Into<ClusteringModel>,
        lensing: LensingParams,
    ) -> Self {
        Self {
            decoherence,
            clustering: clustering.into(),
            lensing,
            coherence: None,
            config: ModulationConfig::default(),
        }
    }

    pub fn with_coherence(mut self, coherence: CoherenceLengthParams) -> Self {
        self.coherence = Some(coherence);
        self
    }

    pub fn with_config(mut self, config: ModulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Damping envelope `exp(-ξ ℓ(ℓ+1)/ℓ_d²)` on the given multipole grid.
    pub fn damping_envelope(&self, ell: ArrayView1<'_, f64>) -> Array1<f64> {
        let xi = self.decoherence.damping_amplitude;
        ell.mapv(|l| self.config.damping_factor(l, xi))
    }

    /// Σ evaluated at the lensing reference point (k=0.1, z=2 by default).
    pub fn lensing_amplitude(&self) -> f64 {
        lensing_modifier(
            self.config.lensing_reference_k,
            self.config.lensing_reference_z,
            &self.lensing,
        )
    }

    /// μ evaluated at the clustering reference point (k=0.01, z=0 by default).
    pub fn clustering_reference_amplitude(&self) -> f64 {
        let (k, z) = (self.config.clustering_reference_k, self.config.clustering_reference_z);
        match &self.clustering {
            ClusteringModel::Continuous(p) => clustering_modifier(k, z, p),
            ClusteringModel::Binned(p) => clustering_modifier_binned(k, z, p),
        }
    }

    /// ℓ_c(z) when a coherence-length record is attached.
    pub fn coherence_length_at(&self, z: f64) -> Option<f64> {
        self.coherence.as_ref().map(|p| coherence_length(z, p))
    }

    /// Lensing-amplitude proxy `A_L = 1 + Σ(k_ref, z_ref)`.
    pub fn lensing_amplitude_proxy(&self) -> f64 {
        1.0 + self.lensing_amplitude()
    }
}
