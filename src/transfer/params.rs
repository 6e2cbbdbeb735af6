//! transfer::params — physical-effect parameter records.
//!
//! Purpose
//! -------
//! Hold the four parameter sets that drive the phenomenological deviations
//! from ΛCDM: photon decoherence, clustering (μ) modification, lensing (Σ)
//! modification, and a finite coherence length. These are plain value types
//! with no behavior beyond storage; all evaluation lives in
//! [`transfer::functions`](super::functions).
//!
//! Invariants & assumptions
//! ------------------------
//! - Records are immutable once constructed (`Copy` values, no interior
//!   mutability); one instance is used per model evaluation.
//! - `pivot_k` must be non-zero for the scale-suppression law to be defined.
//!   This is the caller's responsibility; nothing here validates it.
//! - `damping_amplitude` is conventionally ≥ 0 but is not enforced, so that
//!   samplers can explore either side of zero under their own priors.
//!
//! Conventions
//! -----------
//! - Wavenumbers are in h/Mpc, lengths in Mpc/h, rates in s⁻¹.
//! - `Default` impls reproduce the fiducial values used throughout the
//!   toolkit (zero amplitudes, i.e. the GR/ΛCDM limit).

use serde::{Deserialize, Serialize};

/// Photon-decoherence parameters.
///
/// Fields
/// ------
/// - `log10_gamma0`: log₁₀ of the rate normalization Γ₀ in s⁻¹.
/// - `transition_scale_factor`: a* at which the low-gravity transition sets in.
/// - `steepness`: exponent p of the transition.
/// - `reference_temperature`: fixed-point blackbody temperature in Kelvin.
/// - `damping_amplitude`: ξ, strength of the anisotropy damping envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecoherenceParams {
    pub log10_gamma0: f64,
    pub transition_scale_factor: f64,
    pub steepness: f64,
    pub reference_temperature: f64,
    pub damping_amplitude: f64,
}

impl DecoherenceParams {
    pub fn new(
        log10_gamma0: f64, transition_scale_factor: f64, steepness: f64,
        reference_temperature: f64, damping_amplitude: f64,
    ) -> Self {
        Self {
            log10_gamma0,
            transition_scale_factor,
            steepness,
            reference_temperature,
            damping_amplitude,
        }
    }

    /// Fiducial parameters with only the damping amplitude changed.
    pub fn with_damping(damping_amplitude: f64) -> Self {
        Self { damping_amplitude, ..Self::default() }
    }
}

impl Default for DecoherenceParams {
    fn default() -> Self {
        Self::new(-18.0, 1.0, 2.0, 2.725, 0.0)
    }
}

/// Continuous clustering-modification parameters for μ(k, z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringParams {
    /// Amplitude today, μ₀.
    pub amplitude: f64,
    /// Pivot wavenumber k₀ in h/Mpc.
    pub pivot_k: f64,
    /// Scale slope m.
    pub slope: f64,
    /// Transition redshift z_t.
    pub transition_z: f64,
    /// Redshift steepness n.
    pub steepness: f64,
}

impl ClusteringParams {
    pub fn new(
        amplitude: f64, pivot_k: f64, slope: f64, transition_z: f64, steepness: f64,
    ) -> Self {
        Self { amplitude, pivot_k, slope, transition_z, steepness }
    }

    pub fn with_amplitude(amplitude: f64) -> Self {
        Self { amplitude, ..Self::default() }
    }
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self::new(0.0, 0.05, 2.0, 1.0, 2.0)
    }
}

/// Two-bin redshift variant of μ(k, z).
///
/// μ = `low_amplitude` for z ≤ `split_z`, `high_amplitude` otherwise, times
/// the same scale-suppression law as [`ClusteringParams`]. The binning
/// replaces the redshift-steepness factor entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinnedClusteringParams {
    pub low_amplitude: f64,
    pub high_amplitude: f64,
    pub split_z: f64,
    pub pivot_k: f64,
    pub slope: f64,
}

impl BinnedClusteringParams {
    pub fn new(
        low_amplitude: f64, high_amplitude: f64, split_z: f64, pivot_k: f64, slope: f64,
    ) -> Self {
        Self { low_amplitude, high_amplitude, split_z, pivot_k, slope }
    }
}

impl Default for BinnedClusteringParams {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.5, 0.05, 2.0)
    }
}

/// Either clustering parameterization.
///
/// Call sites match on this instead of inspecting types at runtime; the
/// bundle evaluates whichever variant it carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClusteringModel {
    Continuous(ClusteringParams),
    Binned(BinnedClusteringParams),
}

impl Default for ClusteringModel {
    fn default() -> Self {
        ClusteringModel::Continuous(ClusteringParams::default())
    }
}

impl From<ClusteringParams> for ClusteringModel {
    fn from(params: ClusteringParams) -> Self {
        ClusteringModel::Continuous(params)
    }
}

impl From<BinnedClusteringParams> for ClusteringModel {
    fn from(params: BinnedClusteringParams) -> Self {
        ClusteringModel::Binned(params)
    }
}

/// Lensing-modification parameters for Σ(k, z).
///
/// Same shape as [`ClusteringParams`] but controls the anisotropic-stress /
/// lensing amplitude rather than the Poisson equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensingParams {
    pub amplitude: f64,
    pub pivot_k: f64,
    pub slope: f64,
    pub transition_z: f64,
    pub steepness: f64,
}

impl LensingParams {
    pub fn new(
        amplitude: f64, pivot_k: f64, slope: f64, transition_z: f64, steepness: f64,
    ) -> Self {
        Self { amplitude, pivot_k, slope, transition_z, steepness }
    }

    pub fn with_amplitude(amplitude: f64) -> Self {
        Self { amplitude, ..Self::default() }
    }
}

impl Default for LensingParams {
    fn default() -> Self {
        Self::new(0.0, 0.05, 2.0, 1.0, 2.0)
    }
}

/// Finite coherence-length parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoherenceLengthParams {
    /// Present-day coherence length in Mpc/h.
    pub present_length: f64,
    /// Redshift-scaling index ν.
    pub scaling_index: f64,
    pub transition_z: f64,
    pub steepness: f64,
}

impl CoherenceLengthParams {
    pub fn new(present_length: f64, scaling_index: f64, transition_z: f64, steepness: f64) -> Self {
        Self { present_length, scaling_index, transition_z, steepness }
    }
}

impl Default for CoherenceLengthParams {
    fn default() -> Self {
        Self::new(300.0, 1.0, 1.0, 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The fiducial records must sit in the GR limit: every amplitude that
    // feeds the spectrum modulator is zero.
    fn defaults_are_in_the_gr_limit() {
        // Arrange & Act
        let dec = DecoherenceParams::default();
        let clus = ClusteringParams::default();
        let lens = LensingParams::default();
        let binned = BinnedClusteringParams::default();

        // Assert
        assert_eq!(dec.damping_amplitude, 0.0);
        assert_eq!(clus.amplitude, 0.0);
        assert_eq!(lens.amplitude, 0.0);
        assert_eq!(binned.low_amplitude, 0.0);
        assert_eq!(binned.high_amplitude, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // `From` conversions tag each parameterization with the right variant.
    fn clustering_model_from_conversions_tag_variants() {
        let continuous: ClusteringModel = ClusteringParams::with_amplitude(0.1).into();
        let binned: ClusteringModel = BinnedClusteringParams::default().into();

        assert!(matches!(continuous, ClusteringModel::Continuous(p) if p.amplitude == 0.1));
        assert!(matches!(binned, ClusteringModel::Binned(_)));
    }
}
