//! transfer::functions — scale/redshift-dependent modification amplitudes.
//!
//! Purpose
//! -------
//! Map parameter records and independent variables (wavenumber k, redshift
//! z, scale factor a) to modification amplitudes: μ(k, z), Σ(k, z), the
//! coherence length ℓ_c(z), and the decoherence rate Γ(a).
//!
//! Key behaviors
//! -------------
//! - Scalar functions are the primitive; `*_array` helpers broadcast them
//!   over `ndarray` inputs with standard `ndarray` broadcasting rules.
//! - The scale factor `1 / (1 + (k/k₀)^(-m))` turns on around k = k₀ and
//!   saturates to 1 for k ≫ k₀ (for m > 0).
//! - The redshift factor `1 / (1 + ((1+z)/(1+z_t))^n)` tends to 1 at z = 0
//!   side and to 0 at high redshift for n > 0.
//!
//! Invariants & assumptions
//! ------------------------
//! - Pure arithmetic: no error conditions, no side effects. The caller
//!   guarantees `pivot_k ≠ 0`.
//! - Γ(a) is suppressed for a < a* when the steepness is positive so that
//!   the modification vanishes at early times.

use crate::transfer::params::{
    BinnedClusteringParams, ClusteringParams, CoherenceLengthParams, DecoherenceParams,
    LensingParams,
};
use ndarray::{Array, ArrayView, Dimension, Zip};

/// Scale-suppression law `1 / (1 + (k/k₀)^(-m))`.
#[inline]
pub fn scale_weight(k: f64, pivot_k: f64, slope: f64) -> f64 {
    1.0 / (1.0 + (k / pivot_k).powf(-slope))
}

/// Redshift turn-off `1 / (1 + ((1+z)/(1+z_t))^n)`.
#[inline]
pub fn redshift_weight(z: f64, transition_z: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + ((1.0 + z) / (1.0 + transition_z)).powf(steepness))
}

/// Product of [`scale_weight`] and [`redshift_weight`]; bounded in [0, 1].
#[inline]
pub fn scale_redshift_weight(
    k: f64, z: f64, pivot_k: f64, slope: f64, transition_z: f64, steepness: f64,
) -> f64 {
    scale_weight(k, pivot_k, slope) * redshift_weight(z, transition_z, steepness)
}

/// μ(k, z) for the continuous parameterization.
pub fn clustering_modifier(k: f64, z: f64, params: &ClusteringParams) -> f64 {
    params.amplitude
        * scale_redshift_weight(
            k,
            z,
            params.pivot_k,
            params.slope,
            params.transition_z,
            params.steepness,
        )
}

/// μ(k, z) for the two-bin parameterization.
///
/// The amplitude is `low_amplitude` for z ≤ split, `high_amplitude` above;
/// there is no redshift-steepness factor.
pub fn clustering_modifier_binned(k: f64, z: f64, params: &BinnedClusteringParams) -> f64 {
    let amplitude = if z <= params.split_z { params.low_amplitude } else { params.high_amplitude };
    amplitude * scale_weight(k, params.pivot_k, params.slope)
}

/// Piecewise μ(a) for growth-only use, without scale dependence.
///
/// Maps `a → z = 1/max(a, 1e-8) − 1` before selecting the bin.
pub fn clustering_of_a_binned(a: f64, params: &BinnedClusteringParams) -> f64 {
    let z = 1.0 / a.max(1e-8) - 1.0;
    if z <= params.split_z { params.low_amplitude } else { params.high_amplitude }
}

/// Σ(k, z), same functional form as [`clustering_modifier`].
pub fn lensing_modifier(k: f64, z: f64, params: &LensingParams) -> f64 {
    params.amplitude
        * scale_redshift_weight(
            k,
            z,
            params.pivot_k,
            params.slope,
            params.transition_z,
            params.steepness,
        )
}

/// ℓ_c(z) = ℓ_c0 · (1+z)^(-ν) · S(z).
pub fn coherence_length(z: f64, params: &CoherenceLengthParams) -> f64 {
    params.present_length
        * (1.0 + z).powf(-params.scaling_index)
        * redshift_weight(z, params.transition_z, params.steepness)
}

/// Γ(a) = 10^log10Γ₀ · (a*² / (a² + a*²))^p.
///
/// Γ(0) = Γ₀ and Γ → 0 as a → ∞ for p > 0; non-increasing in a.
pub fn decoherence_rate(a: f64, params: &DecoherenceParams) -> f64 {
    let gamma0 = 10f64.powf(params.log10_gamma0);
    let a_star_sq = params.transition_scale_factor * params.transition_scale_factor;
    gamma0 * (a_star_sq / (a * a + a_star_sq)).powf(params.steepness)
}

/// Broadcast μ(k, z) over arrays of matching (or broadcastable) shape.
///
/// `z` is broadcast to the shape of `k`.
///
/// Panics
/// ------
/// - Panics if `z` cannot be broadcast to `k`'s shape (ndarray contract).
pub fn clustering_modifier_array<D: Dimension>(
    k: ArrayView<'_, f64, D>, z: ArrayView<'_, f64, D>, params: &ClusteringParams,
) -> Array<f64, D> {
    Zip::from(&k).and_broadcast(&z).map_collect(|&k, &z| clustering_modifier(k, z, params))
}

/// Broadcast the binned μ(k, z) over arrays.
pub fn clustering_modifier_binned_array<D: Dimension>(
    k: ArrayView<'_, f64, D>, z: ArrayView<'_, f64, D>, params: &BinnedClusteringParams,
) -> Array<f64, D> {
    Zip::from(&k).and_broadcast(&z).map_collect(|&k, &z| clustering_modifier_binned(k, z, params))
}

/// Broadcast Σ(k, z) over arrays.
pub fn lensing_modifier_array<D: Dimension>(
    k: ArrayView<'_, f64, D>, z: ArrayView<'_, f64, D>, params: &LensingParams,
) -> Array<f64, D> {
    Zip::from(&k).and_broadcast(&z).map_collect(|&k, &z| lensing_modifier(k, z, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Bounds and limits of the scale/redshift weight.
    // - Monotonicity and endpoints of the decoherence rate.
    // - Bin selection of the two-bin clustering model.
    // - Agreement of array broadcasting with the scalar functions.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The combined weight stays inside [0, 1] across a wide log grid.
    //
    // Given
    // -----
    // - k from 1e-5 to 1e3 h/Mpc, z from 0 to 1100.
    // - Positive slope and steepness.
    //
    // Expect
    // ------
    // - Every weight lies in [0, 1].
    fn scale_redshift_weight_is_bounded_in_unit_interval() {
        // Arrange
        let ks: Vec<f64> = (0..=80).map(|i| 10f64.powf(-5.0 + 0.1 * i as f64)).collect();
        let zs = [0.0, 0.5, 1.0, 3.0, 10.0, 1100.0];

        // Act & Assert
        for &k in &ks {
            for &z in &zs {
                let w = scale_redshift_weight(k, z, 0.05, 2.0, 1.0, 2.0);
                assert!((0.0..=1.0).contains(&w), "weight {w} out of bounds at k={k}, z={z}");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the limits: k → 0 gives 0, k → ∞ gives the redshift factor alone.
    fn scale_redshift_weight_limits_in_k() {
        // Arrange
        let (k0, m, zt, n, z) = (0.05, 2.0, 1.0, 2.0, 0.7);

        // Act
        let at_zero = scale_redshift_weight(0.0, z, k0, m, zt, n);
        let tiny = scale_redshift_weight(1e-9, z, k0, m, zt, n);
        let huge = scale_redshift_weight(1e9, z, k0, m, zt, n);

        // Assert
        assert_eq!(at_zero, 0.0);
        assert!(tiny < 1e-10);
        assert!((huge - redshift_weight(z, zt, n)).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The redshift factor decreases monotonically in z for positive steepness.
    fn redshift_weight_is_monotone_decreasing() {
        let mut prev = f64::INFINITY;
        for i in 0..200 {
            let z = 0.05 * i as f64;
            let w = redshift_weight(z, 1.0, 3.0);
            assert!(w < prev, "redshift weight should strictly decrease: z={z}");
            prev = w;
        }
    }

    #[test]
    // Purpose
    // -------
    // Γ(a=0) = Γ₀, Γ decays towards zero at large a, and it never increases.
    //
    // Given
    // -----
    // - log10 Γ₀ = -18, a* = 0.5, p = 2.
    //
    // Expect
    // ------
    // - Γ(0) equals 1e-18 to relative precision.
    // - Γ(1e4) < 1e-30.
    // - Γ is non-increasing on a grid in [0, 10].
    fn decoherence_rate_endpoints_and_monotonicity() {
        // Arrange
        let params = DecoherenceParams::new(-18.0, 0.5, 2.0, 2.725, 0.0);

        // Act
        let at_zero = decoherence_rate(0.0, &params);
        let late = decoherence_rate(1e4, &params);

        // Assert
        assert!((at_zero - 1e-18).abs() < 1e-30);
        assert!(late < 1e-30);
        let mut prev = f64::INFINITY;
        for i in 0..=1000 {
            let a = 0.01 * i as f64;
            let rate = decoherence_rate(a, &params);
            assert!(rate <= prev);
            prev = rate;
        }
    }

    #[test]
    // Purpose
    // -------
    // The binned model picks the low bin at and below the split, the high bin
    // strictly above it, and drops the redshift-steepness factor.
    fn clustering_modifier_binned_selects_bins() {
        // Arrange
        let params = BinnedClusteringParams::new(0.1, -0.2, 0.5, 0.05, 2.0);
        let k = 1e6;

        // Act
        let below = clustering_modifier_binned(k, 0.2, &params);
        let at_split = clustering_modifier_binned(k, 0.5, &params);
        let above = clustering_modifier_binned(k, 0.6, &params);

        // Assert
        assert!((below - 0.1).abs() < 1e-9);
        assert!((at_split - 0.1).abs() < 1e-9);
        assert!((above + 0.2).abs() < 1e-9);
        assert_eq!(clustering_of_a_binned(1.0, &params), 0.1);
        assert_eq!(clustering_of_a_binned(0.5, &params), -0.2);
    }

    #[test]
    // Purpose
    // -------
    // Continuous μ at the pivot equals amplitude × 1/2 × S(z).
    fn clustering_modifier_at_pivot_is_half_scale_weight() {
        let params = ClusteringParams::new(0.3, 0.07, 2.0, 1.5, 3.0);
        let mu = clustering_modifier(0.07, 0.0, &params);
        let expected = 0.3 * 0.5 * redshift_weight(0.0, 1.5, 3.0);
        assert!((mu - expected).abs() < 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // The coherence length falls below its present-day value at higher z.
    fn coherence_length_decreases_with_redshift() {
        let params = CoherenceLengthParams::default();
        let today = coherence_length(0.0, &params);
        let later = coherence_length(2.0, &params);
        assert!(today > later);
        assert!((today - 300.0 * redshift_weight(0.0, 1.0, 2.0)).abs() < 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Array helpers broadcast a scalar redshift across a k-grid and match the
    // scalar functions element-wise.
    fn array_helpers_broadcast_and_match_scalars() {
        // Arrange
        let k: Array1<f64> = array![0.001, 0.01, 0.1, 1.0];
        let z = Array1::from_elem(4, 0.5);
        let lens = LensingParams::new(0.2, 0.1, 2.0, 2.0, 2.0);
        let clus = ClusteringParams::with_amplitude(0.1);

        // Act
        let sigma = lensing_modifier_array(k.view(), z.view(), &lens);
        let mu = clustering_modifier_array(k.view(), z.view(), &clus);

        // Assert
        for i in 0..k.len() {
            assert!((sigma[i] - lensing_modifier(k[i], 0.5, &lens)).abs() < 1e-15);
            assert!((mu[i] - clustering_modifier(k[i], 0.5, &clus)).abs() < 1e-15);
        }
    }
}
