//! diagnostics::rhat — Gelman–Rubin potential scale reduction.
//!
//! Purpose
//! -------
//! Compare between-chain and within-chain variance of independent chains
//! (or of contiguous pieces of one chain) to detect non-convergence.
//!
//! Key behaviors
//! -------------
//! - Chains are trimmed to the shortest length N before comparison.
//! - W = mean of per-chain variances (ddof = 1), B = N · var(chain means)
//!   (ddof = 1), and R̂ = √(((N-1)/N · W + B/N) / (W + ε)).
//! - [`split_rhat`] applies the same formula to the two halves of one
//!   series; [`segmented_rhat`] to `k` contiguous segments of a sample
//!   matrix, column by column.
//!
//! Invariants & assumptions
//! ------------------------
//! - ε = 1e-12 keeps identical constant chains finite; R̂ is then 0 rather
//!   than NaN.
//! - One chain has no R̂. That case is an explicit error, never an
//!   approximation.
//!
//! Testing notes
//! -------------
//! - Split-R̂ is weaker than the multi-chain statistic: a drift spanning the
//!   whole run looks the same in both halves and is not detected.

use crate::diagnostics::errors::{DiagnosticsError, DiagnosticsResult};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis, s};
use tracing::warn;

const VARIANCE_FLOOR: f64 = 1e-12;

/// R̂ of one scalar quantity across `chains`.
///
/// Errors
/// ------
/// - `InsufficientChains` for fewer than two chains.
/// - `Unavailable` if the shortest chain has fewer than two samples.
/// - `NonFiniteInput` for NaN or ±∞ samples in the trimmed range.
pub fn gelman_rubin(chains: &[ArrayView1<'_, f64>]) -> DiagnosticsResult<f64> {
    let m = chains.len();
    if m < 2 {
        warn!(chains = m, "R-hat requires at least two chains; reporting unavailable");
        return Err(DiagnosticsError::InsufficientChains { found: m, required: 2 });
    }
    let n = chains.iter().map(|c| c.len()).min().unwrap_or(0);
    if n < 2 {
        warn!(n, "R-hat requires at least two samples per chain; reporting unavailable");
        return Err(DiagnosticsError::Unavailable {
            diagnostic: "R-hat",
            reason: "chains need at least two samples each",
        });
    }

    let mut variances = Array1::<f64>::zeros(m);
    let mut means = Array1::<f64>::zeros(m);
    for (i, chain) in chains.iter().enumerate() {
        let trimmed = chain.slice(s![..n]);
        if let Some((index, &value)) = trimmed.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(DiagnosticsError::NonFiniteInput { index, value });
        }
        means[i] = trimmed.sum() / n as f64;
        variances[i] = trimmed.var(1.0);
    }
    let nf = n as f64;
    let w = variances.sum() / m as f64;
    let b = nf * means.var(1.0);
    let var_plus = (nf - 1.0) / nf * w + b / nf;
    Ok((var_plus / (w + VARIANCE_FLOOR)).sqrt())
}

/// Column-wise R̂ for chains stored as `n_i × ndim` matrices.
///
/// Errors
/// ------
/// - As [`gelman_rubin`], plus `Unavailable` if the chains disagree in
///   `ndim`.
pub fn gelman_rubin_columns(chains: &[ArrayView2<'_, f64>]) -> DiagnosticsResult<Array1<f64>> {
    let ndim = match chains.first() {
        Some(c) => c.ncols(),
        None => return Err(DiagnosticsError::InsufficientChains { found: 0, required: 2 }),
    };
    if chains.iter().any(|c| c.ncols() != ndim) {
        return Err(DiagnosticsError::Unavailable {
            diagnostic: "R-hat",
            reason: "chains have different numbers of parameters",
        });
    }
    (0..ndim)
        .map(|j| {
            let columns: Vec<ArrayView1<'_, f64>> = chains.iter().map(|c| c.column(j)).collect();
            gelman_rubin(&columns)
        })
        .collect()
}

/// Two-halves R̂ of a single series. A trailing odd sample is dropped.
pub fn split_rhat(series: ArrayView1<'_, f64>) -> DiagnosticsResult<f64> {
    let half = series.len() / 2;
    gelman_rubin(&[series.slice(s![..half]), series.slice(s![half..2 * half])])
}

/// Two-halves R̂ for every column of an `n × ndim` sample matrix.
pub fn split_rhat_columns(samples: ArrayView2<'_, f64>) -> DiagnosticsResult<Array1<f64>> {
    samples.axis_iter(Axis(1)).map(split_rhat).collect()
}

/// Column-wise R̂ over `segments` contiguous segments of the rows.
///
/// Errors
/// ------
/// - `Unavailable` when a segment would hold `min_segment_len` rows or
///   fewer.
pub fn segmented_rhat(
    samples: ArrayView2<'_, f64>, segments: usize, min_segment_len: usize,
) -> DiagnosticsResult<Array1<f64>> {
    let per_segment = if segments == 0 { 0 } else { samples.nrows() / segments };
    if per_segment <= min_segment_len {
        warn!(per_segment, segments, "segments too short for R-hat; reporting unavailable");
        return Err(DiagnosticsError::Unavailable {
            diagnostic: "R-hat",
            reason: "chain too short to split into segments",
        });
    }
    let pieces: Vec<ArrayView2<'_, f64>> = (0..segments)
        .map(|i| samples.slice(s![i * per_segment..(i + 1) * per_segment, ..]))
        .collect();
    gelman_rubin_columns(&pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};
    use rand_xoshiro::Xoshiro256PlusPlus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - R̂ ≈ 1 for independent draws from one distribution.
    // - R̂ ≫ 1 for chains centred in different places.
    // - The single-chain refusal and the zero-variance guard.
    // - Split and segmented variants.
    // -------------------------------------------------------------------------

    fn normal(n: usize, mean: f64, seed: u64) -> Array1<f64> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                let e: f64 = StandardNormal.sample(&mut rng);
                mean + e
            })
            .collect()
    }

    #[test]
    // Purpose
    // -------
    // Two long chains from the same stationary distribution give R̂ near 1.
    //
    // Given
    // -----
    // - Two independent N(0, 1) chains of 5000 and 6000 samples.
    //
    // Expect
    // ------
    // - |R̂ - 1| < 0.05 after trimming to 5000.
    fn same_distribution_gives_rhat_near_one() {
        let a = normal(5_000, 0.0, 1);
        let b = normal(6_000, 0.0, 2);

        let rhat = gelman_rubin(&[a.view(), b.view()]).unwrap();

        assert!((rhat - 1.0).abs() < 0.05, "rhat = {rhat}");
    }

    #[test]
    // Purpose
    // -------
    // Chains stuck in different modes give a large R̂.
    fn separated_chains_give_large_rhat() {
        let a = normal(1_000, 0.0, 3);
        let b = normal(1_000, 5.0, 4);

        let rhat = gelman_rubin(&[a.view(), b.view()]).unwrap();

        assert!(rhat > 2.0, "rhat = {rhat}");
    }

    #[test]
    // Purpose
    // -------
    // One chain is unavailable; identical constant chains do not divide by
    // zero.
    fn single_chain_unavailable_and_constant_chains_finite() {
        let a = array![1.0, 1.0, 1.0, 1.0];

        let single = gelman_rubin(&[a.view()]);
        let constant = gelman_rubin(&[a.view(), a.view()]).unwrap();

        assert_eq!(
            single.unwrap_err(),
            DiagnosticsError::InsufficientChains { found: 1, required: 2 }
        );
        assert!(constant.is_finite());
        assert_eq!(constant, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Split-R̂ is near 1 for a stationary series and large for a series
    // whose halves sit at different levels; segmented R̂ refuses short
    // segments.
    fn split_and_segmented_variants() {
        let stationary = normal(4_000, 0.0, 5);
        let mut shifted = normal(4_001, 0.0, 6);
        shifted.slice_mut(s![2_000..]).mapv_inplace(|v| v + 4.0);
        let mut samples = Array2::zeros((800, 2));
        samples.column_mut(0).assign(&normal(800, 0.0, 7));
        samples.column_mut(1).assign(&normal(800, 1.0, 8));

        let r_stationary = split_rhat(stationary.view()).unwrap();
        let r_shifted = split_rhat(shifted.view()).unwrap();
        let segmented = segmented_rhat(samples.view(), 4, 100).unwrap();
        let too_short = segmented_rhat(samples.view(), 8, 100);

        assert!((r_stationary - 1.0).abs() < 0.05);
        assert!(r_shifted > 1.5);
        assert_eq!(segmented.len(), 2);
        assert!(segmented.iter().all(|r| (r - 1.0).abs() < 0.1));
        assert!(matches!(too_short, Err(DiagnosticsError::Unavailable { .. })));
    }
}
