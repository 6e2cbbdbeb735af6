//! likelihood::covariance — correlated-Gaussian χ² for binned bandpowers.
//!
//! Purpose
//! -------
//! Compute χ² = rᵀ C⁻¹ r for a residual vector r and covariance C. The
//! inverse comes from `nalgebra`'s LU-based `try_inverse`; when C is
//! singular the Moore–Penrose pseudo-inverse is used instead.
//!
//! Conventions
//! -----------
//! - Bin matching follows `numpy.allclose` defaults (rtol 1e-5, atol 1e-8).

use crate::likelihood::errors::{LikelihoodError, LikelihoodResult};
use nalgebra::{DMatrix, DVector};
use ndarray::{ArrayView1, ArrayView2};
use tracing::debug;

const GRID_RTOL: f64 = 1e-5;
const GRID_ATOL: f64 = 1e-8;
const PINV_EPS: f64 = 1e-12;

/// Require `model` to match `data` bin by bin.
pub fn ensure_matching_grid(
    data: ArrayView1<'_, f64>, model: ArrayView1<'_, f64>,
) -> LikelihoodResult<()> {
    if data.len() != model.len() {
        return Err(LikelihoodError::LengthMismatch {
            what: "model ell grid",
            expected: data.len(),
            actual: model.len(),
        });
    }
    for (index, (&d, &m)) in data.iter().zip(model.iter()).enumerate() {
        if (d - m).abs() > GRID_ATOL + GRID_RTOL * m.abs() {
            return Err(LikelihoodError::GridMismatch { index, data: d, model: m });
        }
    }
    Ok(())
}

/// χ² = rᵀ C⁻¹ r.
///
/// Errors
/// ------
/// - `CovarianceShape` when `cov` is not `n × n` with `n = residual.len()`.
/// - `NonFiniteInput` for a non-finite covariance entry.
/// - `SingularCovariance` if the pseudo-inverse also fails.
pub fn covariance_chi2(
    residual: ArrayView1<'_, f64>, cov: ArrayView2<'_, f64>,
) -> LikelihoodResult<f64> {
    let n = residual.len();
    if cov.nrows() != n || cov.ncols() != n {
        return Err(LikelihoodError::CovarianceShape {
            rows: cov.nrows(),
            cols: cov.ncols(),
            expected: n,
        });
    }
    if let Some((index, &value)) = cov.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(LikelihoodError::NonFiniteInput { what: "covariance entry", index, value });
    }
    let c = DMatrix::<f64>::from_fn(n, n, |i, j| cov[[i, j]]);
    let r = DVector::<f64>::from_iterator(n, residual.iter().copied());
    let icov = match c.clone().try_inverse() {
        Some(inv) => inv,
        None => {
            debug!(n, "covariance is singular, falling back to pseudo-inverse");
            c.pseudo_inverse(PINV_EPS)
                .map_err(|reason| LikelihoodError::SingularCovariance { reason })?
        }
    };
    Ok(r.dot(&(icov * &r)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // With a diagonal covariance the χ² reduces to Σ (r/σ)².
    fn diagonal_covariance_matches_sigma_chi2() {
        let r = array![1.0, -2.0, 0.5];
        let cov = array![[4.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.25]];

        let chi2 = covariance_chi2(r.view(), cov.view()).unwrap();

        assert!((chi2 - (0.25 + 4.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A singular covariance falls back to the pseudo-inverse instead of
    // failing.
    //
    // Given
    // -----
    // - C = [[1, 1], [1, 1]] (rank 1), r = [1, 1].
    //
    // Expect
    // ------
    // - C⁺ = C/4, so χ² = rᵀC⁺r = 1.
    fn singular_covariance_uses_pseudo_inverse() {
        let r = array![1.0, 1.0];
        let cov = array![[1.0, 1.0], [1.0, 1.0]];

        let chi2 = covariance_chi2(r.view(), cov.view()).unwrap();

        assert!((chi2 - 1.0).abs() < 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Shape and grid mismatches are configuration errors.
    fn shape_and_grid_mismatches_are_errors() {
        assert!(matches!(
            covariance_chi2(array![1.0, 2.0].view(), array![[1.0]].view()),
            Err(LikelihoodError::CovarianceShape { rows: 1, cols: 1, expected: 2 })
        ));
        assert!(matches!(
            ensure_matching_grid(array![30.0, 100.0].view(), array![30.0, 101.0].view()),
            Err(LikelihoodError::GridMismatch { index: 1, .. })
        ));
        assert!(ensure_matching_grid(array![30.0].view(), array![30.0 + 1e-9].view()).is_ok());
    }
}
