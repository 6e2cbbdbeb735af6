//! Piecewise-linear interpolation with NaN outside the model support.

use crate::likelihood::errors::{LikelihoodError, LikelihoodResult};
use ndarray::{Array1, ArrayView1};

/// Check that `xp` is non-empty, finite and strictly increasing.
pub fn validate_grid(xp: ArrayView1<'_, f64>) -> LikelihoodResult<()> {
    if xp.is_empty() {
        return Err(LikelihoodError::EmptyData { what: "model grid" });
    }
    if let Some((index, &value)) = xp.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(LikelihoodError::NonFiniteInput { what: "model grid", index, value });
    }
    for i in 1..xp.len() {
        if xp[i] <= xp[i - 1] {
            return Err(LikelihoodError::NonMonotoneGrid {
                index: i,
                previous: xp[i - 1],
                value: xp[i],
            });
        }
    }
    Ok(())
}

/// Interpolate `(xp, fp)` linearly at `x`.
///
/// Points with `x < xp[0]` or `x > xp[last]` (or non-finite `x`) return
/// NaN. The endpoints themselves are inside the support.
///
/// Errors
/// ------
/// - `LengthMismatch` when `xp` and `fp` differ in length.
/// - Any error from [`validate_grid`].
pub fn interp_or_nan(
    x: ArrayView1<'_, f64>, xp: ArrayView1<'_, f64>, fp: ArrayView1<'_, f64>,
) -> LikelihoodResult<Array1<f64>> {
    if fp.len() != xp.len() {
        return Err(LikelihoodError::LengthMismatch {
            what: "model values",
            expected: xp.len(),
            actual: fp.len(),
        });
    }
    validate_grid(xp)?;
    let xs = xp.to_vec();
    Ok(x.mapv(|xi| interp_point(xi, &xs, |i| fp[i])))
}

fn interp_point<F: Fn(usize) -> f64>(x: f64, xp: &[f64], fp: F) -> f64 {
    let n = xp.len();
    if !x.is_finite() || x < xp[0] || x > xp[n - 1] {
        return f64::NAN;
    }
    if n == 1 {
        return fp(0);
    }
    // First index with xp[j] > x; x lies in [xp[j-1], xp[j]).
    let j = xp.partition_point(|&v| v <= x);
    if j == n {
        return fp(n - 1);
    }
    let (x0, x1) = (xp[j - 1], xp[j]);
    let t = (x - x0) / (x1 - x0);
    fp(j - 1) + t * (fp(j) - fp(j - 1))
}
