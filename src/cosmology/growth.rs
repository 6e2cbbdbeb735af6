//! cosmology::growth — linear growth factor with a modified effective G.
//!
//! Purpose
//! -------
//! Integrate the linear growth equation with an optional clustering
//! modification μ(a) and provide D(a), f = d ln D / d ln a and fσ8(z) for
//! the growth likelihood block.
//!
//! Key behaviors
//! -------------
//! - In x = ln a the equation reads
//!   D_xx + (2 + d ln H/d ln a) D_x - 1.5 Ωm(a) (1 + μ(a)) D = 0,
//!   which is the usual a-space form divided through by a².
//! - Explicit RK2 (midpoint) with a fixed maximum step in ln a, starting
//!   deep in matter domination at a = 1e-3 on the growing mode D = a.
//! - D is normalized so that D(a = 1) = 1.
//!
//! Invariants & assumptions
//! ------------------------
//! - Radiation is neglected, so the matter-era initial condition is exact
//!   for μ = 0 and a good approximation for small constant μ.
//! - Requested scale factors must be finite and positive; they may exceed 1.

use crate::cosmology::{
    background::Lcdm,
    errors::{CosmologyError, CosmologyResult},
};
use ndarray::{Array1, ArrayView1};

const A_INIT: f64 = 1e-3;
const MAX_STEP_LN_A: f64 = 2e-3;

/// D and f at one scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPoint {
    pub a: f64,
    /// Growth factor normalized to D(1) = 1.
    pub d: f64,
    /// Growth rate f = d ln D / d ln a.
    pub f: f64,
}

/// Linear growth solver over a background with a μ(a) hook.
#[derive(Debug, Clone)]
pub struct GrowthModel<M = fn(f64) -> f64> {
    cosmo: Lcdm,
    mu_of_a: M,
}

fn no_modification(_: f64) -> f64 {
    0.0
}

impl GrowthModel {
    /// GR growth (μ = 0).
    pub fn new(cosmo: Lcdm) -> Self {
        Self { cosmo, mu_of_a: no_modification }
    }
}

impl<M: Fn(f64) -> f64> GrowthModel<M> {
    /// Growth with a clustering modification μ(a).
    pub fn with_mu(cosmo: Lcdm, mu_of_a: M) -> Self {
        Self { cosmo, mu_of_a }
    }

    pub fn cosmology(&self) -> &Lcdm {
        &self.cosmo
    }

    /// Solve at each requested scale factor, returned in input order.
    ///
    /// Errors
    /// ------
    /// - `InvalidScaleFactor` for non-finite or non-positive entries.
    pub fn solve(&self, a: &[f64]) -> CosmologyResult<Vec<GrowthPoint>> {
        if let Some(&bad) = a.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(CosmologyError::InvalidScaleFactor { a: bad });
        }
        let mut order: Vec<usize> = (0..a.len()).collect();
        order.sort_by(|&i, &j| a[i].total_cmp(&a[j]));

        let mut raw = vec![(0.0, 0.0); a.len()];
        let mut d_at_one = None;
        let mut x = A_INIT.ln();
        let mut state = [A_INIT, A_INIT];
        let mut targets = order.iter().map(|&i| (Some(i), a[i])).collect::<Vec<_>>();
        let insert_at = targets.partition_point(|&(_, v)| v < 1.0);
        targets.insert(insert_at, (None, 1.0));

        for (slot, target) in targets {
            let x_target = target.ln();
            if x_target > x {
                state = self.integrate(state, x, x_target);
                x = x_target;
            }
            let (d, dx) = if x_target < A_INIT.ln() {
                // Before the initial epoch D ∝ a on the growing mode.
                (target, target)
            } else {
                (state[0], state[1])
            };
            match slot {
                Some(i) => raw[i] = (d, dx),
                None => d_at_one = Some(d),
            }
        }

        let norm = d_at_one.unwrap_or(1.0);
        Ok(a.iter()
            .zip(raw)
            .map(|(&a, (d, dx))| GrowthPoint { a, d: d / norm, f: dx / d })
            .collect())
    }

    /// D(a) normalized to D(1) = 1.
    pub fn growth_factor(&self, a: f64) -> CosmologyResult<f64> {
        Ok(self.solve(&[a])?[0].d)
    }

    /// f(a) = d ln D / d ln a.
    pub fn growth_rate(&self, a: f64) -> CosmologyResult<f64> {
        Ok(self.solve(&[a])?[0].f)
    }

    /// fσ8(z) = f(z) · σ8,0 · D(z).
    pub fn fsigma8(&self, z: f64, sigma8_0: f64) -> CosmologyResult<f64> {
        Ok(self.fsigma8_array(ndarray::arr1(&[z]).view(), sigma8_0)?[0])
    }

    /// fσ8 on a redshift array from a single integration.
    ///
    /// Errors
    /// ------
    /// - `InvalidRedshift` for z ≤ -1 or non-finite z.
    pub fn fsigma8_array(
        &self, z: ArrayView1<'_, f64>, sigma8_0: f64,
    ) -> CosmologyResult<Array1<f64>> {
        if let Some(&bad) = z.iter().find(|v| !v.is_finite() || **v <= -1.0) {
            return Err(CosmologyError::InvalidRedshift { z: bad });
        }
        let a: Vec<f64> = z.iter().map(|&z| 1.0 / (1.0 + z)).collect();
        let points = self.solve(&a)?;
        Ok(points.iter().map(|p| p.f * sigma8_0 * p.d).collect())
    }

    fn integrate(&self, mut state: [f64; 2], x_from: f64, x_to: f64) -> [f64; 2] {
        let steps = ((x_to - x_from) / MAX_STEP_LN_A).ceil().max(1.0) as usize;
        let h = (x_to - x_from) / steps as f64;
        let mut x = x_from;
        for _ in 0..steps {
            let k1 = self.derivative(x, state);
            let mid = [state[0] + 0.5 * h * k1[0], state[1] + 0.5 * h * k1[1]];
            let k2 = self.derivative(x + 0.5 * h, mid);
            state = [state[0] + h * k2[0], state[1] + h * k2[1]];
            x += h;
        }
        state
    }

    fn derivative(&self, x: f64, [d, dx]: [f64; 2]) -> [f64; 2] {
        let a = x.exp();
        let mu = (self.mu_of_a)(a);
        let friction = 2.0 + self.cosmo.dlnh_dlna(a);
        let source = 1.5 * self.cosmo.omega_m_of_a(a) * (1.0 + mu);
        [dx, -friction * dx + source * d]
    }
}
