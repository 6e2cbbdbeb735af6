//! cosmology::background — flat/curved wCDM expansion history and distances.
//!
//! Purpose
//! -------
//! Supply the background quantities the BAO and SNe likelihood blocks need:
//! E(z), H(z), comoving and transverse distances, D_A, D_L, D_V/r_d and the
//! distance modulus.
//!
//! Key behaviors
//! -------------
//! - E(z)² = Ωm(1+z)³ + Ωk(1+z)² + Ω_DE(1+z)^{3(1+w)} with Ω_DE = 1 - Ωm - Ωk.
//! - The line-of-sight integral ∫dz/E is computed with composite Simpson
//!   quadrature on a uniform grid whose resolution scales with z.
//! - Curvature enters through sinh/sin of √|Ωk| · χ H0/c.
//!
//! Conventions
//! -----------
//! - Distances in Mpc, H in km/s/Mpc, c = 299792.458 km/s.
//! - Radiation is neglected.

use crate::cosmology::errors::{CosmologyError, CosmologyResult};
use serde::{Deserialize, Serialize};

/// Speed of light in km/s.
pub const SPEED_OF_LIGHT: f64 = 299_792.458;

const MIN_INTERVALS: usize = 16;
const MAX_INTERVALS: usize = 20_000;
const INTERVALS_PER_UNIT_Z: f64 = 200.0;

/// Background cosmology with a constant dark-energy equation of state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lcdm {
    pub h0: f64,
    pub omega_m: f64,
    pub omega_b: f64,
    pub omega_k: f64,
    pub t_cmb: f64,
    /// Dark-energy equation of state w.
    pub w: f64,
    /// Sound horizon at the drag epoch in Mpc.
    pub r_d: f64,
}

impl Lcdm {
    /// Construct and validate.
    ///
    /// Errors
    /// ------
    /// - `InvalidParameter` if any value is non-finite, `h0 ≤ 0`, `r_d ≤ 0`,
    ///   `omega_m < 0`, or `omega_b` lies outside `[0, omega_m]`.
    pub fn new(
        h0: f64, omega_m: f64, omega_b: f64, omega_k: f64, t_cmb: f64, w: f64, r_d: f64,
    ) -> CosmologyResult<Self> {
        for (name, value) in [
            ("h0", h0),
            ("omega_m", omega_m),
            ("omega_b", omega_b),
            ("omega_k", omega_k),
            ("t_cmb", t_cmb),
            ("w", w),
            ("r_d", r_d),
        ] {
            if !value.is_finite() {
                return Err(CosmologyError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        if h0 <= 0.0 {
            return Err(CosmologyError::InvalidParameter {
                name: "h0",
                value: h0,
                reason: "must be strictly positive",
            });
        }
        if r_d <= 0.0 {
            return Err(CosmologyError::InvalidParameter {
                name: "r_d",
                value: r_d,
                reason: "must be strictly positive",
            });
        }
        if omega_m < 0.0 {
            return Err(CosmologyError::InvalidParameter {
                name: "omega_m",
                value: omega_m,
                reason: "must be non-negative",
            });
        }
        if omega_b < 0.0 || omega_b > omega_m {
            return Err(CosmologyError::InvalidParameter {
                name: "omega_b",
                value: omega_b,
                reason: "must lie in [0, omega_m]",
            });
        }
        Ok(Self { h0, omega_m, omega_b, omega_k, t_cmb, w, r_d })
    }

    pub fn h(&self) -> f64 {
        self.h0 / 100.0
    }

    pub fn omega_de(&self) -> f64 {
        1.0 - self.omega_m - self.omega_k
    }

    /// Hubble distance c/H0 in Mpc.
    pub fn hubble_distance(&self) -> f64 {
        SPEED_OF_LIGHT / self.h0
    }

    /// Dimensionless expansion rate E(z) = H(z)/H0.
    pub fn e_of_z(&self, z: f64) -> f64 {
        let x = 1.0 + z;
        (self.omega_m * x.powi(3)
            + self.omega_k * x * x
            + self.omega_de() * x.powf(3.0 * (1.0 + self.w)))
        .sqrt()
    }

    /// H(z) in km/s/Mpc.
    pub fn hubble(&self, z: f64) -> f64 {
        self.h0 * self.e_of_z(z)
    }

    /// Line-of-sight comoving distance χ(z) = c/H0 ∫₀ᶻ dz'/E(z').
    ///
    /// Errors
    /// ------
    /// - `InvalidRedshift` for negative or non-finite z.
    pub fn line_of_sight_distance(&self, z: f64) -> CosmologyResult<f64> {
        check_redshift(z)?;
        Ok(self.hubble_distance() * simpson(|zp| 1.0 / self.e_of_z(zp), 0.0, z, interval_count(z)))
    }

    /// Transverse comoving distance D_M(z), including curvature.
    pub fn comoving_distance(&self, z: f64) -> CosmologyResult<f64> {
        let chi = self.line_of_sight_distance(z)?;
        if self.omega_k == 0.0 {
            return Ok(chi);
        }
        let dh = self.hubble_distance();
        let sqrt_ok = self.omega_k.abs().sqrt();
        let x = sqrt_ok * chi / dh;
        Ok(if self.omega_k > 0.0 { dh * x.sinh() / sqrt_ok } else { dh * x.sin() / sqrt_ok })
    }

    pub fn angular_diameter_distance(&self, z: f64) -> CosmologyResult<f64> {
        Ok(self.comoving_distance(z)? / (1.0 + z))
    }

    pub fn luminosity_distance(&self, z: f64) -> CosmologyResult<f64> {
        Ok(self.comoving_distance(z)? * (1.0 + z))
    }

    /// D_V(z)/r_d with D_V = (c z D_M² / H(z))^{1/3}.
    pub fn dv_over_rd(&self, z: f64) -> CosmologyResult<f64> {
        let dm = self.comoving_distance(z)?;
        let dv = (SPEED_OF_LIGHT * z * dm * dm / self.hubble(z)).cbrt();
        Ok(dv / self.r_d)
    }

    /// μ(z) = 5 log₁₀(max(D_L, 1e-6)) + 25, D_L in Mpc.
    pub fn distance_modulus(&self, z: f64) -> CosmologyResult<f64> {
        let dl = self.luminosity_distance(z)?;
        Ok(5.0 * dl.max(1e-6).log10() + 25.0)
    }

    /// Ωm(a) = Ωm a⁻³ / E².
    pub fn omega_m_of_a(&self, a: f64) -> f64 {
        let e = self.e_of_z(1.0 / a - 1.0);
        self.omega_m / (a * a * a * e * e)
    }

    /// d ln H / d ln a = -(3Ωm(a) + 2Ωk(a) + 3(1+w)Ω_DE(a)) / 2.
    pub fn dlnh_dlna(&self, a: f64) -> f64 {
        let e2 = self.e_of_z(1.0 / a - 1.0).powi(2);
        let om = self.omega_m * a.powi(-3) / e2;
        let ok = self.omega_k * a.powi(-2) / e2;
        let ode = self.omega_de() * a.powf(-3.0 * (1.0 + self.w)) / e2;
        -0.5 * (3.0 * om + 2.0 * ok + 3.0 * (1.0 + self.w) * ode)
    }
}

impl Default for Lcdm {
    fn default() -> Self {
        Self {
            h0: 67.74,
            omega_m: 0.315,
            omega_b: 0.049,
            omega_k: 0.0,
            t_cmb: 2.7255,
            w: -1.0,
            r_d: 147.1,
        }
    }
}

/// CPL equation of state w(a) = w0 + wa(1 - a).
pub fn w_eff(a: f64, w0: f64, wa: f64) -> f64 {
    w0 + wa * (1.0 - a)
}

fn check_redshift(z: f64) -> CosmologyResult<()> {
    if !z.is_finite() || z < 0.0 {
        return Err(CosmologyError::InvalidRedshift { z });
    }
    Ok(())
}

fn interval_count(z: f64) -> usize {
    let n = ((z * INTERVALS_PER_UNIT_Z).ceil() as usize).clamp(MIN_INTERVALS, MAX_INTERVALS);
    n + n % 2
}

/// Composite Simpson rule on `n` (even) uniform intervals.
fn simpson<F: Fn(f64) -> f64>(f: F, lo: f64, hi: f64, n: usize) -> f64 {
    if hi == lo {
        return 0.0;
    }
    let h = (hi - lo) / n as f64;
    let interior: f64 = (1..n)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(lo + i as f64 * h)
        })
        .sum();
    h / 3.0 * (f(lo) + interior + f(hi))
}
