//! Cosmological distances and detector-frame to source-frame conversion.
//!
//! - [`Cosmology`]: ΛCDM background with optional spatial curvature
//! - [`invert_redshift`]: Newton search for `z` given a luminosity distance
//! - [`to_source_frame`]: per-event conversion of detector-frame masses

mod frame;
mod redshift;

pub use frame::{
    chi_effective, chirp_mass, to_source_frame, DetectorFrameSamples, FailurePolicy, Parameter,
    SkyPosition, SourceFrameSamples, SpinSamples,
};
pub use redshift::{invert_redshift, invert_redshift_with};

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::constants::{PLANCK_H, PLANCK_OMEGA_LAMBDA, PLANCK_OMEGA_M, SPEED_OF_LIGHT_KM_S};
use crate::error::RedshiftError;

/// Luminosity distance as a function of redshift.
pub trait DistanceModel {
    /// Luminosity distance in Mpc at redshift `z`.
    fn luminosity_distance(&self, z: f64) -> f64;

    /// `d d_L / dz` in Mpc.
    ///
    /// Defaults to a central finite difference.
    fn luminosity_distance_derivative(&self, z: f64) -> f64 {
        let h = 1e-6 * (1.0 + z.abs());
        (self.luminosity_distance(z + h) - self.luminosity_distance(z - h)) / (2.0 * h)
    }
}

/// ΛCDM cosmology `(h, Ω_m, Ω_Λ)` with curvature `Ω_k = 1 - Ω_m - Ω_Λ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cosmology {
    /// Reduced Hubble constant `H0 / (100 km/s/Mpc)`.
    pub h: f64,
    /// Matter density parameter.
    pub omega_m: f64,
    /// Dark energy density parameter.
    pub omega_lambda: f64,
}

impl Default for Cosmology {
    /// Planck 2021, flat.
    fn default() -> Self {
        Self {
            h: PLANCK_H,
            omega_m: PLANCK_OMEGA_M,
            omega_lambda: PLANCK_OMEGA_LAMBDA,
        }
    }
}

impl Cosmology {
    /// Validate and build a cosmology.
    pub fn new(h: f64, omega_m: f64, omega_lambda: f64) -> Result<Self, RedshiftError> {
        if !(h.is_finite() && h > 0.0) {
            return Err(RedshiftError::InvalidCosmology(format!("h must be positive, got {h}")));
        }
        if !(omega_m.is_finite() && omega_m >= 0.0 && omega_lambda.is_finite()) {
            return Err(RedshiftError::InvalidCosmology(format!(
                "density parameters must be finite with Ω_m >= 0, got ({omega_m}, {omega_lambda})"
            )));
        }
        Ok(Self {
            h,
            omega_m,
            omega_lambda,
        })
    }

    /// Parse `"h,om,ol"`.
    pub fn parse(text: &str) -> Result<Self, RedshiftError> {
        let values = text
            .split(',')
            .map(|t| t.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RedshiftError::InvalidCosmology(e.to_string()))?;
        match values.as_slice() {
            &[h, om, ol] => Self::new(h, om, ol),
            _ => Err(RedshiftError::InvalidCosmology(format!(
                "expected three comma-separated values, got {}",
                values.len()
            ))),
        }
    }

    /// Curvature density parameter.
    pub fn omega_k(&self) -> f64 {
        1.0 - self.omega_m - self.omega_lambda
    }

    /// Hubble distance `c / H0` in Mpc.
    pub fn hubble_distance(&self) -> f64 {
        SPEED_OF_LIGHT_KM_S / (100.0 * self.h)
    }

    /// Dimensionless Hubble rate `E(z) = H(z) / H0`.
    pub fn hubble_rate(&self, z: f64) -> f64 {
        let a = 1.0 + z;
        (self.omega_m * a * a * a + self.omega_k() * a * a + self.omega_lambda).sqrt()
    }

    /// Line-of-sight comoving distance in Mpc.
    pub fn comoving_distance(&self, z: f64) -> f64 {
        self.hubble_distance() * gauss_legendre(|x| 1.0 / self.hubble_rate(x), 0.0, z)
    }

    /// Transverse comoving distance in Mpc.
    pub fn transverse_comoving_distance(&self, z: f64) -> f64 {
        let dc = self.comoving_distance(z);
        let dh = self.hubble_distance();
        let ok = self.omega_k();
        if ok.abs() < 1e-12 {
            dc
        } else if ok > 0.0 {
            let s = ok.sqrt();
            dh / s * (s * dc / dh).sinh()
        } else {
            let s = (-ok).sqrt();
            dh / s * (s * dc / dh).sin()
        }
    }
}

impl DistanceModel for Cosmology {
    fn luminosity_distance(&self, z: f64) -> f64 {
        (1.0 + z) * self.transverse_comoving_distance(z)
    }

    fn luminosity_distance_derivative(&self, z: f64) -> f64 {
        let dh = self.hubble_distance();
        let dc = self.comoving_distance(z);
        let dm = self.transverse_comoving_distance(z);
        let ddc = dh / self.hubble_rate(z);
        let ok = self.omega_k();
        let ddm = if ok.abs() < 1e-12 {
            ddc
        } else if ok > 0.0 {
            ddc * (ok.sqrt() * dc / dh).cosh()
        } else {
            ddc * ((-ok).sqrt() * dc / dh).cos()
        };
        dm + (1.0 + z) * ddm
    }
}

const GL_ORDER: usize = 64;

static GL_RULE: OnceLock<(Vec<f64>, Vec<f64>)> = OnceLock::new();

/// Gauss-Legendre nodes and weights on [-1, 1], by Newton iteration on `P_n`.
fn gauss_legendre_rule() -> &'static (Vec<f64>, Vec<f64>) {
    GL_RULE.get_or_init(|| {
        let n = GL_ORDER;
        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];
        for i in 0..(n + 1) / 2 {
            let mut x = (std::f64::consts::PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
            let mut dp = 0.0;
            for _ in 0..100 {
                let (mut p0, mut p1) = (1.0, x);
                for k in 2..=n {
                    let p2 = ((2 * k - 1) as f64 * x * p1 - (k - 1) as f64 * p0) / k as f64;
                    p0 = p1;
                    p1 = p2;
                }
                dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
                let dx = p1 / dp;
                x -= dx;
                if dx.abs() < 1e-15 {
                    break;
                }
            }
            let w = 2.0 / ((1.0 - x * x) * dp * dp);
            nodes[i] = -x;
            nodes[n - 1 - i] = x;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }
        (nodes, weights)
    })
}

/// Integrate `f` over `[a, b]` with the 64-point Gauss-Legendre rule.
fn gauss_legendre<F: Fn(f64) -> f64>(f: F, a: f64, b: f64) -> f64 {
    let (nodes, weights) = gauss_legendre_rule();
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);
    nodes
        .iter()
        .zip(weights)
        .map(|(&x, &w)| w * f(mid + half * x))
        .sum::<f64>()
        * half
}
