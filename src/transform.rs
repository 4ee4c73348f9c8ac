//! Probit coordinate transform between a bounded box and R^D.
//!
//! Each coordinate is rescaled to the unit interval and mapped through the
//! standard normal quantile function, so the box center goes to the origin
//! and the transform is monotonic per dimension.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::{erf, erf_inv};

use crate::error::InputError;
use crate::types::{Bounds, SampleSet};

/// Map one point from the open box to probit space.
///
/// # Errors
///
/// Fails if the point has the wrong dimension or is not strictly inside.
pub fn to_probit(point: &[f64], bounds: &Bounds) -> Result<Vec<f64>, InputError> {
    check_point(point, bounds, 0)?;
    Ok(point
        .iter()
        .zip(bounds.iter())
        .map(|(&x, &(a, b))| SQRT_2 * erf_inv(2.0 * (x - a) / (b - a) - 1.0))
        .collect())
}

/// Map one point from probit space back into the box.
pub fn from_probit(point: &[f64], bounds: &Bounds) -> Result<Vec<f64>, InputError> {
    if point.len() != bounds.dim() {
        return Err(InputError::DimensionMismatch {
            expected: bounds.dim(),
            found: point.len(),
        });
    }
    Ok(point
        .iter()
        .zip(bounds.iter())
        .map(|(&y, &(a, b))| a + (b - a) * 0.5 * (1.0 + erf(y / SQRT_2)))
        .collect())
}

/// Transform every sample of a set.
pub fn to_probit_set(samples: &SampleSet, bounds: &Bounds) -> Result<SampleSet, InputError> {
    samples.check_dim(bounds)?;
    let mut data = Vec::with_capacity(samples.as_slice().len());
    for (index, row) in samples.rows().enumerate() {
        check_point(row, bounds, index)?;
        data.extend(to_probit(row, bounds)?);
    }
    SampleSet::new(data, samples.dim())
}

/// `ln |dy/dx|` of the transform at a natural-space point.
///
/// A density in probit space is turned into a natural-space density by
/// adding this term to its logarithm.
pub fn log_jacobian(point: &[f64], bounds: &Bounds) -> Result<f64, InputError> {
    let y = to_probit(point, bounds)?;
    Ok(y.iter()
        .zip(bounds.iter())
        .map(|(&yi, &(a, b))| 0.5 * yi * yi + 0.5 * (2.0 * PI).ln() - (b - a).ln())
        .sum())
}

fn check_point(point: &[f64], bounds: &Bounds, index: usize) -> Result<(), InputError> {
    if point.len() != bounds.dim() {
        return Err(InputError::DimensionMismatch {
            expected: bounds.dim(),
            found: point.len(),
        });
    }
    match bounds.first_violation(point) {
        Some((dim, value)) => Err(InputError::OutsideBounds { index, dim, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_origin() {
        let b = Bounds::new(vec![(-5.0, 5.0), (2.0, 100.0)]).unwrap();
        let y = to_probit(b.center().as_slice(), &b).unwrap();
        for v in y {
            assert!(v.abs() < 1e-12);
        }
    }

    #[test]
    fn test_inverse() {
        let b = Bounds::new(vec![(0.0, 1.0), (-3.0, 7.0)]).unwrap();
        let x = [0.137, 6.2];
        let back = from_probit(&to_probit(&x, &b).unwrap(), &b).unwrap();
        for (u, v) in x.iter().zip(back) {
            assert!((u - v).abs() < 1e-9, "{u} vs {v}");
        }
    }

    #[test]
    fn test_monotonic() {
        let b = Bounds::interval(0.0, 10.0).unwrap();
        let ys: Vec<f64> = (1..100)
            .map(|i| to_probit(&[i as f64 * 0.1], &b).unwrap()[0])
            .collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_boundary_rejected() {
        let b = Bounds::interval(0.0, 1.0).unwrap();
        assert!(to_probit(&[0.0], &b).is_err());
        assert!(to_probit(&[1.2], &b).is_err());
        assert!(to_probit(&[0.5, 0.5], &b).is_err());
    }

    #[test]
    fn test_log_jacobian_at_center() {
        // dy/dx at the center is sqrt(2π) / width.
        let b = Bounds::interval(-1.0, 1.0).unwrap();
        let lj = log_jacobian(&[0.0], &b).unwrap();
        assert!((lj - ((2.0 * PI).sqrt() / 2.0).ln()).abs() < 1e-12);
    }
}
