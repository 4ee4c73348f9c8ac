//! Redshift from luminosity distance by Newton iteration.

use tracing::trace;

use super::DistanceModel;
use crate::constants::{NEWTON_MAX_ITER, NEWTON_TOL, REDSHIFT_GUESS};
use crate::error::RedshiftError;

/// Solve `d_L(z) = distance` for `z`, starting from `z = 1`.
///
/// # Errors
///
/// Fails for non-positive or non-finite distances, a vanishing derivative,
/// or when the iteration does not settle within 50 steps. The failure
/// concerns this distance only.
pub fn invert_redshift<M: DistanceModel + ?Sized>(
    model: &M,
    distance: f64,
) -> Result<f64, RedshiftError> {
    invert_redshift_with(model, distance, REDSHIFT_GUESS, NEWTON_TOL, NEWTON_MAX_ITER)
}

/// [`invert_redshift`] with explicit start, step tolerance and iteration cap.
pub fn invert_redshift_with<M: DistanceModel + ?Sized>(
    model: &M,
    distance: f64,
    z0: f64,
    tol: f64,
    max_iter: usize,
) -> Result<f64, RedshiftError> {
    if !(distance.is_finite() && distance > 0.0) {
        return Err(RedshiftError::InvalidDistance(distance));
    }

    let mut z = z0;
    for iter in 0..max_iter {
        let residual = model.luminosity_distance(z) - distance;
        let slope = model.luminosity_distance_derivative(z);
        if !(slope.is_finite() && slope != 0.0) || !residual.is_finite() {
            return Err(RedshiftError::DegenerateDerivative { distance, z });
        }

        let mut step = residual / slope;
        // Redshift stays above -1; halve steps that would leave that range.
        while z - step <= -1.0 {
            step *= 0.5;
        }
        let next = z - step;
        trace!(iter, z = next, residual, "newton step");

        if (next - z).abs() < tol {
            return Ok(next);
        }
        z = next;
    }

    Err(RedshiftError::NotConverged {
        distance,
        iterations: max_iter,
        last: z,
    })
}
