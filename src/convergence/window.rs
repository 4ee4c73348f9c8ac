//! Sliding-window width for the angular coefficients.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::MIN_WINDOW;
use crate::error::DiagnosticError;

/// Resolved window, in samples and in entropy evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    /// Width in ingested samples.
    pub samples: usize,
    /// Width in entropy evaluations (`samples / entropy_interval`).
    pub evaluations: usize,
    /// Whether the width is below the 200-sample floor.
    pub reduced_confidence: bool,
}

/// Default width for `n_samples` samples.
pub fn default_window(n_samples: usize) -> usize {
    if n_samples > MIN_WINDOW {
        (n_samples / 5).max(MIN_WINDOW)
    } else {
        n_samples / 5
    }
}

/// Resolve the window for `n_samples` samples evaluated every
/// `entropy_interval` samples.
///
/// # Errors
///
/// [`DiagnosticError::ZeroInterval`] for a zero interval, and
/// [`DiagnosticError::WindowTooSmall`] when fewer than two evaluations fit
/// in the window.
pub fn resolve_window(
    n_samples: usize,
    requested: Option<usize>,
    entropy_interval: usize,
) -> Result<WindowPolicy, DiagnosticError> {
    if entropy_interval == 0 {
        return Err(DiagnosticError::ZeroInterval);
    }
    let samples = requested.unwrap_or_else(|| default_window(n_samples));
    let evaluations = samples / entropy_interval;
    if evaluations < 2 {
        return Err(DiagnosticError::WindowTooSmall {
            window: evaluations,
        });
    }

    let reduced_confidence = samples < MIN_WINDOW;
    if reduced_confidence {
        warn!(
            window = samples,
            floor = MIN_WINDOW,
            "window is below the recommended minimum; the convergence estimate may be unreliable"
        );
    }

    Ok(WindowPolicy {
        samples,
        evaluations,
        reduced_confidence,
    })
}
