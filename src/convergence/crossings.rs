//! Zero crossings of the angular coefficients and their aggregation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::slope::AngularCoefficients;
use super::trace::EntropyTraces;
use super::window::WindowPolicy;
use crate::error::DiagnosticError;

/// Offsets at which the sign of `series` changes.
///
/// Exact zeros and NaNs carry no sign and are skipped, so `+, 0, -` counts
/// as one crossing and `+, 0, +` as none. The offset is that of the last
/// element before the new sign.
pub fn zero_crossings(series: &[f64]) -> Vec<usize> {
    let mut crossings = Vec::new();
    let mut previous: Option<bool> = None;
    for (i, &v) in series.iter().enumerate() {
        let positive = if v > 0.0 {
            true
        } else if v < 0.0 {
            false
        } else {
            continue;
        };
        if previous.is_some_and(|p| p != positive) {
            crossings.push(i - 1);
        }
        previous = Some(positive);
    }
    crossings
}

/// Convergence of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConvergence {
    /// Sample indices of every zero crossing, in order.
    pub crossings: Vec<usize>,
    /// Sample index of the crossing that completed the required count.
    pub converged_at: Option<usize>,
}

/// Overall outcome of the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvergenceEstimate {
    /// Mean convergence index over the runs that converged.
    Converged {
        samples: usize,
        runs_converged: usize,
        runs_total: usize,
    },
    /// No run reached the required number of crossings.
    Inconclusive,
}

impl ConvergenceEstimate {
    /// The convergence index, if any.
    pub fn samples(&self) -> Option<usize> {
        match self {
            Self::Converged { samples, .. } => Some(*samples),
            Self::Inconclusive => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Per-run crossings and the aggregated estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub window: WindowPolicy,
    pub entropy_interval: usize,
    pub zero_crossings: usize,
    pub runs: Vec<RunConvergence>,
    pub estimate: ConvergenceEstimate,
}

/// Find the convergence index of a set of entropy traces.
///
/// Each run's angular coefficients are scanned for sign changes; a crossing
/// at offset `j` maps to sample `(window + j) * interval`. A run converges
/// once it has `required` crossings, at the last of them. The
/// estimate is the mean over converged runs, rounded down.
///
/// # Errors
///
/// [`DiagnosticError::ZeroCrossingsRequired`] if `required` is zero.
pub fn analyse_traces<A>(
    traces: &EntropyTraces,
    window: WindowPolicy,
    required: usize,
    slope: &A,
) -> Result<ConvergenceReport, DiagnosticError>
where
    A: AngularCoefficients + ?Sized,
{
    if required == 0 {
        return Err(DiagnosticError::ZeroCrossingsRequired);
    }
    let interval = traces.interval();

    let runs: Vec<RunConvergence> = traces
        .runs()
        .iter()
        .map(|values| {
            let coefficients = slope.angular_coefficients(values, window.evaluations);
            let crossings: Vec<usize> = zero_crossings(&coefficients)
                .into_iter()
                .map(|offset| (window.evaluations + offset) * interval)
                .collect();
            let converged_at = crossings.get(required - 1).copied();
            RunConvergence {
                crossings,
                converged_at,
            }
        })
        .collect();

    let converged: Vec<usize> = runs.iter().filter_map(|r| r.converged_at).collect();
    let runs_total = runs.len();
    debug!(runs_total, runs_converged = converged.len(), "analysed entropy traces");

    let estimate = if converged.is_empty() {
        info!(required, "convergence not reached yet");
        ConvergenceEstimate::Inconclusive
    } else {
        if converged.len() < runs_total {
            warn!(
                runs_converged = converged.len(),
                runs_total, "at least one draw did not converge"
            );
        }
        let sum: usize = converged.iter().sum();
        ConvergenceEstimate::Converged {
            samples: sum / converged.len(),
            runs_converged: converged.len(),
            runs_total,
        }
    };

    Ok(ConvergenceReport {
        window,
        entropy_interval: interval,
        zero_crossings: required,
        runs,
        estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::slope::LeastSquaresSlope;

    #[test]
    fn test_strict_sign_changes() {
        assert_eq!(zero_crossings(&[1.0, -1.0, 2.0, 3.0, -0.5]), vec![0, 1, 3]);
        assert_eq!(zero_crossings(&[1.0, 0.0, -1.0]), vec![1]);
        assert!(zero_crossings(&[1.0, 0.0, 1.0]).is_empty());
        assert!(zero_crossings(&[0.0, 0.0]).is_empty());
        assert_eq!(zero_crossings(&[-1.0, f64::NAN, 1.0]), vec![1]);
    }

    fn window(evaluations: usize, interval: usize) -> WindowPolicy {
        WindowPolicy {
            samples: evaluations * interval,
            evaluations,
            reduced_confidence: false,
        }
    }

    /// Identity primitive: the series is its own derivative.
    fn identity(series: &[f64], window: usize) -> Vec<f64> {
        series[window..].to_vec()
    }

    #[test]
    fn test_crossing_index_mapping() {
        let indices = vec![0, 2, 4, 6, 8, 10, 12];
        let traces = EntropyTraces::new(
            indices,
            vec![
                vec![9.0, 9.0, 1.0, -1.0, 1.0, -1.0, -1.0],
                vec![9.0, 9.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            ],
        )
        .unwrap();
        let report = analyse_traces(&traces, window(2, 2), 2, &identity).unwrap();
        // Offsets 0 and 1 of the sliced series map to (2 + j) * 2.
        assert_eq!(report.runs[0].crossings, vec![4, 6, 8]);
        assert_eq!(report.runs[0].converged_at, Some(6));
        assert_eq!(report.runs[1].converged_at, None);
        assert_eq!(report.zero_crossings, 2);
        assert_eq!(
            report.estimate,
            ConvergenceEstimate::Converged {
                samples: 6,
                runs_converged: 1,
                runs_total: 2
            }
        );
    }

    #[test]
    fn test_mean_is_floored() {
        let traces = EntropyTraces::new(
            vec![0, 1, 2, 3, 4],
            vec![vec![0.0, 1.0, -1.0, 0.0, 0.0], vec![0.0, 1.0, 1.0, -1.0, 0.0]],
        )
        .unwrap();
        let report = analyse_traces(&traces, window(1, 1), 1, &identity).unwrap();
        assert_eq!(report.runs[0].converged_at, Some(1));
        assert_eq!(report.runs[1].converged_at, Some(2));
        assert_eq!(report.estimate.samples(), Some(1));
    }

    #[test]
    fn test_inconclusive() {
        let values: Vec<f64> = (0..20).map(|i| -(i as f64)).collect();
        let traces = EntropyTraces::new((0..20).collect(), vec![values]).unwrap();
        let report = analyse_traces(&traces, window(5, 1), 1, &LeastSquaresSlope).unwrap();
        assert_eq!(report.estimate, ConvergenceEstimate::Inconclusive);
        assert!(!report.estimate.is_converged());
        assert!(analyse_traces(&traces, window(5, 1), 0, &LeastSquaresSlope).is_err());
    }
}
