//! JSON serialization for reports and mixture snapshots.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::io_error;
use crate::convergence::ConvergenceReport;
use crate::error::OutputError;

/// Serialize to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for the
/// report types of this crate).
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Serialize to a pretty-printed JSON string.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Write a convergence report as pretty JSON.
pub fn write_report(path: impl AsRef<Path>, report: &ConvergenceReport) -> Result<(), OutputError> {
    let path = path.as_ref();
    fs::write(path, to_json_pretty(report)?).map_err(io_error(path))
}

/// Save the final snapshot of every run as a JSON array.
pub fn save_draws<S: Serialize>(path: impl AsRef<Path>, draws: &[S]) -> Result<(), OutputError> {
    let path = path.as_ref();
    fs::write(path, to_json(draws)?).map_err(io_error(path))
}

/// Load snapshots written by [`save_draws`].
pub fn load_draws<S: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<S>, OutputError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::{ConvergenceEstimate, RunConvergence, WindowPolicy};

    fn make_report() -> ConvergenceReport {
        ConvergenceReport {
            window: WindowPolicy {
                samples: 200,
                evaluations: 200,
                reduced_confidence: false,
            },
            entropy_interval: 1,
            zero_crossings: 3,
            runs: vec![
                RunConvergence {
                    crossings: vec![210, 260, 340],
                    converged_at: Some(340),
                },
                RunConvergence {
                    crossings: vec![500],
                    converged_at: None,
                },
            ],
            estimate: ConvergenceEstimate::Converged {
                samples: 340,
                runs_converged: 1,
                runs_total: 2,
            },
        }
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&make_report()).unwrap();
        assert!(json.contains("\"status\":\"converged\""));
        assert!(json.contains("\"samples\":340"));
        assert!(json.contains("\"converged_at\":null"));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&ConvergenceEstimate::Inconclusive).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("inconclusive"));
    }

    #[test]
    fn test_draws_and_report_files() {
        let dir = tempfile::tempdir().unwrap();
        let draws = vec![vec![0.1, 0.2], vec![0.3]];
        save_draws(dir.path().join("draws.json"), &draws).unwrap();
        let back: Vec<Vec<f64>> = load_draws(dir.path().join("draws.json")).unwrap();
        assert_eq!(back, draws);

        let report = make_report();
        let path = dir.path().join("report.json");
        write_report(&path, &report).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let back: ConvergenceReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);

        assert!(matches!(
            load_draws::<f64>(dir.path().join("missing.json")),
            Err(OutputError::Io { .. })
        ));
    }
}
