//! Artifact files written after a diagnostic run.

use bnp_support::convergence::{resolve_window, EntropyTrace, EntropyTraces, LeastSquaresSlope};
use bnp_support::output::{
    format_report, load_draws, read_convergence_index, read_entropy_traces, save_draws,
    write_convergence_index, write_entropy_traces, write_report,
};
use bnp_support::{analyse_traces, ConvergenceEstimate, ConvergenceReport, OutputError};

/// Damped oscillation around a plateau: slopes change sign regularly.
fn ringing_trace(phase: f64) -> EntropyTrace {
    let mut trace = EntropyTrace::default();
    for i in 0..600 {
        let t = i as f64;
        let ringing = 0.05 * (t / 40.0 + phase).sin() * (-t / 400.0).exp();
        trace.push(i, 1.0 - (-t / 80.0).exp() + ringing);
    }
    trace
}

#[test]
fn trace_files_round_trip_into_the_same_report() {
    let traces = EntropyTraces::from_traces(vec![ringing_trace(0.0), ringing_trace(1.3)]).unwrap();
    let window = resolve_window(600, Some(100), 1).unwrap();
    let report = analyse_traces(&traces, window, 2, &LeastSquaresSlope).unwrap();
    assert!(report.estimate.is_converged());

    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("entropy.txt");
    write_entropy_traces(&trace_path, &traces).unwrap();
    let reloaded = read_entropy_traces(&trace_path).unwrap();
    assert_eq!(reloaded, traces);
    assert_eq!(analyse_traces(&reloaded, window, 2, &LeastSquaresSlope).unwrap(), report);

    let index_path = dir.path().join("convergence.txt");
    assert!(write_convergence_index(&index_path, &report.estimate).unwrap());
    assert_eq!(Some(read_convergence_index(&index_path).unwrap()), report.estimate.samples());

    let report_path = dir.path().join("report.json");
    write_report(&report_path, &report).unwrap();
    let json = std::fs::read_to_string(&report_path).unwrap();
    let back: ConvergenceReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);

    colored::control::set_override(false);
    assert!(format_report(&report).contains("Converged after"));
}

#[test]
fn draws_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draws.json");
    let draws = vec![(0.1, 2.0), (0.3, 1.5)];
    save_draws(&path, &draws).unwrap();
    let back: Vec<(f64, f64)> = load_draws(&path).unwrap();
    assert_eq!(back, draws);
}

#[test]
fn inconclusive_writes_no_index_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convergence.txt");
    assert!(!write_convergence_index(&path, &ConvergenceEstimate::Inconclusive).unwrap());
    assert!(matches!(read_convergence_index(&path), Err(OutputError::Io { .. })));
}
