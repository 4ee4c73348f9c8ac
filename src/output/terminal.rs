//! Terminal summary of a convergence report.

use colored::Colorize;

use crate::convergence::{ConvergenceEstimate, ConvergenceReport};

/// Format a report for human-readable terminal output.
pub fn format_report(report: &ConvergenceReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str("bnp-support convergence diagnostic\n");
    output.push_str(&sep);
    output.push_str("\n\n");

    output.push_str(&format!(
        "  Window: {} samples ({} evaluations, every {} samples)\n",
        report.window.samples, report.window.evaluations, report.entropy_interval
    ));
    output.push_str(&format!(
        "  Required zero crossings: {}\n",
        report.zero_crossings
    ));
    if report.window.reduced_confidence {
        output.push_str(&format!(
            "  {}\n",
            "\u{26A0} Window below 200 samples, reduced confidence".yellow()
        ));
    }
    output.push('\n');

    match report.estimate {
        ConvergenceEstimate::Converged {
            samples,
            runs_converged,
            runs_total,
        } => {
            output.push_str(&format!(
                "  {}\n\n",
                format!("\u{2713} Converged after ~{samples} samples")
                    .as_str()
                    .green()
                    .bold()
            ));
            let ratio = format!("{runs_converged}/{runs_total}");
            let ratio = if runs_converged == runs_total {
                ratio.as_str().green()
            } else {
                ratio.as_str().yellow()
            };
            output.push_str(&format!("    Runs converged: {ratio}\n"));
        }
        ConvergenceEstimate::Inconclusive => {
            output.push_str(&format!(
                "  {}\n\n",
                "\u{2717} Convergence not reached yet".red().bold()
            ));
            output.push_str(&format!("    Runs converged: 0/{}\n", report.runs.len()));
        }
    }

    let (min, max) = report
        .runs
        .iter()
        .filter_map(|r| r.converged_at)
        .fold((None, None), |(lo, hi): (Option<usize>, Option<usize>), c| {
            (Some(lo.map_or(c, |l| l.min(c))), Some(hi.map_or(c, |h| h.max(c))))
        });
    if let (Some(min), Some(max)) = (min, max) {
        output.push_str(&format!("    Per-run range:  {min}\u{2013}{max} samples\n"));
    }

    output.push('\n');
    output.push_str(&sep);
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::{RunConvergence, WindowPolicy};

    fn make_report(estimate: ConvergenceEstimate) -> ConvergenceReport {
        ConvergenceReport {
            window: WindowPolicy {
                samples: 100,
                evaluations: 100,
                reduced_confidence: true,
            },
            entropy_interval: 1,
            zero_crossings: 2,
            runs: vec![
                RunConvergence {
                    crossings: vec![120, 300],
                    converged_at: Some(300),
                },
                RunConvergence {
                    crossings: vec![150, 500],
                    converged_at: Some(500),
                },
            ],
            estimate,
        }
    }

    #[test]
    fn test_format_converged() {
        colored::control::set_override(false);
        let output = format_report(&make_report(ConvergenceEstimate::Converged {
            samples: 400,
            runs_converged: 2,
            runs_total: 2,
        }));
        assert!(output.contains("Converged after ~400 samples"));
        assert!(output.contains("Runs converged: 2/2"));
        assert!(output.contains("300\u{2013}500"));
        assert!(output.contains("reduced confidence"));
    }

    #[test]
    fn test_format_inconclusive() {
        colored::control::set_override(false);
        let mut report = make_report(ConvergenceEstimate::Inconclusive);
        for run in &mut report.runs {
            run.converged_at = None;
        }
        let output = format_report(&report);
        assert!(output.contains("not reached"));
        assert!(output.contains("0/2"));
        assert!(!output.contains("Per-run range"));
    }
}
