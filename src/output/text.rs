//! Plain-text entropy trace and convergence-index files.
//!
//! The trace file holds the evaluated sample indices on its first row and
//! the entropy values of one run on each following row, whitespace
//! separated.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::io_error;
use crate::convergence::{ConvergenceEstimate, EntropyTraces};
use crate::error::OutputError;

/// Render traces in the text layout.
pub fn format_entropy_traces(traces: &EntropyTraces) -> String {
    let mut out = String::new();
    let indices: Vec<String> = traces.indices().iter().map(usize::to_string).collect();
    out.push_str(&indices.join(" "));
    out.push('\n');
    for run in traces.runs() {
        let mut first = true;
        for v in run {
            if !first {
                out.push(' ');
            }
            let _ = write!(out, "{v:?}");
            first = false;
        }
        out.push('\n');
    }
    out
}

/// Parse the text layout.
pub fn parse_entropy_traces(text: &str) -> Result<EntropyTraces, OutputError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

    let (_, header) = lines
        .next()
        .ok_or_else(|| OutputError::Malformed("missing index row".into()))?;
    let indices = header
        .split_whitespace()
        .map(parse_index)
        .collect::<Result<Vec<usize>, _>>()
        .map_err(|e| OutputError::Malformed(format!("index row: {e}")))?;

    let runs = lines
        .map(|(n, line)| {
            line.split_whitespace()
                .map(|t| t.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|e| OutputError::Malformed(format!("line {}: {e}", n + 1)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    EntropyTraces::new(indices, runs).map_err(|e| OutputError::Malformed(e.to_string()))
}

/// Indices may have been written as floats (`200.0`) by other tools.
fn parse_index(token: &str) -> Result<usize, String> {
    if let Ok(i) = token.parse::<usize>() {
        return Ok(i);
    }
    match token.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as usize),
        _ => Err(format!("`{token}` is not a sample index")),
    }
}

/// Write traces to `path`.
pub fn write_entropy_traces(
    path: impl AsRef<Path>,
    traces: &EntropyTraces,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    fs::write(path, format_entropy_traces(traces)).map_err(io_error(path))
}

/// Read traces written by [`write_entropy_traces`].
pub fn read_entropy_traces(path: impl AsRef<Path>) -> Result<EntropyTraces, OutputError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    parse_entropy_traces(&text)
}

/// Write the convergence index as a single integer.
///
/// Nothing is written for an inconclusive estimate; returns whether a file
/// was written.
pub fn write_convergence_index(
    path: impl AsRef<Path>,
    estimate: &ConvergenceEstimate,
) -> Result<bool, OutputError> {
    let Some(samples) = estimate.samples() else {
        return Ok(false);
    };
    let path = path.as_ref();
    fs::write(path, format!("{samples}\n")).map_err(io_error(path))?;
    Ok(true)
}

/// Read a convergence-index file.
pub fn read_convergence_index(path: impl AsRef<Path>) -> Result<usize, OutputError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    parse_index(text.trim()).map_err(OutputError::Malformed)
}
