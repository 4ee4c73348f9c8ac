//! Entropy traces recorded while an estimator ingests samples.

use serde::{Deserialize, Serialize};

use crate::error::DiagnosticError;

/// Entropy of one run, evaluated at the listed 0-based ingestion indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntropyTrace {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl EntropyTrace {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, index: usize, value: f64) {
        self.indices.push(index);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Traces of several runs sharing one evaluation grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyTraces {
    indices: Vec<usize>,
    runs: Vec<Vec<f64>>,
}

impl EntropyTraces {
    /// Build from a shared index row and one value row per run.
    pub fn new(indices: Vec<usize>, runs: Vec<Vec<f64>>) -> Result<Self, DiagnosticError> {
        for (run, values) in runs.iter().enumerate() {
            if values.len() != indices.len() {
                return Err(DiagnosticError::TraceLength {
                    run,
                    expected: indices.len(),
                    found: values.len(),
                });
            }
        }
        Ok(Self { indices, runs })
    }

    /// Collect per-run traces; all of them must share the first run's grid.
    pub fn from_traces(traces: Vec<EntropyTrace>) -> Result<Self, DiagnosticError> {
        let mut traces = traces.into_iter();
        let Some(first) = traces.next() else {
            return Err(DiagnosticError::NoDraws);
        };
        let indices = first.indices;
        let mut runs = vec![first.values];
        for (i, trace) in traces.enumerate() {
            if trace.indices != indices {
                return Err(DiagnosticError::TraceLength {
                    run: i + 1,
                    expected: indices.len(),
                    found: trace.indices.len(),
                });
            }
            runs.push(trace.values);
        }
        Self::new(indices, runs)
    }

    /// Evaluated ingestion indices.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// One value row per run.
    pub fn runs(&self) -> &[Vec<f64>] {
        &self.runs
    }

    pub fn n_runs(&self) -> usize {
        self.runs.len()
    }

    /// Spacing of the evaluation grid, 1 for grids of fewer than two points.
    pub fn interval(&self) -> usize {
        match self.indices.as_slice() {
            [a, b, ..] if b > a => b - a,
            _ => 1,
        }
    }

    /// The trace of one run.
    pub fn trace(&self, run: usize) -> Option<EntropyTrace> {
        self.runs.get(run).map(|values| EntropyTrace {
            indices: self.indices.clone(),
            values: values.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_traces() {
        let mut a = EntropyTrace::with_capacity(3);
        let mut b = EntropyTrace::default();
        for i in 0..3 {
            a.push(i * 4, i as f64);
            b.push(i * 4, -(i as f64));
        }
        let traces = EntropyTraces::from_traces(vec![a.clone(), b]).unwrap();
        assert_eq!(traces.n_runs(), 2);
        assert_eq!(traces.interval(), 4);
        assert_eq!(traces.indices(), &[0, 4, 8]);
        assert_eq!(traces.trace(0), Some(a));
        assert!(traces.trace(2).is_none());
    }

    #[test]
    fn test_mismatched_grid() {
        let mut a = EntropyTrace::default();
        a.push(0, 1.0);
        a.push(1, 1.0);
        let mut b = EntropyTrace::default();
        b.push(0, 1.0);
        assert_eq!(
            EntropyTraces::from_traces(vec![a, b]),
            Err(DiagnosticError::TraceLength {
                run: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            EntropyTraces::new(vec![0, 1], vec![vec![1.0]]),
            Err(DiagnosticError::TraceLength {
                run: 0,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(EntropyTraces::from_traces(Vec::new()), Err(DiagnosticError::NoDraws));
    }
}
