//! Configuration for the convergence diagnostic.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DRAWS, DEFAULT_ZERO_CROSSINGS};
use crate::error::DiagnosticError;

/// Configuration options for `ConvergenceDiagnostic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// Independent reconstruction runs (default: 100).
    pub n_draws: usize,

    /// Evaluate the entropy every this many ingested samples (default: 1).
    pub entropy_interval: usize,

    /// Sliding-window width in samples.
    ///
    /// `None` picks `max(N/5, 200)` for `N > 200` samples and `N/5`
    /// otherwise. Widths under 200 samples are accepted with a warning.
    pub window: Option<usize>,

    /// Zero crossings a run needs to count as converged (default: 5).
    pub zero_crossings: usize,

    /// Base seed for shuffling and per-run estimator seeds.
    ///
    /// `None` draws one from the operating system.
    pub seed: Option<u64>,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            n_draws: DEFAULT_DRAWS,
            entropy_interval: 1,
            window: None,
            zero_crossings: DEFAULT_ZERO_CROSSINGS,
            seed: None,
        }
    }
}

impl ConvergenceConfig {
    /// Reject settings that make the diagnostic meaningless.
    pub fn validate(&self) -> Result<(), DiagnosticError> {
        if self.n_draws == 0 {
            return Err(DiagnosticError::NoDraws);
        }
        if self.entropy_interval == 0 {
            return Err(DiagnosticError::ZeroInterval);
        }
        if self.zero_crossings == 0 {
            return Err(DiagnosticError::ZeroCrossingsRequired);
        }
        Ok(())
    }
}
