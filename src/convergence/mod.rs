//! Sequential convergence diagnostic.
//!
//! An online estimator is fed the samples one at a time in several
//! independently shuffled orders. After every `entropy_interval`-th sample
//! the entropy of its current state is recorded. The sliding-window slope
//! of each entropy trace oscillates around zero once the reconstruction has
//! stabilised, so its zero crossings mark convergence.
//!
//! ```ignore
//! let report = ConvergenceDiagnostic::new()
//!     .draws(10)
//!     .window(200)
//!     .zero_crossings(3)
//!     .seed(42)
//!     .run(&samples, &prior, |prior, seed| MyEstimator::new(prior, seed), &my_entropy)?;
//! println!("{:?}", report.report.estimate);
//! ```

mod crossings;
mod run;
mod slope;
mod trace;
mod window;

pub use crossings::{
    analyse_traces, zero_crossings, ConvergenceEstimate, ConvergenceReport, RunConvergence,
};
pub use run::{ReconstructionRun, RunOutput, RunState};
pub use slope::{AngularCoefficients, LeastSquaresSlope};
pub use trace::{EntropyTrace, EntropyTraces};
pub use window::{default_window, resolve_window, WindowPolicy};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ConvergenceConfig;
use crate::error::{DiagnosticError, InputError};
use crate::estimator::{EntropyFunctional, OnlineEstimator};
use crate::statistics::{counter_rng_seed, entropy_seed, stream_rng};
use crate::types::{PriorParameters, SampleSet};

/// Stream offset separating estimator seeds from shuffle seeds.
const ESTIMATOR_STREAM: u64 = 1 << 32;

/// Snapshots, traces and convergence report of a full diagnostic.
#[derive(Debug, Clone)]
pub struct Reconstruction<S> {
    /// Final mixture of each run, in run order.
    pub draws: Vec<S>,
    pub traces: EntropyTraces,
    pub report: ConvergenceReport,
    /// Base seed actually used, for reproducing the runs.
    pub seed: u64,
}

/// Builder and driver for the convergence diagnostic.
#[derive(Debug, Clone)]
pub struct ConvergenceDiagnostic<A = LeastSquaresSlope> {
    config: ConvergenceConfig,
    slope: A,
}

impl Default for ConvergenceDiagnostic {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvergenceDiagnostic {
    /// Default configuration with the least-squares slope.
    pub fn new() -> Self {
        Self::with_config(ConvergenceConfig::default())
    }

    /// Ten runs instead of a hundred, for exploration.
    pub fn quick() -> Self {
        Self::with_config(ConvergenceConfig {
            n_draws: 10,
            ..ConvergenceConfig::default()
        })
    }

    pub fn with_config(config: ConvergenceConfig) -> Self {
        Self {
            config,
            slope: LeastSquaresSlope,
        }
    }
}

impl<A: AngularCoefficients> ConvergenceDiagnostic<A> {
    /// Number of independent runs.
    pub fn draws(mut self, n: usize) -> Self {
        self.config.n_draws = n;
        self
    }

    /// Evaluate the entropy every `n` ingested samples.
    pub fn entropy_interval(mut self, n: usize) -> Self {
        self.config.entropy_interval = n;
        self
    }

    /// Sliding-window width in samples.
    pub fn window(mut self, samples: usize) -> Self {
        self.config.window = Some(samples);
        self
    }

    /// Zero crossings needed for a run to converge.
    pub fn zero_crossings(mut self, n: usize) -> Self {
        self.config.zero_crossings = n;
        self
    }

    /// Fix the base seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Replace the slope primitive.
    pub fn slope_estimator<B: AngularCoefficients>(self, slope: B) -> ConvergenceDiagnostic<B> {
        ConvergenceDiagnostic {
            config: self.config,
            slope,
        }
    }

    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }

    /// Window for `n_samples` samples under the current configuration.
    pub fn window_policy(&self, n_samples: usize) -> Result<WindowPolicy, DiagnosticError> {
        resolve_window(n_samples, self.config.window, self.config.entropy_interval)
    }

    /// Analyse previously recorded traces without running the estimator.
    ///
    /// The window is resolved for `n_samples` with the interval of the
    /// traces' evaluation grid.
    pub fn analyse(
        &self,
        traces: &EntropyTraces,
        n_samples: usize,
    ) -> Result<ConvergenceReport, DiagnosticError> {
        let window = resolve_window(n_samples, self.config.window, traces.interval())?;
        analyse_traces(traces, window, self.config.zero_crossings, &self.slope)
    }

    /// Run every reconstruction and analyse the traces.
    ///
    /// `make_estimator` builds one estimator per run from the prior and a
    /// per-run seed for the estimator's own randomness. Runs share only
    /// `samples` and `prior` and execute in parallel with the `parallel`
    /// feature; results do not depend on scheduling.
    ///
    /// # Errors
    ///
    /// Invalid configuration, an empty sample set, a window holding fewer
    /// than two evaluations, or a dimension mismatch between the samples,
    /// the prior and the estimators.
    pub fn run<E, F, H>(
        &self,
        samples: &SampleSet,
        prior: &PriorParameters,
        make_estimator: F,
        entropy: &H,
    ) -> Result<Reconstruction<E::Snapshot>, DiagnosticError>
    where
        E: OnlineEstimator,
        E::Snapshot: Send,
        A: Sync,
        F: Fn(&PriorParameters, u64) -> E + Sync,
        H: EntropyFunctional<E> + Sync + ?Sized,
    {
        self.config.validate()?;
        if samples.is_empty() {
            return Err(DiagnosticError::NoSamples);
        }
        if prior.dim() != samples.dim() {
            return Err(InputError::DimensionMismatch {
                expected: samples.dim(),
                found: prior.dim(),
            }
            .into());
        }
        let window = self.window_policy(samples.len())?;
        let seed = self.config.seed.unwrap_or_else(entropy_seed);

        info!(
            n_draws = self.config.n_draws,
            n_samples = samples.len(),
            window = window.samples,
            entropy_interval = self.config.entropy_interval,
            seed,
            "starting reconstruction runs"
        );

        let interval = self.config.entropy_interval;
        let single = |run: usize| -> Result<RunOutput<E::Snapshot>, DiagnosticError> {
            let estimator_seed = counter_rng_seed(seed, ESTIMATOR_STREAM + run as u64);
            let estimator = make_estimator(prior, estimator_seed);
            if estimator.dim() != samples.dim() {
                return Err(InputError::DimensionMismatch {
                    expected: samples.dim(),
                    found: estimator.dim(),
                }
                .into());
            }
            let mut rng = stream_rng(seed, run as u64);
            let mut reconstruction = ReconstructionRun::new(estimator, samples, interval);
            reconstruction.start(&mut rng);
            reconstruction.ingest_all(entropy);
            debug!(run, "reconstruction finished");
            reconstruction.finish().ok_or(DiagnosticError::NoSamples)
        };

        let n_draws = self.config.n_draws;
        let outputs: Result<Vec<_>, DiagnosticError> = crate::thread_pool::install(|| {
            #[cfg(feature = "parallel")]
            let runs = (0..n_draws).into_par_iter();
            #[cfg(not(feature = "parallel"))]
            let runs = 0..n_draws;
            runs.map(single).collect()
        });

        let (draws, traces): (Vec<_>, Vec<_>) =
            outputs?.into_iter().map(|o| (o.draw, o.trace)).unzip();
        let traces = EntropyTraces::from_traces(traces)?;
        let report = analyse_traces(&traces, window, self.config.zero_crossings, &self.slope)?;

        Ok(Reconstruction {
            draws,
            traces,
            report,
            seed,
        })
    }
}
