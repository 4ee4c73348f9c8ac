//! # bnp-support
//!
//! Numerical support engine for Bayesian nonparametric population
//! inference with online Dirichlet-process Gaussian mixtures.
//!
//! The crate covers everything around the mixture model itself:
//! - Normal-Inverse-Wishart prior elicitation in probit working space
//! - Interior grids and bounded rejection sampling
//! - Redshift inversion and detector-frame to source-frame conversion
//! - The sequential convergence diagnostic: independent shuffled
//!   reconstructions, entropy traces and zero crossings of their slope
//!
//! The estimator and entropy functional are supplied by the caller through
//! [`OnlineEstimator`] and [`EntropyFunctional`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use bnp_support::{Bounds, ConvergenceDiagnostic, PriorElicitation, SampleSet};
//!
//! let bounds = Bounds::new(vec![(5.0, 80.0)])?;
//! let samples = SampleSet::from_values(masses);
//! let prior = PriorElicitation::new(&bounds).samples(&samples).seed(1).elicit()?;
//!
//! let out = ConvergenceDiagnostic::new()
//!     .draws(10)
//!     .seed(1)
//!     .run(&samples, &prior, |p, seed| MyMixture::new(&bounds, p, seed), &my_entropy)?;
//!
//! match out.report.estimate {
//!     ConvergenceEstimate::Converged { samples, .. } => println!("converged after {samples}"),
//!     ConvergenceEstimate::Inconclusive => println!("not yet converged"),
//! }
//! ```

#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod error;
mod types;

// Functional modules
pub mod convergence;
pub mod cosmology;
pub mod estimator;
pub mod output;
pub mod prior;
pub mod statistics;
pub mod transform;

mod thread_pool;

// Re-exports for public API
pub use config::ConvergenceConfig;
pub use constants::{
    DEFAULT_DRAWS, DEFAULT_K, DEFAULT_ZERO_CROSSINGS, MAX_PRIOR_STD, MC_DRAWS, MIN_WINDOW,
};
pub use convergence::{
    analyse_traces, ConvergenceDiagnostic, ConvergenceEstimate, ConvergenceReport, EntropyTraces,
    Reconstruction,
};
pub use cosmology::{invert_redshift, to_source_frame, Cosmology, DistanceModel, FailurePolicy};
pub use error::{
    DiagnosticError, InputError, OutputError, PriorError, RedshiftError, SamplingError,
};
pub use estimator::{EntropyFunctional, MixtureSnapshot, OnlineEstimator};
pub use prior::{default_prior, PriorElicitation};
pub use statistics::{grid, rejection_sample, Grid, RejectionSampler};
pub use types::{Bounds, Matrix, PriorParameters, SampleSet, Vector};

/// Elicit a prior from bounds alone, or with samples.
///
/// Shorthand for [`PriorElicitation`] with a fixed seed; use the builder for
/// explicit means, standard deviations or covariances.
pub fn elicit(
    bounds: &Bounds,
    samples: Option<&SampleSet>,
    seed: u64,
) -> Result<PriorParameters, PriorError> {
    let builder = PriorElicitation::new(bounds).seed(seed);
    match samples {
        Some(samples) => builder.samples(samples).elicit(),
        None => builder.elicit(),
    }
}
