//! Statistical building blocks.
//!
//! - Online mean/covariance accumulation and marginal clamping
//! - Counter-based seed derivation for reproducible parallel streams
//! - Interior grids and one-dimensional rejection sampling

mod covariance;
mod sampling;
mod seed;

pub use covariance::{accumulate, clamp_marginal_stds, marginal_stds, WelfordCovariance};
pub use sampling::{grid, rejection_sample, Grid, RejectionSampler};
pub use seed::{counter_rng_seed, entropy_seed, stream_rng};
