//! Numeric defaults shared across the engine.

/// Default scale parameter `k` of the Normal-Inverse-Wishart prior.
pub const DEFAULT_K: f64 = 1e-2;

/// Upper bound on a prior marginal standard deviation in probit space.
///
/// Also the default standard deviation when nothing else is known.
pub const MAX_PRIOR_STD: f64 = 0.2;

/// Empirical spread-to-sigma rule: the sample spread is read as roughly 3σ.
pub const SAMPLE_SPREAD_SIGMAS: f64 = 3.0;

/// Draws used to re-estimate a natural-space covariance in probit space.
pub const MC_DRAWS: usize = 10_000;

/// Fewest retained Monte-Carlo draws accepted for a covariance estimate.
pub const MIN_RETAINED_DRAWS: usize = 100;

/// Recommended minimum window (in samples) for the entropy derivative.
pub const MIN_WINDOW: usize = 200;

/// Default number of zero crossings required to declare convergence.
pub const DEFAULT_ZERO_CROSSINGS: usize = 5;

/// Default number of independent reconstructions.
pub const DEFAULT_DRAWS: usize = 100;

/// Probe points used to find the rejection-sampling envelope.
pub const ENVELOPE_PROBES: usize = 1000;

/// Accept/reject rounds allowed before the rejection sampler gives up.
pub const MAX_REJECTION_ROUNDS: usize = 10_000;

/// Speed of light in km/s.
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Planck 2021 reduced Hubble constant `H0 / (100 km/s/Mpc)`.
pub const PLANCK_H: f64 = 0.674;

/// Planck 2021 matter density parameter.
pub const PLANCK_OMEGA_M: f64 = 0.315;

/// Planck 2021 dark energy density parameter.
pub const PLANCK_OMEGA_LAMBDA: f64 = 0.685;

/// Starting redshift for the luminosity-distance root search.
pub const REDSHIFT_GUESS: f64 = 1.0;

/// Absolute step tolerance of the Newton iteration.
pub const NEWTON_TOL: f64 = 1.48e-8;

/// Iteration cap of the Newton iteration.
pub const NEWTON_MAX_ITER: usize = 50;
