//! Normal-Inverse-Wishart prior elicitation in probit space.
//!
//! Every field of the prior is resolved independently, preferring explicit
//! guidance over what the samples suggest, and that over a fixed default:
//!
//! | Field | Explicit | From samples | Default |
//! |---|---|---|---|
//! | `ν` | `df` if `> D + 2` | | `D + 2` |
//! | `μ` | `mean`, probit-transformed | mean of probit samples | origin |
//! | `Λ` | `cov`, else `std` (Monte-Carlo re-estimated) | `cov/9`, marginals clamped to 0.2 | `0.2² · I` |
//! | `k` | `k` | | `0.01` |
//!
//! A natural-space Gaussian is not a Gaussian in probit space, so an explicit
//! `cov`/`std` is turned into a probit-space covariance by simulation: draws
//! from `N(center, cov)` are filtered to the box, transformed, and measured.

use nalgebra::Cholesky;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_K, MAX_PRIOR_STD, MC_DRAWS, MIN_RETAINED_DRAWS, SAMPLE_SPREAD_SIGMAS,
};
use crate::error::{InputError, PriorError};
use crate::statistics::{accumulate, clamp_marginal_stds, entropy_seed, WelfordCovariance};
use crate::transform::{to_probit, to_probit_set};
use crate::types::{Bounds, Matrix, PriorParameters, SampleSet, Vector};

/// Builder for [`PriorParameters`].
///
/// ```ignore
/// let prior = PriorElicitation::new(&bounds)
///     .samples(&samples)
///     .std(&[0.5])
///     .seed(42)
///     .elicit()?;
/// ```
#[derive(Debug, Clone)]
pub struct PriorElicitation<'a> {
    bounds: &'a Bounds,
    samples: Option<&'a SampleSet>,
    mean: Option<Vec<f64>>,
    std: Option<Vec<f64>>,
    cov: Option<Matrix>,
    df: Option<usize>,
    k: Option<f64>,
    seed: Option<u64>,
    mc_draws: usize,
    min_retained: usize,
}

impl<'a> PriorElicitation<'a> {
    /// Start from bounds alone; every field falls back to its default.
    pub fn new(bounds: &'a Bounds) -> Self {
        Self {
            bounds,
            samples: None,
            mean: None,
            std: None,
            cov: None,
            df: None,
            k: None,
            seed: None,
            mc_draws: MC_DRAWS,
            min_retained: MIN_RETAINED_DRAWS,
        }
    }

    /// Natural-space samples used for the empirical mean and covariance.
    pub fn samples(mut self, samples: &'a SampleSet) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Explicit natural-space mean; must lie strictly inside the bounds.
    pub fn mean(mut self, mean: &[f64]) -> Self {
        self.mean = Some(mean.to_vec());
        self
    }

    /// Expected natural-space standard deviation, one value for all
    /// dimensions or one per dimension.
    pub fn std(mut self, std: &[f64]) -> Self {
        self.std = Some(std.to_vec());
        self
    }

    /// Expected natural-space covariance; takes precedence over `std`.
    pub fn cov(mut self, cov: Matrix) -> Self {
        self.cov = Some(cov);
        self
    }

    /// Degrees of freedom; ignored unless larger than `D + 2`.
    pub fn df(mut self, df: usize) -> Self {
        self.df = Some(df);
        self
    }

    /// Scale parameter of the Normal component.
    pub fn k(mut self, k: f64) -> Self {
        self.k = Some(k);
        self
    }

    /// Seed for the Monte-Carlo re-estimation.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of simulated draws for the Monte-Carlo re-estimation.
    pub fn mc_draws(mut self, draws: usize) -> Self {
        self.mc_draws = draws;
        self
    }

    /// Fewest in-bounds draws accepted for the Monte-Carlo covariance.
    pub fn min_retained(mut self, retained: usize) -> Self {
        self.min_retained = retained;
        self
    }

    /// Resolve all four hyperparameters.
    ///
    /// # Errors
    ///
    /// - [`PriorError::MeanOutsideBounds`] if an explicit mean is not strictly inside
    /// - [`PriorError::Input`] for dimension mismatches or samples outside the bounds
    /// - [`PriorError::InvalidStd`] / [`PriorError::NotPositiveDefinite`] for bad spreads
    /// - [`PriorError::DegenerateMonteCarlo`] if too few simulated draws survive
    /// - [`PriorError::DegenerateSamples`] if the samples give a singular covariance
    /// - [`PriorError::InvalidScale`] for a non-positive or non-finite `k`
    pub fn elicit(&self) -> Result<PriorParameters, PriorError> {
        let dim = self.bounds.dim();

        let probit_samples = match self.samples {
            Some(samples) => Some(to_probit_set(samples, self.bounds)?),
            None => None,
        };

        let k = self.k.unwrap_or(DEFAULT_K);
        if !(k.is_finite() && k > 0.0) {
            return Err(PriorError::InvalidScale(k));
        }

        let df = match self.df {
            Some(df) if df > dim + 2 => df,
            _ => dim + 2,
        };

        let mu = self.resolve_mean(probit_samples.as_ref())?;
        let lambda = self.resolve_covariance(probit_samples.as_ref())?;

        debug!(dim, df, k, "prior elicited");
        Ok(PriorParameters { k, lambda, df, mu })
    }

    fn resolve_mean(&self, probit_samples: Option<&SampleSet>) -> Result<Vector, PriorError> {
        let dim = self.bounds.dim();
        if let Some(mean) = &self.mean {
            if mean.len() != dim {
                return Err(InputError::DimensionMismatch {
                    expected: dim,
                    found: mean.len(),
                }
                .into());
            }
            if let Some((dim, value)) = self.bounds.first_violation(mean) {
                return Err(PriorError::MeanOutsideBounds { dim, value });
            }
            return Ok(Vector::from_vec(to_probit(mean, self.bounds)?));
        }
        match probit_samples {
            Some(ps) if !ps.is_empty() => Ok(accumulate(ps).mean().clone()),
            _ => Ok(Vector::zeros(dim)),
        }
    }

    fn resolve_covariance(&self, probit_samples: Option<&SampleSet>) -> Result<Matrix, PriorError> {
        let dim = self.bounds.dim();

        if let Some(cov) = &self.cov {
            if cov.nrows() != dim || cov.ncols() != dim {
                return Err(InputError::DimensionMismatch {
                    expected: dim,
                    found: cov.nrows().max(cov.ncols()),
                }
                .into());
            }
            return self.reestimate(cov);
        }

        if let Some(std) = &self.std {
            let stds = broadcast_std(std, dim)?;
            return self.reestimate(&Matrix::from_diagonal(&stds.map(|s| s * s)));
        }

        if let Some(ps) = probit_samples {
            let cov = accumulate(ps)
                .covariance()
                .ok_or(PriorError::TooFewSamples(ps.len()))?;
            let scaled = cov / (SAMPLE_SPREAD_SIGMAS * SAMPLE_SPREAD_SIGMAS);
            let lambda = clamp_marginal_stds(&scaled, MAX_PRIOR_STD);
            if !is_well_conditioned(&lambda) {
                return Err(PriorError::DegenerateSamples { n: ps.len() });
            }
            return Ok(lambda);
        }

        Ok(Matrix::identity(dim, dim) * (MAX_PRIOR_STD * MAX_PRIOR_STD))
    }

    /// Re-derive a natural-space covariance as a probit-space one by simulation.
    fn reestimate(&self, cov: &Matrix) -> Result<Matrix, PriorError> {
        let dim = self.bounds.dim();
        let symmetric = cov
            .iter()
            .zip(cov.transpose().iter())
            .all(|(a, b)| (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0));
        if !symmetric {
            return Err(PriorError::NotPositiveDefinite);
        }
        let chol = Cholesky::new(cov.clone()).ok_or(PriorError::NotPositiveDefinite)?;
        let l = chol.l();

        let seed = self.seed.unwrap_or_else(entropy_seed);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let center = self.bounds.center();

        let mut acc = WelfordCovariance::new(dim);
        for _ in 0..self.mc_draws {
            let z = Vector::from_fn(dim, |_, _| StandardNormal.sample(&mut rng));
            let x = &center + &l * z;
            if !self.bounds.contains(x.as_slice()) {
                continue;
            }
            acc.update(&to_probit(x.as_slice(), self.bounds)?);
        }

        let required = self.min_retained.max(dim + 1);
        let retained = acc.count();
        if retained < required {
            return Err(PriorError::DegenerateMonteCarlo {
                retained,
                drawn: self.mc_draws,
                required,
            });
        }
        if retained * 2 < self.mc_draws {
            warn!(
                retained,
                drawn = self.mc_draws,
                "most simulated draws fell outside the bounds"
            );
        }
        debug!(retained, drawn = self.mc_draws, seed, "covariance re-estimated in probit space");

        let lambda = acc.covariance().ok_or(PriorError::DegenerateMonteCarlo {
            retained,
            drawn: self.mc_draws,
            required,
        })?;
        if !is_well_conditioned(&lambda) {
            return Err(PriorError::NotPositiveDefinite);
        }
        Ok(lambda)
    }
}

/// Cholesky succeeds and no pivot collapses relative to its diagonal entry.
fn is_well_conditioned(m: &Matrix) -> bool {
    const RELATIVE_PIVOT: f64 = 1e-12;
    match Cholesky::new(m.clone()) {
        Some(chol) => {
            let l = chol.l();
            (0..m.nrows()).all(|i| l[(i, i)] * l[(i, i)] > RELATIVE_PIVOT * m[(i, i)])
        }
        None => false,
    }
}

/// Prior parameters from bounds alone.
pub fn default_prior(bounds: &Bounds) -> PriorParameters {
    let dim = bounds.dim();
    PriorParameters {
        k: DEFAULT_K,
        lambda: Matrix::identity(dim, dim) * (MAX_PRIOR_STD * MAX_PRIOR_STD),
        df: dim + 2,
        mu: Vector::zeros(dim),
    }
}

fn broadcast_std(std: &[f64], dim: usize) -> Result<Vector, PriorError> {
    let stds = match std.len() {
        1 => Vector::from_element(dim, std[0]),
        n if n == dim => Vector::from_column_slice(std),
        n => {
            return Err(InputError::DimensionMismatch {
                expected: dim,
                found: n,
            }
            .into())
        }
    };
    if let Some((dim, &value)) = stds
        .iter()
        .enumerate()
        .find(|(_, s)| !(s.is_finite() && **s > 0.0))
    {
        return Err(PriorError::InvalidStd { dim, value });
    }
    Ok(stds)
}
