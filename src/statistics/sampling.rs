//! Interior grids over bounded boxes and 1D rejection sampling.

use rand::Rng;
use tracing::debug;

use crate::constants::{ENVELOPE_PROBES, MAX_REJECTION_ROUNDS};
use crate::error::{InputError, SamplingError};
use crate::types::{Bounds, SampleSet};

/// Regular Cartesian grid of interior points.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Grid points; the first dimension varies slowest, the last fastest.
    pub points: SampleSet,
    /// Spacing along each axis, in the same order as the bounds.
    pub spacings: Vec<f64>,
    axes: Vec<Vec<f64>>,
}

impl Grid {
    /// Volume of one grid cell.
    pub fn cell_volume(&self) -> f64 {
        self.spacings.iter().product()
    }

    /// Interior points of axis `dim`.
    pub fn axis(&self, dim: usize) -> &[f64] {
        &self.axes[dim]
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// `count` evenly spaced points strictly between `min` and `max`, and their spacing.
fn interior_axis(min: f64, max: f64, count: usize) -> (Vec<f64>, f64) {
    let step = (max - min) / (count + 1) as f64;
    ((1..=count).map(|i| min + i as f64 * step).collect(), step)
}

/// Build the interior grid with `counts[i]` points along axis `i`.
///
/// Endpoints are excluded: `spacings[i] = (max_i - min_i) / (counts[i] + 1)`
/// and the grid holds `∏ counts[i]` points.
///
/// # Errors
///
/// Fails if `counts` does not match the bounds dimension or any count is zero.
pub fn grid(bounds: &Bounds, counts: &[usize]) -> Result<Grid, SamplingError> {
    if counts.len() != bounds.dim() {
        return Err(InputError::DimensionMismatch {
            expected: bounds.dim(),
            found: counts.len(),
        }
        .into());
    }
    if let Some(dim) = counts.iter().position(|&c| c == 0) {
        return Err(SamplingError::EmptyAxis { dim });
    }

    let (axes, spacings): (Vec<Vec<f64>>, Vec<f64>) = bounds
        .iter()
        .zip(counts)
        .map(|(&(a, b), &c)| interior_axis(a, b, c))
        .unzip();

    let dim = bounds.dim();
    let total: usize = counts.iter().product();
    let mut data = Vec::with_capacity(total * dim);
    let mut index = vec![0usize; dim];
    for _ in 0..total {
        data.extend(index.iter().enumerate().map(|(d, &i)| axes[d][i]));
        // Odometer increment, last axis fastest.
        for d in (0..dim).rev() {
            index[d] += 1;
            if index[d] < counts[d] {
                break;
            }
            index[d] = 0;
        }
    }

    Ok(Grid {
        points: SampleSet::new(data, dim)?,
        spacings,
        axes,
    })
}

/// One-dimensional rejection sampler.
///
/// The envelope is the largest value of `density · selection` on a fixed
/// probe grid spanning the closed interval; an endpoint where the target is
/// not finite is left out. Each round draws `n` uniform candidates and `n`
/// uniform heights in `[0, envelope)`, keeps the candidates below the curve,
/// and stops once at least `n` points are collected.
#[derive(Debug, Clone, Copy)]
pub struct RejectionSampler {
    probes: usize,
    max_rounds: usize,
}

impl Default for RejectionSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl RejectionSampler {
    /// Sampler with 1000 probe points and at most 10 000 rounds.
    pub fn new() -> Self {
        Self {
            probes: ENVELOPE_PROBES,
            max_rounds: MAX_REJECTION_ROUNDS,
        }
    }

    /// Set the number of envelope probe points.
    pub fn probes(mut self, probes: usize) -> Self {
        self.probes = probes.max(2);
        self
    }

    /// Set the number of accept/reject rounds before giving up.
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds.max(1);
        self
    }

    /// Draw exactly `n` samples from `density` on `bounds`.
    pub fn sample<R, F>(
        &self,
        n: usize,
        density: F,
        bounds: &Bounds,
        rng: &mut R,
    ) -> Result<Vec<f64>, SamplingError>
    where
        R: Rng,
        F: Fn(f64) -> f64,
    {
        self.sample_selected(n, density, |_| 1.0, bounds, rng)
    }

    /// Draw exactly `n` samples from `density · selection` on `bounds`.
    ///
    /// # Errors
    ///
    /// Fails for non-1D bounds, a non-positive or non-finite envelope, or
    /// when the round budget runs out before `n` samples are accepted.
    pub fn sample_selected<R, F, S>(
        &self,
        n: usize,
        density: F,
        selection: S,
        bounds: &Bounds,
        rng: &mut R,
    ) -> Result<Vec<f64>, SamplingError>
    where
        R: Rng,
        F: Fn(f64) -> f64,
        S: Fn(f64) -> f64,
    {
        if bounds.dim() != 1 {
            return Err(SamplingError::NotOneDimensional(bounds.dim()));
        }
        if n == 0 {
            return Ok(Vec::new());
        }
        let (a, b) = bounds.limits(0);
        let target = |x: f64| density(x) * selection(x);

        let top = self.envelope(a, b, &target);
        if !(top.is_finite() && top > 0.0) {
            return Err(SamplingError::InvalidEnvelope(top));
        }

        let mut accepted = Vec::with_capacity(n);
        for round in 1..=self.max_rounds {
            for _ in 0..n {
                let x = rng.random_range(a..b);
                let h = rng.random_range(0.0..top);
                if h < target(x) {
                    accepted.push(x);
                }
            }
            if accepted.len() >= n {
                debug!(rounds = round, requested = n, "rejection sampling done");
                accepted.truncate(n);
                return Ok(accepted);
            }
        }

        Err(SamplingError::Exhausted {
            collected: accepted.len(),
            requested: n,
            rounds: self.max_rounds,
        })
    }

    /// Largest target value over `probes` evenly spaced points of `[a, b]`.
    fn envelope<F: Fn(f64) -> f64>(&self, a: f64, b: f64, target: &F) -> f64 {
        let last = self.probes - 1;
        let step = (b - a) / last as f64;
        (0..=last)
            .map(|i| {
                let x = if i == last { b } else { a + i as f64 * step };
                let value = target(x);
                if (i == 0 || i == last) && !value.is_finite() {
                    f64::NEG_INFINITY
                } else {
                    value
                }
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Draw `n` samples from `density` with the default sampler.
pub fn rejection_sample<R, F>(
    n: usize,
    density: F,
    bounds: &Bounds,
    rng: &mut R,
) -> Result<Vec<f64>, SamplingError>
where
    R: Rng,
    F: Fn(f64) -> f64,
{
    RejectionSampler::new().sample(n, density, bounds, rng)
}
