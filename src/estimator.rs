//! Capabilities the engine expects from the density estimator and the
//! functionals evaluated on it.
//!
//! The clustering update rule of the online Dirichlet-process mixture and
//! the closed-form entropy live outside this crate; anything implementing
//! these traits can be driven by [`crate::convergence`].

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Bounds, SampleSet};

/// Online density estimator fed one sample at a time.
pub trait OnlineEstimator {
    /// Frozen mixture produced at the end of a reconstruction.
    type Snapshot;

    /// Reset to the prior, discarding every ingested sample.
    fn initialise(&mut self);

    /// Ingest one natural-space sample.
    fn add_new_point(&mut self, point: &[f64]);

    /// Freeze the current state.
    fn build_mixture(&self) -> Self::Snapshot;

    /// Natural-space bounds of the estimator.
    fn bounds(&self) -> &Bounds;

    /// Dimension of the estimated density.
    fn dim(&self) -> usize {
        self.bounds().dim()
    }

    /// Reconstruct from a whole sample set in a random order.
    fn density_from_samples<R: Rng>(&mut self, samples: &SampleSet, rng: &mut R) -> Self::Snapshot
    where
        Self: Sized,
    {
        self.initialise();
        let mut order: Vec<usize> = (0..samples.len()).collect();
        order.shuffle(rng);
        for i in order {
            self.add_new_point(samples.row(i));
        }
        self.build_mixture()
    }
}

/// A frozen density that can be evaluated and sampled.
pub trait MixtureSnapshot {
    /// Dimension of the points the density is defined on.
    fn dim(&self) -> usize;

    /// Density at a natural-space point.
    fn pdf(&self, point: &[f64]) -> f64;

    /// `n` natural-space draws.
    fn rvs<R: Rng>(&self, n: usize, rng: &mut R) -> SampleSet
    where
        Self: Sized;

    /// Density at every row of `points`.
    fn pdf_many(&self, points: &SampleSet) -> Vec<f64> {
        points.rows().map(|p| self.pdf(p)).collect()
    }
}

/// Scalar functional evaluated on a partially fed estimator.
pub trait EntropyFunctional<E: ?Sized> {
    fn entropy(&self, state: &E) -> f64;
}

impl<E: ?Sized, F> EntropyFunctional<E> for F
where
    F: Fn(&E) -> f64,
{
    fn entropy(&self, state: &E) -> f64 {
        self(state)
    }
}

/// Draw `n` samples from the posterior predictive of a set of snapshots:
/// each draw picks a snapshot uniformly at random, then samples from it.
pub fn pooled_rvs<S, R>(draws: &[S], n: usize, rng: &mut R) -> Option<SampleSet>
where
    S: MixtureSnapshot,
    R: Rng,
{
    let dim = draws.first()?.dim();
    let mut counts = vec![0usize; draws.len()];
    for _ in 0..n {
        counts[rng.random_range(0..draws.len())] += 1;
    }
    let mut data = Vec::with_capacity(n * dim);
    for (draw, &count) in draws.iter().zip(&counts) {
        if count > 0 {
            data.extend_from_slice(draw.rvs(count, rng).as_slice());
        }
    }
    SampleSet::new(data, dim).ok()
}

/// Median density across snapshots at every row of `points`.
pub fn median_pdf<S: MixtureSnapshot>(draws: &[S], points: &SampleSet) -> Vec<f64> {
    let per_draw: Vec<Vec<f64>> = draws.iter().map(|d| d.pdf_many(points)).collect();
    (0..points.len())
        .map(|i| {
            let mut column: Vec<f64> = per_draw.iter().map(|v| v[i]).collect();
            column.sort_by(|a, b| a.total_cmp(b));
            match column.len() {
                0 => f64::NAN,
                n if n % 2 == 1 => column[n / 2],
                n => 0.5 * (column[n / 2 - 1] + column[n / 2]),
            }
        })
        .collect()
}
