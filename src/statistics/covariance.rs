//! Mean and covariance estimation for point clouds of any dimension.
//!
//! Both the prior elicitation (empirical moments of probit samples) and the
//! Monte-Carlo re-estimation of a natural-space covariance go through the
//! online accumulator defined here.

use crate::types::{Matrix, SampleSet, Vector};

/// Online mean/covariance accumulator using Welford's algorithm.
///
/// Stores the running mean and M2 (sum of outer products of deviations),
/// which can be converted to covariance via M2/(n-1).
#[derive(Debug, Clone)]
pub struct WelfordCovariance {
    /// Count of vectors accumulated so far.
    n: usize,
    /// Running mean of vectors.
    mean: Vector,
    /// Sum of outer products: Σ(x - μ)(x - μ)^T
    m2: Matrix,
}

impl WelfordCovariance {
    /// Create a new accumulator for vectors of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self {
            n: 0,
            mean: Vector::zeros(dim),
            m2: Matrix::zeros(dim, dim),
        }
    }

    /// Update the accumulator with a new vector.
    ///
    /// ```text
    /// δ = x - μₙ₋₁
    /// μₙ = μₙ₋₁ + δ/n
    /// δ' = x - μₙ
    /// M2ₙ = M2ₙ₋₁ + δ·δ'^T
    /// ```
    pub fn update(&mut self, x: &[f64]) {
        debug_assert_eq!(x.len(), self.mean.len());
        self.n += 1;
        let n = self.n as f64;
        let x = Vector::from_column_slice(x);

        let delta = &x - &self.mean;
        self.mean += &delta / n;
        let delta2 = &x - &self.mean;
        self.m2 += &delta * delta2.transpose();
    }

    /// Merge another accumulator into this one (Chan's parallel algorithm).
    pub fn merge(&mut self, other: &Self) {
        if other.n == 0 {
            return;
        }
        if self.n == 0 {
            *self = other.clone();
            return;
        }

        let n_a = self.n as f64;
        let n_b = other.n as f64;
        let n_ab = n_a + n_b;

        let delta = &other.mean - &self.mean;
        self.mean = (&self.mean * n_a + &other.mean * n_b) / n_ab;
        let correction = &delta * delta.transpose() * (n_a * n_b / n_ab);
        self.m2 = &self.m2 + &other.m2 + correction;

        self.n += other.n;
    }

    /// Number of vectors accumulated.
    pub fn count(&self) -> usize {
        self.n
    }

    /// Running mean.
    pub fn mean(&self) -> &Vector {
        &self.mean
    }

    /// Unbiased sample covariance M2/(n-1), or `None` for fewer than two vectors.
    ///
    /// The result is symmetrized to remove rounding asymmetry.
    pub fn covariance(&self) -> Option<Matrix> {
        if self.n < 2 {
            return None;
        }
        let cov = &self.m2 / (self.n - 1) as f64;
        Some((&cov + cov.transpose()) * 0.5)
    }
}

/// Accumulate every row of a sample set.
pub fn accumulate(samples: &SampleSet) -> WelfordCovariance {
    let mut acc = WelfordCovariance::new(samples.dim());
    for row in samples.rows() {
        acc.update(row);
    }
    acc
}

/// Per-axis standard deviations of a covariance matrix.
pub fn marginal_stds(cov: &Matrix) -> Vector {
    cov.diagonal().map(f64::sqrt)
}

/// Rescale a covariance so that no marginal standard deviation exceeds `cap`,
/// keeping the correlation structure.
///
/// Entry `(i, j)` is multiplied by `s'_i s'_j / (s_i s_j)` where
/// `s' = min(s, cap)`. Axes with zero variance are left untouched.
pub fn clamp_marginal_stds(cov: &Matrix, cap: f64) -> Matrix {
    let stds = marginal_stds(cov);
    let ratio = stds.map(|s| if s > cap { cap / s } else { 1.0 });
    Matrix::from_fn(cov.nrows(), cov.ncols(), |i, j| cov[(i, j)] * ratio[i] * ratio[j])
}
