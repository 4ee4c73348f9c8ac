//! Type aliases and common types.

use nalgebra::{DMatrix, DVector};
use rand::seq::index;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Dynamically sized covariance matrix.
pub type Matrix = DMatrix<f64>;

/// Dynamically sized vector.
pub type Vector = DVector<f64>;

/// Open box `(min, max)` per dimension in natural parameter space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    limits: Vec<(f64, f64)>,
}

impl Bounds {
    /// Validate and build bounds.
    ///
    /// # Errors
    ///
    /// Fails if there are no dimensions or any dimension has `min >= max`
    /// or a non-finite limit.
    pub fn new(limits: Vec<(f64, f64)>) -> Result<Self, InputError> {
        if limits.is_empty() {
            return Err(InputError::EmptyBounds);
        }
        for (dim, &(min, max)) in limits.iter().enumerate() {
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(InputError::InvalidBounds { dim, min, max });
            }
        }
        Ok(Self { limits })
    }

    /// One-dimensional bounds.
    pub fn interval(min: f64, max: f64) -> Result<Self, InputError> {
        Self::new(vec![(min, max)])
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.limits.len()
    }

    /// `(min, max)` of one dimension.
    pub fn limits(&self, dim: usize) -> (f64, f64) {
        self.limits[dim]
    }

    /// Iterate over `(min, max)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.limits.iter()
    }

    /// Box center.
    pub fn center(&self) -> Vector {
        Vector::from_iterator(self.dim(), self.limits.iter().map(|(a, b)| 0.5 * (a + b)))
    }

    /// `max - min` per dimension.
    pub fn widths(&self) -> Vec<f64> {
        self.limits.iter().map(|(a, b)| b - a).collect()
    }

    /// Whether `point` lies strictly inside the box.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(&self.limits)
                .all(|(&x, &(a, b))| a < x && x < b)
    }

    /// First dimension in which `point` leaves the open box, with its value.
    pub(crate) fn first_violation(&self, point: &[f64]) -> Option<(usize, f64)> {
        for (d, (&x, &(a, b))) in point.iter().zip(&self.limits).enumerate() {
            if !(a < x && x < b) {
                return Some((d, x));
            }
        }
        None
    }
}

/// `N` samples of dimension `D`, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    data: Vec<f64>,
    dim: usize,
}

impl SampleSet {
    /// Wrap a row-major buffer.
    ///
    /// # Errors
    ///
    /// Fails if `dim == 0` or the buffer length is not a multiple of `dim`.
    pub fn new(data: Vec<f64>, dim: usize) -> Result<Self, InputError> {
        if dim == 0 || data.len() % dim != 0 {
            return Err(InputError::RaggedSamples {
                len: data.len(),
                dim,
            });
        }
        Ok(Self { data, dim })
    }

    /// One-dimensional samples.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            data: values,
            dim: 1,
        }
    }

    /// Build from rows of equal length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, InputError> {
        let dim = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * dim);
        for row in rows {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(InputError::DimensionMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(data, dim)
    }

    /// Parse whitespace-separated rows; blank lines and `#` comments are skipped.
    pub fn from_text(text: &str) -> Result<Self, InputError> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let row = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
                .map(|t| t.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| InputError::Parse {
                    line: i + 1,
                    reason: e.to_string(),
                })?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Sample `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over samples.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.dim)
    }

    /// Row-major backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Fail unless every sample lies strictly inside `bounds`.
    pub fn check_within(&self, bounds: &Bounds) -> Result<(), InputError> {
        self.check_dim(bounds)?;
        for (index, row) in self.rows().enumerate() {
            if let Some((dim, value)) = bounds.first_violation(row) {
                return Err(InputError::OutsideBounds { index, dim, value });
            }
        }
        Ok(())
    }

    /// Drop samples that are not strictly inside `bounds`.
    pub fn retain_within(&self, bounds: &Bounds) -> Result<Self, InputError> {
        self.check_dim(bounds)?;
        let data = self
            .rows()
            .filter(|row| bounds.contains(row))
            .flatten()
            .copied()
            .collect();
        Ok(Self {
            data,
            dim: self.dim,
        })
    }

    /// Random subset of `n` samples without replacement.
    ///
    /// Returns a copy of all samples when `n >= len`.
    pub fn downsample(&self, n: usize, seed: u64) -> Self {
        if n >= self.len() {
            return self.clone();
        }
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let picked = index::sample(&mut rng, self.len(), n);
        let mut data = Vec::with_capacity(n * self.dim);
        for i in picked.iter() {
            data.extend_from_slice(self.row(i));
        }
        Self {
            data,
            dim: self.dim,
        }
    }

    pub(crate) fn check_dim(&self, bounds: &Bounds) -> Result<(), InputError> {
        if self.dim != bounds.dim() {
            return Err(InputError::DimensionMismatch {
                expected: bounds.dim(),
                found: self.dim,
            });
        }
        Ok(())
    }
}

/// Normal-Inverse-Wishart hyperparameters in probit space, ordered `(k, Λ, ν, μ)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorParameters {
    /// Scale of the Normal component.
    pub k: f64,
    /// Expected covariance of the Inverse-Wishart component.
    pub lambda: Matrix,
    /// Degrees of freedom, always `> D + 1`.
    pub df: usize,
    /// Location in probit space.
    pub mu: Vector,
}

impl PriorParameters {
    /// Dimension of the parameter space.
    pub fn dim(&self) -> usize {
        self.mu.len()
    }

    /// The fixed `(k, Λ, ν, μ)` tuple.
    pub fn into_tuple(self) -> (f64, Matrix, usize, Vector) {
        (self.k, self.lambda, self.df, self.mu)
    }
}
