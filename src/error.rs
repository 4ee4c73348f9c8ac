//! Error types.
//!
//! Failures are local to the call that raised them: a failed redshift
//! inversion or a failed reconstruction never touches sibling state.

use thiserror::Error;

/// Malformed bounds, samples or points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Bounds must describe at least one dimension.
    #[error("bounds must have at least one dimension")]
    EmptyBounds,

    /// Each dimension needs `min < max`, both finite.
    #[error("invalid bounds in dimension {dim}: [{min}, {max}]")]
    InvalidBounds { dim: usize, min: f64, max: f64 },

    /// Dimensionality of an input does not match the bounds.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Flat buffer length is not a multiple of the dimension.
    #[error("sample buffer of length {len} cannot be split into rows of {dim}")]
    RaggedSamples { len: usize, dim: usize },

    /// A point lies on or outside the open box.
    #[error("point {index} is outside the bounds in dimension {dim} (value {value})")]
    OutsideBounds { index: usize, dim: usize, value: f64 },

    /// A requested column is not available.
    #[error("column `{0}` is not available")]
    MissingColumn(&'static str),

    /// Text input could not be parsed.
    #[error("cannot parse line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Prior elicitation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriorError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// An explicit mean must lie strictly inside the bounds.
    #[error("mean is outside of the given bounds (dimension {dim}, value {value})")]
    MeanOutsideBounds { dim: usize, value: f64 },

    /// Standard deviations must be positive and finite.
    #[error("invalid standard deviation {value} in dimension {dim}")]
    InvalidStd { dim: usize, value: f64 },

    /// The covariance is not symmetric positive definite.
    #[error("covariance matrix is not symmetric positive definite")]
    NotPositiveDefinite,

    /// Too few simulated draws survived the bounds filter.
    #[error(
        "only {retained} of {drawn} simulated draws fell inside the bounds (need {required}); \
         increase the number of draws or use a narrower covariance"
    )]
    DegenerateMonteCarlo {
        retained: usize,
        drawn: usize,
        required: usize,
    },

    /// Too few samples to estimate a covariance.
    #[error("need at least 2 samples to estimate a covariance, got {0}")]
    TooFewSamples(usize),

    /// The samples span fewer dimensions than the bounds.
    #[error("the {n} samples do not spread across every dimension; their covariance is singular")]
    DegenerateSamples { n: usize },

    /// The Normal scale must be positive and finite.
    #[error("invalid scale k = {0}")]
    InvalidScale(f64),
}

/// Grid and rejection-sampling failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// Each axis needs at least one interior point.
    #[error("grid axis {dim} needs at least one point")]
    EmptyAxis { dim: usize },

    /// Rejection sampling is one dimensional only.
    #[error("rejection sampling is only defined in one dimension, got {0}")]
    NotOneDimensional(usize),

    /// The envelope must be positive and finite.
    #[error("density envelope is not positive and finite ({0})")]
    InvalidEnvelope(f64),

    /// The accept/reject loop ran out of rounds.
    #[error("rejection sampler collected {collected} of {requested} samples in {rounds} rounds")]
    Exhausted {
        collected: usize,
        requested: usize,
        rounds: usize,
    },
}

/// Luminosity-distance inversion failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RedshiftError {
    /// Cosmological parameters out of range.
    #[error("invalid cosmology: {0}")]
    InvalidCosmology(String),

    /// Distances must be positive and finite.
    #[error("invalid luminosity distance {0}")]
    InvalidDistance(f64),

    /// Newton iteration did not settle.
    #[error("redshift search for d_L = {distance} Mpc did not converge after {iterations} iterations (last z = {last})")]
    NotConverged {
        distance: f64,
        iterations: usize,
        last: f64,
    },

    /// The derivative vanished or became non-finite.
    #[error("zero or non-finite derivative at z = {z} while inverting d_L = {distance} Mpc")]
    DegenerateDerivative { distance: f64, z: f64 },

    /// A failure at one sample of a batch, under the abort policy.
    #[error("sample {index}: {source}")]
    AtSample {
        index: usize,
        #[source]
        source: Box<RedshiftError>,
    },

    /// Columns of a detector-frame batch differ in length.
    #[error("column `{column}` has {found} entries, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Convergence diagnostic configuration failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosticError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// At least one run is needed.
    #[error("number of draws must be positive")]
    NoDraws,

    /// Entropy must be evaluated at least every sample.
    #[error("entropy interval must be positive")]
    ZeroInterval,

    /// A slope over fewer than two evaluations is undefined.
    #[error("window of {window} evaluations is too small (need at least 2)")]
    WindowTooSmall { window: usize },

    /// At least one crossing is needed to define convergence.
    #[error("required number of zero crossings must be positive")]
    ZeroCrossingsRequired,

    /// No samples to ingest.
    #[error("sample set is empty")]
    NoSamples,

    /// Traces in one collection must share the same evaluation grid.
    #[error("entropy trace {run} has {found} evaluations, expected {expected}")]
    TraceLength {
        run: usize,
        expected: usize,
        found: usize,
    },
}

/// Artifact reading/writing failures.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("malformed entropy trace file: {0}")]
    Malformed(String),
}
