//! Error types for WoE discretization.
//!
//! Every fatal condition of a discretization call is a variant of
//! [`DiscretizeError`]. Recoverable conditions (degenerate quantiles,
//! zero-count bins, non-convergence) are not errors; they are reported as
//! [`Warning`](super::Warning)s on the result.

use thiserror::Error;

/// Result type for discretization operations.
pub type Result<T> = std::result::Result<T, DiscretizeError>;

/// Why the observation set cannot support a WoE computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInputKind {
    /// No observations at all
    NoObservations,
    /// No observation has outcome 1
    NoEvents,
    /// No observation has outcome 0
    NoNonEvents,
}

impl std::fmt::Display for EmptyInputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyInputKind::NoObservations => write!(f, "no observations"),
            EmptyInputKind::NoEvents => write!(f, "no events (outcome = 1)"),
            EmptyInputKind::NoNonEvents => write!(f, "no non-events (outcome = 0)"),
        }
    }
}

/// Fatal errors raised while discretizing a feature.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscretizeError {
    /// Requested bin count cannot be honoured by the data.
    #[error("invalid bin count {requested}: {reason}")]
    InvalidBinCount { requested: usize, reason: String },

    /// WoE is undefined for the whole dataset.
    #[error("empty input: {0}, WoE is undefined")]
    EmptyInput(EmptyInputKind),

    /// Value column contains NaN or an infinity.
    #[error("observation {index} has non-finite value {value}")]
    NonFiniteValue { index: usize, value: f64 },

    /// Outcome is not 0 or 1.
    #[error("observation {index} has outcome {outcome}, expected 0 or 1")]
    InvalidOutcome { index: usize, outcome: i64 },

    /// Value and outcome columns disagree in length.
    #[error("value column has {values} rows but outcome column has {outcomes}")]
    LengthMismatch { values: usize, outcomes: usize },

    /// A configuration parameter is out of range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// An observation falls outside every bin of the partition.
    #[error("value {value} is not covered by the partition [{lower}, {upper}]")]
    UncoveredObservation { value: f64, lower: f64, upper: f64 },

    /// Merge index has no right-hand neighbour.
    #[error("cannot merge bin {index} with its neighbour: partition has {bins} bin(s)")]
    MergeOutOfRange { index: usize, bins: usize },
}
