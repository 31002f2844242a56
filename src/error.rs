//! Error type shared by the evaluator and the dataset layer.
//!
//! The ordering algorithms themselves never fail: an empty job set yields
//! an empty ordering with objective 0.

use thiserror::Error;

/// Errors reported by u-flowtime.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The job set (or a dataset header) declares zero jobs.
    #[error("empty input: no jobs")]
    EmptyInput,

    /// An ordering is not a permutation of the job index range.
    #[error("invalid ordering: {0}")]
    InvalidOrdering(String),

    /// A dataset could not be parsed.
    ///
    /// `position` is the 1-based token position (the header count is
    /// token 1).
    #[error("malformed dataset at token {position}: {message}")]
    Malformed { position: usize, message: String },

    /// Underlying filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;
