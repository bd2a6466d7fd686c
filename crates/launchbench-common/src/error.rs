//! Error types for launchbench

use thiserror::Error;

/// Errors produced while setting up, running or verifying a measurement run.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("buffer allocation failed: {len} elements ({bytes} bytes)")]
    Allocation { len: usize, bytes: usize },

    #[error("buffer length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("kernel launch failed: {0}")]
    Launch(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("result validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// Whether this error comes from a kernel producing wrong output.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Outcome of a failed correctness scan over a result buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{mismatches} of {len} elements rejected; first at index {first_index} (value {first_value})"
)]
pub struct ValidationError {
    /// Number of elements scanned.
    pub len: usize,
    /// Number of elements that failed the predicate.
    pub mismatches: usize,
    /// Index of the first failing element.
    pub first_index: usize,
    /// Value of the first failing element.
    pub first_value: i32,
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, BenchError>;
