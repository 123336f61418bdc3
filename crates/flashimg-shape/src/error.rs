//! Error types for the shape crate.

use thiserror::Error;

/// Errors that can occur while padding or offsetting an image.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The requested final size is smaller than the input.
    #[error("cannot reach a final size of {target} bytes: input is already {input} bytes")]
    TargetTooSmall { target: u64, input: u64 },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for shape results.
pub type ShapeResult<T> = Result<T, ShapeError>;
