//! Error types for the merge engine.

use thiserror::Error;

/// Errors that can occur while merging images.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Two inputs disagree at a byte position and neither is the empty marker.
    ///
    /// The offset is 1-based, counted from the start of the pairwise merge
    /// that detected it.
    #[error(
        "merging failed due to difference at offset {offset} ({offset:#x}): \
         0x{left:02x} vs 0x{right:02x}"
    )]
    Conflict { offset: u64, left: u8, right: u8 },

    /// An input's length differs from the expected image size.
    #[error("input {index} is {actual} bytes, expected {expected}")]
    SizeMismatch {
        index: usize,
        expected: u64,
        actual: u64,
    },

    /// Fewer than two inputs were supplied.
    #[error("merging requires at least two inputs, got {0}")]
    NotEnoughInputs(usize),

    /// I/O failure while reading an input stream.
    #[error("I/O error on input {index}: {source}")]
    Io {
        index: usize,
        source: std::io::Error,
    },

    /// I/O failure while writing the merged output.
    #[error("I/O error on output: {0}")]
    Output(#[source] std::io::Error),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
