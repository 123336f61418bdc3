//! Error types for the capture crate.

use thiserror::Error;

/// Errors that can occur while capturing a flash dump.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The console response is too short to contain a full page dump.
    #[error("dump response too short: {0} bytes")]
    ResponseTooShort(usize),

    /// The console response is missing an expected marker.
    #[error("dump response has no {0:?} marker")]
    MissingMarker(&'static str),

    /// The page data region could not be decoded as hex.
    #[error("invalid hex in dump response: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A parsed page did not contain a full page of data.
    #[error("page {page}: expected {expected} data bytes, got {actual}")]
    ShortPage {
        page: u64,
        expected: usize,
        actual: usize,
    },

    /// I/O error on the console or the output stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for capture results.
pub type CaptureResult<T> = Result<T, CaptureError>;
