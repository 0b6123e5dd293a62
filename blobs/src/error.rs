//! Error types for region detection.

use std::fmt;

use thiserror::Error;

/// Arena pool identifiers, reported with [`Error::CapacityExceeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    ScanLines,
    Parts,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pool::ScanLines => write!(f, "scan-line"),
            Pool::Parts => write!(f, "blob-part"),
        }
    }
}

/// Errors that abort a `find_blobs` call or reject a configuration.
///
/// Empty frames, frames without blobs and single-pixel blobs are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Invalid detector configuration: {0}")]
    InvalidConfig(String),

    #[error("The {pool} pool is exhausted (capacity {capacity})")]
    CapacityExceeded { pool: Pool, capacity: usize },
}

impl Error {
    /// True for malformed input that was rejected before scanning started.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::BufferSizeMismatch { .. } | Error::InvalidDimensions { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
