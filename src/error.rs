//! Error types for Tflat

use thiserror::Error;

/// Top-level error type
#[derive(Error, Debug)]
pub enum FlattenError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Tflat operations
pub type Result<T> = std::result::Result<T, FlattenError>;
