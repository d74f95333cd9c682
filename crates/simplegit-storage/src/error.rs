//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested object or reference was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored bytes could not be parsed as an object or reference.
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// The compressor or decompressor failed.
    #[error("compression error: {0}")]
    Compression(String),
}
