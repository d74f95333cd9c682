//! Repository error types.

use simplegit_storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// No metadata directory exists under the given root.
    #[error("not a simplegit repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// A file to stage, or a commit/object digest, could not be resolved.
    #[error("not found: {0}")]
    NotFound(String),

    /// A commit was attempted with nothing staged.
    #[error("nothing to commit: staging index is empty")]
    EmptyStaging,

    /// A stored tree or commit could not be parsed.
    #[error("corrupt object: {0}")]
    CorruptObject(String),

    /// A path cannot be recorded in a tree entry.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// The object or reference store failed.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The staging index could not be read or written.
    #[error("index error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for RepoError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => Self::NotFound(id),
            StorageError::InvalidObject(msg) | StorageError::Compression(msg) => {
                Self::CorruptObject(msg)
            }
            other @ StorageError::Io(_) => Self::Storage(other),
        }
    }
}

/// A specialized Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepoError>;
