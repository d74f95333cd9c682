//! Loose object storage for simplegit.
//!
//! This crate provides content-addressed, on-disk storage for repository
//! objects (blobs, trees, commits) and the file-backed reference store
//! that records the branch tip.

mod compression;
mod error;
mod fsutil;
mod object;
mod refs;
mod store;

pub use compression::CompressionLevel;
pub use error::StorageError;
pub use fsutil::write_atomic;
pub use object::{Object, ObjectId, ObjectKind};
pub use refs::{RefStore, Reference};
pub use store::ObjectStore;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
