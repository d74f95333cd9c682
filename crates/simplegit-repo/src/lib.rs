//! # Simplegit Repo
//!
//! Repository operations for simplegit: staging files, recording
//! snapshots as tree and commit objects, and resetting the working
//! directory to any stored commit.
//!
//! A [`Repository`] is an explicit handle carrying the repository root and
//! configuration; every operation goes through it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use simplegit_repo::{RepoConfig, Repository};
//!
//! # fn main() -> simplegit_repo::Result<()> {
//! let root = std::path::Path::new("work");
//! Repository::init(root, &RepoConfig::default())?;
//! let repo = Repository::open(root, RepoConfig::default())?;
//! repo.stage("a.txt")?;
//! let first = repo.commit("first")?;
//! repo.reset(&first.to_hex())?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod commit;
mod config;
mod error;
mod index;
mod repository;
mod tree;
mod worktree;

pub use commit::{Commit, Signature};
pub use config::{Identity, RepoConfig};
pub use error::{RepoError, Result};
pub use index::{IndexEntry, StagingIndex};
pub use repository::{InitStatus, Repository, StageOutcome};
pub use tree::{Tree, TreeEntry};
pub use worktree::Worktree;

pub use simplegit_storage::{CompressionLevel, ObjectId, ObjectKind};
