//! Tree objects: one flat snapshot of staged paths.
//!
//! Payload is newline-joined entry lines of the form
//! `100644 0 blob <id> <path>`. The path is everything after the fourth
//! space, so it may itself contain spaces but never a newline.

use std::path::{Component, Path};

use simplegit_storage::{ObjectId, ObjectKind};

use crate::{RepoError, Result, StagingIndex};

/// Mode written for every entry (regular file).
pub const FILE_MODE: &str = "100644";
/// Constant second field of every entry line.
pub const ENTRY_PLACEHOLDER: &str = "0";

/// A path and the blob holding its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Repository-relative path.
    pub path: String,
    /// Blob ID.
    pub id: ObjectId,
}

/// Ordered list of tree entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    /// Entries in staging order.
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Builds a tree with one entry per staged path, in staging order.
    #[must_use]
    pub fn from_index(index: &StagingIndex) -> Self {
        let entries = index
            .entries()
            .iter()
            .map(|e| TreeEntry {
                path: e.path.clone(),
                id: e.id,
            })
            .collect();
        Self { entries }
    }

    /// Serializes the tree payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "{FILE_MODE} {ENTRY_PLACEHOLDER} {} {} {}",
                    ObjectKind::Blob,
                    e.id,
                    e.path
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
            .into_bytes()
    }

    /// Parses a tree payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| RepoError::CorruptObject(format!("tree is not UTF-8: {e}")))?;

        let mut entries = Vec::new();
        for line in text.split('\n').filter(|l| !l.is_empty()) {
            let fields: Vec<&str> = line.splitn(5, ' ').collect();
            let [_mode, _placeholder, kind, id, path] = fields[..] else {
                return Err(RepoError::CorruptObject(format!(
                    "malformed tree entry: {line:?}"
                )));
            };
            if kind != ObjectKind::Blob.as_str() {
                return Err(RepoError::CorruptObject(format!(
                    "unexpected tree entry kind: {kind}"
                )));
            }
            if path.is_empty() {
                return Err(RepoError::CorruptObject(format!(
                    "tree entry without path: {line:?}"
                )));
            }
            let id = ObjectId::from_hex(id)
                .map_err(|e| RepoError::CorruptObject(format!("tree entry id: {e}")))?;
            entries.push(TreeEntry {
                path: path.to_string(),
                id,
            });
        }
        Ok(Self { entries })
    }
}

/// Checks that `path` can be recorded in a tree entry line and stays
/// inside the repository root.
pub(crate) fn validate_path(path: &str) -> Result<()> {
    let inside_root = Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if path.is_empty() || path.contains('\n') || !inside_root {
        return Err(RepoError::InvalidPath(path.to_string()));
    }
    Ok(())
}
