//! Working-directory synchronization.
//!
//! Materializes a tree onto disk in two phases: every tree entry is
//! written first, then every file outside the tree is deleted. An
//! interrupted run can leave stale extra files behind but never misses a
//! file the tree records. The metadata directory is never touched.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use simplegit_storage::ObjectStore;
use walkdir::WalkDir;

use crate::{Result, Tree};

/// The files under a repository root, excluding its metadata directory.
#[derive(Debug, Clone)]
pub struct Worktree {
    root: PathBuf,
    meta_dir: PathBuf,
}

impl Worktree {
    /// Creates a worktree over `root`, skipping `root/<meta_dir_name>`.
    pub fn new(root: impl Into<PathBuf>, meta_dir_name: &str) -> Self {
        let root = root.into();
        let meta_dir = root.join(meta_dir_name);
        Self { root, meta_dir }
    }

    /// Returns the repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Makes the file set under the root equal to `tree`.
    ///
    /// Every blob `tree` references must already be in `store`.
    pub fn sync(&self, store: &ObjectStore, tree: &Tree) -> Result<()> {
        self.write_tree(store, tree)?;
        let removed = self.remove_untracked(tree)?;
        tracing::debug!(
            written = tree.entries.len(),
            removed = removed.len(),
            "working directory synchronized"
        );
        Ok(())
    }

    /// Writes every entry of `tree`, replacing existing content in full.
    pub fn write_tree(&self, store: &ObjectStore, tree: &Tree) -> Result<()> {
        for entry in &tree.entries {
            let blob = store.get(&entry.id)?;
            let full_path = self.root.join(&entry.path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&full_path, &blob.data)?;
            tracing::debug!(path = %entry.path, id = %entry.id, "wrote file");
        }
        Ok(())
    }

    /// Deletes every file under the root that `tree` does not list.
    ///
    /// Returns the root-relative paths removed. Directories are left in
    /// place even when they end up empty.
    pub fn remove_untracked(&self, tree: &Tree) -> Result<Vec<PathBuf>> {
        let tracked: HashSet<PathBuf> = tree
            .entries
            .iter()
            .map(|e| normalize(Path::new(&e.path)))
            .collect();

        let mut removed = Vec::new();
        for entry in self.files()? {
            let rel = normalize(&entry);
            if tracked.contains(&rel) {
                continue;
            }
            fs::remove_file(self.root.join(&entry))?;
            tracing::debug!(path = %rel.display(), "removed file");
            removed.push(rel);
        }
        Ok(removed)
    }

    /// Lists root-relative paths of all non-directory entries, skipping
    /// the metadata directory.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() != self.meta_dir);

        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_dir() {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                files.push(rel.to_path_buf());
            }
        }
        Ok(files)
    }
}

/// Drops `.` components so `./a.txt` and `a.txt` name the same file.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}
