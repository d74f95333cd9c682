//! Repository handle and the caller-facing operations.

use std::fs;
use std::path::{Component, Path, PathBuf};

use simplegit_storage::{ObjectId, ObjectKind, ObjectStore, RefStore};

use crate::tree::validate_path;
use crate::{Commit, RepoConfig, RepoError, Result, Signature, StagingIndex, Tree, Worktree};

const INDEX_FILE: &str = "index.json";

/// Result of [`Repository::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// A fresh metadata directory was created.
    Created,
    /// The metadata directory already existed; nothing was written.
    AlreadyInitialized,
}

/// Per-path result of [`Repository::stage_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The file was stored and recorded under this blob ID.
    Staged(ObjectId),
    /// No file exists at the path; the index was left unchanged.
    Missing,
}

/// A repository rooted at a working directory.
///
/// The handle carries everything an operation needs; there is no
/// process-wide state. Concurrent processes operating on the same root are
/// not coordinated: the index and branch ref are last-writer-wins.
#[derive(Debug, Clone)]
pub struct Repository {
    meta_dir: PathBuf,
    config: RepoConfig,
    objects: ObjectStore,
    refs: RefStore,
    worktree: Worktree,
}

impl Repository {
    /// Creates the metadata directory under `root`.
    ///
    /// Lays out `objects/`, `refs/heads/`, and a symbolic `HEAD`. If the
    /// metadata directory already exists nothing is written.
    pub fn init(root: impl AsRef<Path>, config: &RepoConfig) -> Result<InitStatus> {
        let root = root.as_ref();
        let meta_dir = root.join(&config.meta_dir);

        if meta_dir.exists() {
            tracing::info!(path = %root.display(), "repository already initialized");
            return Ok(InitStatus::AlreadyInitialized);
        }

        fs::create_dir_all(meta_dir.join("objects"))?;
        RefStore::new(&meta_dir, config.branch.as_str()).init()?;

        tracing::info!(path = %root.display(), branch = %config.branch, "initialized repository");
        Ok(InitStatus::Created)
    }

    /// Opens an initialized repository.
    pub fn open(root: impl AsRef<Path>, config: RepoConfig) -> Result<Self> {
        let root = root.as_ref();
        let meta_dir = root.join(&config.meta_dir);
        if !meta_dir.is_dir() {
            return Err(RepoError::NotARepository(root.to_path_buf()));
        }

        let objects = ObjectStore::new(meta_dir.join("objects")).with_compression(config.compression);
        let refs = RefStore::new(&meta_dir, config.branch.as_str());
        let worktree = Worktree::new(root, &config.meta_dir);

        Ok(Self {
            meta_dir,
            config,
            objects,
            refs,
            worktree,
        })
    }

    /// Returns the working-directory root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.worktree.root()
    }

    /// Returns the metadata directory.
    #[must_use]
    pub fn meta_dir(&self) -> &Path {
        &self.meta_dir
    }

    /// Returns the object store.
    #[must_use]
    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    /// Returns the configuration this handle was opened with.
    #[must_use]
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    fn index_path(&self) -> PathBuf {
        self.meta_dir.join(INDEX_FILE)
    }

    /// Returns the current staging index.
    pub fn staged(&self) -> Result<StagingIndex> {
        StagingIndex::load(&self.index_path())
    }

    /// Returns the current branch tip, or `None` before the first commit.
    pub fn head(&self) -> Result<Option<ObjectId>> {
        Ok(self.refs.read_head()?)
    }

    /// Stores the file at `path` (relative to the root) as a blob and
    /// records it in the staging index.
    ///
    /// Fails with [`RepoError::NotFound`] without touching the index when
    /// no file exists at `path`.
    pub fn stage(&self, path: &str) -> Result<ObjectId> {
        validate_path(path)?;
        if self.is_metadata_path(path) {
            return Err(RepoError::InvalidPath(path.to_string()));
        }

        let full_path = self.root().join(path);
        if !full_path.is_file() {
            return Err(RepoError::NotFound(path.to_string()));
        }

        let content = fs::read(&full_path)?;
        let id = self.objects.put_blob(content)?;

        let mut index = self.staged()?;
        index.stage(path, id);
        index.save(&self.index_path())?;

        tracing::info!(path = %path, id = %id, "staged");
        Ok(id)
    }

    /// Stages each path in turn.
    ///
    /// Missing files are reported per path and do not stop the remaining
    /// paths from being staged; any other failure aborts.
    pub fn stage_all<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<(String, StageOutcome)>> {
        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let outcome = match self.stage(path) {
                Ok(id) => StageOutcome::Staged(id),
                Err(RepoError::NotFound(_)) => {
                    tracing::warn!(path = %path, "file not found, skipping");
                    StageOutcome::Missing
                }
                Err(e) => return Err(e),
            };
            outcomes.push((path.to_string(), outcome));
        }
        Ok(outcomes)
    }

    /// Records the staged files as a new commit and moves the branch to it.
    ///
    /// Fails with [`RepoError::EmptyStaging`] and writes nothing when the
    /// staging index is empty. On success the index is cleared.
    pub fn commit(&self, message: &str) -> Result<ObjectId> {
        self.commit_at(message, chrono::Utc::now().timestamp())
    }

    /// Like [`Repository::commit`] with an explicit timestamp (Unix seconds).
    pub fn commit_at(&self, message: &str, time: i64) -> Result<ObjectId> {
        let mut index = self.staged()?;
        if index.is_empty() {
            return Err(RepoError::EmptyStaging);
        }
        if let Some(entry) = index.entries().iter().find(|e| !self.objects.exists(&e.id)) {
            return Err(RepoError::NotFound(entry.id.to_hex()));
        }

        let tree_id = self
            .objects
            .put(ObjectKind::Tree, Tree::from_index(&index).encode())?;

        let signature = Signature::new(
            self.config.identity.clone(),
            time,
            self.config.tz_offset.as_str(),
        );
        let commit = Commit::new(tree_id, signature, message);
        let commit_id = self.objects.put(ObjectKind::Commit, commit.encode())?;

        self.refs.write_head(&commit_id)?;
        let files = index.len();
        index.clear();
        index.save(&self.index_path())?;

        tracing::info!(id = %commit_id, tree = %tree_id, files, "committed");
        Ok(commit_id)
    }

    /// Reads and decodes a commit object.
    pub fn read_commit(&self, id: &ObjectId) -> Result<Commit> {
        let object = self.objects.get(id)?;
        if object.kind != ObjectKind::Commit {
            return Err(RepoError::CorruptObject(format!(
                "{id} is a {}, not a commit",
                object.kind
            )));
        }
        Commit::parse(&object.data)
    }

    /// Reads and decodes a tree object.
    pub fn read_tree(&self, id: &ObjectId) -> Result<Tree> {
        let object = self.objects.get(id)?;
        if object.kind != ObjectKind::Tree {
            return Err(RepoError::CorruptObject(format!(
                "{id} is a {}, not a tree",
                object.kind
            )));
        }
        Tree::parse(&object.data)
    }

    /// Makes the working directory match commit `digest` and moves the
    /// branch to it.
    ///
    /// The whole target is resolved and checked before anything on disk
    /// changes: an unknown digest fails with [`RepoError::NotFound`] and an
    /// unreadable commit or tree with [`RepoError::CorruptObject`], both
    /// leaving the working directory, index, and branch ref untouched.
    pub fn reset(&self, digest: &str) -> Result<ObjectId> {
        let id: ObjectId = digest
            .parse()
            .map_err(|_| RepoError::NotFound(digest.to_string()))?;
        if !self.objects.exists(&id) {
            return Err(RepoError::NotFound(digest.to_string()));
        }

        let commit = self.read_commit(&id)?;
        let tree = self.read_tree(&commit.tree)?;
        for entry in &tree.entries {
            if validate_path(&entry.path).is_err() || self.is_metadata_path(&entry.path) {
                return Err(RepoError::CorruptObject(format!(
                    "tree {} records unsafe path {:?}",
                    commit.tree, entry.path
                )));
            }
            if !self.objects.exists(&entry.id) {
                return Err(RepoError::NotFound(entry.id.to_hex()));
            }
        }

        self.worktree.sync(&self.objects, &tree)?;
        self.refs.write_head(&id)?;
        StagingIndex::default().save(&self.index_path())?;

        tracing::info!(id = %id, files = tree.entries.len(), "reset working directory");
        Ok(id)
    }

    fn is_metadata_path(&self, path: &str) -> bool {
        Path::new(path)
            .components()
            .find(|c| matches!(c, Component::Normal(_)))
            .is_some_and(|c| c.as_os_str() == self.config.meta_dir.as_str())
    }
}
