//! File-backed reference management.
//!
//! `HEAD` is a symbolic reference (`ref: refs/heads/<branch>`) and the
//! branch file holds the literal hex ID of the current tip. Both files are
//! rewritten whole on every update.

use crate::{write_atomic, ObjectId, Result, StorageError};
use std::fs;
use std::io;
use std::path::PathBuf;

const SYMBOLIC_PREFIX: &str = "ref: ";

/// A reference (branch tip or symbolic ref).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Direct reference to an object.
    Direct(ObjectId),
    /// Symbolic reference (e.g., HEAD -> refs/heads/master).
    Symbolic(String),
}

impl Reference {
    /// Parses the content of a reference file.
    pub fn parse(content: &str) -> Result<Self> {
        let content = content.trim();
        match content.strip_prefix(SYMBOLIC_PREFIX) {
            Some(target) => Ok(Self::Symbolic(target.trim().to_string())),
            None => content.parse().map(Self::Direct),
        }
    }

    /// Returns the text stored on disk for this reference.
    pub fn to_file_content(&self) -> String {
        match self {
            Self::Direct(id) => id.to_hex(),
            Self::Symbolic(target) => format!("{SYMBOLIC_PREFIX}{target}\n"),
        }
    }

    /// Returns the object ID if this is a direct reference.
    pub fn as_direct(&self) -> Option<ObjectId> {
        match self {
            Self::Direct(id) => Some(*id),
            Self::Symbolic(_) => None,
        }
    }
}

/// Reference store over a repository metadata directory.
#[derive(Debug, Clone)]
pub struct RefStore {
    meta_dir: PathBuf,
    branch: String,
}

impl RefStore {
    /// Creates a reference store for `meta_dir` tracking a single branch.
    pub fn new(meta_dir: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            meta_dir: meta_dir.into(),
            branch: branch.into(),
        }
    }

    /// Returns the full name of the tracked branch, e.g. `refs/heads/master`.
    pub fn branch_ref(&self) -> String {
        format!("refs/heads/{}", self.branch)
    }

    /// Returns the branch name.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Writes `HEAD` pointing at the branch and creates `refs/heads/`.
    ///
    /// The branch file itself is not created until the first commit.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.meta_dir.join("refs").join("heads"))?;
        let head = Reference::Symbolic(self.branch_ref());
        fs::write(self.meta_dir.join("HEAD"), head.to_file_content())?;
        Ok(())
    }

    /// Reads a reference by name relative to the metadata directory.
    ///
    /// Returns `None` when the file is absent or empty.
    pub fn get(&self, name: &str) -> Result<Option<Reference>> {
        let content = match fs::read_to_string(self.ref_path(name)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Reference::parse(&content).map(Some)
    }

    /// Resolves HEAD to the current branch tip.
    ///
    /// Returns `None` before the first commit.
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        match self.get("HEAD")? {
            Some(Reference::Direct(id)) => Ok(Some(id)),
            Some(Reference::Symbolic(target)) => match self.get(&target)? {
                Some(Reference::Direct(id)) => Ok(Some(id)),
                Some(Reference::Symbolic(_)) => Err(StorageError::InvalidObject(
                    "nested symbolic refs not supported".to_string(),
                )),
                None => Ok(None),
            },
            None => self.get(&self.branch_ref()).map(|r| r.and_then(|r| r.as_direct())),
        }
    }

    /// Points the branch at `id`, replacing the previous tip.
    pub fn write_head(&self, id: &ObjectId) -> Result<()> {
        let path = self.ref_path(&self.branch_ref());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&path, Reference::Direct(*id).to_file_content().as_bytes())?;
        tracing::debug!(branch = %self.branch, id = %id, "updated branch ref");
        Ok(())
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        name.split('/')
            .fold(self.meta_dir.clone(), |path, part| path.join(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn refs() -> (TempDir, RefStore) {
        let dir = TempDir::new().unwrap();
        let store = RefStore::new(dir.path(), "master");
        store.init().unwrap();
        (dir, store)
    }

    #[test]
    fn test_init_layout() {
        let (dir, _store) = refs();

        assert_eq!(
            fs::read_to_string(dir.path().join("HEAD")).unwrap(),
            "ref: refs/heads/master\n"
        );
        assert!(dir.path().join("refs/heads").is_dir());
        assert!(!dir.path().join("refs/heads/master").exists());
    }

    #[test]
    fn test_read_head_before_first_commit() {
        let (_dir, store) = refs();
        assert_eq!(store.read_head().unwrap(), None);
    }

    #[test]
    fn test_write_then_read_head() {
        let (dir, store) = refs();
        let id = ObjectId::from_bytes([7u8; 20]);

        store.write_head(&id).unwrap();

        assert_eq!(store.read_head().unwrap(), Some(id));
        assert_eq!(
            fs::read_to_string(dir.path().join("refs/heads/master")).unwrap(),
            id.to_hex()
        );
    }

    #[test]
    fn test_ref_update_replaces_tip() {
        let (_dir, store) = refs();
        let id1 = ObjectId::from_bytes([1u8; 20]);
        let id2 = ObjectId::from_bytes([2u8; 20]);

        store.write_head(&id1).unwrap();
        store.write_head(&id2).unwrap();

        assert_eq!(store.read_head().unwrap(), Some(id2));
    }

    #[test]
    fn test_empty_branch_file_reads_as_none() {
        let (dir, store) = refs();
        fs::write(dir.path().join("refs/heads/master"), "").unwrap();
        assert_eq!(store.read_head().unwrap(), None);
    }

    #[test]
    fn test_garbage_branch_file_is_invalid() {
        let (dir, store) = refs();
        fs::write(dir.path().join("refs/heads/master"), "not-a-digest").unwrap();
        assert!(matches!(
            store.read_head(),
            Err(StorageError::InvalidObject(_))
        ));
    }

    #[test]
    fn test_reference_parse() {
        assert_eq!(
            Reference::parse("ref: refs/heads/master\n").unwrap(),
            Reference::Symbolic("refs/heads/master".to_string())
        );
        let id = ObjectId::from_bytes([3u8; 20]);
        assert_eq!(
            Reference::parse(&format!("{id}\n")).unwrap(),
            Reference::Direct(id)
        );
    }

    #[test]
    fn test_custom_branch_name() {
        let dir = TempDir::new().unwrap();
        let store = RefStore::new(dir.path(), "trunk");
        store.init().unwrap();
        let id = ObjectId::from_bytes([9u8; 20]);

        store.write_head(&id).unwrap();

        assert_eq!(store.branch_ref(), "refs/heads/trunk");
        assert!(dir.path().join("refs/heads/trunk").is_file());
        assert_eq!(store.read_head().unwrap(), Some(id));
    }
}
