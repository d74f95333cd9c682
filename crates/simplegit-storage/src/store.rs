//! Loose, content-addressed object store.

use crate::compression::{self, CompressionLevel};
use crate::{write_atomic, Object, ObjectId, ObjectKind, Result, StorageError};
use bytes::Bytes;
use std::fs;
use std::path::{Path, PathBuf};

/// Content-addressed object store rooted at an `objects/` directory.
///
/// Each object lives at `objects/<2 hex>/<38 hex>` as the zlib stream of
/// its encoded form. Objects are never removed.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
    level: CompressionLevel,
}

impl ObjectStore {
    /// Creates a store over `objects_dir` with the default compression level.
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: objects_dir.into(),
            level: CompressionLevel::default(),
        }
    }

    /// Sets the compression level used for new objects.
    #[must_use]
    pub fn with_compression(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Returns the `objects/` directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores a payload of the given kind and returns its ID.
    pub fn put(&self, kind: ObjectKind, payload: impl Into<Bytes>) -> Result<ObjectId> {
        self.put_object(&Object::new(kind, payload))
    }

    /// Stores a blob and returns its ID.
    pub fn put_blob(&self, content: impl Into<Bytes>) -> Result<ObjectId> {
        self.put(ObjectKind::Blob, content)
    }

    /// Stores an already built object.
    ///
    /// The file is always replaced atomically, so storing an object that
    /// is already present rewrites identical bytes and repairs a file left
    /// damaged by an earlier interrupted write.
    pub fn put_object(&self, object: &Object) -> Result<ObjectId> {
        let path = self.object_path(&object.id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let compressed = self.level.compress(&object.encode())?;
        write_atomic(&path, &compressed)?;
        tracing::debug!(
            id = %object.id,
            kind = %object.kind,
            size = object.size(),
            "stored object"
        );
        Ok(object.id)
    }

    /// Retrieves an object by ID.
    pub fn get(&self, id: &ObjectId) -> Result<Object> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id.to_hex()));
            }
            Err(e) => return Err(e.into()),
        };
        let raw = compression::decompress(&compressed)?;
        Object::decode(&raw)
    }

    /// Checks if an object exists.
    pub fn exists(&self, id: &ObjectId) -> bool {
        self.object_path(id).is_file()
    }

    /// Returns the filesystem path for an object ID.
    ///
    /// Uses 2-char prefix directories: `abcdef...` -> `ab/cdef...`
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        let (prefix, rest) = hex.split_at(2);
        self.root.join(prefix).join(rest)
    }
}
