//! Staging index.
//!
//! The pending change set between commits, persisted as `index.json`: a
//! flat JSON object mapping repository-relative paths to blob IDs. Entries
//! are kept in an explicit ordered list so the document, and any tree built
//! from it, is deterministic. Re-staging a path updates it in place.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use simplegit_storage::{write_atomic, ObjectId};

use crate::Result;

/// One staged path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Repository-relative path, exactly as the caller supplied it.
    pub path: String,
    /// Blob ID of the staged content.
    pub id: ObjectId,
}

/// Ordered mapping of staged paths to blob IDs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StagingIndex {
    entries: Vec<IndexEntry>,
}

impl StagingIndex {
    /// Loads the index from `path`; a missing or blank file is an empty index.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&data)?)
    }

    /// Rewrites the whole index file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())?;
        Ok(())
    }

    /// Records `path -> id`, keeping the original position of a re-staged path.
    pub fn stage(&mut self, path: &str, id: ObjectId) {
        match self.entries.iter_mut().find(|e| e.path == path) {
            Some(entry) => entry.id = id,
            None => self.entries.push(IndexEntry {
                path: path.to_string(),
                id,
            }),
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the staged blob ID for `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<ObjectId> {
        self.entries.iter().find(|e| e.path == path).map(|e| e.id)
    }

    /// Entries in staging order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of staged paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for StagingIndex {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.path, &entry.id)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StagingIndex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = StagingIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of paths to object ids")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut index = StagingIndex::default();
                while let Some((path, id)) = access.next_entry::<String, ObjectId>()? {
                    index.stage(&path, id);
                }
                Ok(index)
            }
        }

        deserializer.deserialize_map(IndexVisitor)
    }
}
