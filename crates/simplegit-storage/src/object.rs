//! Object types and the canonical `"<kind> <len>\0<payload>"` encoding.

use crate::{Result, StorageError};
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// A 20-byte SHA-1 object identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 20]);

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl ObjectId {
    /// Length of the hex representation.
    pub const HEX_LEN: usize = 40;

    /// Creates an ObjectId from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an ObjectId from a hex string.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != Self::HEX_LEN {
            return Err(StorageError::InvalidObject(format!(
                "invalid object id length: {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex, &mut bytes)
            .map_err(|e| StorageError::InvalidObject(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns the hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the first seven hex characters, for status messages.
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// Computes the SHA-1 hash of data with an object header.
    pub fn hash_object(kind: ObjectKind, data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(header(kind, data.len()).as_bytes());
        hasher.update(data);
        let result = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }
}

impl FromStr for ObjectId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s.trim())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// File content.
    Blob,
    /// Flat path listing of one snapshot.
    Tree,
    /// Commit object.
    Commit,
}

impl ObjectKind {
    /// Returns the string used in object headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    /// Parses an object kind from a header string.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(Self::Blob),
            "tree" => Ok(Self::Tree),
            "commit" => Ok(Self::Commit),
            _ => Err(StorageError::InvalidObject(format!(
                "unknown object type: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn header(kind: ObjectKind, len: usize) -> String {
    format!("{} {}\0", kind.as_str(), len)
}

/// An immutable stored object (blob, tree, or commit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// The object's unique identifier (SHA-1 hash).
    pub id: ObjectId,
    /// The kind of object.
    pub kind: ObjectKind,
    /// The raw payload (uncompressed, without header).
    pub data: Bytes,
}

impl Object {
    /// Creates a new object, computing its ID from the data.
    pub fn new(kind: ObjectKind, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let id = ObjectId::hash_object(kind, &data);
        Self { id, kind, data }
    }

    /// Creates a blob object from file content.
    pub fn blob(content: impl Into<Bytes>) -> Self {
        Self::new(ObjectKind::Blob, content)
    }

    /// Returns the size of the payload.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the canonical header followed by the payload.
    ///
    /// This is the exact byte string the ID is computed over.
    pub fn encode(&self) -> Vec<u8> {
        let header = header(self.kind, self.data.len());
        let mut out = Vec::with_capacity(header.len() + self.data.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.data);
        out
    }

    /// Parses `"<kind> <len>\0<payload>"` back into an object.
    ///
    /// The length field must be a number but is otherwise informational:
    /// the payload's actual length wins.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let null_pos = raw.iter().position(|&b| b == 0).ok_or_else(|| {
            StorageError::InvalidObject("missing null byte in header".to_string())
        })?;

        let header = String::from_utf8_lossy(&raw[..null_pos]);
        let (kind, size) = header.split_once(' ').ok_or_else(|| {
            StorageError::InvalidObject(format!("invalid header: {}", header))
        })?;

        let kind = ObjectKind::parse(kind)?;
        let size: usize = size
            .parse()
            .map_err(|_| StorageError::InvalidObject("invalid size".to_string()))?;

        let data = Bytes::copy_from_slice(&raw[null_pos + 1..]);
        if size != data.len() {
            tracing::debug!(
                declared = size,
                actual = data.len(),
                "object header length differs from payload"
            );
        }
        Ok(Self::new(kind, data))
    }
}
