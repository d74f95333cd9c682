//! Commit objects.
//!
//! Payload layout (note the leading blank line and trailing newline):
//!
//! ```text
//!
//! tree <id>
//! author <name> <<email>> <epoch-seconds> <tz-offset>
//! committer <name> <<email>> <epoch-seconds> <tz-offset>
//!
//! <message>
//! ```
//!
//! There is no parent field: history is linear and only the branch ref
//! records which commit is current.

use std::fmt;

use simplegit_storage::ObjectId;

use crate::config::Identity;
use crate::{RepoError, Result};

/// Author or committer line contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Who made the change.
    pub identity: Identity,
    /// Seconds since the Unix epoch.
    pub time: i64,
    /// Timezone offset text, e.g. `+0000`.
    pub offset: String,
}

impl Signature {
    /// Creates a signature.
    pub fn new(identity: Identity, time: i64, offset: impl Into<String>) -> Self {
        Self {
            identity,
            time,
            offset: offset.into(),
        }
    }

    fn parse(text: &str) -> Result<Self> {
        let corrupt = || RepoError::CorruptObject(format!("malformed signature: {text:?}"));

        let mut parts = text.rsplitn(3, ' ');
        let offset = parts.next().ok_or_else(corrupt)?;
        let time = parts
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(corrupt)?;
        let who = parts.next().ok_or_else(corrupt)?;

        let (name, email) = who
            .strip_suffix('>')
            .and_then(|w| w.rsplit_once(" <"))
            .ok_or_else(corrupt)?;

        Ok(Self {
            identity: Identity {
                name: name.to_string(),
                email: email.to_string(),
            },
            time,
            offset: offset.to_string(),
        })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            self.identity.name, self.identity.email, self.time, self.offset
        )
    }
}

/// A decoded commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Snapshot this commit records.
    pub tree: ObjectId,
    /// Author line.
    pub author: Signature,
    /// Committer line.
    pub committer: Signature,
    /// Free-text message.
    pub message: String,
}

impl Commit {
    /// Creates a commit whose author and committer are the same signature.
    #[must_use]
    pub fn new(tree: ObjectId, signature: Signature, message: impl Into<String>) -> Self {
        Self {
            tree,
            author: signature.clone(),
            committer: signature,
            message: message.into(),
        }
    }

    /// Serializes the commit payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        format!(
            "\ntree {}\nauthor {}\ncommitter {}\n\n{}\n",
            self.tree, self.author, self.committer, self.message
        )
        .into_bytes()
    }

    /// Parses a commit payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| RepoError::CorruptObject(format!("commit is not UTF-8: {e}")))?;
        let text = text.strip_prefix('\n').unwrap_or(text);

        let (headers, body) = text.split_once("\n\n").ok_or_else(|| {
            RepoError::CorruptObject("commit has no message separator".to_string())
        })?;

        let mut tree = None;
        let mut author = None;
        let mut committer = None;
        for line in headers.lines() {
            if let Some(id) = line.strip_prefix("tree ") {
                let id = ObjectId::from_hex(id.trim())
                    .map_err(|e| RepoError::CorruptObject(format!("commit tree id: {e}")))?;
                tree = Some(id);
            } else if let Some(sig) = line.strip_prefix("author ") {
                author = Some(Signature::parse(sig)?);
            } else if let Some(sig) = line.strip_prefix("committer ") {
                committer = Some(Signature::parse(sig)?);
            }
        }

        let missing = |field: &str| RepoError::CorruptObject(format!("commit has no {field} line"));
        Ok(Self {
            tree: tree.ok_or_else(|| missing("tree"))?,
            author: author.ok_or_else(|| missing("author"))?,
            committer: committer.ok_or_else(|| missing("committer"))?,
            message: body.strip_suffix('\n').unwrap_or(body).to_string(),
        })
    }
}
