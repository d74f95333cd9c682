//! Repository configuration.

use simplegit_storage::CompressionLevel;

/// Environment variable overriding the commit author name.
pub const ENV_AUTHOR_NAME: &str = "SIMPLEGIT_AUTHOR_NAME";
/// Environment variable overriding the commit author email.
pub const ENV_AUTHOR_EMAIL: &str = "SIMPLEGIT_AUTHOR_EMAIL";
/// Environment variable selecting the object compression level.
pub const ENV_COMPRESSION: &str = "SIMPLEGIT_COMPRESSION";

/// Name and email recorded on the author and committer lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Email address, written between angle brackets.
    pub email: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            email: "user@example.com".to_string(),
        }
    }
}

/// Configuration for a repository handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Name of the metadata directory under the repository root.
    pub meta_dir: String,
    /// The single branch HEAD points at.
    pub branch: String,
    /// Identity used for both author and committer.
    pub identity: Identity,
    /// Timezone offset text written after commit timestamps.
    pub tz_offset: String,
    /// Compression level for new objects.
    pub compression: CompressionLevel,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            meta_dir: ".simplegit".to_string(),
            branch: "master".to_string(),
            identity: Identity::default(),
            tz_offset: "+0000".to_string(),
            compression: CompressionLevel::default(),
        }
    }
}

impl RepoConfig {
    /// Builds the default configuration overlaid with `SIMPLEGIT_*`
    /// environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the default configuration overlaid with values from `lookup`.
    ///
    /// Empty values are ignored, as are unknown compression level names.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = get(ENV_AUTHOR_NAME) {
            config.identity.name = name;
        }
        if let Some(email) = get(ENV_AUTHOR_EMAIL) {
            config.identity.email = email;
        }
        if let Some(level) = get(ENV_COMPRESSION) {
            match CompressionLevel::parse(&level) {
                Some(level) => config.compression = level,
                None => tracing::warn!(value = %level, "ignoring unknown compression level"),
            }
        }
        config
    }

    /// Replaces the author/committer identity.
    #[must_use]
    pub fn with_identity(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.identity = Identity {
            name: name.into(),
            email: email.into(),
        };
        self
    }

    /// Replaces the compression level.
    #[must_use]
    pub fn with_compression(mut self, level: CompressionLevel) -> Self {
        self.compression = level;
        self
    }
}
