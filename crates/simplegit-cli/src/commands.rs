//! CLI command implementations.
//!
//! Each command opens the repository, runs one core operation, and returns
//! the status line to print.

use std::path::Path;

use anyhow::{bail, Context, Result};
use simplegit_repo::{InitStatus, RepoConfig, RepoError, Repository, StageOutcome};

fn open(root: &Path) -> Result<Repository> {
    Repository::open(root, RepoConfig::from_env())
        .with_context(|| format!("cannot open repository at {}", root.display()))
}

/// Initialize a repository at `path`.
pub fn init(path: &Path) -> Result<String> {
    tracing::info!(path = %path.display(), "Initializing repository");

    Ok(match Repository::init(path, &RepoConfig::from_env())? {
        InitStatus::Created => format!("Initialized empty repository in {}", path.display()),
        InitStatus::AlreadyInitialized => {
            format!("Repository already initialized in {}", path.display())
        }
    })
}

/// Stage files.
pub fn add(root: &Path, paths: &[String]) -> Result<String> {
    let repo = open(root)?;
    let lines: Vec<String> = repo
        .stage_all(paths)?
        .into_iter()
        .map(|(path, outcome)| match outcome {
            StageOutcome::Staged(_) => format!("Staged: {path}"),
            StageOutcome::Missing => format!("File not found: {path}"),
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Commit the staged files.
pub fn commit(root: &Path, message: &str) -> Result<String> {
    let repo = open(root)?;
    match repo.commit(message) {
        Ok(id) => Ok(format!("Committed: {id}")),
        Err(RepoError::EmptyStaging) => Ok("Nothing to commit! Please stage files.".to_string()),
        Err(e) => Err(e.into()),
    }
}

/// Reset the working directory to a commit.
pub fn reset(root: &Path, commit_hash: &str) -> Result<String> {
    let repo = open(root)?;
    match repo.reset(commit_hash) {
        Ok(id) => Ok(format!("Reset to commit {}", id.short())),
        Err(RepoError::NotFound(id)) if id == commit_hash => {
            bail!("commit {commit_hash} not found")
        }
        Err(e) => Err(e.into()),
    }
}
