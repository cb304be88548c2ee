//! Read-only version-control interface consumed by the analysis engine.
//!
//! Every method is blocking and may be slow or fail; callers reach it through
//! `BoundedGit`, which moves each call onto the blocking pool under a timeout.

use std::time::Duration;

use thiserror::Error;

use crate::models::{Commit, DiffSummary};

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    #[error("Path not found: {path} at {revision}")]
    PathNotFound { path: String, revision: String },

    #[error("git {operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Blocking git task failed: {0}")]
    Task(String),
}

impl GitError {
    /// True when the failure only means the file is absent at that revision.
    pub fn is_missing_path(&self) -> bool {
        matches!(self, GitError::PathNotFound { .. })
    }
}

pub trait GitSource: Send + Sync {
    /// Commits reachable from HEAD, newest first, at most `max_count`.
    fn log(&self, max_count: usize) -> Result<Vec<Commit>, GitError>;

    /// Per-file line counts for everything that changed from `from` to `to`.
    fn diff_summary(&self, from: &str, to: &str) -> Result<DiffSummary, GitError>;

    /// Unified patch text for one path between two revisions.
    fn diff(&self, from: &str, to: &str, path: &str) -> Result<String, GitError>;

    /// Full text of `path` at `revision`.
    fn show(&self, revision: &str, path: &str) -> Result<String, GitError>;

    /// Every file path at `revision`, in tree order.
    fn ls_tree(&self, revision: &str) -> Result<Vec<String>, GitError>;

    /// Paths with uncommitted working-tree changes.
    fn status(&self) -> Result<Vec<String>, GitError>;
}
