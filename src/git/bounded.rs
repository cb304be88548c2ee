//! Timeout-bounded async access to a `GitSource`.
//!
//! git2 calls block, so each one runs on tokio's blocking pool and is raced
//! against `timeout`. A call that loses the race reports `GitError::Timeout`;
//! the blocking task itself finishes in the background.
//!
//! The abandoned task may still hold the repository lock, so once one call
//! times out every later call on the same `BoundedGit` (and its clones) fails
//! at once instead of queueing behind it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::git::source::{GitError, GitSource};
use crate::models::{Commit, DiffSummary};

#[derive(Clone)]
pub struct BoundedGit {
    source: Arc<dyn GitSource>,
    timeout: Duration,
    stalled: Arc<AtomicBool>,
}

impl BoundedGit {
    pub fn new(source: Arc<dyn GitSource>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            stalled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True once any call has timed out.
    pub fn is_stalled(&self) -> bool {
        self.stalled.load(Ordering::SeqCst)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, GitError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn GitSource) -> Result<T, GitError> + Send + 'static,
    {
        if self.is_stalled() {
            tracing::debug!("Skipping git {}: an earlier call timed out", operation);
            return Err(GitError::Timeout {
                operation,
                after: self.timeout,
            });
        }

        let source = Arc::clone(&self.source);
        let task = tokio::task::spawn_blocking(move || f(source.as_ref()));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(GitError::Task(join_err.to_string())),
            Err(_) => {
                self.stalled.store(true, Ordering::SeqCst);
                tracing::warn!("git {} exceeded {:?}", operation, self.timeout);
                Err(GitError::Timeout {
                    operation,
                    after: self.timeout,
                })
            }
        }
    }

    pub async fn log(&self, max_count: usize) -> Result<Vec<Commit>, GitError> {
        self.run("log", move |git| git.log(max_count)).await
    }

    pub async fn diff_summary(&self, from: &str, to: &str) -> Result<DiffSummary, GitError> {
        let (from, to) = (from.to_string(), to.to_string());
        self.run("diff --stat", move |git| git.diff_summary(&from, &to)).await
    }

    pub async fn diff(&self, from: &str, to: &str, path: &str) -> Result<String, GitError> {
        let (from, to, path) = (from.to_string(), to.to_string(), path.to_string());
        self.run("diff", move |git| git.diff(&from, &to, &path)).await
    }

    pub async fn show(&self, revision: &str, path: &str) -> Result<String, GitError> {
        let (revision, path) = (revision.to_string(), path.to_string());
        self.run("show", move |git| git.show(&revision, &path)).await
    }

    pub async fn ls_tree(&self, revision: &str) -> Result<Vec<String>, GitError> {
        let revision = revision.to_string();
        self.run("ls-tree", move |git| git.ls_tree(&revision)).await
    }

    pub async fn status(&self) -> Result<Vec<String>, GitError> {
        self.run("status", |git| git.status()).await
    }
}
