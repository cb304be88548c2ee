//! Shallow clone of a remote repository into a scoped temporary directory.
//!
//! The `TempDir` guard is created before the clone starts and moves into the
//! blocking clone task. On success it is handed to the `GitRepository`, so the
//! directory lives exactly as long as the last handle to the clone. A clone
//! abandoned by the outer timeout still owns it and removes it when it ends.

use std::path::Path;
use std::time::{Duration, Instant};

use git2::build::RepoBuilder;
use git2::{ErrorClass, ErrorCode, FetchOptions, RemoteCallbacks};
use tempfile::TempDir;
use thiserror::Error;

use crate::git::repository::GitRepository;

const TEMP_PREFIX: &str = "git-timelapse-";

#[derive(Debug, Clone)]
pub struct CloneOptions {
    /// History depth for remote clones; 0 fetches everything.
    pub depth: u32,
    pub timeout: Duration,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            depth: 50,
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneFailureKind {
    Unauthorized,
    NotFound,
    TimedOut,
    Network,
    Other,
}

#[derive(Error, Debug)]
#[error("clone failed ({kind:?}): {message}")]
pub struct CloneFailure {
    pub kind: CloneFailureKind,
    pub message: String,
}

impl CloneFailure {
    pub fn new(kind: CloneFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn from_git(err: &git2::Error) -> Self {
        let kind = match (err.code(), err.class()) {
            (ErrorCode::Auth, _) | (ErrorCode::Certificate, _) => CloneFailureKind::Unauthorized,
            (ErrorCode::NotFound, _) => CloneFailureKind::NotFound,
            _ => match classify_clone_message(err.message()) {
                CloneFailureKind::Other
                    if matches!(err.class(), ErrorClass::Net | ErrorClass::Http | ErrorClass::Ssl) =>
                {
                    CloneFailureKind::Network
                }
                kind => kind,
            },
        };
        Self::new(kind, err.message())
    }
}

/// Maps a raw clone error message onto a failure kind.
pub fn classify_clone_message(message: &str) -> CloneFailureKind {
    let msg = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| msg.contains(n));

    if has(&["authentication failed", "could not read username", "access denied", "authentication required", "401", "403"]) {
        CloneFailureKind::Unauthorized
    } else if has(&["not found", "does not exist", "404"]) {
        CloneFailureKind::NotFound
    } else if has(&["timeout", "timed out"]) {
        CloneFailureKind::TimedOut
    } else if has(&["network", "could not resolve", "failed to resolve", "failed to connect", "connection refused"]) {
        CloneFailureKind::Network
    } else {
        CloneFailureKind::Other
    }
}

/// The local transport cannot fetch shallow, so local sources are cloned in full.
fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || !url.contains("://")
}

pub fn create_clone_dir() -> Result<TempDir, CloneFailure> {
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir()
        .map_err(|e| CloneFailure::new(CloneFailureKind::Other, format!("Could not create temp dir: {}", e)))
}

/// Blocking clone of `url` into `dest`, aborted once `options.timeout` elapses.
pub fn clone_repository(url: &str, dest: &Path, options: &CloneOptions) -> Result<GitRepository, CloneFailure> {
    let deadline = Instant::now() + options.timeout;
    let timed_out = std::cell::Cell::new(false);

    let mut callbacks = RemoteCallbacks::new();
    callbacks.transfer_progress(|_| {
        if Instant::now() > deadline {
            timed_out.set(true);
            return false;
        }
        true
    });

    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(callbacks);
    if options.depth > 0 && !is_local_url(url) {
        fetch.depth(options.depth as i32);
    }

    let started = Instant::now();
    let result = RepoBuilder::new().fetch_options(fetch).clone(url, dest);

    match result {
        Ok(repo) => {
            tracing::info!("Cloned {} in {:?}", url, started.elapsed());
            Ok(GitRepository::from_repository(repo, dest.to_string_lossy().to_string()))
        }
        Err(_) if timed_out.get() => Err(CloneFailure::new(
            CloneFailureKind::TimedOut,
            format!("clone timed out after {:?}", options.timeout),
        )),
        Err(e) => Err(CloneFailure::from_git(&e)),
    }
}

/// Clones on the blocking pool with an outer timeout as a backstop for
/// stalls that never reach the transfer callback. `dir` is removed once
/// nothing uses the clone any more.
pub async fn clone_bounded(url: &str, dir: TempDir, options: &CloneOptions) -> Result<GitRepository, CloneFailure> {
    let (url, opts) = (url.to_string(), options.clone());
    let task = tokio::task::spawn_blocking(move || {
        let repo = clone_repository(&url, dir.path(), &opts)?;
        Ok(repo.with_workdir(dir))
    });

    match tokio::time::timeout(options.timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(CloneFailure::new(CloneFailureKind::Other, join_err.to_string())),
        Err(_) => {
            tracing::warn!("Abandoning clone after {:?}; its directory goes when it stops", options.timeout);
            Err(CloneFailure::new(
                CloneFailureKind::TimedOut,
                format!("clone timed out after {:?}", options.timeout),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::source::GitSource;
    use crate::git::testing::RepoFixture;
    use rstest::rstest;

    #[rstest]
    #[case("fatal: Authentication failed for 'https://github.com/x/y'", CloneFailureKind::Unauthorized)]
    #[case("could not read Username for 'https://github.com'", CloneFailureKind::Unauthorized)]
    #[case("remote: Repository not found.", CloneFailureKind::NotFound)]
    #[case("unexpected http status code: 404", CloneFailureKind::NotFound)]
    #[case("Connection timed out after 30000 ms", CloneFailureKind::TimedOut)]
    #[case("Network is unreachable", CloneFailureKind::Network)]
    #[case("failed to resolve address for nowhere.invalid: Name or service not known", CloneFailureKind::Network)]
    #[case("object database corrupted", CloneFailureKind::Other)]
    fn classifies_clone_messages(#[case] message: &str, #[case] expected: CloneFailureKind) {
        assert_eq!(classify_clone_message(message), expected);
    }

    #[test]
    fn local_urls_skip_shallow_fetch() {
        assert!(is_local_url("file:///tmp/repo"));
        assert!(is_local_url("/tmp/repo"));
        assert!(!is_local_url("https://github.com/rust-lang/rust"));
    }

    #[test]
    fn clones_local_repository_and_cleans_up() {
        let fixture = RepoFixture::new();
        fixture.commit("first", &[("a.txt", "a\n")]);
        let url = format!("file://{}", fixture.path().display());

        let dir = create_clone_dir().unwrap();
        let dir_path = dir.path().to_path_buf();
        assert!(dir_path.file_name().unwrap().to_string_lossy().starts_with(TEMP_PREFIX));

        let clone = clone_repository(&url, dir.path(), &CloneOptions::default()).unwrap();
        assert_eq!(clone.log(10).unwrap().len(), 1);

        drop(clone);
        drop(dir);
        assert!(!dir_path.exists());
    }

    #[test]
    fn missing_source_is_a_clone_failure() {
        let dir = create_clone_dir().unwrap();
        let missing = dir.path().join("nope");
        let err = clone_repository(
            &format!("file://{}", missing.display()),
            &dir.path().join("clone"),
            &CloneOptions::default(),
        )
        .err()
        .expect("cloning a missing source must fail");
        assert_ne!(err.kind, CloneFailureKind::TimedOut);
    }

    #[tokio::test]
    async fn bounded_clone_keeps_its_directory_until_dropped() {
        let fixture = RepoFixture::new();
        fixture.commit("first", &[("a.txt", "a\n")]);
        let url = format!("file://{}", fixture.path().display());

        let dir = create_clone_dir().unwrap();
        let dir_path = dir.path().to_path_buf();
        let clone = clone_bounded(&url, dir, &CloneOptions::default()).await.unwrap();

        assert!(dir_path.exists());
        assert_eq!(clone.log(10).unwrap().len(), 1);
        drop(clone);
        assert!(!dir_path.exists());
    }

    #[tokio::test]
    async fn failed_bounded_clone_removes_its_directory() {
        let dir = create_clone_dir().unwrap();
        let dir_path = dir.path().to_path_buf();
        let url = format!("file://{}", dir_path.join("missing").display());

        let err = clone_bounded(&url, dir, &CloneOptions::default()).await.err();
        assert!(err.is_some());
        assert!(!dir_path.exists());
    }
}
