//! Test doubles for the version-control interface.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;

use crate::git::source::{GitError, GitSource};
use crate::models::{ChangeStats, Commit, DiffSummary};

/// A throwaway on-disk repository built commit by commit.
pub struct RepoFixture {
    dir: TempDir,
    repo: Repository,
}

impl RepoFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `files`, stages everything and commits on HEAD. Returns the new oid.
    pub fn commit(&self, message: &str, files: &[(&str, &str)]) -> String {
        for (path, content) in files {
            let full = self.dir.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(full, content).unwrap();
        }
        self.commit_index(message)
    }

    pub fn remove(&self, message: &str, path: &str) -> String {
        std::fs::remove_file(self.dir.path().join(path)).unwrap();
        self.commit_index(message)
    }

    fn commit_index(&self, message: &str) -> String {
        let mut index = self.repo.index().unwrap();
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test Author", "test@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
            .to_string()
    }
}

pub fn fake_commit(id: &str, message: &str) -> Commit {
    Commit {
        id: id.to_string(),
        message: message.to_string(),
        author: "Test Author".to_string(),
        timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        relative_time: "1 year ago".to_string(),
        files_changed_count: 0,
    }
}

/// Scripted `GitSource`: anything not registered fails like a missing revision.
#[derive(Default)]
pub struct FakeGit {
    commits: Vec<Commit>,
    summaries: HashMap<(String, String), DiffSummary>,
    trees: HashMap<String, Vec<String>>,
    files: HashMap<(String, String), String>,
    working_changes: Vec<String>,
    delay: Option<Duration>,
    show_calls: AtomicUsize,
    summary_calls: AtomicUsize,
}

impl FakeGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits given newest first.
    pub fn with_commits(mut self, ids: &[&str]) -> Self {
        self.commits = ids.iter().map(|id| fake_commit(id, &format!("commit {id}"))).collect();
        self
    }

    pub fn with_commit_messages(mut self, commits: &[(&str, &str)]) -> Self {
        self.commits = commits.iter().map(|(id, msg)| fake_commit(id, msg)).collect();
        self
    }

    pub fn with_summary(mut self, from: &str, to: &str, files: &[(&str, usize, usize)]) -> Self {
        let files = files
            .iter()
            .map(|(path, ins, del)| ChangeStats::new(*path, *ins, *del))
            .collect();
        self.summaries
            .insert((from.to_string(), to.to_string()), DiffSummary::from_files(files));
        self
    }

    pub fn with_tree(mut self, revision: &str, paths: &[&str]) -> Self {
        self.trees
            .insert(revision.to_string(), paths.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn with_file(mut self, revision: &str, path: &str, text: &str) -> Self {
        self.files
            .insert((revision.to_string(), path.to_string()), text.to_string());
        self
    }

    pub fn with_working_changes(mut self, paths: &[&str]) -> Self {
        self.working_changes = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn show_calls(&self) -> usize {
        self.show_calls.load(Ordering::SeqCst)
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    fn pause(&self) {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
    }
}

impl GitSource for FakeGit {
    fn log(&self, max_count: usize) -> Result<Vec<Commit>, GitError> {
        self.pause();
        Ok(self.commits.iter().take(max_count).cloned().collect())
    }

    fn diff_summary(&self, from: &str, to: &str) -> Result<DiffSummary, GitError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.pause();
        self.summaries
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .ok_or_else(|| GitError::RevisionNotFound(format!("{from}..{to}")))
    }

    fn diff(&self, from: &str, to: &str, path: &str) -> Result<String, GitError> {
        self.pause();
        Ok(format!("diff {from}..{to} -- {path}\n"))
    }

    fn show(&self, revision: &str, path: &str) -> Result<String, GitError> {
        self.show_calls.fetch_add(1, Ordering::SeqCst);
        self.pause();
        self.files
            .get(&(revision.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| GitError::PathNotFound {
                path: path.to_string(),
                revision: revision.to_string(),
            })
    }

    fn ls_tree(&self, revision: &str) -> Result<Vec<String>, GitError> {
        self.pause();
        self.trees
            .get(revision)
            .cloned()
            .ok_or_else(|| GitError::RevisionNotFound(revision.to_string()))
    }

    fn status(&self) -> Result<Vec<String>, GitError> {
        self.pause();
        Ok(self.working_changes.clone())
    }
}
