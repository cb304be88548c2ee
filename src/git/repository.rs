use git2::{DiffFormat, DiffOptions, ObjectType, Repository, Sort, StatusOptions, TreeWalkMode, TreeWalkResult};
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

use crate::git::source::{GitError, GitSource};
use crate::models::{ChangeStats, Commit, DiffSummary};

pub struct GitRepository {
    pub repo: Mutex<Repository>,
    pub path: String,
    /// Scratch directory the repository lives in. Declared after `repo` so
    /// the handle closes before the directory is removed.
    workdir: Option<TempDir>,
}

impl fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.path)
            .field("owns_workdir", &self.workdir.is_some())
            .finish()
    }
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GitError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::open(&path)?;
        Ok(Self::from_repository(repo, path_str))
    }

    pub fn from_repository(repo: Repository, path: String) -> Self {
        Self {
            repo: Mutex::new(repo),
            path,
            workdir: None,
        }
    }

    /// Ties `dir` to this repository: it is deleted when the last handle drops.
    pub fn with_workdir(mut self, dir: TempDir) -> Self {
        self.workdir = Some(dir);
        self
    }

    pub fn with_repo<F, T>(&self, f: F) -> Result<T, GitError>
    where
        F: FnOnce(&Repository) -> Result<T, GitError>,
    {
        let repo = self
            .repo
            .lock()
            .map_err(|_| GitError::Task("Lock poisoned".to_string()))?;
        f(&repo)
    }
}

impl GitSource for GitRepository {
    fn log(&self, max_count: usize) -> Result<Vec<Commit>, GitError> {
        self.with_repo(|repo| {
            let mut revwalk = repo.revwalk()?;
            revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
            revwalk.push_head()?;

            let mut commits = Vec::new();
            for oid in revwalk.take(max_count) {
                let commit = repo.find_commit(oid?)?;
                commits.push(commit_to_info(&commit));
            }
            Ok(commits)
        })
    }

    fn diff_summary(&self, from: &str, to: &str) -> Result<DiffSummary, GitError> {
        self.with_repo(|repo| {
            let from_tree = resolve_tree(repo, from)?;
            let to_tree = resolve_tree(repo, to)?;
            let diff = repo.diff_tree_to_tree(Some(&from_tree), Some(&to_tree), None)?;

            let mut files = Vec::new();
            for (delta_idx, delta) in diff.deltas().enumerate() {
                let Some(path) = delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().to_string())
                else {
                    continue;
                };

                // Binary deltas have no patch; they count as changed with no lines.
                let (insertions, deletions) = match git2::Patch::from_diff(&diff, delta_idx)? {
                    Some(patch) => {
                        let (_, additions, deletions) = patch.line_stats()?;
                        (additions, deletions)
                    }
                    None => (0, 0),
                };
                files.push(ChangeStats::new(path, insertions, deletions));
            }

            Ok(DiffSummary::from_files(files))
        })
    }

    fn diff(&self, from: &str, to: &str, path: &str) -> Result<String, GitError> {
        self.with_repo(|repo| {
            let from_tree = resolve_tree(repo, from)?;
            let to_tree = resolve_tree(repo, to)?;

            let mut opts = DiffOptions::new();
            opts.context_lines(3);
            opts.pathspec(path);

            let diff = repo.diff_tree_to_tree(Some(&from_tree), Some(&to_tree), Some(&mut opts))?;

            let mut text = String::new();
            diff.print(DiffFormat::Patch, |_, _, line| {
                match line.origin() {
                    '+' | '-' | ' ' => text.push(line.origin()),
                    _ => {}
                }
                text.push_str(&String::from_utf8_lossy(line.content()));
                true
            })?;
            Ok(text)
        })
    }

    fn show(&self, revision: &str, path: &str) -> Result<String, GitError> {
        self.with_repo(|repo| {
            let tree = resolve_tree(repo, revision)?;
            let entry = tree.get_path(Path::new(path)).map_err(|_| GitError::PathNotFound {
                path: path.to_string(),
                revision: revision.to_string(),
            })?;

            let obj = entry.to_object(repo)?;
            let blob = obj.as_blob().ok_or_else(|| GitError::PathNotFound {
                path: path.to_string(),
                revision: revision.to_string(),
            })?;

            Ok(String::from_utf8_lossy(blob.content()).into_owned())
        })
    }

    fn ls_tree(&self, revision: &str) -> Result<Vec<String>, GitError> {
        self.with_repo(|repo| {
            let tree = resolve_tree(repo, revision)?;

            let mut files = Vec::new();
            tree.walk(TreeWalkMode::PreOrder, |root, entry| {
                if entry.kind() == Some(ObjectType::Blob) {
                    if let Some(name) = entry.name() {
                        files.push(format!("{}{}", root, name));
                    }
                }
                TreeWalkResult::Ok
            })?;
            Ok(files)
        })
    }

    fn status(&self) -> Result<Vec<String>, GitError> {
        self.with_repo(|repo| {
            let mut opts = StatusOptions::new();
            opts.include_untracked(true).recurse_untracked_dirs(true);

            let statuses = repo.statuses(Some(&mut opts))?;
            Ok(statuses
                .iter()
                .filter_map(|entry| entry.path().map(|p| p.to_string()))
                .collect())
        })
    }
}

fn resolve_tree<'r>(repo: &'r Repository, revision: &str) -> Result<git2::Tree<'r>, GitError> {
    let object = repo
        .revparse_single(revision)
        .map_err(|_| GitError::RevisionNotFound(revision.to_string()))?;
    object
        .peel_to_tree()
        .map_err(|_| GitError::RevisionNotFound(revision.to_string()))
}

pub fn commit_to_info(commit: &git2::Commit) -> Commit {
    let timestamp = commit.time().seconds();
    let date = chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();
    Commit {
        id: commit.id().to_string(),
        message: commit.summary().unwrap_or("").trim().to_string(),
        author: commit.author().name().unwrap_or("Unknown").to_string(),
        timestamp: date,
        relative_time: format_relative_time(timestamp),
        files_changed_count: 0,
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}
