//! Before/after file text with a process-wide cache.
//!
//! A file missing on one side of the range (added or deleted in between) is
//! not an error: that side gets a readable sentinel instead. Entries are
//! never invalidated, so only answers pinned to full object ids are kept.
//! A side that failed for any other reason (a timeout, a broken object) also
//! gets its sentinel but leaves the cache untouched.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::git::BoundedGit;
use crate::models::FileContents;

pub const HEAD: &str = "HEAD";
pub const MISSING_BEFORE: &str = "// File not found in previous commit";
pub const MISSING_AFTER: &str = "// File not found in this commit";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey {
    pub repo_url: String,
    pub path: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ContentKey {
    pub fn new(repo_url: &str, path: &str, from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            repo_url: repo_url.to_string(),
            path: path.to_string(),
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    /// Both ends name immutable commits, so the answer can never change.
    pub fn is_pinned(&self) -> bool {
        matches!((&self.from, &self.to), (Some(from), Some(to)) if is_object_id(from) && is_object_id(to))
    }
}

/// A full 40-character hexadecimal object id, as opposed to a ref or prefix.
pub fn is_object_id(revision: &str) -> bool {
    revision.len() == 40 && revision.bytes().all(|b| b.is_ascii_hexdigit())
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("File not found: {0}")]
    FileNotAtRevision(String),
}

#[derive(Default)]
pub struct ContentCache {
    entries: Mutex<HashMap<ContentKey, FileContents>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ContentKey) -> Option<FileContents> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    pub fn insert(&self, key: ContentKey, contents: FileContents) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, contents);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct ContentFetcher<'a> {
    cache: &'a ContentCache,
}

impl<'a> ContentFetcher<'a> {
    pub fn new(cache: &'a ContentCache) -> Self {
        Self { cache }
    }

    pub fn cached(&self, key: &ContentKey) -> Option<FileContents> {
        self.cache.get(key)
    }

    /// Text of `key.path` at `key.from` and `key.to` (HEAD when absent).
    ///
    /// Fails only when no revision was requested and the file is not at HEAD;
    /// otherwise a missing side is replaced by its sentinel. The result is
    /// cached when the key is pinned and neither read failed.
    pub async fn fetch(&self, git: &BoundedGit, key: ContentKey) -> Result<FileContents, ContentError> {
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!("Content cache hit for {}", key.path);
            return Ok(hit);
        }

        let from = key.from.as_deref().unwrap_or(HEAD);
        let to = key.to.as_deref().unwrap_or(HEAD);
        let explicit = key.from.is_some() || key.to.is_some();

        let after = read_side(git, to, &key.path).await;
        let before = if from == to {
            after.clone()
        } else {
            read_side(git, from, &key.path).await
        };

        if !explicit && matches!(after, Side::Missing) {
            return Err(ContentError::FileNotAtRevision(key.path));
        }

        let complete = !before.failed() && !after.failed();
        let contents = FileContents {
            before: before.text_or(MISSING_BEFORE),
            after: after.text_or(MISSING_AFTER),
        };
        if complete && key.is_pinned() {
            self.cache.insert(key, contents.clone());
        }
        Ok(contents)
    }
}

const CODE_EXTENSIONS: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".py", ".java", ".cpp", ".c", ".go", ".rs", ".md", ".json",
];

pub fn is_code_file(path: &str) -> bool {
    CODE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// README first, then an entry point, then whatever comes first.
pub fn preferred_file<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    let named = |needles: &[&str]| {
        candidates.iter().copied().find(|p| {
            let lower = p.to_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
    };
    named(&["readme"])
        .or_else(|| named(&["main", "index"]))
        .or_else(|| candidates.first().copied())
}

/// Picks one file worth showing for the analysed range and fetches its text.
///
/// `range` is `Some((from, to))` when the client asked for explicit bounds.
/// Nothing suitable yields empty contents, which the diff view renders as
/// its placeholder.
pub async fn representative_file_contents(
    fetcher: &ContentFetcher<'_>,
    git: &BoundedGit,
    repo_url: &str,
    range: Option<(&str, &str)>,
) -> FileContents {
    let Some((from, to)) = range else {
        let files = match git.ls_tree(HEAD).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Could not list files at HEAD: {}", e);
                return FileContents::default();
            }
        };
        let candidates: Vec<&str> = files.iter().map(String::as_str).filter(|p| is_code_file(p)).collect();
        let Some(path) = preferred_file(&candidates) else {
            return FileContents::default();
        };
        return fetcher
            .fetch(git, ContentKey::new(repo_url, path, None, None))
            .await
            .unwrap_or_default();
    };

    let changed = match git.diff_summary(from, to).await {
        Ok(summary) => summary.files.into_iter().map(|f| f.path).find(|p| is_code_file(p)),
        Err(e) => {
            tracing::warn!("Could not get diff for commits: {}", e);
            None
        }
    };
    let path = match changed {
        Some(path) => Some(path),
        None => git
            .ls_tree(to)
            .await
            .ok()
            .and_then(|files| files.into_iter().find(|p| is_code_file(p))),
    };

    match path {
        Some(path) => fetcher
            .fetch(git, ContentKey::new(repo_url, &path, Some(from), Some(to)))
            .await
            .unwrap_or_default(),
        None => FileContents::default(),
    }
}

/// One side of a before/after read.
#[derive(Debug, Clone)]
enum Side {
    Found(String),
    /// The path does not exist at that revision.
    Missing,
    /// The read itself went wrong; the file may well exist.
    Failed,
}

impl Side {
    fn failed(&self) -> bool {
        matches!(self, Side::Failed)
    }

    fn text_or(self, sentinel: &str) -> String {
        match self {
            Side::Found(text) => text,
            Side::Missing | Side::Failed => sentinel.to_string(),
        }
    }
}

async fn read_side(git: &BoundedGit, revision: &str, path: &str) -> Side {
    match git.show(revision, path).await {
        Ok(text) => Side::Found(text),
        Err(e) if e.is_missing_path() => {
            tracing::debug!("{}", e);
            Side::Missing
        }
        Err(e) => {
            tracing::warn!("Could not read {} at {}: {}", path, revision, e);
            Side::Failed
        }
    }
}
