//! Commit range selection.
//!
//! The log arrives newest first. Only the newest `limit` commits are
//! selectable; `truncated` tells the client there is older history it cannot
//! pick. Range indices are chronological positions inside that window
//! (0 = oldest), so a valid range always has `from_index <= to_index`.

use thiserror::Error;

use crate::models::{Commit, RangeInfo};

pub const DEFAULT_DISPLAY_LIMIT: usize = 50;
/// Shortest abbreviated id accepted as a commit reference.
pub const MIN_PREFIX_LEN: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeResolutionError {
    #[error("repository has no commits")]
    EmptyHistory,

    #[error("commit {0} is not in the selectable history")]
    UnknownCommit(String),

    #[error("commit reference {0} is ambiguous")]
    AmbiguousCommit(String),

    #[error("from commit {from} is newer than to commit {to}")]
    Reversed { from: String, to: String },
}

#[derive(Debug, Clone)]
pub struct CommitWindow<'a> {
    commits: &'a [Commit],
    total: usize,
    limit: usize,
}

impl<'a> CommitWindow<'a> {
    pub fn new(commits: &'a [Commit], limit: usize) -> Self {
        Self {
            commits: &commits[..commits.len().min(limit)],
            total: commits.len(),
            limit,
        }
    }

    /// Selectable commits, newest first.
    pub fn commits(&self) -> &'a [Commit] {
        self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn truncated(&self) -> bool {
        self.total > self.commits.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn chronological_index(&self, position: usize) -> usize {
        self.commits.len() - 1 - position
    }

    fn locate(&self, reference: &str) -> Result<usize, RangeResolutionError> {
        if let Some(pos) = self.commits.iter().position(|c| c.id == reference) {
            return Ok(self.chronological_index(pos));
        }

        if reference.len() >= MIN_PREFIX_LEN {
            let mut matches = self
                .commits
                .iter()
                .enumerate()
                .filter(|(_, c)| c.id.starts_with(reference));
            match (matches.next(), matches.next()) {
                (Some((pos, _)), None) => return Ok(self.chronological_index(pos)),
                (Some(_), Some(_)) => return Err(RangeResolutionError::AmbiguousCommit(reference.to_string())),
                _ => {}
            }
        }

        Err(RangeResolutionError::UnknownCommit(reference.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    /// Inclusive slice of the window, newest first.
    pub commits: Vec<Commit>,
    pub from_index: usize,
    pub to_index: usize,
    pub truncated: bool,
    pub total: usize,
    pub limit: usize,
}

impl ResolvedRange {
    pub fn oldest(&self) -> &Commit {
        &self.commits[self.commits.len() - 1]
    }

    pub fn newest(&self) -> &Commit {
        &self.commits[0]
    }

    pub fn info(&self) -> RangeInfo {
        RangeInfo {
            from_commit: self.oldest().id.clone(),
            to_commit: self.newest().id.clone(),
            from_index: self.from_index,
            to_index: self.to_index,
            truncated: self.truncated,
            total_commits: self.total,
            display_limit: self.limit,
        }
    }
}

/// Resolves `from`/`to` against the window. A missing bound defaults to the
/// window edge; anything unresolvable or reversed is an error, never a guess.
pub fn resolve_range(
    window: &CommitWindow<'_>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<ResolvedRange, RangeResolutionError> {
    if window.is_empty() {
        return Err(RangeResolutionError::EmptyHistory);
    }

    let from_index = match from {
        Some(reference) => window.locate(reference)?,
        None => 0,
    };
    let to_index = match to {
        Some(reference) => window.locate(reference)?,
        None => window.len() - 1,
    };

    if from_index > to_index {
        return Err(RangeResolutionError::Reversed {
            from: from.unwrap_or_default().to_string(),
            to: to.unwrap_or_default().to_string(),
        });
    }

    let newest_pos = window.chronological_index(to_index);
    let oldest_pos = window.chronological_index(from_index);

    Ok(ResolvedRange {
        commits: window.commits()[newest_pos..=oldest_pos].to_vec(),
        from_index,
        to_index,
        truncated: window.truncated(),
        total: window.total(),
        limit: window.limit(),
    })
}
