//! One `/api/analyze` request from URL to response.
//!
//! Only a failed clone, a failed log read or a bad range abort the request.
//! Everything after that degrades to empty values and a `warn!`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use url::Url;

use crate::analysis::content::{representative_file_contents, ContentCache, ContentFetcher};
use crate::analysis::history::generate_history;
use crate::analysis::notes::{architecture_diagrams, architecture_notes};
use crate::analysis::range::{resolve_range, CommitWindow, ResolvedRange};
use crate::analysis::tree_builder::{build_changed_tree, build_full_tree};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::git::{clone_bounded, create_clone_dir, BoundedGit};
use crate::models::{AnalysisResponse, AnalysisStats, AnalyzeRequest, ChangeStats, Commit, DiffSummary, FileDiffEntry};
use crate::store::RepositoryStore;

/// Checks that `url` is present and absolute; returns it trimmed.
pub fn validate_repo_url(url: Option<&str>) -> Result<String> {
    let url = url.map(str::trim).filter(|u| !u.is_empty());
    let url = url.ok_or_else(|| AppError::BadRequest("Repository URL is required".to_string()))?;
    Url::parse(url).map_err(|e| AppError::BadRequest(format!("Invalid repository URL: {}", e)))?;
    Ok(url.to_string())
}

/// Empty strings from form fields count as "not given".
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub struct Analyzer<'a> {
    config: &'a Config,
    store: &'a dyn RepositoryStore,
    cache: &'a ContentCache,
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a Config, store: &'a dyn RepositoryStore, cache: &'a ContentCache) -> Self {
        Self { config, store, cache }
    }

    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResponse> {
        let repo_url = validate_repo_url(request.repo_url.as_deref())?;
        let record = self.store.get_or_create(&repo_url)?;

        // The clone owns its scratch directory; it goes with the last handle.
        let repo = clone_bounded(&repo_url, create_clone_dir()?, &self.config.clone_options()).await?;
        let git = BoundedGit::new(Arc::new(repo), self.config.git_timeout);

        let response = self
            .analyze_source(
                &git,
                &repo_url,
                non_empty(request.from_commit.as_deref()),
                non_empty(request.to_commit.as_deref()),
            )
            .await?;

        self.store.update_last_analyzed(record.id, Utc::now())?;
        tracing::info!(
            "Analyzed {} ({} commits, {} files changed)",
            record.name,
            response.stats.commits_count,
            response.stats.files_changed
        );
        Ok(response)
    }

    /// Everything after the clone, against any version-control source.
    pub async fn analyze_source(
        &self,
        git: &BoundedGit,
        repo_url: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<AnalysisResponse> {
        let log = git.log(self.config.log_limit).await?;
        // Every selectable commit also gets a history tree, so indices line up.
        let limit = self.config.display_limit.min(self.config.history_limit);
        let window = CommitWindow::new(&log, limit);
        let range = resolve_range(&window, from, to)?;

        let summary = range_summary(git, &log, &range).await;
        let file_diffs = file_diffs(git, &log, &range, &summary).await;

        let paths = git.ls_tree(&range.newest().id).await.unwrap_or_else(|e| {
            tracing::warn!("Could not get file tree: {}", e);
            Vec::new()
        });
        let file_tree = build_full_tree(&paths, &summary.files);
        let changed_file_tree = build_changed_tree(&summary.paths(), &summary.files);

        let file_tree_history = generate_history(git, &range.commits).await;

        let mut commits = range.commits.clone();
        for (commit, tree) in commits.iter_mut().zip(&file_tree_history) {
            commit.files_changed_count = tree.file_count();
        }

        let explicit = (from.is_some() || to.is_some())
            .then(|| (range.oldest().id.as_str(), range.newest().id.as_str()));
        let file_contents =
            representative_file_contents(&ContentFetcher::new(self.cache), git, repo_url, explicit).await;

        Ok(AnalysisResponse {
            architecture_notes: architecture_notes(&commits),
            architecture_diagrams: architecture_diagrams(&commits),
            stats: AnalysisStats {
                total_additions: summary.insertions,
                total_deletions: summary.deletions,
                files_changed: summary.changed,
                commits_count: commits.len(),
            },
            range: range.info(),
            commits,
            file_tree,
            changed_file_tree,
            file_tree_history,
            file_contents,
            file_diffs,
        })
    }
}

/// The two revisions a range's summary compares: oldest and newest, or a
/// lone commit and its parent in the log.
fn range_bounds<'c>(log: &'c [Commit], range: &'c ResolvedRange) -> Option<(&'c str, &'c str)> {
    if range.commits.len() > 1 {
        return Some((range.oldest().id.as_str(), range.newest().id.as_str()));
    }
    let only = range.newest();
    let position = log.iter().position(|c| c.id == only.id)?;
    log.get(position + 1).map(|previous| (previous.id.as_str(), only.id.as_str()))
}

async fn range_summary(git: &BoundedGit, log: &[Commit], range: &ResolvedRange) -> DiffSummary {
    let result = match range_bounds(log, range) {
        Some((from, to)) => git.diff_summary(from, to).await,
        None => git.status().await.map(|paths| {
            let files: Vec<ChangeStats> = paths.into_iter().map(|p| ChangeStats::new(p, 0, 0)).collect();
            DiffSummary::from_files(files)
        }),
    };

    result.unwrap_or_else(|e| {
        tracing::warn!("Could not get diff summary: {}", e);
        DiffSummary::default()
    })
}

async fn file_diffs(
    git: &BoundedGit,
    log: &[Commit],
    range: &ResolvedRange,
    summary: &DiffSummary,
) -> BTreeMap<String, FileDiffEntry> {
    let mut diffs = BTreeMap::new();
    let Some((from, to)) = range_bounds(log, range) else {
        return diffs;
    };

    for file in &summary.files {
        match git.diff(from, to, &file.path).await {
            Ok(diff) => {
                diffs.insert(
                    file.path.clone(),
                    FileDiffEntry {
                        before: String::new(),
                        after: String::new(),
                        additions: file.insertions,
                        deletions: file.deletions,
                        diff,
                    },
                );
            }
            Err(e) => tracing::warn!("Could not get diff for file {}: {}", file.path, e),
        }
    }
    diffs
}
