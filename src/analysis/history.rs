//! Per-commit file tree history.
//!
//! Entry `i` lists the files commit `i` changed relative to commit `i + 1`,
//! its older neighbour in the analysed range. The oldest commit has no
//! neighbour, so every file it contains is reported as added with a
//! placeholder count of one insertion (not a real line count).

use crate::analysis::tree_builder::build_changed_tree;
use crate::git::{BoundedGit, GitError};
use crate::models::{ChangeStats, Commit, FileTreeNode};

/// Placeholder insertion count for files of the oldest analysed commit.
pub const INITIAL_FILE_INSERTIONS: usize = 1;

/// One changed-only tree per commit, index-aligned with `commits`
/// (newest first). A commit whose changes cannot be read gets an empty tree.
pub async fn generate_history(git: &BoundedGit, commits: &[Commit]) -> Vec<FileTreeNode> {
    let mut history = Vec::with_capacity(commits.len());

    for (i, commit) in commits.iter().enumerate() {
        let tree = match changed_files(git, commit, commits.get(i + 1)).await {
            Ok(files) => {
                let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
                build_changed_tree(&paths, &files)
            }
            Err(e) => {
                tracing::warn!("Could not analyze commit {}: {}", commit.short_id(), e);
                FileTreeNode::root()
            }
        };
        history.push(tree);
    }

    history
}

async fn changed_files(
    git: &BoundedGit,
    commit: &Commit,
    previous: Option<&Commit>,
) -> Result<Vec<ChangeStats>, GitError> {
    match previous {
        Some(previous) => Ok(git.diff_summary(&previous.id, &commit.id).await?.files),
        None => {
            let files = git.ls_tree(&commit.id).await?;
            Ok(files
                .into_iter()
                .map(|path| ChangeStats::new(path, INITIAL_FILE_INSERTIONS, 0))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::{fake_commit, FakeGit};
    use crate::models::FileStatus;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    fn commits(ids: &[&str]) -> Vec<Commit> {
        ids.iter().map(|id| fake_commit(id, id)).collect()
    }

    fn bounded(fake: FakeGit) -> BoundedGit {
        BoundedGit::new(Arc::new(fake), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn one_tree_per_commit_with_per_commit_changes() {
        let git = bounded(
            FakeGit::new()
                .with_summary("c1", "c2", &[("src/lib.rs", 4, 1)])
                .with_summary("c2", "c3", &[("README.md", 0, 2), ("src/new.rs", 9, 0)])
                .with_tree("c1", &["README.md", "src/lib.rs"]),
        );

        let history = generate_history(&git, &commits(&["c3", "c2", "c1"])).await;

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].file_paths(), vec!["README.md", "src/new.rs"]);
        assert_eq!(history[0].find("README.md").unwrap().status, Some(FileStatus::Deleted));
        assert_eq!(history[0].find("src/new.rs").unwrap().status, Some(FileStatus::Added));

        assert_eq!(history[1].file_paths(), vec!["src/lib.rs"]);
        assert_eq!(history[1].find("src/lib.rs").unwrap().status, Some(FileStatus::Modified));
    }

    #[tokio::test]
    async fn oldest_commit_lists_every_file_as_added() {
        let git = bounded(FakeGit::new().with_tree("c1", &["a.txt", "dir/b.txt"]));

        let history = generate_history(&git, &commits(&["c1"])).await;

        assert_eq!(history.len(), 1);
        for path in ["a.txt", "dir/b.txt"] {
            let node = history[0].find(path).unwrap();
            assert_eq!(node.status, Some(FileStatus::Added));
            assert_eq!((node.additions, node.deletions), (Some(INITIAL_FILE_INSERTIONS), Some(0)));
        }
    }

    #[tokio::test]
    async fn failed_commit_becomes_empty_tree_without_aborting() {
        // c2 -> c3 is unknown to the fake, as with a shallow clone boundary.
        let git = bounded(
            FakeGit::new()
                .with_summary("c1", "c2", &[("a.txt", 1, 1)])
                .with_tree("c1", &["a.txt"]),
        );

        let history = generate_history(&git, &commits(&["c3", "c2", "c1"])).await;

        assert_eq!(history.len(), 3);
        assert_eq!(history[0], FileTreeNode::root());
        assert_eq!(history[1].file_paths(), vec!["a.txt"]);
        assert_eq!(history[2].file_paths(), vec!["a.txt"]);
    }

    #[tokio::test]
    async fn empty_input_gives_empty_history() {
        let git = bounded(FakeGit::new());
        assert!(generate_history(&git, &[]).await.is_empty());
    }

    #[tokio::test]
    async fn every_failure_still_yields_n_trees() {
        let git = bounded(FakeGit::new());
        let history = generate_history(&git, &commits(&["a", "b", "c", "d", "e"])).await;
        assert_eq!(history.len(), 5);
        assert!(history.iter().all(|t| t.children().is_empty()));
    }
}
