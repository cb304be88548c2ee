//! Builds a `FileTreeNode` hierarchy from a flat list of repository paths.
//!
//! Children keep the first-seen order of the input; nothing is sorted. Nodes
//! are found by name under their parent, so a folder shared by many paths is
//! created once.

use std::collections::HashMap;

use crate::analysis::classify::{classify_changed_only, classify_full};
use crate::models::{ChangeStats, FileStatus, FileTreeNode, ROOT_PATH};

pub type StatsByPath<'a> = HashMap<&'a str, &'a ChangeStats>;

pub fn stats_by_path(stats: &[ChangeStats]) -> StatsByPath<'_> {
    stats.iter().map(|s| (s.path.as_str(), s)).collect()
}

/// Every listed path, classified with the full-tree rules.
pub fn build_full_tree<S: AsRef<str>>(paths: &[S], stats: &[ChangeStats]) -> FileTreeNode {
    build_tree(paths, stats, classify_full)
}

/// Only the changed paths, classified with the changed-only rules.
pub fn build_changed_tree<S: AsRef<str>>(paths: &[S], stats: &[ChangeStats]) -> FileTreeNode {
    build_tree(paths, stats, classify_changed_only)
}

fn build_tree<S, F>(paths: &[S], stats: &[ChangeStats], classify: F) -> FileTreeNode
where
    S: AsRef<str>,
    F: Fn(Option<&ChangeStats>) -> FileStatus,
{
    let lookup = stats_by_path(stats);
    let mut root = FileTreeNode::root();

    for path in paths {
        let path = path.as_ref();
        let file_stats = lookup.get(path).copied();
        insert_path(&mut root, path, classify(file_stats), file_stats);
    }

    root
}

fn insert_path(root: &mut FileTreeNode, path: &str, status: FileStatus, stats: Option<&ChangeStats>) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let Some(last) = segments.len().checked_sub(1) else {
        return;
    };

    let mut current = root;
    for (i, segment) in segments.iter().enumerate() {
        let child_path = join_path(&current.path, segment);
        let Some(children) = current.children.as_mut() else {
            tracing::debug!("Skipping {}: {} is a file", path, current.path);
            return;
        };

        let idx = match children.iter().position(|c| c.name == *segment) {
            Some(idx) => idx,
            None => {
                let node = if i == last {
                    FileTreeNode::file(*segment, child_path, status, stats)
                } else {
                    FileTreeNode::folder(*segment, child_path)
                };
                children.push(node);
                children.len() - 1
            }
        };
        current = &mut children[idx];
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn names(node: &FileTreeNode) -> Vec<&str> {
        node.children().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn empty_input_gives_empty_root() {
        let tree = build_full_tree::<&str>(&[], &[]);
        assert_eq!(tree, FileTreeNode::root());
        assert_eq!(tree.name, "root");
        assert_eq!(tree.path, "/");
        assert_eq!(tree.children, Some(vec![]));
    }

    #[test]
    fn file_paths_match_input_set() {
        let paths = ["src/main.rs", "README.md", "src/git/mod.rs", "src/git/diff.rs", "docs/a/b/c.md"];
        let tree = build_full_tree(&paths, &[]);

        let built: BTreeSet<String> = tree.file_paths().into_iter().collect();
        let expected: BTreeSet<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(built, expected);
    }

    #[test]
    fn children_keep_first_seen_order_and_folders_are_shared() {
        let tree = build_full_tree(&["zeta.txt", "src/b.rs", "alpha.txt", "src/a.rs"], &[]);

        assert_eq!(names(&tree), vec!["zeta.txt", "src", "alpha.txt"]);
        let src = tree.find("src").unwrap();
        assert_eq!(src.kind, NodeKind::Folder);
        assert_eq!(names(src), vec!["b.rs", "a.rs"]);
    }

    #[test]
    fn node_paths_extend_parent_paths() {
        let tree = build_full_tree(&["a/b/c.txt"], &[]);

        let a = &tree.children()[0];
        let b = &a.children()[0];
        let c = &b.children()[0];
        assert_eq!((a.path.as_str(), b.path.as_str(), c.path.as_str()), ("a", "a/b", "a/b/c.txt"));
        assert!(c.is_file());
        assert_eq!(c.children, None);
    }

    #[test]
    fn root_level_file() {
        let tree = build_full_tree(&["Cargo.toml"], &[]);
        let file = tree.find("Cargo.toml").unwrap();
        assert_eq!(file.kind, NodeKind::File);
        assert_eq!(file.status, Some(FileStatus::Unchanged));
    }

    #[test]
    fn full_tree_classifies_and_carries_counts() {
        let stats = vec![
            ChangeStats::new("src/new.rs", 10, 0),
            ChangeStats::new("src/old.rs", 0, 4),
            ChangeStats::new("src/lib.rs", 3, 2),
        ];
        let tree = build_full_tree(&["src/new.rs", "src/old.rs", "src/lib.rs", "README.md"], &stats);

        let status = |p: &str| tree.find(p).unwrap().status;
        assert_eq!(status("src/new.rs"), Some(FileStatus::Added));
        assert_eq!(status("src/old.rs"), Some(FileStatus::Deleted));
        assert_eq!(status("src/lib.rs"), Some(FileStatus::Modified));
        assert_eq!(status("README.md"), Some(FileStatus::Unchanged));

        let lib = tree.find("src/lib.rs").unwrap();
        assert_eq!((lib.additions, lib.deletions), (Some(3), Some(2)));
        let readme = tree.find("README.md").unwrap();
        assert_eq!((readme.additions, readme.deletions), (None, None));

        let src = tree.find("src").unwrap();
        assert_eq!((src.status, src.additions), (None, None));
    }

    #[test]
    fn changed_tree_uses_changed_only_rules() {
        let stats = vec![ChangeStats::new("a.txt", 0, 0), ChangeStats::new("b.txt", 1, 0)];
        let tree = build_changed_tree(&["a.txt", "b.txt", "c.txt"], &stats);

        assert_eq!(tree.find("a.txt").unwrap().status, Some(FileStatus::Deleted));
        assert_eq!(tree.find("b.txt").unwrap().status, Some(FileStatus::Added));
        assert_eq!(tree.find("c.txt").unwrap().status, Some(FileStatus::Modified));
    }

    #[test]
    fn path_through_a_file_is_skipped() {
        let tree = build_full_tree(&["a", "a/b", "c//d/"], &[]);

        assert_eq!(names(&tree), vec!["a", "c"]);
        assert!(tree.find("a").unwrap().is_file());
        assert_eq!(tree.find("c/d").unwrap().kind, NodeKind::File);
    }

    #[test]
    fn serializes_like_the_client_expects() {
        let stats = vec![ChangeStats::new("src/a.rs", 2, 0)];
        let tree = build_full_tree(&["src/a.rs"], &stats);
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "root",
                "type": "folder",
                "path": "/",
                "children": [{
                    "name": "src",
                    "type": "folder",
                    "path": "src",
                    "children": [{
                        "name": "a.rs",
                        "type": "file",
                        "path": "src/a.rs",
                        "status": "added",
                        "additions": 2,
                        "deletions": 0
                    }]
                }]
            })
        );
    }
}
