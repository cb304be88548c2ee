//! File tree DTOs.
//!
//! - `FileTreeNode`: recursive folder/file node rendered by the tree sidebar
//! - `ChangeStats`: per-path insertion/deletion counts between two revisions
//! - `DiffSummary`: all `ChangeStats` between two revisions plus totals
//!
//! Used by: the path-tree builder and the per-commit history generator

use serde::{Deserialize, Serialize};

pub const ROOT_NAME: &str = "root";
pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileTreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletions: Option<usize>,
}

impl FileTreeNode {
    /// The empty tree: a root folder with no children.
    pub fn root() -> Self {
        Self::folder(ROOT_NAME, ROOT_PATH)
    }

    pub fn folder(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Folder,
            path: path.into(),
            status: None,
            children: Some(Vec::new()),
            additions: None,
            deletions: None,
        }
    }

    pub fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        status: FileStatus,
        stats: Option<&ChangeStats>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            path: path.into(),
            status: Some(status),
            children: None,
            additions: stats.map(|s| s.insertions),
            deletions: stats.map(|s| s.deletions),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn children(&self) -> &[FileTreeNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Paths of every file leaf, depth-first in child order.
    pub fn file_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_file_paths(&mut paths);
        paths
    }

    fn collect_file_paths(&self, out: &mut Vec<String>) {
        if self.is_file() {
            out.push(self.path.clone());
            return;
        }
        for child in self.children() {
            child.collect_file_paths(out);
        }
    }

    pub fn file_count(&self) -> usize {
        if self.is_file() {
            1
        } else {
            self.children().iter().map(FileTreeNode::file_count).sum()
        }
    }

    /// Looks a node up by its root-relative path.
    pub fn find(&self, path: &str) -> Option<&FileTreeNode> {
        if self.path == path {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(path))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeStats {
    pub path: String,
    pub insertions: usize,
    pub deletions: usize,
}

impl ChangeStats {
    pub fn new(path: impl Into<String>, insertions: usize, deletions: usize) -> Self {
        Self {
            path: path.into(),
            insertions,
            deletions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub files: Vec<ChangeStats>,
    pub insertions: usize,
    pub deletions: usize,
    pub changed: usize,
}

impl DiffSummary {
    pub fn from_files(files: Vec<ChangeStats>) -> Self {
        let insertions = files.iter().map(|f| f.insertions).sum();
        let deletions = files.iter().map(|f| f.deletions).sum();
        let changed = files.len();
        Self {
            files,
            insertions,
            deletions,
            changed,
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}
