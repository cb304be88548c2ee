//! Request/response bodies for `/api/analyze` and `/api/file-content`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Commit, FileContents, FileTreeNode};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub repo_url: Option<String>,
    pub from_commit: Option<String>,
    pub to_commit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentRequest {
    pub repo_url: Option<String>,
    pub file_path: Option<String>,
    pub from_commit: Option<String>,
    pub to_commit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub commits: Vec<Commit>,
    pub file_tree: FileTreeNode,
    pub changed_file_tree: FileTreeNode,
    pub file_tree_history: Vec<FileTreeNode>,
    pub architecture_notes: Vec<String>,
    pub architecture_diagrams: Vec<ArchitectureDiagram>,
    pub file_contents: FileContents,
    pub stats: AnalysisStats,
    pub file_diffs: BTreeMap<String, FileDiffEntry>,
    pub range: RangeInfo,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_additions: usize,
    pub total_deletions: usize,
    pub files_changed: usize,
    pub commits_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileDiffEntry {
    pub before: String,
    pub after: String,
    pub additions: usize,
    pub deletions: usize,
    pub diff: String,
}

/// The resolved commit window echoed back so the client can warn about
/// history beyond the display cutoff.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RangeInfo {
    pub from_commit: String,
    pub to_commit: String,
    pub from_index: usize,
    pub to_index: usize,
    pub truncated: bool,
    pub total_commits: usize,
    pub display_limit: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArchitectureDiagram {
    pub nodes: Vec<DiagramNode>,
    pub links: Vec<DiagramLink>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiagramLink {
    pub source: String,
    pub target: String,
}
