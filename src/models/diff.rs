//! Line-diff DTOs.
//!
//! - `DiffSegment`: maximal run of lines sharing one classification
//! - `StyledSegment`: a segment plus its playback opacity and collapsed state
//! - `CollapsedSection`: hidden range summary for the "expand" affordance
//! - `FileContents`: before/after text of one file
//!
//! Used by: the animation viewer, via `/api/render-diff`

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub lines: Vec<String>,
    /// 1-based, inclusive, over the merged line stream
    pub start_line: usize,
    pub end_line: usize,
    pub collapsible: bool,
}

impl DiffSegment {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_change(&self) -> bool {
        self.kind != SegmentKind::Unchanged
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyledSegment {
    #[serde(flatten)]
    pub segment: DiffSegment,
    pub opacity: f32,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollapsedSection {
    pub start_line: usize,
    pub end_line: usize,
    pub hidden_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FileContents {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderDiffRequest {
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
    #[serde(default)]
    pub progress: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDiffResponse {
    pub segments: Vec<StyledSegment>,
    pub collapsed_sections: Vec<CollapsedSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub additions: usize,
    pub deletions: usize,
}
