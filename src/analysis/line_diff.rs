//! Line-level diff segmentation for the playback view.
//!
//! Segments are computed once from the two texts. Playback progress only
//! changes how prominent added and removed segments are drawn, never which
//! segments exist.
//!
//! Long unchanged runs are split so the viewer can fold them:
//!
//! ```text
//! unchanged x10  ->  3 context | 4 collapsible | 3 context
//! unchanged x6   ->  6 (shown in full)
//! ```

use similar::{Algorithm, ChangeTag, TextDiff};

use crate::models::{CollapsedSection, DiffSegment, RenderDiffResponse, SegmentKind, StyledSegment};

/// Unchanged runs longer than this are folded.
pub const COLLAPSE_THRESHOLD: usize = 6;
/// Lines kept visible on each side of a folded run.
pub const CONTEXT_LINES: usize = 3;
pub const EMPTY_PLACEHOLDER: &str = "No file content available for comparison";

/// Segments the LCS line diff of `before` and `after`. Either side empty
/// yields no segments. Lines compare without their endings, so a missing
/// final newline or CRLF against LF is not a change.
pub fn render_diff(before: &str, after: &str) -> Vec<DiffSegment> {
    if before.is_empty() || after.is_empty() {
        return Vec::new();
    }

    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Lcs)
        .diff_slices(&old, &new);

    let mut runs: Vec<(SegmentKind, Vec<String>)> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SegmentKind::Unchanged,
            ChangeTag::Delete => SegmentKind::Removed,
            ChangeTag::Insert => SegmentKind::Added,
        };
        let line = change.value().to_string();

        match runs.last_mut() {
            Some((last_kind, lines)) if *last_kind == kind => lines.push(line),
            _ => runs.push((kind, vec![line])),
        }
    }

    let mut segments = Vec::new();
    let mut next_line = 1;
    for (kind, mut lines) in runs {
        if kind == SegmentKind::Unchanged && lines.len() > COLLAPSE_THRESHOLD {
            let tail = lines.split_off(lines.len() - CONTEXT_LINES);
            let middle = lines.split_off(CONTEXT_LINES);
            push_segment(&mut segments, &mut next_line, kind, lines, false);
            push_segment(&mut segments, &mut next_line, kind, middle, true);
            push_segment(&mut segments, &mut next_line, kind, tail, false);
        } else {
            push_segment(&mut segments, &mut next_line, kind, lines, false);
        }
    }

    segments
}

fn push_segment(
    segments: &mut Vec<DiffSegment>,
    next_line: &mut usize,
    kind: SegmentKind,
    lines: Vec<String>,
    collapsible: bool,
) {
    let start_line = *next_line;
    *next_line += lines.len();
    segments.push(DiffSegment {
        kind,
        lines,
        start_line,
        end_line: *next_line - 1,
        collapsible,
    });
}

/// A segmented diff viewed at one point of playback.
#[derive(Debug, Clone)]
pub struct DiffView {
    segments: Vec<DiffSegment>,
    progress: f32,
    empty: bool,
}

impl DiffView {
    pub fn new(before: &str, after: &str, progress: f32) -> Self {
        Self {
            segments: render_diff(before, after),
            progress: clamp_progress(progress),
            empty: before.is_empty() || after.is_empty(),
        }
    }

    pub fn segments(&self) -> &[DiffSegment] {
        &self.segments
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.empty.then_some(EMPTY_PLACEHOLDER)
    }

    /// Added lines fade in as playback advances; removed lines fade out.
    pub fn opacity(&self, kind: SegmentKind) -> f32 {
        match kind {
            SegmentKind::Added => self.progress,
            SegmentKind::Removed => 1.0 - self.progress,
            SegmentKind::Unchanged => 1.0,
        }
    }

    pub fn additions(&self) -> usize {
        self.count_lines(SegmentKind::Added)
    }

    pub fn deletions(&self) -> usize {
        self.count_lines(SegmentKind::Removed)
    }

    fn count_lines(&self, kind: SegmentKind) -> usize {
        self.segments
            .iter()
            .filter(|s| s.kind == kind)
            .map(DiffSegment::len)
            .sum()
    }

    pub fn styled_segments(&self) -> Vec<StyledSegment> {
        self.segments
            .iter()
            .map(|segment| StyledSegment {
                opacity: self.opacity(segment.kind),
                collapsed: segment.collapsible,
                segment: segment.clone(),
            })
            .collect()
    }

    pub fn collapsed_sections(&self) -> Vec<CollapsedSection> {
        self.segments
            .iter()
            .filter(|s| s.collapsible)
            .map(|s| CollapsedSection {
                start_line: s.start_line,
                end_line: s.end_line,
                hidden_lines: s.len(),
            })
            .collect()
    }

    pub fn into_response(self) -> RenderDiffResponse {
        RenderDiffResponse {
            segments: self.styled_segments(),
            collapsed_sections: self.collapsed_sections(),
            placeholder: self.placeholder().map(str::to_string),
            additions: self.additions(),
            deletions: self.deletions(),
        }
    }
}

fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}
