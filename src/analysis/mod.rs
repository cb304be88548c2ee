//! The analysis engine: trees, change classification, per-commit history,
//! line diffs, range selection and file contents, plus the pipeline that
//! strings them together for one request.

pub mod classify;
pub mod content;
pub mod history;
pub mod line_diff;
pub mod notes;
pub mod pipeline;
pub mod range;
pub mod tree_builder;

pub use content::{ContentCache, ContentFetcher, ContentKey};
pub use line_diff::{render_diff, DiffView};
pub use pipeline::Analyzer;
pub use range::{resolve_range, CommitWindow, RangeResolutionError, ResolvedRange};
