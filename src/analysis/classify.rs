//! Change-status classification.
//!
//! Two rule sets exist and both are kept verbatim because clients depend on
//! their exact boundary behaviour:
//! - `classify_full`: used for the complete repository tree
//! - `classify_changed_only`: used for trees that only list changed paths
//!
//! They disagree on purpose, e.g. a `0/0` entry is `unchanged` in the full
//! tree but `deleted` in a changed-only tree.

use crate::models::{ChangeStats, FileStatus};

pub fn classify_full(stats: Option<&ChangeStats>) -> FileStatus {
    let Some(stats) = stats else {
        return FileStatus::Unchanged;
    };

    match (stats.insertions, stats.deletions) {
        (ins, 0) if ins > 0 => FileStatus::Added,
        (0, del) if del > 0 => FileStatus::Deleted,
        (ins, del) if ins > 0 || del > 0 => FileStatus::Modified,
        _ => FileStatus::Unchanged,
    }
}

pub fn classify_changed_only(stats: Option<&ChangeStats>) -> FileStatus {
    let Some(stats) = stats else {
        return FileStatus::Modified;
    };

    if stats.insertions > 0 && stats.deletions > 0 {
        FileStatus::Modified
    } else if stats.insertions > 0 {
        FileStatus::Added
    } else {
        FileStatus::Deleted
    }
}
