//! Narrative notes and evolution diagrams for the first commits of a range.

use crate::models::{ArchitectureDiagram, Commit, DiagramLink, DiagramNode};

/// Only this many commits get a note or a diagram.
pub const NOTE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    InitialSetup,
    Refactoring,
    FeatureAddition,
    BugFix,
    Update,
    Development,
}

impl NoteKind {
    /// Picks the kind from keywords in `message`. The first commit is always
    /// the initial setup.
    pub fn classify(message: &str, index: usize) -> Self {
        let msg = message.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| msg.contains(n));

        if index == 0 || has(&["initial", "setup"]) {
            NoteKind::InitialSetup
        } else if has(&["refactor"]) {
            NoteKind::Refactoring
        } else if has(&["add", "new"]) {
            NoteKind::FeatureAddition
        } else if has(&["fix", "bug"]) {
            NoteKind::BugFix
        } else if has(&["update", "upgrade"]) {
            NoteKind::Update
        } else {
            NoteKind::Development
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            NoteKind::InitialSetup => "Initial Setup",
            NoteKind::Refactoring => "Code Refactoring",
            NoteKind::FeatureAddition => "Feature Addition",
            NoteKind::BugFix => "Bug Fix",
            NoteKind::Update => "Update",
            NoteKind::Development => "Development",
        }
    }

    fn sentence(self) -> &'static str {
        match self {
            NoteKind::InitialSetup => "This commit establishes the foundational structure of the repository.",
            NoteKind::Refactoring => "This commit improves code organization and maintainability.",
            NoteKind::FeatureAddition => "New functionality has been introduced to enhance the application.",
            NoteKind::BugFix => "This commit resolves issues and improves stability.",
            NoteKind::Update => "Dependencies or configurations have been updated.",
            NoteKind::Development => "Ongoing development and improvements to the codebase.",
        }
    }
}

pub fn architecture_notes(commits: &[Commit]) -> Vec<String> {
    commits
        .iter()
        .take(NOTE_LIMIT)
        .enumerate()
        .map(|(i, commit)| {
            let kind = NoteKind::classify(&commit.message, i);
            format!("**{}:** {} - {}", kind.title(), commit.message, kind.sentence())
        })
        .collect()
}

fn node(id: &str, label: &str, x: f64, y: f64) -> DiagramNode {
    DiagramNode {
        id: id.to_string(),
        label: label.to_string(),
        x,
        y,
    }
}

/// Later diagrams grow extra components around `main`.
pub fn architecture_diagrams(commits: &[Commit]) -> Vec<ArchitectureDiagram> {
    let extras = [
        (0, node("feature", "Feature", 300.0, 150.0)),
        (2, node("utils", "Utils", 100.0, 150.0)),
        (4, node("api", "API", 200.0, 200.0)),
    ];

    (0..commits.len().min(NOTE_LIMIT))
        .map(|index| {
            let mut nodes = vec![node("main", "Main", 200.0, 100.0)];
            let mut links = Vec::new();
            for (_, extra) in extras.iter().filter(|(after, _)| index > *after) {
                links.push(DiagramLink {
                    source: "main".to_string(),
                    target: extra.id.clone(),
                });
                nodes.push(extra.clone());
            }
            ArchitectureDiagram { nodes, links }
        })
        .collect()
}
