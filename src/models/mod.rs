//! Data transfer objects (DTOs) for API requests and responses.
//!
//! These structs are serialized to JSON for frontend consumption.
//! - `commit`: Commit
//! - `tree`: FileTreeNode, ChangeStats, DiffSummary
//! - `diff`: DiffSegment, StyledSegment, FileContents
//! - `analysis`: AnalyzeRequest, AnalysisResponse, RangeInfo, diagrams
//! - `repository`: RepositoryRecord for the analysed-repository list

pub mod analysis;
pub mod commit;
pub mod diff;
pub mod repository;
pub mod tree;

pub use analysis::*;
pub use commit::*;
pub use diff::*;
pub use repository::*;
pub use tree::*;
