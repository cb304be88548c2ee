pub mod bounded;
pub mod clone;
pub mod repository;
pub mod source;

#[cfg(test)]
pub mod testing;

pub use bounded::BoundedGit;
pub use clone::{clone_bounded, create_clone_dir, CloneFailure, CloneFailureKind, CloneOptions};
pub use repository::GitRepository;
pub use source::{GitError, GitSource};
