//! Typed repository errors
//!
//! Operations return `anyhow::Result`, but every failure the caller may want to
//! react to is raised as a [`RepositoryError`] so it can be recovered with
//! `err.downcast_ref::<RepositoryError>()`.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::file_name::FileName;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

/// Coarse classification of a [`RepositoryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input
    Validation,
    /// Unknown commit, branch or stored object
    NotFound,
    /// Illegal transition of the repository state
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Validation(String),

    #[error("commit id prefix {0} is ambiguous")]
    AmbiguousCommit(String),

    #[error("a branch with name {0} does not exist")]
    UnknownBranch(BranchName),

    #[error("no commit with id {0} exists")]
    UnknownCommit(String),

    #[error("object {oid} not found for {name}")]
    ObjectNotFound { name: FileName, oid: ObjectId },

    #[error("file {name} does not exist in commit {oid}")]
    FileNotInCommit { name: FileName, oid: ObjectId },

    #[error("found no commit with message: {0}")]
    NoMatchingCommit(String),

    #[error("not a minigit repository: {}", .0.display())]
    NotInitialized(PathBuf),

    #[error("cannot remove the current branch {0}")]
    CurrentBranch(BranchName),

    #[error("cannot merge a branch with itself")]
    SameBranch,

    #[error("histories have no common ancestor")]
    NoCommonAncestor,

    #[error("no changes added to the commit")]
    NothingToCommit,

    #[error("you have uncommitted changes")]
    UncommittedChanges,

    #[error("untracked working file {0} would be overwritten; move or add it first")]
    UntrackedFile(FileName),

    #[error("a minigit repository already exists in {}", .0.display())]
    AlreadyInitialized(PathBuf),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::Validation(_) | RepositoryError::AmbiguousCommit(_) => {
                ErrorKind::Validation
            }
            RepositoryError::UnknownBranch(_)
            | RepositoryError::UnknownCommit(_)
            | RepositoryError::ObjectNotFound { .. }
            | RepositoryError::FileNotInCommit { .. }
            | RepositoryError::NoMatchingCommit(_)
            | RepositoryError::NotInitialized(_) => ErrorKind::NotFound,
            RepositoryError::CurrentBranch(_)
            | RepositoryError::SameBranch
            | RepositoryError::NoCommonAncestor
            | RepositoryError::NothingToCommit
            | RepositoryError::UncommittedChanges
            | RepositoryError::UntrackedFile(_)
            | RepositoryError::AlreadyInitialized(_) => ErrorKind::State,
        }
    }

    /// Extract the typed error from an `anyhow` chain, if there is one
    pub fn of(error: &anyhow::Error) -> Option<&RepositoryError> {
        error.downcast_ref::<RepositoryError>()
    }
}
