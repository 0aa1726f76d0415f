use thiserror::Error;

use super::commit::{BranchId, CommitId};

/// Broad classification of a [`GraphError`].
///
/// Every error raised by the engine is a rejected argument; the kind only
/// says which precondition was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced commit, branch or edge does not exist
    NotFound,
    /// A commit was linked to, or merged with, itself
    SelfReference,
    /// The operation would fork a commit without allocating a branch
    StructuralConflict,
    /// A snapshot could not be turned back into a tree
    InvalidSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("commit {0} does not exist")]
    CommitNotFound(CommitId),

    #[error("no commit exists on branch {0}")]
    BranchNotFound(BranchId),

    #[error("commit {0} cannot be its own parent")]
    SelfParent(CommitId),

    #[error("commit {0} cannot be its own child")]
    SelfChild(CommitId),

    #[error("commit {commit} has no parent {parent}")]
    ParentNotFound { commit: CommitId, parent: CommitId },

    #[error("commit {commit} has no child {child}")]
    ChildNotFound { commit: CommitId, child: CommitId },

    #[error("commit {0} already has a child; create a new branch instead")]
    AlreadyHasChild(CommitId),

    #[error("commit {0} cannot be merged with itself")]
    SelfMerge(CommitId),

    #[error("commit {0} appears more than once")]
    DuplicateCommit(CommitId),

    #[error("link {from} -> {to} is not mirrored on both commits")]
    BrokenLink { from: CommitId, to: CommitId },

    #[error("commit {0} is not below the next ID to be issued")]
    IdOutOfSequence(CommitId),

    #[error("commit {0} has no parents but is not the root")]
    MultipleRoots(CommitId),

    #[error("commit {commit} has parent {parent}, which was created after it")]
    ParentNotOlder { commit: CommitId, parent: CommitId },

    #[error("snapshot contains no commits")]
    EmptySnapshot,
}

impl GraphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::CommitNotFound(_)
            | GraphError::BranchNotFound(_)
            | GraphError::ParentNotFound { .. }
            | GraphError::ChildNotFound { .. } => ErrorKind::NotFound,
            GraphError::SelfParent(_) | GraphError::SelfChild(_) | GraphError::SelfMerge(_) => {
                ErrorKind::SelfReference
            }
            GraphError::AlreadyHasChild(_) => ErrorKind::StructuralConflict,
            GraphError::DuplicateCommit(_)
            | GraphError::BrokenLink { .. }
            | GraphError::IdOutOfSequence(_)
            | GraphError::MultipleRoots(_)
            | GraphError::ParentNotOlder { .. }
            | GraphError::EmptySnapshot => ErrorKind::InvalidSnapshot,
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(GraphError::CommitNotFound(3).kind(), ErrorKind::NotFound);
        assert_eq!(GraphError::SelfMerge(1).kind(), ErrorKind::SelfReference);
        assert_eq!(GraphError::AlreadyHasChild(0).kind(), ErrorKind::StructuralConflict);
        assert_eq!(GraphError::EmptySnapshot.kind(), ErrorKind::InvalidSnapshot);
    }

    #[test]
    fn test_messages_name_the_commit() {
        let err = GraphError::ChildNotFound { commit: 2, child: 7 };
        assert_eq!(err.to_string(), "commit 2 has no child 7");
    }
}
