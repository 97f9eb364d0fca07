//! Error types for commit graph operations.

use mygit_store::StoreError;
use mygit_types::ObjectId;

/// Errors that can occur while writing or reading commits.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The payload is not a valid commit record.
    #[error("malformed commit {id}: {reason}")]
    MalformedCommit { id: ObjectId, reason: String },

    /// Object store failure (including a missing commit or parent).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GraphError {
    pub(crate) fn malformed(id: ObjectId, reason: impl Into<String>) -> Self {
        Self::MalformedCommit {
            id,
            reason: reason.into(),
        }
    }
}

/// Convenience alias for graph results.
pub type GraphResult<T> = Result<T, GraphError>;
