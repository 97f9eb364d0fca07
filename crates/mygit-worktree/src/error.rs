//! Error types for working directory operations.

use std::path::PathBuf;

use mygit_graph::GraphError;
use mygit_store::StoreError;
use mygit_types::ObjectId;

/// Errors that can occur while building trees or checking out.
#[derive(Debug, thiserror::Error)]
pub enum WorktreeError {
    /// Directory nesting exceeded the configured limit.
    #[error("directory nesting exceeds {max_depth} levels at {}", path.display())]
    DepthLimitExceeded { path: PathBuf, max_depth: usize },

    /// A tree entry cannot be materialized safely.
    #[error("malformed object {id}: {reason}")]
    MalformedObject { id: ObjectId, reason: String },

    /// Filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Object store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The checkout target is not a readable commit.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl WorktreeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for worktree results.
pub type WorktreeResult<T> = Result<T, WorktreeError>;
