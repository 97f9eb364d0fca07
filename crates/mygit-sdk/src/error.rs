use std::path::PathBuf;

use mygit_graph::GraphError;
use mygit_index::IndexError;
use mygit_refs::RefError;
use mygit_store::StoreError;
use mygit_types::{ObjectId, TypeError};
use mygit_worktree::WorktreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a mygit repository (no .mygit directory in {})", .0.display())]
    NotInitialized(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("invalid fingerprint {input:?}: {reason}")]
    InvalidFingerprint { input: String, reason: String },

    #[error("malformed object {id}: {reason}")]
    MalformedObject { id: ObjectId, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("nothing staged; use `add` before committing")]
    NothingStaged,

    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("directory nesting exceeds {max_depth} levels at {}", path.display())]
    DepthLimitExceeded { path: PathBuf, max_depth: usize },

    #[error("ref error: {0}")]
    Ref(#[from] RefError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SdkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<TypeError> for SdkError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidFingerprint { input, reason } => {
                Self::InvalidFingerprint { input, reason }
            }
            other => Self::Config(other.to_string()),
        }
    }
}

impl From<StoreError> for SdkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::ObjectNotFound(id),
            StoreError::Io { path, source } => Self::Io { path, source },
            StoreError::MalformedObject { id, reason } => Self::MalformedObject { id, reason },
        }
    }
}

impl From<GraphError> for SdkError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::MalformedCommit { id, reason } => Self::MalformedObject { id, reason },
            GraphError::Store(e) => e.into(),
        }
    }
}

impl From<WorktreeError> for SdkError {
    fn from(err: WorktreeError) -> Self {
        match err {
            WorktreeError::DepthLimitExceeded { path, max_depth } => {
                Self::DepthLimitExceeded { path, max_depth }
            }
            WorktreeError::MalformedObject { id, reason } => Self::MalformedObject { id, reason },
            WorktreeError::Io { path, source } => Self::Io { path, source },
            WorktreeError::Store(e) => e.into(),
            WorktreeError::Graph(e) => e.into(),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
