//! Error types for reference operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The ref name is invalid or would escape the refs namespace.
    #[error("invalid ref name: {name}: {reason}")]
    InvalidRefName { name: String, reason: String },

    /// The HEAD file does not hold `ref: <name>` or a fingerprint.
    #[error("malformed HEAD: {0:?}")]
    MalformedHead(String),

    /// A branch file does not hold a fingerprint.
    #[error("malformed ref {name}: {reason}")]
    MalformedRef { name: String, reason: String },

    /// I/O error during file-based ref operations.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RefError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
