//! Error types for the index crate.

use std::path::PathBuf;

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A ledger line is not `"<fingerprint> <path>"`.
    #[error("malformed ledger line {line_no}: {reason}")]
    MalformedLine { line_no: usize, reason: String },

    /// A path cannot be recorded in the line format.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// I/O error reading or writing the ledger file.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
