use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid fingerprint {input:?}: {reason}")]
    InvalidFingerprint { input: String, reason: String },

    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("invalid UTC offset {0:?}: expected +HHMM or -HHMM")]
    InvalidOffset(String),

    #[error("invalid committer identity {0:?}")]
    InvalidIdentity(String),
}
