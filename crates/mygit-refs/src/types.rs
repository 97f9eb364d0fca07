//! The HEAD pointer and its on-disk format.

use std::fmt;

use mygit_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{RefError, Result};

/// Branch a fresh repository's HEAD names.
pub const DEFAULT_BRANCH_REF: &str = "refs/heads/main";

/// The state of HEAD: either symbolic (naming a branch file) or direct.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Head {
    /// HEAD names a ref path relative to the metadata directory.
    Symbolic(String),
    /// HEAD holds a commit fingerprint.
    Direct(ObjectId),
}

impl Head {
    /// The HEAD a fresh repository starts with.
    pub fn initial() -> Self {
        Self::Symbolic(DEFAULT_BRANCH_REF.to_string())
    }

    /// Parse the contents of a HEAD file: `ref: <name>` or a 40-hex line.
    pub fn parse(contents: &str) -> Result<Self> {
        let line = contents.trim();
        if let Some(name) = line.strip_prefix("ref:") {
            let name = name.trim();
            if name.is_empty() {
                return Err(RefError::MalformedHead(contents.to_string()));
            }
            return Ok(Self::Symbolic(name.to_string()));
        }
        ObjectId::from_hex(line)
            .map(Self::Direct)
            .map_err(|_| RefError::MalformedHead(contents.to_string()))
    }

    /// Render as file contents, including the trailing newline.
    pub fn to_file_contents(&self) -> String {
        format!("{self}\n")
    }

    /// The fingerprint of a direct HEAD.
    pub fn direct(&self) -> Option<ObjectId> {
        match self {
            Self::Direct(id) => Some(*id),
            Self::Symbolic(_) => None,
        }
    }

    /// Returns `true` if HEAD names a branch.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbolic(_))
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbolic(name) => write!(f, "ref: {name}"),
            Self::Direct(id) => write!(f, "{id}"),
        }
    }
}
