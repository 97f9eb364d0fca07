//! Ledger entry type.

use std::fmt;

use mygit_types::ObjectId;
use serde::{Deserialize, Serialize};

/// One staged file: the blob fingerprint and the `/`-separated path relative
/// to the repository root.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub object_id: ObjectId,
    pub path: String,
}

impl LedgerEntry {
    /// Create a new ledger entry.
    pub fn new(object_id: ObjectId, path: impl Into<String>) -> Self {
        Self {
            object_id,
            path: path.into(),
        }
    }

    /// Parse a `"<fingerprint> <path>"` line. The path is everything after
    /// the first space.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let (id, path) = line
            .split_once(' ')
            .ok_or_else(|| format!("expected '<fingerprint> <path>', got {line:?}"))?;
        let object_id = ObjectId::from_hex(id).map_err(|e| e.to_string())?;
        if path.is_empty() {
            return Err("empty path".into());
        }
        Ok(Self::new(object_id, path))
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_id, self.path)
    }
}
