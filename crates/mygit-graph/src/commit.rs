//! The commit record and its line format.
//!
//! ```text
//! tree <fingerprint>
//! parent <fingerprint>        (absent on the root commit)
//! Committer <name> <<email>>
//! Timestamp <YYYY-MM-DD HH:MM:SS> <+HHMM>
//! Message <message>
//! ```

use mygit_crypto::ContentHasher;
use mygit_types::{CommitTimestamp, Committer, ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// An immutable commit record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Root tree of the snapshot.
    pub tree: ObjectId,
    /// Previous commit, `None` for the root commit.
    pub parent: Option<ObjectId>,
    pub committer: Committer,
    pub timestamp: CommitTimestamp,
    /// Single-line message.
    pub message: String,
}

impl Commit {
    /// Create a commit record. Line breaks in `message` become spaces, since
    /// the format carries exactly one `Message` line.
    pub fn new(
        tree: ObjectId,
        parent: Option<ObjectId>,
        committer: Committer,
        timestamp: CommitTimestamp,
        message: &str,
    ) -> Self {
        let message = message
            .trim_end_matches(['\n', '\r'])
            .replace("\r\n", " ")
            .replace(['\n', '\r'], " ");
        Self {
            tree,
            parent,
            committer,
            timestamp,
            message,
        }
    }

    /// Returns `true` if this is the first commit in a history.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Serialize to the stored payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("tree {}\n", self.tree);
        if let Some(parent) = &self.parent {
            out.push_str(&format!("parent {parent}\n"));
        }
        out.push_str(&format!("Committer {}\n", self.committer));
        out.push_str(&format!("Timestamp {}\n", self.timestamp));
        out.push_str(&format!("Message {}\n", self.message));
        out.into_bytes()
    }

    /// Fingerprint of the serialized record.
    pub fn compute_id(&self) -> ObjectId {
        ContentHasher::hash(&self.to_bytes())
    }

    /// Decode a stored payload. `id` is only used for error reporting.
    ///
    /// The `tree` line must come first and `parent` (if any) second; the
    /// `Committer`, `Timestamp` and `Message` lines are all required. Lines
    /// after `Message` are joined onto the message with spaces.
    pub fn parse(id: &ObjectId, data: &[u8]) -> GraphResult<Self> {
        let id = *id;
        let text = std::str::from_utf8(data)
            .map_err(|e| GraphError::malformed(id, format!("not UTF-8: {e}")))?;
        let mut lines = text.lines().peekable();

        let tree_line = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| GraphError::malformed(id, "missing tree line"))?;
        let tree = ObjectId::from_hex(tree_line.trim_end())
            .map_err(|e| GraphError::malformed(id, format!("tree: {e}")))?;

        let parent = match lines.peek().and_then(|line| line.strip_prefix("parent ")) {
            Some(hex) => {
                let parent = ObjectId::from_hex(hex.trim_end())
                    .map_err(|e| GraphError::malformed(id, format!("parent: {e}")))?;
                lines.next();
                Some(parent)
            }
            None => None,
        };

        let mut committer = None;
        let mut timestamp = None;
        let mut message: Option<Vec<&str>> = None;
        for line in lines {
            // Everything after `Message` continues the message: older writers
            // stored multi-line messages verbatim.
            if let Some(parts) = message.as_mut() {
                parts.push(line);
            } else if let Some(rest) = line.strip_prefix("Committer ") {
                committer = Some(
                    Committer::parse(rest)
                        .map_err(|e| GraphError::malformed(id, e.to_string()))?,
                );
            } else if let Some(rest) = line.strip_prefix("Timestamp ") {
                timestamp = Some(
                    CommitTimestamp::parse(rest)
                        .map_err(|e| GraphError::malformed(id, e.to_string()))?,
                );
            } else if let Some(rest) = line.strip_prefix("Message") {
                message = Some(vec![rest.strip_prefix(' ').unwrap_or(rest)]);
            } else if !line.is_empty() {
                return Err(GraphError::malformed(id, format!("unexpected line {line:?}")));
            }
        }

        let mut message =
            message.ok_or_else(|| GraphError::malformed(id, "missing Message line"))?;
        while message.len() > 1 && message.last().is_some_and(|line| line.is_empty()) {
            message.pop();
        }

        Ok(Self {
            tree,
            parent,
            committer: committer.ok_or_else(|| GraphError::malformed(id, "missing Committer line"))?,
            timestamp: timestamp.ok_or_else(|| GraphError::malformed(id, "missing Timestamp line"))?,
            message: message.join(" "),
        })
    }
}
