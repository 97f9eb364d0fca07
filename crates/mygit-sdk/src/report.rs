use std::path::PathBuf;

use mygit_graph::Commit;
use mygit_store::ObjectKind;
use mygit_types::ObjectId;
use serde::Serialize;

/// Result of `init`.
#[derive(Clone, Debug, Serialize)]
pub struct InitReport {
    pub root: PathBuf,
    /// `true` if a metadata directory was already present.
    pub reinitialized: bool,
    /// Metadata pieces that were missing and got created, e.g. `objects`.
    pub created: Vec<String>,
}

/// Result of a commit operation.
#[derive(Clone, Debug, Serialize)]
pub struct CommitOutcome {
    pub id: ObjectId,
    pub tree: ObjectId,
    pub parent: Option<ObjectId>,
    pub message: String,
    /// Ledger lines consumed by this commit.
    pub staged: usize,
}

/// What `cat-file` should report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatMode {
    /// The payload itself.
    Pretty,
    /// Payload size in bytes.
    Size,
    /// Detected object kind.
    Type,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatOutput {
    Pretty(Vec<u8>),
    Size(u64),
    Type(ObjectKind),
}

/// One commit in `log` output.
#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    pub id: ObjectId,
    #[serde(flatten)]
    pub commit: Commit,
}
