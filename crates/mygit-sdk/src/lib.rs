//! High-level SDK for mygit.
//!
//! [`Repository`] is the explicit context every operation runs against: the
//! working directory root, the `.mygit` metadata layout, the loaded
//! configuration, and the object/ref/ledger backends. This is the main entry
//! point for the CLI and for applications embedding mygit.

pub mod config;
pub mod error;
pub mod layout;
pub mod report;
pub mod repository;

pub use config::{CommitSettings, CommitterSettings, RepoConfig, TreeSettings};
pub use error::{SdkError, SdkResult};
pub use layout::RepoLayout;
pub use report::{CatMode, CatOutput, CommitOutcome, InitReport, LogEntry};
pub use repository::Repository;

// Re-export key types
pub use mygit_graph::Commit;
pub use mygit_index::LedgerEntry;
pub use mygit_refs::Head;
pub use mygit_store::{EntryMode, ObjectKind, Tree, TreeEntry};
pub use mygit_types::{Committer, ObjectId};
pub use mygit_worktree::{CheckoutReport, EntryOrder};
