//! Staging ledger for mygit.
//!
//! Staging a file stores its blob and appends a `"<fingerprint> <path>"` line
//! to the ledger file (`.mygit/index`). The ledger is append-only until a
//! commit truncates it; re-staging a path appends a new line rather than
//! replacing the old one, and readers collapse duplicates with
//! [`StagingLedger::latest`].
//!
//! # Key Types
//!
//! - [`StagingLedger`] -- the ledger file
//! - [`LedgerEntry`] -- one staged `(fingerprint, path)` pair

pub mod entry;
pub mod error;
pub mod ledger;

pub use entry::LedgerEntry;
pub use error::{IndexError, IndexResult};
pub use ledger::StagingLedger;
