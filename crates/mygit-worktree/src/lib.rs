//! Working directory snapshots for mygit.
//!
//! [`TreeBuilder`] turns a directory into tree and blob objects, children
//! before parents, so every ancestor tree's fingerprint changes when any
//! nested file does. [`CheckoutEngine`] does the reverse: it wipes the
//! working directory (keeping the metadata directory) and materializes a
//! commit's tree.
//!
//! Both recurse with a depth guard instead of growing the stack without
//! bound.

pub mod builder;
pub mod checkout;
pub mod error;

pub use builder::{EntryOrder, TreeBuilder, DEFAULT_MAX_DEPTH};
pub use checkout::{CheckoutEngine, CheckoutReport};
pub use error::{WorktreeError, WorktreeResult};

/// Name of the repository metadata directory, excluded from snapshots and
/// never touched by checkout.
pub const METADATA_DIR: &str = ".mygit";
