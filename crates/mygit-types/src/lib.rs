//! Foundation types for mygit.
//!
//! This crate provides the identity and temporal types shared by every other
//! mygit crate.
//!
//! # Key Types
//!
//! - [`ObjectId`]: 160-bit content fingerprint (SHA-1), rendered as 40 hex chars
//! - [`Committer`]: name and email recorded on every commit
//! - [`CommitTimestamp`]: wall-clock time pinned to a fixed UTC offset

pub mod error;
pub mod identity;
pub mod object;
pub mod temporal;

pub use error::TypeError;
pub use identity::Committer;
pub use object::ObjectId;
pub use temporal::{parse_utc_offset, CommitTimestamp};
