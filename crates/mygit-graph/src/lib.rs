//! Commit history for mygit.
//!
//! A commit is an immutable text record linking a root tree, at most one
//! parent commit, the committer, a timestamp with a fixed UTC offset, and a
//! one-line message. Because each commit has at most one parent, the history
//! is a singly linked list walked from HEAD back to the root commit.
//!
//! # Key Types
//!
//! - [`Commit`] -- the record and its line format
//! - [`CommitGraph`] -- writes commits through an object store and walks history
//! - [`History`] -- iterator over `(id, commit)` pairs, newest first

pub mod commit;
pub mod error;
pub mod graph;

pub use commit::Commit;
pub use error::{GraphError, GraphResult};
pub use graph::{CommitGraph, History};
