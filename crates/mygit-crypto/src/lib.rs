//! Content hashing for mygit.
//!
//! Every object in a repository is addressed by the SHA-1 digest of its
//! payload. [`ContentHasher`] is the single place that digest is computed.

pub mod hasher;

pub use hasher::ContentHasher;
