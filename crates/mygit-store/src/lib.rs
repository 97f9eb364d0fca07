//! Content-addressed object storage for mygit.
//!
//! Every blob, tree and commit is stored as an immutable payload keyed by its
//! SHA-1 fingerprint, analogous to git's `.git/objects/` directory but
//! without a type header: the fingerprint is the plain SHA-1 of the payload.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`LooseObjectStore`] -- one zlib-compressed file per object under
//!   `objects/<2 hex>/<38 hex>`
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Payload Codecs
//!
//! - [`Tree`] / [`TreeEntry`] -- `"<mode> <type> <fingerprint> <name>"` lines
//! - [`ObjectKind::detect`] -- best-effort kind recovery from a bare payload
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written; re-writing is a no-op.
//! 2. There is no update or delete operation.
//! 3. Object paths are a pure function of the fingerprint.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod codec;
pub mod error;
pub mod loose;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use loose::LooseObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{EntryMode, ObjectKind, Tree, TreeEntry};
pub use traits::ObjectStore;
