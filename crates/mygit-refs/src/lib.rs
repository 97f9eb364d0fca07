//! Reference management for mygit.
//!
//! References are the human-readable entry points into the commit history.
//! A repository has a single `HEAD` that is either **symbolic** (naming a
//! branch file such as `refs/heads/main`) or **direct** (holding a commit
//! fingerprint). Branch files live under the metadata directory and contain
//! one fingerprint each.
//!
//! A freshly initialized repository's HEAD is `ref: refs/heads/main`, naming
//! a branch file that does not exist yet; such a HEAD resolves to no commit.
//!
//! # Modules
//!
//! - [`error`]: Error types for ref operations
//! - [`types`]: The [`Head`] enum and its file format
//! - [`traits`]: The [`RefStore`] trait defining the storage interface
//! - [`names`]: Ref name validation
//! - [`file`]: [`FileRefStore`] backed by the metadata directory

pub mod error;
pub mod file;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use file::FileRefStore;
pub use names::{validate_branch_name, validate_ref_name};
pub use traits::RefStore;
pub use types::{Head, DEFAULT_BRANCH_REF};
