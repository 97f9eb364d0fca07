//! The [`RefStore`] trait defining the reference storage interface.

use mygit_types::ObjectId;

use crate::error::Result;
use crate::types::Head;

/// Storage backend for HEAD and named refs.
///
/// Ref names are full paths relative to the metadata directory
/// (`refs/heads/main`) and are validated by every implementation before use.
pub trait RefStore: Send + Sync {
    /// Read the current HEAD. `Ok(None)` if HEAD has never been written.
    fn head(&self) -> Result<Option<Head>>;

    /// Overwrite HEAD.
    fn set_head(&self, head: &Head) -> Result<()>;

    /// Read the fingerprint stored in a ref. `Ok(None)` if the ref does not
    /// exist.
    fn read_ref(&self, name: &str) -> Result<Option<ObjectId>>;

    /// The commit HEAD currently designates, following one level of symbolic
    /// indirection. A symbolic HEAD whose branch does not exist yet resolves
    /// to `None`.
    fn resolve_head(&self) -> Result<Option<ObjectId>> {
        match self.head()? {
            None => Ok(None),
            Some(Head::Direct(id)) => Ok(Some(id)),
            Some(Head::Symbolic(name)) => self.read_ref(&name),
        }
    }
}
