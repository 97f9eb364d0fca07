use mygit_types::ObjectId;

use crate::error::StoreResult;
use crate::object::Tree;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - The key of a payload is its SHA-1 fingerprint; the store computes it.
/// - Objects are immutable once written. Writing a payload that is already
///   present is a no-op.
/// - There is no update or delete.
/// - The store never interprets payloads; tree decoding lives on [`Tree`].
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Store a payload and return its fingerprint.
    fn put(&self, data: &[u8]) -> StoreResult<ObjectId>;

    /// Read a payload by fingerprint.
    ///
    /// Returns `Err(StoreError::NotFound)` if the object does not exist.
    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Uncompressed payload size in bytes.
    fn stored_size(&self, id: &ObjectId) -> StoreResult<u64> {
        self.get(id).map(|data| data.len() as u64)
    }

    /// Read and decode a tree object.
    fn get_tree(&self, id: &ObjectId) -> StoreResult<Tree> {
        let data = self.get(id)?;
        Tree::parse(id, &data)
    }

    /// Serialize and store a tree object.
    fn put_tree(&self, tree: &Tree) -> StoreResult<ObjectId> {
        self.put(&tree.to_bytes())
    }
}
