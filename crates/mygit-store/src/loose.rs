use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use mygit_crypto::ContentHasher;
use mygit_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Filesystem object store: one zlib-compressed file per object under
/// `<objects>/<2 hex>/<38 hex>`.
///
/// Writes go through a temporary file in the shard directory that is renamed
/// into place, so a reader never observes a truncated object. Payloads
/// without a zlib header are returned verbatim on read.
#[derive(Debug, Clone)]
pub struct LooseObjectStore {
    objects_dir: PathBuf,
}

impl LooseObjectStore {
    /// Open a store rooted at an existing (or to-be-created) objects directory.
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        Self {
            objects_dir: objects_dir.into(),
        }
    }

    /// The root objects directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// On-disk location of an object.
    pub fn path_for(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.shard();
        self.objects_dir.join(dir).join(file)
    }

    fn write_atomic(&self, path: &Path, packed: &[u8]) -> StoreResult<()> {
        let shard = path.parent().unwrap_or(&self.objects_dir);
        fs::create_dir_all(shard).map_err(|e| StoreError::io(shard, e))?;
        let mut tmp = NamedTempFile::new_in(shard).map_err(|e| StoreError::io(shard, e))?;
        tmp.write_all(packed)
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(path)
            .map_err(|e| StoreError::io(path, e.error))?;
        Ok(())
    }
}

impl ObjectStore for LooseObjectStore {
    fn put(&self, data: &[u8]) -> StoreResult<ObjectId> {
        let id = ContentHasher::hash(data);
        let path = self.path_for(&id);
        if path.is_file() {
            debug!(%id, "object already present");
            return Ok(id);
        }
        let packed = codec::compress(data).map_err(|e| StoreError::io(&path, e))?;
        self.write_atomic(&path, &packed)?;
        debug!(%id, size = data.len(), packed = packed.len(), "wrote object");
        Ok(id)
    }

    fn get(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        let path = self.path_for(id);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*id));
            }
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        if !codec::looks_like_zlib(&raw) {
            debug!(%id, "reading uncompressed object");
            return Ok(raw);
        }
        codec::decompress(&raw)
            .map_err(|e| StoreError::malformed(*id, format!("corrupt zlib stream: {e}")))
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.path_for(id).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{EntryMode, Tree, TreeEntry};
    use proptest::prelude::*;

    fn store() -> (tempfile::TempDir, LooseObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LooseObjectStore::new(dir.path().join("objects"));
        (dir, store)
    }

    #[test]
    fn hello_lands_in_shard() {
        let (_dir, store) = store();
        let id = store.put(b"hello").unwrap();
        let path = store.path_for(&id);
        assert!(path.ends_with("aa/f4c61ddcc5e8a2dabede0f3b482cd9aea9434d"));
        assert!(path.is_file());
        // Stored compressed, not verbatim.
        let raw = fs::read(&path).unwrap();
        assert_ne!(raw, b"hello");
        assert!(codec::looks_like_zlib(&raw));
        assert_eq!(store.get(&id).unwrap(), b"hello");
    }

    #[test]
    fn empty_payload_roundtrips() {
        let (_dir, store) = store();
        let id = store.put(b"").unwrap();
        assert_eq!(id.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert!(store.get(&id).unwrap().is_empty());
        assert_eq!(store.stored_size(&id).unwrap(), 0);
    }

    #[test]
    fn rewrite_is_a_noop() {
        let (_dir, store) = store();
        let id = store.put(b"same bytes").unwrap();
        let path = store.path_for(&id);
        let before = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(store.put(b"same bytes").unwrap(), id);
        let after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(before, after);
        let shard = path.parent().unwrap();
        assert_eq!(fs::read_dir(shard).unwrap().count(), 1);
    }

    #[test]
    fn missing_object_is_not_found() {
        let (_dir, store) = store();
        let id = ContentHasher::hash(b"absent");
        assert!(matches!(store.get(&id), Err(StoreError::NotFound(_))));
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn legacy_uncompressed_payload_is_readable() {
        let (_dir, store) = store();
        let payload = b"tree da39a3ee5e6b4b0d3255bfef95601890afd80709\nMessage legacy\n";
        let id = ContentHasher::hash(payload);
        let path = store.path_for(&id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, payload).unwrap();
        assert_eq!(store.get(&id).unwrap(), payload);
    }

    #[test]
    fn corrupt_stream_is_malformed() {
        let (_dir, store) = store();
        let id = store.put(&vec![b'z'; 2048]).unwrap();
        let path = store.path_for(&id);
        let raw = fs::read(&path).unwrap();
        fs::write(&path, &raw[..raw.len() / 2]).unwrap();
        assert!(matches!(
            store.get(&id),
            Err(StoreError::MalformedObject { .. })
        ));
    }

    #[test]
    fn trees_roundtrip_on_disk() {
        let (_dir, store) = store();
        let blob = store.put(b"fn main() {}").unwrap();
        let tree = Tree::new(vec![TreeEntry::new(EntryMode::Executable, "run", blob)]);
        let id = store.put_tree(&tree).unwrap();
        assert_eq!(store.get_tree(&id).unwrap(), tree);
    }

    proptest! {
        #[test]
        fn get_returns_what_put_stored(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let (_dir, store) = store();
            let id = store.put(&data).unwrap();
            prop_assert_eq!(id, ContentHasher::hash(&data));
            prop_assert_eq!(store.get(&id).unwrap(), data);
        }
    }
}
