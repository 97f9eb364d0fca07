//! Directory to tree objects.

use std::fs::{self, DirEntry};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use mygit_store::{EntryMode, ObjectStore, Tree, TreeEntry};
use mygit_types::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{WorktreeError, WorktreeResult};
use crate::METADATA_DIR;

/// Nesting limit applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Order of entries inside a built tree.
///
/// Order is part of a tree's fingerprint, so two builders with different
/// orders produce different fingerprints for the same directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrder {
    /// Byte order of entry names; reproducible across machines.
    #[default]
    Sorted,
    /// Whatever order the filesystem enumerates.
    Filesystem,
}

impl FromStr for EntryOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sorted" => Ok(Self::Sorted),
            "filesystem" => Ok(Self::Filesystem),
            other => Err(format!("unknown entry order {other:?}")),
        }
    }
}

/// Builds tree objects from a directory, post-order.
///
/// Regular files become blobs (`100755` when owner-executable, else
/// `100644`), subdirectories become subtrees. Symlinks and special files are
/// skipped, as are names the line format cannot carry. The metadata
/// directory is skipped at the top level.
pub struct TreeBuilder {
    store: Arc<dyn ObjectStore>,
    order: EntryOrder,
    max_depth: usize,
}

impl std::fmt::Debug for TreeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("order", &self.order)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl TreeBuilder {
    /// Create a builder writing into `store`, with sorted entries.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            order: EntryOrder::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the entry order.
    pub fn with_order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Snapshot `dir` and return the root tree's fingerprint.
    #[instrument(skip(self), fields(root = %dir.display()))]
    pub fn build(&self, dir: &Path) -> WorktreeResult<ObjectId> {
        let start = Instant::now();
        let id = self.build_dir(dir, 0)?;
        info!(
            tree = %id,
            duration_ms = start.elapsed().as_millis(),
            "built tree"
        );
        Ok(id)
    }

    fn build_dir(&self, dir: &Path, depth: usize) -> WorktreeResult<ObjectId> {
        if depth > self.max_depth {
            return Err(WorktreeError::DepthLimitExceeded {
                path: dir.to_path_buf(),
                max_depth: self.max_depth,
            });
        }

        let listing = fs::read_dir(dir).map_err(|e| WorktreeError::io(dir, e))?;
        let mut entries = Vec::new();
        for item in listing {
            let item = item.map_err(|e| WorktreeError::io(dir, e))?;
            if depth == 0 && item.file_name() == METADATA_DIR {
                continue;
            }
            if let Some(entry) = self.build_entry(&item, depth)? {
                entries.push(entry);
            }
        }

        let tree = match self.order {
            EntryOrder::Sorted => Tree::sorted(entries),
            EntryOrder::Filesystem => Tree::new(entries),
        };
        let id = self.store.put_tree(&tree)?;
        debug!(tree = %id, entries = tree.len(), dir = %dir.display(), "stored tree");
        Ok(id)
    }

    fn build_entry(&self, item: &DirEntry, depth: usize) -> WorktreeResult<Option<TreeEntry>> {
        let path = item.path();
        let file_name = item.file_name();
        let Some(name) = file_name.to_str() else {
            warn!(path = %path.display(), "skipping entry with non UTF-8 name");
            return Ok(None);
        };
        if name.contains(['\n', '\r']) {
            warn!(path = %path.display(), "skipping entry with line break in name");
            return Ok(None);
        }

        let file_type = item.file_type().map_err(|e| WorktreeError::io(&path, e))?;
        if file_type.is_dir() {
            let id = self.build_dir(&path, depth + 1)?;
            return Ok(Some(TreeEntry::new(EntryMode::Directory, name, id)));
        }
        if !file_type.is_file() {
            debug!(path = %path.display(), "skipping non-regular entry");
            return Ok(None);
        }

        let data = fs::read(&path).map_err(|e| WorktreeError::io(&path, e))?;
        let id = self.store.put(&data)?;
        let metadata = item.metadata().map_err(|e| WorktreeError::io(&path, e))?;
        let mode = if is_executable(&metadata) {
            EntryMode::Executable
        } else {
            EntryMode::Regular
        };
        Ok(Some(TreeEntry::new(mode, name, id)))
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use mygit_store::InMemoryObjectStore;

    fn builder() -> (Arc<InMemoryObjectStore>, TreeBuilder) {
        let store = Arc::new(InMemoryObjectStore::new());
        let builder = TreeBuilder::new(store.clone());
        (store, builder)
    }

    #[test]
    fn empty_directory_is_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let (store, builder) = builder();
        let id = builder.build(dir.path()).unwrap();
        assert_eq!(id.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert!(store.get_tree(&id).unwrap().is_empty());
    }

    #[test]
    fn single_file_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        let (store, builder) = builder();
        let id = builder.build(dir.path()).unwrap();
        let tree = store.get_tree(&id).unwrap();
        assert_eq!(tree.len(), 1);
        let entry = tree.get("a.txt").unwrap();
        assert_eq!(entry.mode, EntryMode::Regular);
        assert_eq!(entry.object_id.to_hex(), "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    }

    #[test]
    fn nested_directories_become_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/inner")).unwrap();
        fs::write(dir.path().join("src/inner/deep.txt"), "deep").unwrap();
        fs::write(dir.path().join("top.txt"), "top").unwrap();
        let (store, builder) = builder();
        let id = builder.build(dir.path()).unwrap();

        let root = store.get_tree(&id).unwrap();
        let names: Vec<_> = root.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["src", "top.txt"]);
        let src = root.get("src").unwrap();
        assert_eq!(src.mode, EntryMode::Directory);
        let inner = store.get_tree(&src.object_id).unwrap();
        assert!(inner.get("inner").unwrap().is_tree());
    }

    #[test]
    fn metadata_dir_is_excluded_at_root_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".mygit/objects")).unwrap();
        fs::write(dir.path().join(".mygit/HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::create_dir_all(dir.path().join("sub/.mygit")).unwrap();
        fs::write(dir.path().join("sub/.mygit/x"), "x").unwrap();
        let (store, builder) = builder();
        let root = store.get_tree(&builder.build(dir.path()).unwrap()).unwrap();
        assert!(root.get(".mygit").is_none());
        let sub = store.get_tree(&root.get("sub").unwrap().object_id).unwrap();
        assert!(sub.get(".mygit").is_some());
    }

    #[test]
    fn build_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/c.txt"), "c").unwrap();
        let (_store, builder) = builder();
        assert_eq!(
            builder.build(dir.path()).unwrap(),
            builder.build(dir.path()).unwrap()
        );
    }

    #[test]
    fn nested_change_propagates_to_every_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/c.txt"), "one").unwrap();
        let (store, builder) = builder();
        let before = builder.build(dir.path()).unwrap();
        let a_before = store.get_tree(&before).unwrap().get("a").unwrap().object_id;

        fs::write(dir.path().join("a/b/c.txt"), "onf").unwrap();
        let after = builder.build(dir.path()).unwrap();
        let a_after = store.get_tree(&after).unwrap().get("a").unwrap().object_id;
        assert_ne!(before, after);
        assert_ne!(a_before, a_after);
    }

    #[test]
    fn depth_guard_trips() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("1/2/3")).unwrap();
        let (_store, builder) = builder();
        let err = builder.with_max_depth(2).build(dir.path()).unwrap_err();
        assert!(matches!(err, WorktreeError::DepthLimitExceeded { max_depth: 2, .. }));
    }

    #[test]
    fn entry_order_parses() {
        assert_eq!("sorted".parse::<EntryOrder>().unwrap(), EntryOrder::Sorted);
        assert_eq!("filesystem".parse::<EntryOrder>().unwrap(), EntryOrder::Filesystem);
        assert!("random".parse::<EntryOrder>().is_err());
    }

    #[test]
    fn filesystem_order_follows_enumeration() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "mid", "Beta", "0num"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        fs::create_dir(dir.path().join("dir")).unwrap();
        let listed: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|item| item.unwrap().file_name().into_string().unwrap())
            .collect();

        let (store, builder) = builder();
        let id = builder
            .with_order(EntryOrder::Filesystem)
            .build(dir.path())
            .unwrap();
        let names: Vec<String> = store
            .get_tree(&id)
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, listed);
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_and_symlinks() {
        use std::os::unix::fs::{symlink, PermissionsExt};

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        symlink(&script, dir.path().join("link")).unwrap();

        let (store, builder) = builder();
        let tree = store.get_tree(&builder.build(dir.path()).unwrap()).unwrap();
        assert_eq!(tree.get("run.sh").unwrap().mode, EntryMode::Executable);
        assert!(tree.get("link").is_none());
    }
}
