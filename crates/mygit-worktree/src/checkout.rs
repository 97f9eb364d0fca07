//! Materializing a commit's tree into the working directory.
//!
//! Checkout is destructive and not atomic: after a preflight walk confirms
//! the target tree is complete, every top-level entry except the metadata
//! directory is removed, then the tree is restored. A failure during restore
//! leaves a partially restored directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mygit_graph::Commit;
use mygit_store::{EntryMode, ObjectStore, StoreError, TreeEntry};
use mygit_types::ObjectId;
use serde::Serialize;
use tracing::{debug, info};

use crate::builder::DEFAULT_MAX_DEPTH;
use crate::error::{WorktreeError, WorktreeResult};
use crate::METADATA_DIR;

/// What a checkout did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutReport {
    /// Root tree that was restored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<ObjectId>,
    /// Top-level entries removed during the clean step.
    pub removed: usize,
    /// Files written.
    pub files: usize,
    /// Directories created.
    pub directories: usize,
}

/// Restores trees into a working directory.
pub struct CheckoutEngine {
    store: Arc<dyn ObjectStore>,
    max_depth: usize,
}

impl std::fmt::Debug for CheckoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutEngine")
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl CheckoutEngine {
    /// Create an engine reading from `store`.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Replace the contents of `root` with the tree of commit `commit_id`.
    pub fn checkout(&self, root: &Path, commit_id: &ObjectId) -> WorktreeResult<CheckoutReport> {
        let data = self.store.get(commit_id)?;
        let commit = Commit::parse(commit_id, &data)?;
        let report = self.checkout_tree(root, &commit.tree)?;
        info!(
            commit = %commit_id,
            files = report.files,
            directories = report.directories,
            "checked out commit"
        );
        Ok(report)
    }

    /// Replace the contents of `root` with tree `tree_id`.
    pub fn checkout_tree(&self, root: &Path, tree_id: &ObjectId) -> WorktreeResult<CheckoutReport> {
        self.preflight(tree_id)?;
        let mut report = CheckoutReport {
            tree: Some(*tree_id),
            removed: self.clean(root)?,
            ..CheckoutReport::default()
        };
        self.restore(tree_id, root, 0, &mut report)?;
        Ok(report)
    }

    /// Verify, without touching the working directory, that every tree
    /// reachable from `tree_id` decodes, has restorable entry names, and that
    /// every blob it references exists.
    pub fn preflight(&self, tree_id: &ObjectId) -> WorktreeResult<()> {
        self.preflight_at(tree_id, &PathBuf::new(), 0)
    }

    fn preflight_at(&self, tree_id: &ObjectId, rel: &Path, depth: usize) -> WorktreeResult<()> {
        self.check_depth(rel, depth)?;
        let tree = self.store.get_tree(tree_id)?;
        for entry in &tree.entries {
            if is_metadata_entry(entry, depth) {
                continue;
            }
            check_entry_name(tree_id, entry)?;
            if entry.is_tree() {
                self.preflight_at(&entry.object_id, &rel.join(&entry.name), depth + 1)?;
            } else if !self.store.exists(&entry.object_id)? {
                return Err(StoreError::NotFound(entry.object_id).into());
            }
        }
        Ok(())
    }

    /// Remove every top-level entry of `root` except the metadata directory.
    /// Returns the number of entries removed.
    pub fn clean(&self, root: &Path) -> WorktreeResult<usize> {
        let listing = fs::read_dir(root).map_err(|e| WorktreeError::io(root, e))?;
        let mut removed = 0;
        for item in listing {
            let item = item.map_err(|e| WorktreeError::io(root, e))?;
            if item.file_name() == METADATA_DIR {
                continue;
            }
            let path = item.path();
            let file_type = item.file_type().map_err(|e| WorktreeError::io(&path, e))?;
            if file_type.is_dir() {
                fs::remove_dir_all(&path).map_err(|e| WorktreeError::io(&path, e))?;
            } else {
                fs::remove_file(&path).map_err(|e| WorktreeError::io(&path, e))?;
            }
            debug!(path = %path.display(), "removed");
            removed += 1;
        }
        Ok(removed)
    }

    fn restore(
        &self,
        tree_id: &ObjectId,
        dir: &Path,
        depth: usize,
        report: &mut CheckoutReport,
    ) -> WorktreeResult<()> {
        self.check_depth(dir, depth)?;
        let tree = self.store.get_tree(tree_id)?;
        for entry in &tree.entries {
            if is_metadata_entry(entry, depth) {
                debug!(tree = %tree_id, "skipping snapshotted metadata directory");
                continue;
            }
            check_entry_name(tree_id, entry)?;
            let path = dir.join(&entry.name);
            if entry.is_tree() {
                fs::create_dir_all(&path).map_err(|e| WorktreeError::io(&path, e))?;
                report.directories += 1;
                self.restore(&entry.object_id, &path, depth + 1, report)?;
            } else {
                let data = self.store.get(&entry.object_id)?;
                write_file(&path, &data, entry.mode)?;
                report.files += 1;
                debug!(path = %path.display(), blob = %entry.object_id, "restored file");
            }
        }
        Ok(())
    }

    fn check_depth(&self, path: &Path, depth: usize) -> WorktreeResult<()> {
        if depth > self.max_depth {
            return Err(WorktreeError::DepthLimitExceeded {
                path: path.to_path_buf(),
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }
}

/// Trees written by older tools may carry the metadata directory at the
/// root; it is never restored over the live one.
fn is_metadata_entry(entry: &TreeEntry, depth: usize) -> bool {
    depth == 0 && entry.name == METADATA_DIR
}

/// Entry names must stay inside the directory they are restored into.
fn check_entry_name(tree_id: &ObjectId, entry: &TreeEntry) -> WorktreeResult<()> {
    let name = entry.name.as_str();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(WorktreeError::MalformedObject {
            id: *tree_id,
            reason: format!("unsafe entry name {name:?}"),
        });
    }
    Ok(())
}

fn write_file(path: &Path, data: &[u8], mode: EntryMode) -> WorktreeResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| WorktreeError::io(parent, e))?;
    }
    fs::write(path, data).map_err(|e| WorktreeError::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(mode.permissions());
        fs::set_permissions(path, permissions).map_err(|e| WorktreeError::io(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}
