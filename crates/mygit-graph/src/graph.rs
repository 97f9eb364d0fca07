//! Writing commits and walking history.

use std::sync::Arc;

use chrono::FixedOffset;
use mygit_store::ObjectStore;
use mygit_types::{CommitTimestamp, Committer, ObjectId};
use tracing::{debug, info};

use crate::commit::Commit;
use crate::error::GraphResult;

/// Commit writer and reader over an object store.
///
/// Carries the committer identity and the UTC offset stamped onto new
/// commits.
pub struct CommitGraph {
    store: Arc<dyn ObjectStore>,
    committer: Committer,
    offset: FixedOffset,
}

impl std::fmt::Debug for CommitGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitGraph")
            .field("committer", &self.committer)
            .field("offset", &self.offset)
            .finish()
    }
}

impl CommitGraph {
    /// Create a graph writing commits as `committer` in `offset`.
    pub fn new(store: Arc<dyn ObjectStore>, committer: Committer, offset: FixedOffset) -> Self {
        Self {
            store,
            committer,
            offset,
        }
    }

    /// The identity stamped onto new commits.
    pub fn committer(&self) -> &Committer {
        &self.committer
    }

    /// Create and persist a commit of `tree` on top of `parent`, stamped with
    /// the current time.
    pub fn commit(
        &self,
        message: &str,
        tree: ObjectId,
        parent: Option<ObjectId>,
    ) -> GraphResult<ObjectId> {
        let record = Commit::new(
            tree,
            parent,
            self.committer.clone(),
            CommitTimestamp::now(self.offset),
            message,
        );
        let id = self.write_commit(&record)?;
        info!(commit = %id, tree = %tree, root = record.is_root(), "created commit");
        Ok(id)
    }

    /// Persist an already-built commit record.
    pub fn write_commit(&self, commit: &Commit) -> GraphResult<ObjectId> {
        let id = self.store.put(&commit.to_bytes())?;
        debug!(commit = %id, "wrote commit object");
        Ok(id)
    }

    /// Read and decode a commit.
    pub fn read_commit(&self, id: &ObjectId) -> GraphResult<Commit> {
        let data = self.store.get(id)?;
        Commit::parse(id, &data)
    }

    /// Walk the history from `start` back to the root commit.
    pub fn history(&self, start: ObjectId) -> History<'_> {
        History {
            graph: self,
            next: Some(start),
        }
    }
}

/// Iterator over a linear history, newest first.
///
/// Yields an error (and then stops) if a commit or parent cannot be read.
#[derive(Debug)]
pub struct History<'a> {
    graph: &'a CommitGraph,
    next: Option<ObjectId>,
}

impl Iterator for History<'_> {
    type Item = GraphResult<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.graph.read_commit(&id) {
            Ok(commit) => {
                self.next = commit.parent;
                Some(Ok((id, commit)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
