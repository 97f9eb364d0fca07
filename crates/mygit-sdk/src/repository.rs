use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mygit_crypto::ContentHasher;
use mygit_graph::CommitGraph;
use mygit_index::{LedgerEntry, StagingLedger};
use mygit_refs::{FileRefStore, Head, RefStore};
use mygit_store::{LooseObjectStore, ObjectKind, ObjectStore, Tree};
use mygit_types::ObjectId;
use mygit_worktree::{CheckoutEngine, CheckoutReport, TreeBuilder};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};
use crate::layout::RepoLayout;
use crate::report::{CatMode, CatOutput, CommitOutcome, InitReport, LogEntry};

/// An opened repository: the context every operation runs against.
#[derive(Debug)]
pub struct Repository {
    layout: RepoLayout,
    config: RepoConfig,
    store: Arc<LooseObjectStore>,
    refs: FileRefStore,
    ledger: StagingLedger,
}

impl Repository {
    /// Create `.mygit` under `root`, or fill in whatever pieces of an
    /// existing one are missing, then open it.
    pub fn init(root: impl AsRef<Path>) -> SdkResult<(Self, InitReport)> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|e| SdkError::io(root, e))?;
        let root = fs::canonicalize(root).map_err(|e| SdkError::io(root, e))?;
        let layout = RepoLayout::new(&root);
        let reinitialized = layout.meta_dir().is_dir();
        let mut created = Vec::new();

        for (label, dir) in [
            (".mygit", layout.meta_dir()),
            ("objects", layout.objects_dir()),
            ("refs", layout.refs_dir()),
        ] {
            if !dir.is_dir() {
                fs::create_dir_all(&dir).map_err(|e| SdkError::io(&dir, e))?;
                created.push(label.to_string());
            }
        }

        let head = layout.head_file();
        if !head.is_file() {
            FileRefStore::new(layout.meta_dir()).set_head(&Head::initial())?;
            created.push("HEAD".to_string());
        }

        let index = layout.index_file();
        if !index.is_file() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&index)
                .map_err(|e| SdkError::io(&index, e))?;
            created.push("index".to_string());
        }

        info!(root = %root.display(), reinitialized, created = created.len(), "initialized repository");
        let repo = Self::open(&root)?;
        Ok((
            repo,
            InitReport {
                root,
                reinitialized,
                created,
            },
        ))
    }

    /// Open the repository whose working directory is `root`.
    pub fn open(root: impl AsRef<Path>) -> SdkResult<Self> {
        let root = root.as_ref();
        let root = fs::canonicalize(root).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SdkError::NotInitialized(root.to_path_buf()),
            _ => SdkError::io(root, e),
        })?;
        let layout = RepoLayout::new(root);
        if !layout.meta_dir().is_dir() {
            return Err(SdkError::NotInitialized(layout.root().to_path_buf()));
        }
        let config = RepoConfig::load(&layout.config_file())?;
        debug!(root = %layout.root().display(), ?config, "opened repository");
        Ok(Self {
            store: Arc::new(LooseObjectStore::new(layout.objects_dir())),
            refs: FileRefStore::new(layout.meta_dir()),
            ledger: StagingLedger::open(layout.index_file()),
            layout,
            config,
        })
    }

    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// The object store, for callers that need raw access.
    pub fn store(&self) -> &LooseObjectStore {
        &self.store
    }

    // ---- Content operations ----

    /// Fingerprint a file, storing it as a blob when `write` is set.
    pub fn hash_object(&self, path: impl AsRef<Path>, write: bool) -> SdkResult<ObjectId> {
        let path = self.resolve_path(path.as_ref());
        if write {
            let data = fs::read(&path).map_err(|e| SdkError::io(&path, e))?;
            Ok(self.store.put(&data)?)
        } else {
            let file = fs::File::open(&path).map_err(|e| SdkError::io(&path, e))?;
            ContentHasher::hash_reader(file).map_err(|e| SdkError::io(&path, e))
        }
    }

    /// Snapshot the working directory into tree objects.
    pub fn write_tree(&self) -> SdkResult<ObjectId> {
        Ok(self.tree_builder().build(self.layout.root())?)
    }

    /// Decode a tree object.
    pub fn ls_tree(&self, id: &ObjectId) -> SdkResult<Tree> {
        Ok(self.store.get_tree(id)?)
    }

    /// Inspect any object.
    pub fn cat_file(&self, mode: CatMode, id: &ObjectId) -> SdkResult<CatOutput> {
        Ok(match mode {
            CatMode::Pretty => CatOutput::Pretty(self.store.get(id)?),
            CatMode::Size => CatOutput::Size(self.store.stored_size(id)?),
            CatMode::Type => CatOutput::Type(ObjectKind::detect(&self.store.get(id)?)),
        })
    }

    // ---- Staging ----

    /// Store each file (directories recursively) as a blob and record it in
    /// the staging ledger. Relative paths are taken from the repository root.
    pub fn stage<P: AsRef<Path>>(&self, paths: &[P]) -> SdkResult<Vec<LedgerEntry>> {
        let mut staged = Vec::new();
        for path in paths {
            let path = self.resolve_path(path.as_ref());
            let meta = fs::symlink_metadata(&path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => SdkError::invalid_path(&path, "no such file or directory"),
                _ => SdkError::io(&path, e),
            })?;
            if !meta.is_file() && !meta.is_dir() {
                return Err(SdkError::invalid_path(&path, "not a regular file or directory"));
            }
            let path = fs::canonicalize(&path).map_err(|e| SdkError::io(&path, e))?;
            if path.starts_with(self.layout.meta_dir()) {
                return Err(SdkError::invalid_path(&path, "inside the metadata directory"));
            }
            if meta.is_file() {
                staged.push(self.stage_file(&path)?);
            } else {
                self.stage_dir(&path, &mut staged)?;
            }
        }
        self.ledger.append(&staged)?;
        info!(count = staged.len(), "staged files");
        Ok(staged)
    }

    fn stage_dir(&self, dir: &Path, staged: &mut Vec<LedgerEntry>) -> SdkResult<()> {
        let meta_dir = self.layout.meta_dir();
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.path() != meta_dir);
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                match e.into_io_error() {
                    Some(source) => SdkError::io(path, source),
                    None => SdkError::invalid_path(path, "filesystem loop"),
                }
            })?;
            if entry.file_type().is_file() {
                staged.push(self.stage_file(entry.path())?);
            }
        }
        Ok(())
    }

    fn stage_file(&self, path: &Path) -> SdkResult<LedgerEntry> {
        let name = self
            .layout
            .relative_name(path)
            .ok_or_else(|| SdkError::invalid_path(path, "outside the working directory"))?;
        let data = fs::read(path).map_err(|e| SdkError::io(path, e))?;
        let id = self.store.put(&data)?;
        debug!(blob = %id, path = %name, "staged");
        Ok(LedgerEntry::new(id, name))
    }

    /// Currently staged files, one per path.
    pub fn staged(&self) -> SdkResult<Vec<LedgerEntry>> {
        Ok(self.ledger.latest()?)
    }

    // ---- History ----

    /// Snapshot the working directory and record it as a commit on top of
    /// HEAD. Requires something staged; clears the ledger afterwards.
    ///
    /// The tree is built from the live working directory, not from the
    /// ledger: staging gates a commit but does not select its contents.
    pub fn commit(&self, message: &str) -> SdkResult<CommitOutcome> {
        let staged = self.ledger.entries()?;
        if staged.is_empty() {
            return Err(SdkError::NothingStaged);
        }
        let parent = self.refs.resolve_head()?;
        let tree = self.write_tree()?;
        let graph = self.commit_graph()?;
        let id = graph.commit(message, tree, parent)?;
        self.refs.set_head(&Head::Direct(id))?;
        self.ledger.clear()?;

        let commit = graph.read_commit(&id)?;
        info!(commit = %id, staged = staged.len(), "committed");
        Ok(CommitOutcome {
            id,
            tree,
            parent,
            message: commit.message,
            staged: staged.len(),
        })
    }

    /// Replace the working directory with commit `id` and point HEAD at it.
    pub fn checkout(&self, id: &ObjectId) -> SdkResult<CheckoutReport> {
        let report = self.checkout_engine().checkout(self.layout.root(), id)?;
        self.refs.set_head(&Head::Direct(*id))?;
        info!(commit = %id, files = report.files, "HEAD moved");
        Ok(report)
    }

    /// History from HEAD back to the root commit, newest first. Empty when
    /// nothing has been committed.
    pub fn log(&self) -> SdkResult<Vec<LogEntry>> {
        let Some(start) = self.refs.resolve_head()? else {
            return Ok(Vec::new());
        };
        let graph = self.commit_graph()?;
        let mut entries = Vec::new();
        for item in graph.history(start) {
            let (id, commit) = item?;
            entries.push(LogEntry { id, commit });
        }
        Ok(entries)
    }

    /// The raw HEAD pointer.
    pub fn head(&self) -> SdkResult<Option<Head>> {
        Ok(self.refs.head()?)
    }

    /// The commit HEAD designates, if any.
    pub fn head_commit(&self) -> SdkResult<Option<ObjectId>> {
        Ok(self.refs.resolve_head()?)
    }

    // ---- Wiring ----

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.layout.root().join(path)
        }
    }

    fn tree_builder(&self) -> TreeBuilder {
        TreeBuilder::new(self.store.clone())
            .with_order(self.config.tree.order)
            .with_max_depth(self.config.tree.max_depth)
    }

    fn checkout_engine(&self) -> CheckoutEngine {
        CheckoutEngine::new(self.store.clone()).with_max_depth(self.config.tree.max_depth)
    }

    fn commit_graph(&self) -> SdkResult<CommitGraph> {
        Ok(CommitGraph::new(
            self.store.clone(),
            self.config.committer()?,
            self.config.utc_offset()?,
        ))
    }
}
