use serde::{Deserialize, Serialize};
use mygit_crypto::ContentHasher;
use mygit_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
///
/// Payloads carry no type header, so the kind is a property of how an
/// object is referenced (tree entry type, commit `tree` line) rather than of
/// the stored bytes. [`ObjectKind::detect`] recovers a best guess from the
/// payload alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Raw file content.
    Blob,
    /// Directory listing.
    Tree,
    /// Commit record.
    Commit,
}

impl ObjectKind {
    /// The keyword used in tree lines and `cat-file -t` output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    /// Guess the kind of a payload.
    ///
    /// A payload whose first line is `tree <fingerprint>` is a commit; a
    /// non-empty payload whose every line parses as a tree entry is a tree;
    /// anything else (including the empty payload) is a blob.
    pub fn detect(payload: &[u8]) -> Self {
        let Ok(text) = std::str::from_utf8(payload) else {
            return Self::Blob;
        };
        let first = text.lines().next().unwrap_or("");
        if let Some(rest) = first.strip_prefix("tree ") {
            if ObjectId::is_valid_hex(rest.trim_end()) {
                return Self::Commit;
            }
        }
        if !text.is_empty() && text.lines().all(|line| TreeEntry::parse_line(line).is_ok()) {
            return Self::Tree;
        }
        Self::Blob
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (100644).
    Regular,
    /// Executable file (100755).
    Executable,
    /// Subtree / directory (040000).
    Directory,
}

impl EntryMode {
    /// Octal mode value.
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Directory => 0o040000,
        }
    }

    /// Parse from an octal mode value.
    pub fn from_mode_bits(bits: u32) -> Option<Self> {
        match bits {
            0o100644 => Some(Self::Regular),
            0o100755 => Some(Self::Executable),
            0o040000 => Some(Self::Directory),
            _ => None,
        }
    }

    /// Parse the six-digit form used in tree lines (`100644`, `040000`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 6 {
            return None;
        }
        u32::from_str_radix(s, 8).ok().and_then(Self::from_mode_bits)
    }

    /// The object kind an entry with this mode must reference.
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::Directory => ObjectKind::Tree,
            Self::Regular | Self::Executable => ObjectKind::Blob,
        }
    }

    /// Permission bits applied to a restored file.
    pub fn permissions(&self) -> u32 {
        match self {
            Self::Executable => 0o755,
            Self::Regular => 0o644,
            Self::Directory => 0o755,
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File mode (regular, executable, directory).
    pub mode: EntryMode,
    /// Entry name (filename or directory name).
    pub name: String,
    /// Fingerprint of the referenced blob or tree.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }

    /// The kind of the referenced object.
    pub fn kind(&self) -> ObjectKind {
        self.mode.object_kind()
    }

    /// Returns `true` if this entry references a subtree.
    pub fn is_tree(&self) -> bool {
        self.mode == EntryMode::Directory
    }

    /// Render as `<mode> <type> <fingerprint> <name>` (no newline).
    pub fn to_line(&self) -> String {
        format!("{} {} {} {}", self.mode, self.kind(), self.object_id, self.name)
    }

    /// Parse one tree line. The name is everything after the third space, so
    /// names containing spaces survive.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let mut fields = line.splitn(4, ' ');
        let (Some(mode), Some(kind), Some(id), Some(name)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(format!("expected 4 fields in tree line {line:?}"));
        };
        let mode = EntryMode::parse(mode).ok_or_else(|| format!("unknown mode {mode:?}"))?;
        if kind != mode.object_kind().as_str() {
            return Err(format!("type {kind:?} does not match mode {mode}"));
        }
        let object_id = ObjectId::from_hex(id).map_err(|e| e.to_string())?;
        if name.is_empty() {
            return Err("empty entry name".into());
        }
        Ok(Self::new(mode, name, object_id))
    }
}

/// Directory listing object.
///
/// Entry order is part of the object's identity: the builder decides it
/// (sorted or filesystem order) and `Tree` preserves it exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a tree with the given entries, in the given order.
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    /// Create a tree with entries sorted by name (byte order).
    pub fn sorted(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serialize to the stored payload: one newline-terminated line per entry.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.to_line());
            out.push('\n');
        }
        out.into_bytes()
    }

    /// Decode a stored payload. `id` is only used for error reporting.
    pub fn parse(id: &ObjectId, data: &[u8]) -> StoreResult<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| StoreError::malformed(*id, format!("tree is not UTF-8: {e}")))?;
        let entries = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| TreeEntry::parse_line(line).map_err(|reason| StoreError::malformed(*id, reason)))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Fingerprint of the serialized tree.
    pub fn compute_id(&self) -> ObjectId {
        ContentHasher::hash(&self.to_bytes())
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
