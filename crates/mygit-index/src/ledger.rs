//! The ledger file.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::entry::LedgerEntry;
use crate::error::{IndexError, IndexResult};

/// Append-only staging ledger stored as text lines.
///
/// A missing file reads as an empty ledger.
#[derive(Debug, Clone)]
pub struct StagingLedger {
    path: PathBuf,
}

impl StagingLedger {
    /// Open the ledger at `path`. The file is not touched until used.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> IndexError {
        IndexError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Append entries, one line each, in the given order.
    pub fn append(&self, entries: &[LedgerEntry]) -> IndexResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut buf = String::new();
        for entry in entries {
            if entry.path.contains(['\n', '\r']) {
                return Err(IndexError::InvalidPath(entry.path.clone()));
            }
            buf.push_str(&entry.to_string());
            buf.push('\n');
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        file.write_all(buf.as_bytes()).map_err(|e| self.io_err(e))?;
        debug!(count = entries.len(), "appended ledger entries");
        Ok(())
    }

    /// Every recorded entry in file order. Blank lines are skipped.
    pub fn entries(&self) -> IndexResult<Vec<LedgerEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                LedgerEntry::parse_line(line).map_err(|reason| IndexError::MalformedLine {
                    line_no: i + 1,
                    reason,
                })
            })
            .collect()
    }

    /// One entry per path, the last write winning, ordered by path.
    pub fn latest(&self) -> IndexResult<Vec<LedgerEntry>> {
        let mut by_path = BTreeMap::new();
        for entry in self.entries()? {
            by_path.insert(entry.path.clone(), entry);
        }
        Ok(by_path.into_values().collect())
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.entries()?.is_empty())
    }

    /// Truncate the ledger to zero length.
    pub fn clear(&self) -> IndexResult<()> {
        fs::write(&self.path, b"").map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), "cleared ledger");
        Ok(())
    }
}
