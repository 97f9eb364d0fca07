//! Filesystem reference store rooted at the metadata directory.
//!
//! HEAD lives at `<meta>/HEAD`; a ref named `refs/heads/main` lives at
//! `<meta>/refs/heads/main`. Both hold a single line.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use mygit_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::Head;

/// [`RefStore`] backed by plain files under the metadata directory.
#[derive(Debug, Clone)]
pub struct FileRefStore {
    meta_dir: PathBuf,
}

impl FileRefStore {
    /// Create a store over an existing metadata directory.
    pub fn new(meta_dir: impl Into<PathBuf>) -> Self {
        Self {
            meta_dir: meta_dir.into(),
        }
    }

    /// Path of the HEAD file.
    pub fn head_path(&self) -> PathBuf {
        self.meta_dir.join("HEAD")
    }

    /// Path of a (validated) ref file.
    pub fn ref_path(&self, name: &str) -> Result<PathBuf> {
        validate_ref_name(name)?;
        Ok(name.split('/').fold(self.meta_dir.clone(), |path, part| path.join(part)))
    }

    fn read_optional(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RefError::io(path, e)),
        }
    }

    fn write_replace(path: &Path, contents: &str) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| RefError::io(path, ErrorKind::InvalidInput.into()))?;
        fs::create_dir_all(dir).map_err(|e| RefError::io(dir, e))?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RefError::io(dir, e))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| RefError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| RefError::io(path, e.error))?;
        Ok(())
    }
}

impl RefStore for FileRefStore {
    fn head(&self) -> Result<Option<Head>> {
        Self::read_optional(&self.head_path())?
            .map(|contents| Head::parse(&contents))
            .transpose()
    }

    fn set_head(&self, head: &Head) -> Result<()> {
        if let Head::Symbolic(name) = head {
            validate_ref_name(name)?;
        }
        Self::write_replace(&self.head_path(), &head.to_file_contents())?;
        debug!(%head, "updated HEAD");
        Ok(())
    }

    fn read_ref(&self, name: &str) -> Result<Option<ObjectId>> {
        let path = self.ref_path(name)?;
        let Some(contents) = Self::read_optional(&path)? else {
            return Ok(None);
        };
        ObjectId::from_hex(contents.trim())
            .map(Some)
            .map_err(|e| RefError::MalformedRef {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }
}
