//! Paths of a repository's metadata.

use std::path::{Component, Path, PathBuf};

use mygit_worktree::METADATA_DIR;

/// Where everything lives, derived from the working directory root.
///
/// ```text
/// <root>/.mygit/
///   objects/      loose objects, sharded by the first two hex characters
///   refs/         branch files
///   HEAD          "ref: refs/heads/main" or a fingerprint
///   index         staging ledger
///   config.toml   optional settings
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The working directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.meta_dir().join("objects")
    }

    pub fn refs_dir(&self) -> PathBuf {
        self.meta_dir().join("refs")
    }

    pub fn head_file(&self) -> PathBuf {
        self.meta_dir().join("HEAD")
    }

    pub fn index_file(&self) -> PathBuf {
        self.meta_dir().join("index")
    }

    pub fn config_file(&self) -> PathBuf {
        self.meta_dir().join("config.toml")
    }

    /// Render `path` (inside the root) as a `/`-separated relative path.
    ///
    /// Returns `None` if the path is outside the root, is the root itself,
    /// lies inside the metadata directory, or is not valid UTF-8.
    pub fn relative_name(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                _ => return None,
            }
        }
        if parts.is_empty() || parts[0] == METADATA_DIR {
            return None;
        }
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_paths() {
        let layout = RepoLayout::new("/work");
        assert_eq!(layout.objects_dir(), PathBuf::from("/work/.mygit/objects"));
        assert_eq!(layout.head_file(), PathBuf::from("/work/.mygit/HEAD"));
        assert_eq!(layout.index_file(), PathBuf::from("/work/.mygit/index"));
        assert_eq!(layout.config_file(), PathBuf::from("/work/.mygit/config.toml"));
    }

    #[test]
    fn relative_names() {
        let layout = RepoLayout::new("/work");
        assert_eq!(
            layout.relative_name(Path::new("/work/src/main.rs")).as_deref(),
            Some("src/main.rs")
        );
        assert_eq!(layout.relative_name(Path::new("/work")), None);
        assert_eq!(layout.relative_name(Path::new("/elsewhere/a")), None);
        assert_eq!(layout.relative_name(Path::new("/work/.mygit/HEAD")), None);
    }
}
