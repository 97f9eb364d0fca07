//! Repository settings from `.mygit/config.toml` and the environment.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::FixedOffset;
use mygit_types::{parse_utc_offset, Committer};
use mygit_worktree::{EntryOrder, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Overrides the committer name from any config file.
pub const ENV_COMMITTER_NAME: &str = "MYGIT_COMMITTER_NAME";
/// Overrides the committer email from any config file.
pub const ENV_COMMITTER_EMAIL: &str = "MYGIT_COMMITTER_EMAIL";

const FALLBACK_NAME: &str = "Unknown User";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    pub committer: CommitterSettings,
    pub commit: CommitSettings,
    pub tree: TreeSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitterSettings {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitSettings {
    /// Offset written on the `Timestamp` line, `+HHMM`.
    pub utc_offset: String,
}

impl Default for CommitSettings {
    fn default() -> Self {
        Self {
            utc_offset: "+0530".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeSettings {
    pub order: EntryOrder,
    pub max_depth: usize,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            order: EntryOrder::Sorted,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RepoConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(SdkError::io(path, e)),
        };
        Self::from_toml_str(&text)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))?;
        config.utc_offset()?;
        if config.tree.max_depth == 0 {
            return Err(SdkError::Config("tree.max_depth must be at least 1".into()));
        }
        Ok(config)
    }

    /// The fixed offset for new commit timestamps.
    pub fn utc_offset(&self) -> SdkResult<FixedOffset> {
        parse_utc_offset(&self.commit.utc_offset)
            .map_err(|e| SdkError::Config(format!("commit.utc_offset: {e}")))
    }

    /// The committer for new commits, reading overrides from the process
    /// environment.
    pub fn committer(&self) -> SdkResult<Committer> {
        self.committer_with(|key| std::env::var(key).ok())
    }

    /// The committer for new commits with an explicit variable lookup.
    ///
    /// Name: `MYGIT_COMMITTER_NAME`, then `committer.name`, then `$USER` /
    /// `$USERNAME`, then `Unknown User`. Email: `MYGIT_COMMITTER_EMAIL`,
    /// then `committer.email`, then `<name>@localhost`.
    pub fn committer_with(&self, lookup: impl Fn(&str) -> Option<String>) -> SdkResult<Committer> {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let name = non_blank(lookup(ENV_COMMITTER_NAME))
            .or_else(|| non_blank(self.committer.name.clone()))
            .or_else(|| non_blank(lookup("USER")))
            .or_else(|| non_blank(lookup("USERNAME")))
            .unwrap_or_else(|| FALLBACK_NAME.to_string());
        let email = non_blank(lookup(ENV_COMMITTER_EMAIL))
            .or_else(|| non_blank(self.committer.email.clone()))
            .unwrap_or_else(|| format!("{}@localhost", name.replace(' ', ".")));
        Committer::new(name, email).map_err(|e| SdkError::Config(e.to_string()))
    }
}
