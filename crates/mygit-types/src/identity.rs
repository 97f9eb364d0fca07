use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The person recorded on a commit's `Committer` line.
///
/// Rendered as `name <email>`. Neither part may contain a newline, and the
/// name may not contain angle brackets, so that the rendered form parses back
/// unambiguously.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

impl Committer {
    /// Create a committer, validating both fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty()
            || name.contains(['\n', '\r', '<', '>'])
            || email.contains(['\n', '\r', '<', '>'])
        {
            return Err(TypeError::InvalidIdentity(format!("{name} <{email}>")));
        }
        Ok(Self { name, email })
    }

    /// Parse the `name <email>` form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidIdentity(s.to_string());
        let s = s.trim_end();
        let open = s.rfind('<').ok_or_else(invalid)?;
        let email = s[open + 1..].strip_suffix('>').ok_or_else(invalid)?;
        let name = s[..open].trim_end();
        Self::new(name, email)
    }
}

impl fmt::Display for Committer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
