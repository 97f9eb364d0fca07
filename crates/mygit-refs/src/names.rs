//! Ref name validation.
//!
//! Ref names become file paths under the metadata directory, so validation
//! doubles as path-escape prevention. A full ref name starts with `refs/`;
//! the part after that follows git-style branch naming:
//! - Must be non-empty
//! - Must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - Must not contain `..` or `@{`
//! - Must not start or end with `/`, or end with `.lock`
//! - Components between slashes must be non-empty and not start with `.`

use crate::error::{RefError, Result};

/// Characters that are forbidden anywhere in a ref name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

fn invalid(name: &str, reason: impl Into<String>) -> RefError {
    RefError::InvalidRefName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a short branch name such as `main` or `feature/auth`.
///
/// # Examples
///
/// ```
/// use mygit_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("feature/auth").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("../escape").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "must not be empty"));
    }
    if let Some(ch) = FORBIDDEN_CHARS.iter().find(|ch| name.contains(**ch)) {
        return Err(invalid(name, format!("contains forbidden character {ch:?}")));
    }
    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }
    if name.contains("@{") {
        return Err(invalid(name, "must not contain '@{'"));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(invalid(name, "must not start or end with '/'"));
    }
    if name.ends_with(".lock") || name.ends_with('.') {
        return Err(invalid(name, "must not end with '.' or '.lock'"));
    }
    for component in name.split('/') {
        if component.is_empty() {
            return Err(invalid(name, "path components must not be empty"));
        }
        if component.starts_with('.') {
            return Err(invalid(
                name,
                format!("component must not start with '.': {component:?}"),
            ));
        }
    }
    Ok(())
}

/// Validate a full ref name such as `refs/heads/main`.
pub fn validate_ref_name(name: &str) -> Result<()> {
    let Some(rest) = name.strip_prefix("refs/") else {
        return Err(invalid(name, "must start with 'refs/'"));
    };
    validate_branch_name(rest).map_err(|err| match err {
        RefError::InvalidRefName { reason, .. } => invalid(name, reason),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_branch_name("main").is_ok());
        assert!(validate_branch_name("v1.0").is_ok());
        assert!(validate_branch_name("feature/deep/nested").is_ok());
        assert!(validate_ref_name("refs/heads/main").is_ok());
        assert!(validate_ref_name("refs/tags/v1").is_ok());
    }

    #[test]
    fn reject_missing_refs_prefix() {
        assert!(validate_ref_name("heads/main").is_err());
        assert!(validate_ref_name("HEAD").is_err());
        assert!(validate_ref_name("refs/").is_err());
    }

    #[test]
    fn reject_path_escape() {
        assert!(validate_ref_name("refs/../HEAD").is_err());
        assert!(validate_ref_name("refs/heads/../../objects").is_err());
        assert!(validate_ref_name("refs//heads").is_err());
        assert!(validate_ref_name("refs/heads/.hidden").is_err());
    }

    #[test]
    fn reject_forbidden_chars() {
        for bad in ["a b", "a~b", "a^b", "a:b", "a?b", "a*b", "a[b", "a\\b", "a\nb"] {
            assert!(validate_branch_name(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn reject_suffixes() {
        assert!(validate_branch_name("main.lock").is_err());
        assert!(validate_branch_name("trailing.").is_err());
        assert!(validate_branch_name("trailing/").is_err());
        assert!(validate_branch_name("ref@{0}").is_err());
    }

    #[test]
    fn error_names_the_full_ref() {
        let err = validate_ref_name("refs/heads/a..b").unwrap_err();
        assert!(err.to_string().contains("refs/heads/a..b"));
    }
}
