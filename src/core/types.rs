//! core::types
//!
//! Strong types for values the write path sends to the host.
//!
//! # Types
//!
//! - [`BranchName`] - Validated Git branch name
//! - [`RepoPath`] - Validated repository-relative file path
//!
//! Both enforce validity at construction time, so a proposal can be rejected
//! with `InvalidInput` before any host call is made.
//!
//! # Examples
//!
//! ```
//! use brevoza::core::types::{BranchName, RepoPath};
//!
//! let branch = BranchName::new("add-posts-item-1700000000000").unwrap();
//! let path = RepoPath::new("posts/hello.json").unwrap();
//! assert_eq!(path.extension(), Some("json"));
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(RepoPath::new("../escape.json").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty or exactly `@`
/// - Cannot start with `.` or `-`, or end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, ASCII control characters, or any of
///   ` ~^:\?*[`
/// - No path component may start with `.` or end with `.lock`
///
/// # Example
///
/// ```
/// use brevoza::core::types::BranchName;
///
/// let name = BranchName::new("proposals/posts-hello").unwrap();
/// assert_eq!(name.as_str(), "proposals/posts-hello");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let reject = |reason: &str| Err(TypeError::InvalidBranchName(reason.to_string()));

        if name.is_empty() {
            return reject("branch name cannot be empty");
        }
        if name == "@" {
            return reject("branch name cannot be '@' (reserved)");
        }
        if let Some(c) = name.chars().next().filter(|c| *c == '.' || *c == '-') {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot start with '{c}'"
            )));
        }
        if name.ends_with('/') {
            return reject("branch name cannot end with '/'");
        }
        for seq in ["..", "@{", "//"] {
            if name.contains(seq) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{seq}'"
                )));
            }
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot contain '{c}'"
            )));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return reject("branch name cannot contain control characters");
        }

        for component in name.split('/') {
            if component.starts_with('.') {
                return reject("path component cannot start with '.'");
            }
            if component.ends_with(".lock") {
                return reject("path component cannot end with '.lock'");
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository-relative path to a file.
///
/// Rules:
/// - Cannot be empty, start with `/`, or end with `/`
/// - No empty, `.` or `..` components
/// - No ASCII control characters or backslashes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Create a new validated path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` if the path is not a plain relative file path.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        Self::validate(&path)?;
        Ok(Self(path))
    }

    fn validate(path: &str) -> Result<(), TypeError> {
        let reject = |reason: String| Err(TypeError::InvalidPath(reason));

        if path.trim().is_empty() {
            return reject("path cannot be empty".into());
        }
        if path.starts_with('/') {
            return reject(format!("'{}' must be relative to the repository root", path));
        }
        if path.ends_with('/') {
            return reject(format!("'{}' names a directory, not a file", path));
        }
        if path.contains('\\') || path.chars().any(|c| c.is_ascii_control()) {
            return reject(format!("'{}' contains invalid characters", path));
        }
        if path
            .split('/')
            .any(|component| component.is_empty() || component == "." || component == "..")
        {
            return reject(format!("'{}' contains an empty, '.' or '..' component", path));
        }
        Ok(())
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Extension of the final component, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }
}

impl TryFrom<String> for RepoPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.0
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
