//! core::error
//!
//! Error taxonomy returned across the core boundary.
//!
//! Every failure carries a stable [`ErrorKind`] plus a human-readable
//! message. Per-item fetch failures are not errors at this level; they are
//! recorded on the affected `ItemFile`.

use serde::Serialize;
use thiserror::Error;

use super::types::TypeError;
use crate::forge::ForgeError;

/// Stable classification of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    UpstreamFailure,
}

impl ErrorKind {
    /// Stable lowercase name, suitable for machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::UpstreamFailure => "upstream_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Config, collection, schema, directory, file, or change request absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Branch/file/change request already exists, or the host blocked a merge.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A required parameter is missing or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The host call itself failed (auth, rate limit, transport, server error).
    #[error("upstream failure: {0}")]
    UpstreamFailure(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound(_) => ErrorKind::NotFound,
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
        }
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            CoreError::NotFound(m)
            | CoreError::Conflict(m)
            | CoreError::InvalidInput(m)
            | CoreError::UpstreamFailure(m) => m,
        }
    }
}

impl From<ForgeError> for CoreError {
    fn from(err: ForgeError) -> Self {
        match err {
            ForgeError::NotFound(m) => CoreError::NotFound(m),
            ForgeError::NotADirectory(path) => {
                CoreError::NotFound(format!("'{}' is not a directory", path))
            }
            ForgeError::Conflict(m) => CoreError::Conflict(m),
            other => CoreError::UpstreamFailure(other.to_string()),
        }
    }
}

impl From<TypeError> for CoreError {
    fn from(err: TypeError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}

/// Reject an empty (or whitespace-only) required parameter.
pub fn require_non_empty(name: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::InvalidInput(format!("{} is required", name)))
    } else {
        Ok(())
    }
}
