//! forge::traits
//!
//! Forge trait definition for the remote repository host.
//!
//! # Design
//!
//! The `Forge` trait is async because every operation is network I/O.
//! Owner and repository are passed explicitly on every call through
//! [`RepoRef`]; a forge instance holds credentials and transport only, so a
//! single instance serves any number of repositories.
//!
//! The trait is deliberately narrow. It exposes exactly the capabilities the
//! read path (file content, directory listings) and the write path (refs,
//! file creation, change requests) need, nothing more.
//!
//! # Example
//!
//! ```ignore
//! use brevoza::forge::{Forge, RepoRef};
//!
//! async fn head(forge: &dyn Forge) -> Result<String, ForgeError> {
//!     let repo = RepoRef::new("octocat", "site");
//!     forge.get_branch_head(&repo, "main").await
//! }
//! ```

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A directory listing was requested for a path that is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The resource already exists, or the host refused the state transition.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The operation is not supported by this forge.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

/// Identifies a repository on the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    /// Account or organization owning the repository
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// A single entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    /// Entry name (last path component)
    pub name: String,
    /// Repository-relative path
    pub path: String,
    /// Entry kind
    pub kind: EntryKind,
}

/// Request to create a new file on a branch.
#[derive(Debug, Clone)]
pub struct CreateFileRequest {
    /// Branch receiving the commit
    pub branch: String,
    /// Repository-relative path of the new file
    pub path: String,
    /// Raw file content
    pub content: Vec<u8>,
    /// Commit message
    pub message: String,
}

/// Request to open a change request (pull request).
#[derive(Debug, Clone)]
pub struct CreatePrRequest {
    /// Head branch name (the branch with changes)
    pub head: String,
    /// Base branch name (the branch to merge into)
    pub base: String,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
}

/// PR state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open and awaiting review/merge
    Open,
    /// PR is closed without being merged
    Closed,
    /// PR has been merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrState::Open => write!(f, "open"),
            PrState::Closed => write!(f, "closed"),
            PrState::Merged => write!(f, "merged"),
        }
    }
}

/// State filter for listing change requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrStateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl PrStateFilter {
    /// Query-string value understood by the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStateFilter::Open => "open",
            PrStateFilter::Closed => "closed",
            PrStateFilter::All => "all",
        }
    }

    /// Whether a change request in `state` passes this filter.
    ///
    /// Merged requests count as closed, as they do on GitHub.
    pub fn matches(&self, state: PrState) -> bool {
        match self {
            PrStateFilter::Open => state == PrState::Open,
            PrStateFilter::Closed => state != PrState::Open,
            PrStateFilter::All => true,
        }
    }
}

impl std::str::FromStr for PrStateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(PrStateFilter::Open),
            "closed" => Ok(PrStateFilter::Closed),
            "all" => Ok(PrStateFilter::All),
            other => Err(format!(
                "invalid state '{}', must be one of: open, closed, all",
                other
            )),
        }
    }
}

/// Change request information returned from the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR URL (web URL for viewing)
    pub url: String,
    /// PR state (open, closed, merged)
    pub state: PrState,
    /// Head branch name
    pub head: String,
    /// Base branch name
    pub base: String,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
    /// Login of the account that opened the PR
    pub author: Option<String>,
    /// Creation timestamp as reported by the host
    pub created_at: Option<String>,
}

/// Merge method for merging a PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits and merge
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeMethod::Merge => write!(f, "merge"),
            MergeMethod::Squash => write!(f, "squash"),
            MergeMethod::Rebase => write!(f, "rebase"),
        }
    }
}

/// Host answer to a merge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Whether the host actually merged the PR
    pub merged: bool,
    /// Message returned by the host
    pub message: String,
}

/// The Forge trait for interacting with the repository host.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so the read path can fan out
/// content fetches concurrently.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `NotFound`: Resource doesn't exist
/// - `Conflict`: Resource already exists or the transition was refused
/// - `AuthRequired` / `AuthFailed`: Credentials missing or rejected
/// - `RateLimited`, `ApiError`, `NetworkError`: upstream failures
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Read the raw content of the file at `path` on `git_ref`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the path does not exist or is not a file
    async fn get_file_content(
        &self,
        repo: &RepoRef,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<u8>, ForgeError>;

    /// List the entries of the directory at `path` on `git_ref`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the path does not exist
    /// - `NotADirectory` if the path is a file
    async fn list_directory(
        &self,
        repo: &RepoRef,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ForgeError>;

    /// Resolve the head commit of `branch`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the branch doesn't exist
    async fn get_branch_head(&self, repo: &RepoRef, branch: &str) -> Result<String, ForgeError>;

    /// Create `branch` pointing at `from_commit`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the branch already exists
    async fn create_branch(
        &self,
        repo: &RepoRef,
        branch: &str,
        from_commit: &str,
    ) -> Result<(), ForgeError>;

    /// Create a new file, committing it to the request's branch.
    ///
    /// This never updates an existing file.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the path already has content on that branch
    /// - `NotFound` if the branch doesn't exist
    async fn create_file(&self, repo: &RepoRef, request: CreateFileRequest)
        -> Result<(), ForgeError>;

    /// Open a change request from `request.head` into `request.base`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if an equivalent change request already exists
    async fn open_change_request(
        &self,
        repo: &RepoRef,
        request: CreatePrRequest,
    ) -> Result<PullRequest, ForgeError>;

    /// List change requests, newest first.
    async fn list_change_requests(
        &self,
        repo: &RepoRef,
        state: PrStateFilter,
    ) -> Result<Vec<PullRequest>, ForgeError>;

    /// Merge a change request into its base branch.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the PR doesn't exist
    /// - `Conflict` if the host refuses the merge (conflicts, failing checks,
    ///   PR not open)
    async fn merge_change_request(
        &self,
        repo: &RepoRef,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeOutcome, ForgeError>;

    /// Close a change request without merging.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the PR doesn't exist
    /// - `Conflict` if the PR is no longer open
    async fn close_change_request(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<PullRequest, ForgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_state_display() {
        assert_eq!(format!("{}", PrState::Open), "open");
        assert_eq!(format!("{}", PrState::Closed), "closed");
        assert_eq!(format!("{}", PrState::Merged), "merged");
    }

    #[test]
    fn merge_method_default_is_merge() {
        assert_eq!(MergeMethod::default(), MergeMethod::Merge);
        assert_eq!(format!("{}", MergeMethod::Squash), "squash");
    }

    #[test]
    fn state_filter_parse_and_match() {
        assert_eq!("open".parse::<PrStateFilter>(), Ok(PrStateFilter::Open));
        assert_eq!("all".parse::<PrStateFilter>(), Ok(PrStateFilter::All));
        assert!("merged".parse::<PrStateFilter>().is_err());

        assert!(PrStateFilter::Open.matches(PrState::Open));
        assert!(!PrStateFilter::Open.matches(PrState::Merged));
        assert!(PrStateFilter::Closed.matches(PrState::Merged));
        assert!(PrStateFilter::Closed.matches(PrState::Closed));
        assert!(PrStateFilter::All.matches(PrState::Open));
    }

    #[test]
    fn repo_ref_display() {
        assert_eq!(RepoRef::new("octocat", "site").to_string(), "octocat/site");
    }

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!("{}", ForgeError::NotFound("PR #123".into())),
            "not found: PR #123"
        );
        assert_eq!(
            format!("{}", ForgeError::Conflict("Reference already exists".into())),
            "conflict: Reference already exists"
        );
        assert_eq!(
            format!("{}", ForgeError::NotADirectory("README.md".into())),
            "not a directory: README.md"
        );
        assert_eq!(
            format!(
                "{}",
                ForgeError::ApiError {
                    status: 500,
                    message: "boom".into()
                }
            ),
            "API error: 500 - boom"
        );
    }
}
