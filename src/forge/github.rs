//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub:
//! - Contents API for file reads, directory listings and file creation
//! - Git refs API for branch heads and branch creation
//! - Pulls API for opening, listing, merging and closing change requests
//!
//! # Authentication
//!
//! Tokens come from an optional [`TokenProvider`], consulted before every
//! request. Without a provider requests are sent anonymously, which is
//! enough for reading public repositories; writes then fail with
//! `ForgeError::AuthFailed`.
//!
//! # Retries
//!
//! None. A failed call is reported once; the caller decides whether to
//! re-invoke the whole operation.
//!
//! # Example
//!
//! ```ignore
//! use brevoza::forge::github::GitHubForge;
//! use brevoza::forge::{Forge, RepoRef};
//! use brevoza::auth::StaticTokenProvider;
//! use std::sync::Arc;
//!
//! let provider = Arc::new(StaticTokenProvider::new("github.com", token));
//! let forge = GitHubForge::new(Some(provider));
//! let head = forge.get_branch_head(&RepoRef::new("octocat", "site"), "main").await?;
//! ```
//!
//! [`TokenProvider`]: crate::auth::TokenProvider

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use super::traits::{
    CreateFileRequest, CreatePrRequest, DirEntry, EntryKind, Forge, ForgeError, MergeMethod,
    MergeOutcome, PrState, PrStateFilter, PullRequest, RepoRef,
};
use crate::auth::TokenProvider;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "brevoza";

/// Page size used when listing pull requests (GitHub's maximum).
const PULLS_PER_PAGE: u32 = 100;

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Token source; `None` means anonymous access
    token_provider: Option<Arc<dyn TokenProvider>>,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token provider's state
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token_provider", &self.token_provider.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a forge talking to `api.github.com`.
    pub fn new(provider: Option<Arc<dyn TokenProvider>>) -> Self {
        Self::with_api_base(provider, DEFAULT_API_BASE)
    }

    /// Create a forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (e.g. `https://github.example.com/api/v3`)
    /// or to point at a local test server.
    pub fn with_api_base(
        provider: Option<Arc<dyn TokenProvider>>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token_provider: provider,
            api_base: api_base.into(),
        }
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Check if this forge sends authenticated requests.
    pub fn has_token_provider(&self) -> bool {
        self.token_provider.is_some()
    }

    /// Get the current bearer token, if a provider is configured.
    async fn get_bearer_token(&self) -> Result<Option<String>, ForgeError> {
        match self.token_provider {
            Some(ref provider) => provider
                .bearer_token()
                .await
                .map(Some)
                .map_err(|e| ForgeError::AuthFailed(e.to_string())),
            None => Ok(None),
        }
    }

    /// Build common headers for API requests.
    async fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.get_bearer_token().await? {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint from raw path segments.
    ///
    /// Segments are percent-encoded individually, so file paths with spaces
    /// or unicode survive, while branch names containing `/` are passed as
    /// several segments.
    fn repo_url<'a>(
        &self,
        repo: &RepoRef,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, ForgeError> {
        let invalid_base = || ForgeError::NetworkError(format!("invalid API base '{}'", self.api_base));
        let mut url = Url::parse(&self.api_base).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repo.as_str()])
            .extend(segments.into_iter().filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// URL of the contents endpoint for `path`.
    fn contents_url(&self, repo: &RepoRef, path: &str) -> Result<Url, ForgeError> {
        self.repo_url(repo, std::iter::once("contents").chain(path.split('/')))
    }

    /// Attach headers, send, and decode the response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ForgeError> {
        let response = request
            .headers(self.headers().await?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        self.handle_response(response).await
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        let headers = response.headers();
        let required_permissions = headers
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let rate_limit_exhausted = headers
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0");

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.describe(),
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN if rate_limit_exhausted => ForgeError::RateLimited,
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);
                if let Some(perms) = required_permissions.filter(|p| !p.is_empty()) {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                }
                ForgeError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            // 405: PR not mergeable; 409: head moved or merge conflict;
            // 422: ref/file/PR already exists.
            StatusCode::METHOD_NOT_ALLOWED
            | StatusCode::CONFLICT
            | StatusCode::UNPROCESSABLE_ENTITY => ForgeError::Conflict(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Download a file through its raw URL.
    ///
    /// The contents API omits the payload of files above 1 MB; those are
    /// fetched from `download_url` instead.
    async fn download_raw(&self, download_url: &str) -> Result<Vec<u8>, ForgeError> {
        let response = self
            .client
            .get(download_url)
            .headers(self.headers().await?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return self.handle_error_response(response, status).await;
        }
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ForgeError::NetworkError(e.to_string()))
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_file_content(
        &self,
        repo: &RepoRef,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<u8>, ForgeError> {
        let url = self.contents_url(repo, path)?;
        let value: serde_json::Value = self
            .send(self.client.get(url).query(&[("ref", git_ref)]))
            .await?;

        if value.is_array() {
            return Err(ForgeError::NotFound(format!("'{}' is a directory", path)));
        }

        let file: GitHubContentFile =
            serde_json::from_value(value).map_err(|e| ForgeError::ApiError {
                status: 200,
                message: format!("Failed to parse content response: {}", e),
            })?;

        if file.kind != "file" {
            return Err(ForgeError::NotFound(format!(
                "'{}' is a {}, not a file",
                path, file.kind
            )));
        }

        match (file.encoding.as_deref(), file.content) {
            (Some("base64"), Some(content)) => {
                let compact: String = content.split_whitespace().collect();
                BASE64
                    .decode(compact.as_bytes())
                    .map_err(|e| ForgeError::ApiError {
                        status: 200,
                        message: format!("Invalid base64 content for '{}': {}", path, e),
                    })
            }
            _ => match file.download_url {
                Some(download_url) => self.download_raw(&download_url).await,
                None => Err(ForgeError::ApiError {
                    status: 200,
                    message: format!("No content returned for '{}'", path),
                }),
            },
        }
    }

    async fn list_directory(
        &self,
        repo: &RepoRef,
        git_ref: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ForgeError> {
        let url = self.contents_url(repo, path)?;
        let value: serde_json::Value = self
            .send(self.client.get(url).query(&[("ref", git_ref)]))
            .await?;

        if !value.is_array() {
            return Err(ForgeError::NotADirectory(path.to_string()));
        }

        let entries: Vec<GitHubContentEntry> =
            serde_json::from_value(value).map_err(|e| ForgeError::ApiError {
                status: 200,
                message: format!("Failed to parse directory listing: {}", e),
            })?;

        Ok(entries.into_iter().map(Into::into).collect())
    }

    async fn get_branch_head(&self, repo: &RepoRef, branch: &str) -> Result<String, ForgeError> {
        let url = self.repo_url(repo, ["git", "ref", "heads"].into_iter().chain(branch.split('/')))?;
        let git_ref: GitHubRefResponse = self.send(self.client.get(url)).await?;
        Ok(git_ref.object.sha)
    }

    async fn create_branch(
        &self,
        repo: &RepoRef,
        branch: &str,
        from_commit: &str,
    ) -> Result<(), ForgeError> {
        let url = self.repo_url(repo, ["git", "refs"])?;
        let full_ref = format!("refs/heads/{}", branch);
        let body = CreateRefBody {
            git_ref: &full_ref,
            sha: from_commit,
        };
        let _: IgnoredAny = self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn create_file(
        &self,
        repo: &RepoRef,
        request: CreateFileRequest,
    ) -> Result<(), ForgeError> {
        let url = self.contents_url(repo, &request.path)?;
        let encoded = BASE64.encode(&request.content);
        let body = CreateFileBody {
            message: &request.message,
            content: &encoded,
            branch: &request.branch,
        };
        let _: IgnoredAny = self.send(self.client.put(url).json(&body)).await?;
        Ok(())
    }

    async fn open_change_request(
        &self,
        repo: &RepoRef,
        request: CreatePrRequest,
    ) -> Result<PullRequest, ForgeError> {
        let url = self.repo_url(repo, ["pulls"])?;
        let body = CreatePrBody {
            head: &request.head,
            base: &request.base,
            title: &request.title,
            body: request.body.as_deref(),
        };
        let pr: GitHubPullRequest = self.send(self.client.post(url).json(&body)).await?;
        Ok(pr.into())
    }

    async fn list_change_requests(
        &self,
        repo: &RepoRef,
        state: PrStateFilter,
    ) -> Result<Vec<PullRequest>, ForgeError> {
        let url = self.repo_url(repo, ["pulls"])?;
        let per_page = PULLS_PER_PAGE.to_string();
        let request = self.client.get(url).query(&[
            ("state", state.as_str()),
            ("sort", "created"),
            ("direction", "desc"),
            ("per_page", per_page.as_str()),
        ]);
        let prs: Vec<GitHubPullRequest> = self.send(request).await?;
        Ok(prs.into_iter().map(Into::into).collect())
    }

    async fn merge_change_request(
        &self,
        repo: &RepoRef,
        number: u64,
        method: MergeMethod,
    ) -> Result<MergeOutcome, ForgeError> {
        let number = number.to_string();
        let url = self.repo_url(repo, ["pulls", number.as_str(), "merge"])?;
        let merge_method = method.to_string();
        let body = MergePrBody {
            merge_method: &merge_method,
        };
        let result: GitHubMergeResponse = self.send(self.client.put(url).json(&body)).await?;
        Ok(MergeOutcome {
            merged: result.merged,
            message: result.message,
        })
    }

    async fn close_change_request(
        &self,
        repo: &RepoRef,
        number: u64,
    ) -> Result<PullRequest, ForgeError> {
        let id = number.to_string();
        let url = self.repo_url(repo, ["pulls", id.as_str()])?;

        // GitHub accepts closing an already closed PR, so check first.
        let current: GitHubPullRequest = self.send(self.client.get(url.clone())).await?;
        match PullRequest::from(current).state {
            PrState::Open => {}
            PrState::Closed => {
                return Err(ForgeError::Conflict(format!("PR #{} is already closed", number)))
            }
            PrState::Merged => {
                return Err(ForgeError::Conflict(format!("PR #{} is already merged", number)))
            }
        }

        let body = UpdatePrStateBody { state: "closed" };
        let pr: GitHubPullRequest = self.send(self.client.patch(url).json(&body)).await?;
        Ok(pr.into())
    }
}

// --------------------------------------------------------------------------
// Wire types
// --------------------------------------------------------------------------

/// Request body for creating a ref.
#[derive(Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    sha: &'a str,
}

/// Request body for creating a file through the contents API.
#[derive(Serialize)]
struct CreateFileBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
}

/// Request body for creating a PR.
#[derive(Serialize)]
struct CreatePrBody<'a> {
    head: &'a str,
    base: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
}

/// Request body for merging a PR.
#[derive(Serialize)]
struct MergePrBody<'a> {
    merge_method: &'a str,
}

/// Request body for changing a PR's state.
#[derive(Serialize)]
struct UpdatePrStateBody<'a> {
    state: &'a str,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
    #[serde(default)]
    errors: Vec<GitHubErrorDetail>,
}

impl GitHubErrorResponse {
    /// Top-level message plus any validation details.
    fn describe(self) -> String {
        let details: Vec<String> = self
            .errors
            .into_iter()
            .filter_map(|e| e.message)
            .collect();
        if details.is_empty() {
            self.message
        } else {
            format!("{} ({})", self.message, details.join("; "))
        }
    }
}

/// Validation detail inside a GitHub error response.
#[derive(Deserialize)]
struct GitHubErrorDetail {
    message: Option<String>,
}

/// Single-file contents API response.
#[derive(Deserialize)]
struct GitHubContentFile {
    #[serde(rename = "type")]
    kind: String,
    content: Option<String>,
    encoding: Option<String>,
    download_url: Option<String>,
}

/// Directory listing entry from the contents API.
#[derive(Deserialize)]
struct GitHubContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

impl From<GitHubContentEntry> for DirEntry {
    fn from(entry: GitHubContentEntry) -> Self {
        let kind = match entry.kind.as_str() {
            "dir" => EntryKind::Dir,
            "symlink" => EntryKind::Symlink,
            "submodule" => EntryKind::Submodule,
            _ => EntryKind::File,
        };
        DirEntry {
            name: entry.name,
            path: entry.path,
            kind,
        }
    }
}

/// Git ref response format.
#[derive(Deserialize)]
struct GitHubRefResponse {
    object: GitHubRefObject,
}

/// Object a ref points at.
#[derive(Deserialize)]
struct GitHubRefObject {
    sha: String,
}

/// Merge endpoint response format.
#[derive(Deserialize)]
struct GitHubMergeResponse {
    merged: bool,
    #[serde(default)]
    message: String,
}

/// GitHub PR response format.
///
/// The list endpoint omits `merged`, so `merged_at` is consulted as well.
#[derive(Deserialize)]
struct GitHubPullRequest {
    number: u64,
    html_url: String,
    state: String,
    head: GitHubBranchRef,
    base: GitHubBranchRef,
    title: String,
    body: Option<String>,
    merged: Option<bool>,
    merged_at: Option<String>,
    user: Option<GitHubUser>,
    created_at: Option<String>,
}

/// GitHub ref (head/base) format.
#[derive(Deserialize)]
struct GitHubBranchRef {
    #[serde(rename = "ref")]
    ref_name: String,
}

/// Minimal GitHub user info.
#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

impl From<GitHubPullRequest> for PullRequest {
    fn from(pr: GitHubPullRequest) -> Self {
        let state = if pr.merged.unwrap_or(false) || pr.merged_at.is_some() {
            PrState::Merged
        } else if pr.state == "closed" {
            PrState::Closed
        } else {
            PrState::Open
        };

        PullRequest {
            number: pr.number,
            url: pr.html_url,
            state,
            head: pr.head.ref_name,
            base: pr.base.ref_name,
            title: pr.title,
            body: pr.body,
            author: pr.user.map(|u| u.login),
            created_at: pr.created_at,
        }
    }
}
