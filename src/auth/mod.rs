//! auth
//!
//! Bearer token supply for forge adapters.
//!
//! # Architecture
//!
//! Acquiring host credentials (GitHub App installation tokens, personal
//! access tokens) happens outside this crate. The forge only needs a source
//! of bearer tokens, expressed as the [`TokenProvider`] trait, so callers can
//! plug in whatever refresh machinery they run.
//!
//! [`StaticTokenProvider`] covers the CLI case: a token read once from the
//! environment.
//!
//! # Security
//!
//! Tokens MUST never appear in logs, errors, or `Debug` output. Every type
//! in this module redacts token values.

use async_trait::async_trait;
use thiserror::Error;

/// Environment variables consulted for a token, in order.
pub const TOKEN_ENV_VARS: &[&str] = &["BREVOZA_TOKEN", "GITHUB_TOKEN"];

/// Errors from token supply.
///
/// Messages never include token values.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token is available for the host.
    #[error("not authenticated for host '{0}'. Set BREVOZA_TOKEN or GITHUB_TOKEN.")]
    NotAuthenticated(String),

    /// The token could not be produced (refresh failure, revoked installation).
    #[error("token unavailable: {0}")]
    Unavailable(String),
}

/// Trait for providing bearer tokens to forge adapters.
///
/// Implementors may refresh transparently; the forge calls
/// [`bearer_token`](TokenProvider::bearer_token) before every request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a valid bearer token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] if no token exists
    /// - [`AuthError::Unavailable`] if a token exists but cannot be used
    async fn bearer_token(&self) -> Result<String, AuthError>;

    /// Check if a token is available without producing it.
    fn is_authenticated(&self) -> bool;

    /// Get the host this provider authenticates for.
    fn host(&self) -> &str;
}

/// A fixed token, typically taken from the environment.
pub struct StaticTokenProvider {
    host: String,
    token: String,
}

impl StaticTokenProvider {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
        }
    }

    /// Build a provider from the first non-empty variable in [`TOKEN_ENV_VARS`].
    ///
    /// Returns `None` when no variable is set, which callers treat as
    /// anonymous (read-only) access.
    pub fn from_env(host: impl Into<String>) -> Option<Self> {
        let token = TOKEN_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())?;
        Some(Self::new(host, token))
    }
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("host", &self.host)
            .field("token", &"[redacted]")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::NotAuthenticated(self.host.clone()));
        }
        Ok(self.token.clone())
    }

    fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    fn host(&self) -> &str {
        &self.host
    }
}
