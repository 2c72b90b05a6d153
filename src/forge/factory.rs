//! forge::factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! Commands call [`create_forge`] with the provider name from configuration
//! instead of constructing a specific implementation, so the core never
//! depends on a concrete host adapter.
//!
//! # Example
//!
//! ```ignore
//! use brevoza::forge::{create_forge, ForgeProvider};
//!
//! let provider = ForgeProvider::parse("github").unwrap();
//! let forge = create_forge(provider, "https://api.github.com", None)?;
//! ```

use std::sync::Arc;

use super::github::GitHubForge;
use super::traits::{Forge, ForgeError};
use crate::auth::TokenProvider;

/// Supported forge providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeProvider {
    GitHub,
}

impl ForgeProvider {
    /// Get all available providers.
    pub fn all() -> &'static [ForgeProvider] {
        &[ForgeProvider::GitHub]
    }

    /// Get the provider name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "github",
        }
    }

    /// Parse a provider from a string (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use brevoza::forge::ForgeProvider;
    ///
    /// assert_eq!(ForgeProvider::parse("github"), Some(ForgeProvider::GitHub));
    /// assert_eq!(ForgeProvider::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ForgeProvider::GitHub),
            _ => None,
        }
    }

    /// Parse a provider, producing a descriptive error for unknown names.
    pub fn resolve(name: &str) -> Result<Self, ForgeError> {
        Self::parse(name).ok_or_else(|| {
            ForgeError::NotImplemented(format!(
                "Unknown forge provider '{}'. Available providers: {}",
                name,
                available_providers_string()
            ))
        })
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Create a forge for `provider`.
///
/// # Arguments
///
/// * `provider` - Which host adapter to build
/// * `api_base` - API base URL (public host or an Enterprise/test endpoint)
/// * `token_provider` - Bearer token source; `None` for anonymous access
pub fn create_forge(
    provider: ForgeProvider,
    api_base: &str,
    token_provider: Option<Arc<dyn TokenProvider>>,
) -> Result<Arc<dyn Forge>, ForgeError> {
    match provider {
        ForgeProvider::GitHub => {
            if reqwest::Url::parse(api_base).is_err() {
                return Err(ForgeError::NetworkError(format!(
                    "invalid API base '{}'",
                    api_base
                )));
            }
            Ok(Arc::new(GitHubForge::with_api_base(token_provider, api_base)))
        }
    }
}

/// Get a comma-separated string of available providers.
fn available_providers_string() -> String {
    ForgeProvider::all()
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Valid forge names for configuration validation.
pub fn valid_forge_names() -> &'static [&'static str] {
    &["github"]
}

#[cfg(test)]
mod tests {
    use super::*;

    mod forge_provider {
        use super::*;

        #[test]
        fn all_includes_github() {
            assert!(ForgeProvider::all().contains(&ForgeProvider::GitHub));
        }

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!(ForgeProvider::parse("github"), Some(ForgeProvider::GitHub));
            assert_eq!(ForgeProvider::parse("GitHub"), Some(ForgeProvider::GitHub));
            assert_eq!(ForgeProvider::parse(""), None);
        }

        #[test]
        fn resolve_unknown_lists_available() {
            let err = ForgeProvider::resolve("gitea").unwrap_err();
            assert!(err.to_string().contains("Available providers: github"));
        }

        #[test]
        fn display() {
            assert_eq!(format!("{}", ForgeProvider::GitHub), "github");
        }
    }

    mod create_forge {
        use super::*;

        #[test]
        fn github_forge_created() {
            let forge = create_forge(ForgeProvider::GitHub, "https://api.github.com", None).unwrap();
            assert_eq!(forge.name(), "github");
        }

        #[test]
        fn invalid_api_base_rejected() {
            let result = create_forge(ForgeProvider::GitHub, "::nope::", None);
            assert!(matches!(result, Err(ForgeError::NetworkError(_))));
        }
    }

    #[test]
    fn valid_names_match_providers() {
        for provider in ForgeProvider::all() {
            assert!(valid_forge_names().contains(&provider.name()));
        }
    }
}
