//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Location
//!
//! Searched in order:
//! 1. `$BREVOZA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/brevoza/config.toml`
//! 3. `~/.brevoza/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing (branch names, paths, positive limits).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{BranchName, RepoPath};

/// User configuration.
///
/// # Example
///
/// ```toml
/// forge = "github"
/// api_base = "https://api.github.com"
/// default_branch = "main"
/// root_config_path = "brevoza.config.yml"
///
/// [fetch]
/// concurrency = 8
///
/// [list]
/// default_limit = 50
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Forge provider (e.g., "github")
    pub forge: Option<String>,

    /// API base URL of the forge
    pub api_base: Option<String>,

    /// Branch read from, and proposed against, when none is given
    pub default_branch: Option<String>,

    /// Repository path of the root configuration document
    pub root_config_path: Option<String>,

    /// Content fetch settings
    pub fetch: Option<FetchConfig>,

    /// Listing settings
    pub list: Option<ListConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(forge) = &self.forge {
            let valid_forges = crate::forge::valid_forge_names();
            if !valid_forges.contains(&forge.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid forge '{}', must be one of: {}",
                    forge,
                    valid_forges.join(", ")
                )));
            }
        }

        if let Some(api_base) = &self.api_base {
            if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "api_base '{}' must be an http(s) URL",
                    api_base
                )));
            }
        }

        if let Some(branch) = &self.default_branch {
            BranchName::new(branch).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid default_branch: {}", e))
            })?;
        }

        if let Some(path) = &self.root_config_path {
            RepoPath::new(path).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid root_config_path: {}", e))
            })?;
        }

        if let Some(fetch) = &self.fetch {
            fetch.validate()?;
        }
        if let Some(list) = &self.list {
            list.validate()?;
        }

        Ok(())
    }
}

/// Content fetch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Maximum number of file reads in flight at once
    pub concurrency: Option<usize>,
}

impl FetchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == Some(0) {
            return Err(ConfigError::InvalidValue(
                "fetch.concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Listing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ListConfig {
    /// Page size used when none is given
    pub default_limit: Option<usize>,
}

impl ListConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == Some(0) {
            return Err(ConfigError::InvalidValue(
                "list.default_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_valid() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn full_config_parses() {
        let config: ConfigFile = toml::from_str(
            r#"
            forge = "github"
            api_base = "https://ghe.example.com/api/v3"
            default_branch = "develop"
            root_config_path = "cms/brevoza.config.yml"

            [fetch]
            concurrency = 4

            [list]
            default_limit = 20
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.default_branch.as_deref(), Some("develop"));
        assert_eq!(config.fetch.unwrap().concurrency, Some(4));
        assert_eq!(config.list.unwrap().default_limit, Some(20));
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(toml::from_str::<ConfigFile>("trunk = \"main\"").is_err());
        assert!(toml::from_str::<ConfigFile>("[fetch]\nworkers = 2").is_err());
    }

    #[test]
    fn invalid_values_rejected() {
        let cases = [
            "forge = \"gitlab\"",
            "api_base = \"ftp://example.com\"",
            "default_branch = \"bad..name\"",
            "root_config_path = \"/etc/passwd\"",
            "[fetch]\nconcurrency = 0",
            "[list]\ndefault_limit = 0",
        ];
        for case in cases {
            let config: ConfigFile = toml::from_str(case).unwrap();
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue(_))),
                "should reject: {}",
                case
            );
        }
    }
}
