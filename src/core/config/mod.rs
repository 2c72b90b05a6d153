//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! A single user-scope TOML file supplies defaults for the CLI: which forge
//! to talk to, the default branch, where the root configuration document
//! lives, and fetch/list tuning. The core itself never reads configuration;
//! the CLI resolves values here and passes them explicitly.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$BREVOZA_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/brevoza/config.toml`
//! 3. `~/.brevoza/config.toml` (canonical write location)
//!
//! Missing files are not an error; defaults apply.
//!
//! # Example
//!
//! ```no_run
//! use brevoza::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Default branch: {}", config.default_branch());
//! println!("Fetch concurrency: {}", config.fetch_concurrency());
//! ```

pub mod schema;

pub use schema::{ConfigFile, FetchConfig, ListConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BREVOZA_CONFIG";

pub const DEFAULT_FORGE: &str = "github";
pub const DEFAULT_API_BASE: &str = crate::forge::github::DEFAULT_API_BASE;
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_ROOT_CONFIG_PATH: &str = "brevoza.config.yml";
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Keys understood by [`Config::get`] and [`Config::set`].
pub const KEYS: &[&str] = &[
    "forge",
    "api_base",
    "default_branch",
    "root_config_path",
    "fetch.concurrency",
    "list.default_limit",
];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with defaulting accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: ConfigFile,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Wrap an in-memory config file.
    pub fn from_file(file: ConfigFile) -> Self {
        Self { file, path: None }
    }

    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate the config file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// First existing config file in search order.
    fn locate() -> Option<PathBuf> {
        let candidates = [
            std::env::var(CONFIG_ENV).ok().map(PathBuf::from),
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(|xdg| PathBuf::from(xdg).join("brevoza/config.toml")),
            dirs::home_dir().map(|home| home.join(".brevoza/config.toml")),
        ];
        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Get the canonical path for the config file.
    ///
    /// Returns `$BREVOZA_CONFIG` when set, otherwise `~/.brevoza/config.toml`.
    pub fn canonical_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".brevoza/config.toml"))
    }

    /// Path the configuration was loaded from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Save back to where the config was loaded from, or the canonical path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = match &self.path {
            Some(path) => path.clone(),
            None => Self::canonical_path()?,
        };
        write_atomic(&path, &self.file)?;
        Ok(path)
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    /// Forge provider name. Defaults to "github".
    pub fn forge(&self) -> &str {
        self.file.forge.as_deref().unwrap_or(DEFAULT_FORGE)
    }

    /// Forge API base URL. Defaults to `https://api.github.com`.
    pub fn api_base(&self) -> &str {
        self.file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Default branch. Defaults to "main".
    pub fn default_branch(&self) -> &str {
        self.file.default_branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    /// Root configuration document path. Defaults to "brevoza.config.yml".
    pub fn root_config_path(&self) -> &str {
        self.file
            .root_config_path
            .as_deref()
            .unwrap_or(DEFAULT_ROOT_CONFIG_PATH)
    }

    /// Content fetch concurrency. Defaults to 8.
    pub fn fetch_concurrency(&self) -> usize {
        self.file
            .fetch
            .as_ref()
            .and_then(|f| f.concurrency)
            .unwrap_or(DEFAULT_FETCH_CONCURRENCY)
    }

    /// Default page size. Defaults to 50.
    pub fn default_limit(&self) -> usize {
        self.file
            .list
            .as_ref()
            .and_then(|l| l.default_limit)
            .unwrap_or(DEFAULT_LIST_LIMIT)
    }

    /// Effective value of `key`, defaults applied.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        Ok(match key {
            "forge" => self.forge().to_string(),
            "api_base" => self.api_base().to_string(),
            "default_branch" => self.default_branch().to_string(),
            "root_config_path" => self.root_config_path().to_string(),
            "fetch.concurrency" => self.fetch_concurrency().to_string(),
            "list.default_limit" => self.default_limit().to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        })
    }

    /// Set `key` to `value`, validating the result.
    ///
    /// The change is only applied when the whole file still validates.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut file = self.file.clone();
        let parse_count = |v: &str| {
            v.parse::<usize>().map_err(|_| {
                ConfigError::InvalidValue(format!("{} must be a positive integer, got '{}'", key, v))
            })
        };

        match key {
            "forge" => file.forge = Some(value.to_string()),
            "api_base" => file.api_base = Some(value.to_string()),
            "default_branch" => file.default_branch = Some(value.to_string()),
            "root_config_path" => file.root_config_path = Some(value.to_string()),
            "fetch.concurrency" => {
                file.fetch.get_or_insert_with(Default::default).concurrency =
                    Some(parse_count(value)?)
            }
            "list.default_limit" => {
                file.list.get_or_insert_with(Default::default).default_limit =
                    Some(parse_count(value)?)
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }

        file.validate()?;
        self.file = file;
        Ok(())
    }

    /// All keys with their effective values.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

/// Write a config file atomically (temp file in the same directory, then rename).
pub fn write_atomic(path: &Path, config: &ConfigFile) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

    let temp_path = path.with_extension("toml.tmp");
    let write_err = |e| ConfigError::WriteError {
        path: temp_path.clone(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_file() {
        let config = Config::default();
        assert_eq!(config.forge(), "github");
        assert_eq!(config.api_base(), "https://api.github.com");
        assert_eq!(config.default_branch(), "main");
        assert_eq!(config.root_config_path(), "brevoza.config.yml");
        assert_eq!(config.fetch_concurrency(), 8);
        assert_eq!(config.default_limit(), 50);
        assert!(config.loaded_from().is_none());
    }

    #[test]
    #[serial]
    fn load_from_env_var() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            default_branch = "develop"

            [fetch]
            concurrency = 2
            "#,
        )
        .unwrap();

        std::env::set_var(CONFIG_ENV, &config_path);
        let config = Config::load().unwrap();
        std::env::remove_var(CONFIG_ENV);

        assert_eq!(config.default_branch(), "develop");
        assert_eq!(config.fetch_concurrency(), 2);
        assert_eq!(config.loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    #[serial]
    fn load_from_xdg_home() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("brevoza");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "[list]\ndefault_limit = 10\n").unwrap();

        std::env::remove_var(CONFIG_ENV);
        let previous = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", temp.path());
        let config = Config::load().unwrap();
        match previous {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(config.default_limit(), 10);
    }

    #[test]
    fn invalid_file_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        fs::write(&path, "default_branch = \"bad..name\"").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));

        fs::write(&path, "not toml at all [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn set_validates_and_keeps_previous_on_error() {
        let mut config = Config::default();
        config.set("fetch.concurrency", "3").unwrap();
        assert_eq!(config.get("fetch.concurrency").unwrap(), "3");

        assert!(config.set("fetch.concurrency", "0").is_err());
        assert!(config.set("fetch.concurrency", "many").is_err());
        assert_eq!(config.fetch_concurrency(), 3);

        assert!(matches!(
            config.set("trunk", "main"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn entries_cover_all_keys() {
        let entries = Config::default().entries();
        let keys: Vec<_> = entries.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, KEYS);
    }

    #[test]
    fn write_atomic_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        let mut config = Config::default();
        config.set("default_branch", "content").unwrap();
        write_atomic(&path, &config.file).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_branch(), "content");
    }
}
