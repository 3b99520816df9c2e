//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Turnstile is configured from a single TOML file. The root identity
//! lives here and only here: it is threaded explicitly into the engine
//! at construction time and never stored in the mutable aggregate.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$TURNSTILE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/turnstile/config.toml`
//! 3. `~/.turnstile/config.toml`
//!
//! A missing file is not an error; defaults apply.
//!
//! # Keys
//!
//! ```toml
//! root_id = "1205959966511603802"
//! data_file = "data.json"
//! api_base = "https://users.roblox.com"
//! directory_base = "https://directory.example.com"
//! validator = "http"   # or "allow"
//! timeout_secs = 5
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use super::types::{CallerId, TypeError};

/// Default persisted state file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Default base URL for the external identity-validity check.
pub const DEFAULT_API_BASE: &str = "https://users.roblox.com";

/// Default ceiling for external checks, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

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

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

impl From<TypeError> for ConfigError {
    fn from(err: TypeError) -> Self {
        ConfigError::InvalidValue(err.to_string())
    }
}

/// Which identity validator to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    /// HTTP check against the external users API (fail closed).
    #[default]
    Http,
    /// Accept every syntactically valid identifier. Offline and
    /// development use.
    Allow,
}

/// Raw on-disk schema; every key optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    root_id: Option<String>,
    data_file: Option<PathBuf>,
    api_base: Option<String>,
    directory_base: Option<String>,
    validator: Option<ValidatorKind>,
    timeout_secs: Option<u64>,
}

/// Resolved configuration with defaults applied.
#[derive(Debug, Clone)]
pub struct Config {
    /// The configured root identity, if any.
    pub root_id: Option<CallerId>,
    /// Path of the persisted state file.
    pub data_file: PathBuf,
    /// Base URL for the identity-validity check.
    pub api_base: String,
    /// Base URL for the caller display lookup, if configured.
    pub directory_base: Option<String>,
    /// Which validator implementation to use.
    pub validator: ValidatorKind,
    /// Ceiling for external checks.
    pub timeout: Duration,
    /// Path the config was loaded from, if a file was found.
    loaded_from: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_id: None,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            api_base: DEFAULT_API_BASE.to_string(),
            directory_base: None,
            validator: ValidatorKind::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            loaded_from: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// `explicit` (typically a `--config` flag) takes precedence over
    /// the search path; for an explicit path, a missing file is an
    /// error rather than a silent default.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::find_config_file() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_raw(raw, Some(path.to_path_buf()))
    }

    fn from_raw(raw: RawConfig, loaded_from: Option<PathBuf>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let root_id = raw.root_id.map(CallerId::new).transpose()?;
        Ok(Self {
            root_id,
            data_file: raw.data_file.unwrap_or(defaults.data_file),
            api_base: raw.api_base.unwrap_or(defaults.api_base),
            directory_base: raw.directory_base,
            validator: raw.validator.unwrap_or_default(),
            timeout: Duration::from_secs(raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            loaded_from,
        })
    }

    /// Locate the config file, if any exists.
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("TURNSTILE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("turnstile").join("config.toml");
            if path.exists() {
                return Some(path);
            }
        }
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".turnstile").join("config.toml");
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    /// Path the configuration was loaded from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
