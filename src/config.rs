//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`IMPACTWATCH_*`)
//! 2. Config file (`~/.impactwatch/config.toml`)
//! 3. Defaults

use crate::core::session::DEFAULT_NAME_MAX_LEN;
use crate::error::{Error, Result};
use crate::storage::file::get_impactwatch_home;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default analysis endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/analyze";

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Analysis service configuration.
    pub api: ApiConfig,

    /// Chat history configuration.
    pub history: HistoryConfig,

    /// Cleanup configuration.
    pub cleanup: CleanupConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the chat history file.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: get_impactwatch_home(),
        }
    }
}

/// Analysis service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// URL that analysis requests are POSTed to.
    pub endpoint: String,

    /// Request timeout in seconds. Unset means wait indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl ApiConfig {
    /// The request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: None,
        }
    }
}

/// Chat history configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum session name length before truncation.
    pub name_max_len: usize,

    /// Default number of sessions shown by `list`.
    pub list_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            name_max_len: DEFAULT_NAME_MAX_LEN,
            list_limit: 20,
        }
    }
}

/// Cleanup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Default age, in days, past which `clean` removes sessions.
    pub retention_days: u32,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self { retention_days: 30 }
    }
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path).map_err(Error::Storage)?;
        config = parse_config(&contents)?;
    }

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Parse a TOML config document.
///
/// # Errors
///
/// Returns an error if the document is not valid configuration.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("IMPACTWATCH_CONFIG") {
        return PathBuf::from(path);
    }

    get_impactwatch_home().join("config.toml")
}

/// Apply environment variable overrides to config.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(path) = env::var("IMPACTWATCH_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Ok(home) = env::var("IMPACTWATCH_HOME") {
        config.storage.path = PathBuf::from(home);
    }

    if let Ok(endpoint) = env::var("IMPACTWATCH_ENDPOINT") {
        config.api.endpoint = endpoint;
    }

    if let Ok(val) = env::var("IMPACTWATCH_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.api.timeout_seconds = Some(secs);
        }
    }

    if let Ok(val) = env::var("IMPACTWATCH_NAME_MAX_LEN") {
        if let Ok(len) = val.parse() {
            config.history.name_max_len = len;
        }
    }

    if let Ok(val) = env::var("IMPACTWATCH_RETENTION_DAYS") {
        if let Ok(days) = val.parse() {
            config.cleanup.retention_days = days;
        }
    }
}
