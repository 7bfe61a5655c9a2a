// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is stored in `<config dir>/tk/config.toml` and includes:
//! - `url`: Base URL of the backend (e.g., "https://abc.example.co")
//! - `anon_key`: Public API key sent with every request
//! - `table`: Name of the tasks collection (default "tasks")
//! - `session_file`: Where persisted credentials live
//!
//! `TK_CONFIG` points at a different file; `TK_URL` and `TK_ANON_KEY`
//! override the values read from it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR_NAME: &str = "tk";
const CONFIG_FILE_NAME: &str = "config.toml";
const SESSION_FILE_NAME: &str = "session.json";

/// Upper bound for `refresh_margin_secs`: one day.
pub const MAX_REFRESH_MARGIN_SECS: u64 = 24 * 60 * 60;

/// Environment variable naming an alternate config file.
pub const ENV_CONFIG: &str = "TK_CONFIG";
/// Environment variable overriding `url`.
pub const ENV_URL: &str = "TK_URL";
/// Environment variable overriding `anon_key`.
pub const ENV_ANON_KEY: &str = "TK_ANON_KEY";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("backend not configured\n  hint: run 'tk configure <url> <anon-key>' or set TK_URL and TK_ANON_KEY")]
    NotConfigured,

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Connection settings for the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash.
    #[serde(default)]
    pub url: String,
    /// Public API key sent as the `apikey` header.
    #[serde(default)]
    pub anon_key: String,
    /// Name of the tasks collection.
    #[serde(default = "default_table")]
    pub table: String,
    /// Path of the persisted session. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
    /// Refresh access tokens this many seconds before they expire.
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,
}

fn default_table() -> String {
    "tasks".to_string()
}

fn default_refresh_margin_secs() -> u64 {
    60
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
            session_file: None,
            refresh_margin_secs: default_refresh_margin_secs(),
        }
    }
}

impl ClientConfig {
    /// Creates a config for the given backend.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        ClientConfig {
            url: url.into(),
            anon_key: anon_key.into(),
            ..ClientConfig::default()
        }
    }

    /// Loads configuration from `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Loads the config from its default location (or `TK_CONFIG`), applies
    /// environment overrides and validates the result.
    ///
    /// A missing file is not an error as long as the environment supplies
    /// the backend settings.
    pub fn discover() -> ConfigResult<Self> {
        let path = config_path();
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            ClientConfig::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `lookup` (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.is_empty()) {
            self.url = url;
        }
        if let Some(key) = lookup(ENV_ANON_KEY).filter(|v| !v.is_empty()) {
            self.anon_key = key;
        }
    }

    /// Checks that the backend settings are present and well-formed.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.url.is_empty() && self.anon_key.is_empty() {
            return Err(ConfigError::NotConfigured);
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "url '{}' must start with http:// or https://",
                self.url
            )));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::Invalid("anon_key cannot be empty".to_string()));
        }
        if self.table.trim().is_empty() {
            return Err(ConfigError::Invalid("table cannot be empty".to_string()));
        }
        if self.refresh_margin_secs > MAX_REFRESH_MARGIN_SECS {
            return Err(ConfigError::Invalid(format!(
                "refresh_margin_secs must be at most {} (got {})",
                MAX_REFRESH_MARGIN_SECS, self.refresh_margin_secs
            )));
        }
        Ok(())
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Where the persisted session lives.
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| data_dir().join(SESSION_FILE_NAME))
    }

    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.refresh_margin_secs)
    }
}

/// Path of the config file: `TK_CONFIG` or `<config dir>/tk/config.toml`.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(ENV_CONFIG) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
