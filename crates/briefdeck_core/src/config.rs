//! Environment-driven application configuration.
//!
//! # Responsibility
//! - Decide which storage backend the process uses.
//! - Resolve endpoint, database path, timeout and logging settings.
//!
//! # Invariants
//! - Backend selection happens once, at construction time.
//! - Invalid values are rejected with the offending variable name; absent
//!   values fall back to defaults.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_USE_API: &str = "BRIEFDECK_USE_API";
pub const ENV_API_URL: &str = "BRIEFDECK_API_URL";
pub const ENV_DB_PATH: &str = "BRIEFDECK_DB_PATH";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "BRIEFDECK_HTTP_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "BRIEFDECK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "BRIEFDECK_LOG_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/briefs";
const DEFAULT_DB_FILE_NAME: &str = "briefdeck.sqlite3";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Which persistence backend serves the brief collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Remote,
    Local,
}

impl StorageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.variable, self.message)
    }
}

impl Error for ConfigError {}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage_mode: StorageMode,
    /// Collection resource; items live at `{api_base_url}/{id}`.
    pub api_base_url: String,
    /// SQLite file backing local storage and preferences.
    pub db_path: PathBuf,
    pub request_timeout: Duration,
    pub log_level: String,
    /// Rolling log directory. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::Local,
            api_base_url: DEFAULT_API_URL.to_string(),
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to
    /// raw values. Blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = read(ENV_USE_API) {
            config.storage_mode = if parse_flag(ENV_USE_API, &raw)? {
                StorageMode::Remote
            } else {
                StorageMode::Local
            };
        }

        if let Some(raw) = read(ENV_API_URL) {
            if !(raw.starts_with("http://") || raw.starts_with("https://")) {
                return Err(ConfigError {
                    variable: ENV_API_URL,
                    message: format!("expected an http(s) URL, got `{raw}`"),
                });
            }
            config.api_base_url = raw.trim_end_matches('/').to_string();
        }

        if let Some(raw) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(raw);
        }

        if let Some(raw) = read(ENV_HTTP_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError {
                    variable: ENV_HTTP_TIMEOUT_SECS,
                    message: format!("expected a positive integer, got `{raw}`"),
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = read(ENV_LOG_LEVEL) {
            config.log_level = raw;
        }

        if let Some(raw) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(raw));
        }

        Ok(config)
    }
}

fn parse_flag(variable: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError {
            variable,
            message: format!("expected true|false, got `{other}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, StorageMode, DEFAULT_API_URL, ENV_HTTP_TIMEOUT_SECS};
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_storage() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage_mode, StorageMode::Local);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn use_api_flag_selects_remote_and_trims_url() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BRIEFDECK_USE_API", "TRUE"),
            ("BRIEFDECK_API_URL", "https://briefs.example.com/api/briefs/"),
        ]))
        .unwrap();
        assert_eq!(config.storage_mode, StorageMode::Remote);
        assert_eq!(config.api_base_url, "https://briefs.example.com/api/briefs");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("BRIEFDECK_USE_API", "  ")])).unwrap();
        assert_eq!(config.storage_mode, StorageMode::Local);
    }

    #[test]
    fn rejects_zero_timeout_and_names_variable() {
        let err =
            AppConfig::from_lookup(lookup(&[("BRIEFDECK_HTTP_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(err.variable, ENV_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn rejects_unknown_flag_value() {
        let err = AppConfig::from_lookup(lookup(&[("BRIEFDECK_USE_API", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("BRIEFDECK_USE_API"));
    }
}
