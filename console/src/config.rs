//! Console configuration loaded via OrthoConfig.
//!
//! Every value can be supplied through `CONSOLE_*` environment variables or a
//! configuration file; accessors apply the defaults.

use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_STORAGE_DIR_NAME: &str = ".admin-console";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 300;

/// Errors raised when configured values are unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The API base address does not parse as an absolute URL.
    #[error("invalid api base url '{value}': {message}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// A duration setting was zero.
    #[error("{setting} must be greater than zero")]
    ZeroDuration {
        /// Setting name.
        setting: &'static str,
    },
    /// A duration setting does not fit the clock's range.
    #[error("{setting} is out of range")]
    OutOfRange {
        /// Setting name.
        setting: &'static str,
    },
}

/// Settings for the console core and CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONSOLE")]
pub struct ConsoleSettings {
    /// Backend base address; API paths are appended to it.
    pub api_base_url: Option<String>,
    /// Directory holding the stored credential.
    pub storage_dir: Option<PathBuf>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Seconds before a cached query result counts as stale.
    pub cache_max_age_secs: Option<u64>,
}

fn default_storage_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(DEFAULT_STORAGE_DIR_NAME)
}

impl ConsoleSettings {
    /// Parsed backend base address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the value is not an
    /// absolute URL.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);
        Url::parse(raw).map_err(|error| ConfigError::InvalidBaseUrl {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    /// Credential directory, defaulting to `.admin-console` under `$HOME`.
    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(default_storage_dir)
    }

    /// Request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDuration`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => Err(ConfigError::ZeroDuration {
                setting: "request_timeout_secs",
            }),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Age after which cached query results are refetched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] when the value exceeds the clock's
    /// range.
    pub fn cache_max_age(&self) -> Result<TimeDelta, ConfigError> {
        let secs = self.cache_max_age_secs.unwrap_or(DEFAULT_CACHE_MAX_AGE_SECS);
        i64::try_from(secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or(ConfigError::OutOfRange {
                setting: "cache_max_age_secs",
            })
    }
}
