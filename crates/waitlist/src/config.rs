//! Configuration management for waitlist.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "waitlist";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "fallback.db";

/// Collector endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://formspree.io/f/xjkodqoe";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `WAITLIST_`, nested with `__`)
/// 2. TOML config file at `~/.config/waitlist/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Collector endpoint configuration.
    pub collector: CollectorConfig,
    /// Fallback storage configuration.
    pub storage: StorageConfig,
}

/// Collector endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// URL the waitlist form is posted to.
    pub endpoint: String,
    /// Client-side request timeout in seconds.
    /// Set to 0 to wait indefinitely.
    pub timeout_secs: u64,
}

/// Fallback storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the fallback database file.
    /// Defaults to `~/.local/share/waitlist/fallback.db`
    pub database_path: Option<PathBuf>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl CollectorConfig {
    /// Get the request timeout, or `None` if disabled.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("WAITLIST_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the collector endpoint is not an absolute
    /// `http`/`https` URL.
    pub fn validate(&self) -> Result<()> {
        let endpoint = &self.collector.endpoint;
        let url = reqwest::Url::parse(endpoint).map_err(|e| {
            Error::config_validation(format!("collector endpoint {endpoint:?} is not a URL: {e}"))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config_validation(format!(
                "collector endpoint must use http or https, got {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(Error::config_validation(format!(
                "collector endpoint {endpoint:?} has no host"
            )));
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
