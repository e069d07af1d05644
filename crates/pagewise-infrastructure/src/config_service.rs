//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `~/.config/pagewise/config.json` and applies
//! environment overrides on top.
//!
//! Priority: environment variables > config.json > built-in defaults.

use crate::paths::PagewisePaths;
use pagewise_core::config::ClientConfig;
use pagewise_core::error::{PagewiseError, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_BASE_URL: &str = "PAGEWISE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "PAGEWISE_TIMEOUT_SECS";
pub const ENV_CACHE_ENABLED: &str = "PAGEWISE_CACHE_ENABLED";
pub const ENV_CACHE_DIR: &str = "PAGEWISE_CACHE_DIR";

#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: Option<PathBuf>,
}

impl ConfigService {
    /// Uses the default config location.
    pub fn new() -> Self {
        Self {
            config_path: PagewisePaths::config_file().ok(),
        }
    }

    /// Uses an explicit config file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Loads the effective configuration.
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = match &self.config_path {
            Some(path) => Self::load_file(path)?,
            None => {
                tracing::debug!("[ConfigService] No config directory, using defaults");
                ClientConfig::default()
            }
        };

        apply_overrides(config, |key| env::var(key).ok())
    }

    fn load_file(path: &Path) -> Result<ClientConfig> {
        if !path.exists() {
            tracing::debug!(
                "[ConfigService] Config file not found at {}, using defaults",
                path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PagewiseError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            PagewiseError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies environment-style overrides read through `lookup`.
pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL) {
        config.base_url = url;
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.timeout_secs = raw.trim().parse().map_err(|_| {
            PagewiseError::config(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
        })?;
    }

    if let Some(raw) = lookup(ENV_CACHE_ENABLED) {
        config.cache.enabled = matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
    }

    if let Some(dir) = lookup(ENV_CACHE_DIR) {
        config.cache.dir = Some(PathBuf::from(dir));
    }

    Ok(config)
}
