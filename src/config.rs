//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL override and the last used login email.
//!
//! Configuration is stored at `~/.config/pricewatch/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/log directory paths
const APP_NAME: &str = "pricewatch";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
const API_URL_ENV: &str = "PRICEWATCH_API_URL";

/// Default API base URL.
/// The backend mounts under /api; in development it listens on localhost.
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Resolve the API base URL: environment variable, then config file,
    /// then the compiled default.
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                return url.trim_end_matches('/').to_string();
            }
        }
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the session file, next to the config.
    pub fn data_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    /// Directory for log files. The terminal belongs to the TUI, so logs
    /// are written here instead of stderr.
    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let config = Config {
            api_base_url: Some("https://tracker.example.com/api/".to_string()),
            last_email: None,
        };
        // Only meaningful when the env override is unset, which is the
        // default in the test environment.
        if std::env::var(API_URL_ENV).is_err() {
            assert_eq!(config.api_base_url(), "https://tracker.example.com/api");
        }
    }

    #[test]
    fn test_default_base_url() {
        let config = Config::default();
        if std::env::var(API_URL_ENV).is_err() {
            assert_eq!(config.api_base_url(), "http://127.0.0.1:8000/api");
        }
    }
}
