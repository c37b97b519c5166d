//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the API base URL, retry and timeout settings, where the token is
//! persisted, and the last email used to log in.
//!
//! Configuration is stored at `~/.config/jobboard/config.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{ClientConfig, RetryPolicy, API_URL_ENV, DEFAULT_API_BASE_URL};
use crate::auth::{FileBackend, KeyringBackend, TokenBackend};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "jobboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Where the bearer token is kept between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// OS keychain.
    #[default]
    Keychain,
    /// Plain-text file in the user cache directory.
    File,
    /// Not persisted; every run starts logged out.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
    pub token_storage: TokenStorage,
    /// Per-attempt timeout in seconds. Unset or `0` means no timeout.
    pub request_timeout_secs: Option<u64>,
    /// Retry POST/PATCH on 5xx. Defaults to true.
    pub retry_non_idempotent: Option<bool>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Base URL from `JOBBOARD_API_URL`, then this file, then the default.
    pub fn base_url(&self) -> String {
        resolve_base_url(std::env::var(API_URL_ENV).ok(), self.api_base_url.as_deref())
    }

    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        let request_timeout = match self.request_timeout_secs {
            Some(0) | None => defaults.request_timeout,
            Some(secs) => Some(Duration::from_secs(secs)),
        };
        let retry = RetryPolicy {
            retry_non_idempotent: self.retry_non_idempotent.unwrap_or(true),
            ..RetryPolicy::default()
        };
        ClientConfig {
            base_url: self.base_url(),
            request_timeout,
            retry,
        }
    }

    /// Persistence backend for the configured storage, or `None` for memory-only.
    pub fn token_backend(&self) -> Result<Option<Arc<dyn TokenBackend>>> {
        let backend: Arc<dyn TokenBackend> = match self.token_storage {
            TokenStorage::Keychain => Arc::new(KeyringBackend::new()),
            TokenStorage::File => Arc::new(FileBackend::in_cache_dir()?),
            TokenStorage::Memory => return Ok(None),
        };
        Ok(Some(backend))
    }
}

fn resolve_base_url(env: Option<String>, configured: Option<&str>) -> String {
    env.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| configured.map(str::to_string).filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_resolution_order() {
        assert_eq!(
            resolve_base_url(Some("https://env.example/api".into()), Some("https://file.example/api")),
            "https://env.example/api"
        );
        assert_eq!(
            resolve_base_url(Some("  ".into()), Some("https://file.example/api")),
            "https://file.example/api"
        );
        assert_eq!(resolve_base_url(None, None), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_client_config_timeout_and_retry() {
        let config = Config {
            request_timeout_secs: Some(0),
            retry_non_idempotent: Some(false),
            ..Config::default()
        };
        let client = config.client_config();
        assert_eq!(client.request_timeout, None);
        assert!(!client.retry.retry_non_idempotent);
        assert_eq!(client.retry.max_attempts, 3);

        let client = Config::default().client_config();
        assert_eq!(client.request_timeout, None);
        assert!(client.retry.retry_non_idempotent);

        let config = Config {
            request_timeout_secs: Some(30),
            ..Config::default()
        };
        assert_eq!(config.client_config().request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("jobboard-config-{}", std::process::id()))
            .join(CONFIG_FILE);
        let config = Config {
            api_base_url: Some("https://jobs.example/api".into()),
            last_email: Some("kim@example.com".into()),
            token_storage: TokenStorage::File,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base_url.as_deref(), Some("https://jobs.example/api"));
        assert_eq!(loaded.token_storage, TokenStorage::File);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("jobboard-config-does-not-exist.json");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.token_storage, TokenStorage::Keychain);
        assert!(config.token_backend().unwrap().is_some());
    }
}
