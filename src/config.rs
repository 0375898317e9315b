//! Configuration Management
//!
//! Provider settings come from CLI flags, then environment variables, then the
//! persisted config file. Secrets are never written to disk.

use crate::dremio::Credentials;
use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const ENV_URL: &str = "DREMIO_URL";
pub const ENV_API_KEY: &str = "DREMIO_API_KEY";
pub const ENV_USERNAME: &str = "DREMIO_USERNAME";
pub const ENV_PASSWORD: &str = "DREMIO_PASSWORD";

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Server root, e.g. `http://localhost:9047`
    #[serde(default)]
    pub dremio_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dremio-provider").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved config to {:?}", path);

        Ok(())
    }

    /// Read the `DREMIO_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            dremio_url: get(ENV_URL),
            username: get(ENV_USERNAME),
            api_key: get(ENV_API_KEY),
            password: get(ENV_PASSWORD),
        }
    }

    /// Fill every unset field from `fallback`
    pub fn or(self, fallback: Config) -> Config {
        Config {
            dremio_url: self.dremio_url.or(fallback.dremio_url),
            username: self.username.or(fallback.username),
            api_key: self.api_key.or(fallback.api_key),
            password: self.password.or(fallback.password),
        }
    }

    /// Effective configuration (CLI > environment > config file)
    pub fn resolve(cli: Config) -> Config {
        cli.or(Self::from_env()).or(Self::load())
    }

    /// Validated server URL
    pub fn url(&self) -> Result<Url> {
        let raw = self
            .dremio_url
            .as_deref()
            .ok_or_else(|| ProviderError::invalid(format!("dremio_url is not set (or {ENV_URL})")))?;
        let url = Url::parse(raw)
            .map_err(|e| ProviderError::invalid(format!("invalid dremio_url '{raw}': {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ProviderError::invalid(format!(
                "dremio_url must use http or https, got '{other}'"
            ))),
        }
    }

    /// API key wins over username and password
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(key) = &self.api_key {
            return Ok(Credentials::ApiKey(key.clone()));
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Credentials::Password {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => Err(ProviderError::invalid(
                "either api_key or both username and password must be set",
            )),
        }
    }
}
