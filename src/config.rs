//! Configuration loading and management
//!
//! Handles parsing of `trackify.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Config file name, looked up in the working directory first and in the
/// user config directory second
pub const CONFIG_FILE: &str = "trackify.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote card store connection
    #[serde(default)]
    pub server: ServerConfig,
}

/// Remote store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the card store API
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a `trackify.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the usual locations, or return defaults.
    ///
    /// Lookup order: explicit path, `trackify.toml` in the working
    /// directory, then the user config directory.
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let cwd_config = PathBuf::from(CONFIG_FILE);
        if cwd_config.exists() {
            return Self::load(&cwd_config);
        }

        if let Some(path) = user_config_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    /// Override the server URL, e.g. from `--server` or the environment
    pub fn with_server_url(mut self, url: Option<String>) -> Result<Self> {
        if let Some(url) = url {
            self.server.url = url;
            self.validate()?;
        }
        Ok(self)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.server.url.trim();
        if url.is_empty() {
            return Err(Error::InvalidConfig(
                "server.url cannot be empty".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::InvalidConfig(format!(
                "server.url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.server.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "server.timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Path of the per-user config file, if a home directory can be resolved
pub fn user_config_path() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "trackify")?;
    Some(dirs.config_dir().join(CONFIG_FILE))
}
