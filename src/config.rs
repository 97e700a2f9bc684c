//! Configuration for the warden-mcp server.
//!
//! Handles loading settings from TOML files; CLI flags and environment
//! variables override file values in `main`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Orchestration CLI settings
    pub orchestrator: OrchestratorConfig,

    /// Database access settings
    pub database: DatabaseConfig,
}

/// Orchestration CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Executable name or path used to invoke the orchestration CLI
    pub bin: String,
}

/// Database access settings for the `db` service container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// MySQL root password inside the db container
    pub root_password: String,

    /// Database used when a query does not name one
    pub default_database: String,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.warden-mcp.toml` in the current directory
    /// 2. `~/.config/warden-mcp/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        match Self::consulted_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Config file `load` consults.
    ///
    /// The local `.warden-mcp.toml` wins when present; otherwise the
    /// global `config.toml` location is returned even before a file
    /// exists there.
    pub fn consulted_path() -> Option<PathBuf> {
        let local_config = PathBuf::from(".warden-mcp.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("warden-mcp"))
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { bin: "warden".to_string() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { root_password: "magento".to_string(), default_database: "magento".to_string() }
    }
}

impl DatabaseConfig {
    /// Get the password masked for display.
    pub fn masked_password(&self) -> String {
        if self.root_password.chars().count() <= 4 {
            "****".to_string()
        } else {
            let prefix: String = self.root_password.chars().take(2).collect();
            format!("{prefix}****")
        }
    }
}
