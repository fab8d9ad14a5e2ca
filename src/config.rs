//! Configuration Management
//!
//! Handles persistent configuration storage for cloudcate.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the configured endpoint
const ENDPOINT_ENV: &str = "CLOUDCATE_ENDPOINT";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Search backend base URL
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Location at the end of the last session
    #[serde(default)]
    pub last_location: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cloudcate").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_json(&content),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            },
        }
    }

    /// Parse configuration, falling back to defaults on malformed content
    pub fn from_json(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config: {}", e);
            Self::default()
        })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective endpoint (CLI > environment > config > default)
    pub fn effective_endpoint(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty()))
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn effective_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Set last location and save
    pub fn set_last_location(&mut self, href: &str) -> Result<()> {
        self.last_location = Some(href.to_string());
        self.save()
    }
}
