//! Configuration loading and management for keyscope.
//!
//! Loads settings from `keyscope.toml` with an environment variable override
//! for the API key. A missing config file falls back to defaults; only a
//! missing credential is fatal, and it is reported before any network call.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing Gemini API key: set GEMINI_API_KEY or api.gemini_key in keyscope.toml")]
    MissingApiKey,
}

/// Analysis model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
}

/// Storage paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base path for data storage
    pub path: PathBuf,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from the default location (keyscope.toml in cwd
    /// or home), falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::read_from(&path)?,
            None => Config::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let mut config = Self::read_from(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn read_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.api.gemini_key = Some(key);
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("keyscope.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config").join("keyscope").join("keyscope.toml");
            if home_config.exists() {
                return Some(home_config);
            }
        }

        None
    }

    /// Get the configured API key
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .gemini_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .map(|dir| dir.join("keyscope"))
            .unwrap_or_else(|| PathBuf::from("./data"));
        Self { path }
    }
}
