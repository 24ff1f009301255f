use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TaskdeckError};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StoreConfig {
    /// "local" (default) or "remote"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub local: Option<toml::Table>,
    #[serde(default)]
    pub remote: Option<toml::Table>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            local: None,
            remote: None,
        }
    }
}

fn default_backend() -> String {
    "local".into()
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TaskdeckError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TaskdeckError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("taskdeck").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
        }
    }
}
