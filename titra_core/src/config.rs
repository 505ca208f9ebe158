//! Configuration file support for Titra.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/titra/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Number formatting configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Maximum decimals in fixed-point output
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    /// Magnitudes below this are shown in scientific notation
    #[serde(default = "default_scientific_below")]
    pub scientific_below: f64,

    #[serde(default = "default_significant_digits")]
    pub significant_digits: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            scientific_below: default_scientific_below(),
            significant_digits: default_significant_digits(),
        }
    }
}

/// History recording configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Record calculations unless told otherwise on the command line
    #[serde(default = "default_history_enabled")]
    pub enabled: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_history_enabled(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("titra")
}

fn default_decimals() -> usize {
    4
}

fn default_scientific_below() -> f64 {
    1e-3
}

fn default_significant_digits() -> usize {
    4
}

fn default_history_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.check()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("titra").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Path of the history file inside the data directory
    pub fn history_path(&self) -> PathBuf {
        self.data.data_dir.join("history.jsonl")
    }

    fn check(&self) -> Result<()> {
        if !(self.display.scientific_below.is_finite() && self.display.scientific_below >= 0.0) {
            return Err(Error::Config(format!(
                "display.scientific_below must be a non-negative number, got {}",
                self.display.scientific_below
            )));
        }
        if self.display.significant_digits == 0 {
            return Err(Error::Config(
                "display.significant_digits must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
