//! Configuration file support for Liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::parser::{DateOrder, ParseOptions};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub parsing: ParsingConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Location of the workout log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
        }
    }
}

/// How rows of the workout log are read
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParsingConfig {
    #[serde(default)]
    pub date_order: DateOrder,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::default(),
            delimiter: default_delimiter(),
        }
    }
}

impl ParsingConfig {
    /// Validate the settings and turn them into parser options
    pub fn options(&self) -> Result<ParseOptions> {
        let delimiter = self.delimiter;
        let printable = delimiter.is_ascii_punctuation() || delimiter == '\t' || delimiter == ' ';
        if !printable {
            return Err(Error::Config(format!(
                "delimiter must be ASCII punctuation, a tab or a space, got {:?}",
                delimiter
            )));
        }

        Ok(ParseOptions {
            delimiter: delimiter as u8,
            date_order: self.date_order,
        })
    }
}

/// Presentation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Unit shown for sets whose MeasurementUnit column is blank
    #[serde(default = "default_unit")]
    pub default_unit: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_unit: default_unit(),
        }
    }
}

// Default value functions
fn default_log_file() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("liftlog").join("workouts.csv")
}

fn default_delimiter() -> char {
    ','
}

fn default_unit() -> String {
    "kg".into()
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
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("liftlog").join("config.toml")
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
