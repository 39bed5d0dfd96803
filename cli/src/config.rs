//! Configuration for the `voteboard` binary.
//!
//! Resolution order: built-in defaults, then the TOML file, then
//! `VOTEBOARD_*` environment variables, then command line flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CliError;

pub const ENV_DATA_DIR: &str = "VOTEBOARD_DATA_DIR";
pub const ENV_SUBMIT_DELAY_MS: &str = "VOTEBOARD_SUBMIT_DELAY_MS";
pub const ENV_LOG_LEVEL: &str = "VOTEBOARD_LOG_LEVEL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub submission: SubmissionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("voteboard"))
        .unwrap_or_else(|| PathBuf::from("./voteboard_data"))
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Pause before a submission is committed. 0 disables it.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    1500
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self { delay_ms: default_delay_ms() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::ConfigRead {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| CliError::ConfigParse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("voteboard").join("config.toml"))
    }

    /// An explicit path must exist; the default one is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, CliError> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load(&path)?,
                None => Self::default(),
            },
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), CliError> {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(delay) = lookup(ENV_SUBMIT_DELAY_MS) {
            self.submission.delay_ms = delay.trim().parse().map_err(|_| CliError::InvalidOverride {
                name: ENV_SUBMIT_DELAY_MS,
                value: delay,
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
