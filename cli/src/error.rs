use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Board(#[from] shared::Error),
    #[error("Failed to read config {path}: {error}")]
    ConfigRead { path: PathBuf, error: String },
    #[error("Invalid config {path}: {error}")]
    ConfigParse { path: PathBuf, error: String },
    #[error("Invalid value for {name}: {value}")]
    InvalidOverride { name: &'static str, value: String },
    #[error("Refusing to clear board data without --yes")]
    NotConfirmed,
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::Serialization(err.to_string())
    }
}
