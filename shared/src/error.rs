use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

use crate::storage::StorageError;
use crate::validation::ValidationError;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Invalid input provided")]
    InvalidInput,
    #[error("Storage unavailable")]
    StorageError,
    #[error("Stored data is corrupt")]
    CorruptData,
    #[error("Internal system error")]
    SystemError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let code = match err {
            StorageError::Corrupt { .. } | StorageError::Serialization(_) => ErrorCode::CorruptData,
            StorageError::Io(_) | StorageError::Unavailable(_) => ErrorCode::StorageError,
            StorageError::InvalidKey(_) => ErrorCode::SystemError,
        };
        Error::with_details(code, "Failed to persist board state", err.to_string())
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::new(ErrorCode::InvalidInput, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
