//! Custom error types for translation operations

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Transport failure or non-success HTTP status from the provider
    #[error("Provider error: {message}")]
    ProviderError {
        status: Option<u16>,
        message: String,
    },

    /// Response body could not be decoded into a translation
    #[error("Parse error: {message}")]
    ParseError {
        message: String,
    },

    /// File operation error
    #[error("File error: {path} - {message}")]
    FileError {
        path: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Stopped at a chunk or unit boundary after a cancel request
    #[error("Translation cancelled")]
    Cancelled,

    /// Worker or runtime failure outside any single request
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// Coarse category used in batch reports
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslationError::ProviderError { .. } => ErrorKind::Provider,
            TranslationError::ParseError { .. } => ErrorKind::Parse,
            TranslationError::FileError { .. } => ErrorKind::Io,
            TranslationError::ConfigError { .. } => ErrorKind::Config,
            TranslationError::Cancelled => ErrorKind::Cancelled,
            TranslationError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Build a file error carrying the offending path
    pub fn file(path: impl fmt::Display, err: impl fmt::Display) -> Self {
        TranslationError::FileError {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return TranslationError::ParseError {
                message: err.to_string(),
            };
        }
        TranslationError::ProviderError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Error category as it appears in a [`BatchReport`](crate::core::models::BatchReport)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Provider,
    Parse,
    Io,
    Config,
    Cancelled,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Provider => write!(f, "provider"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Io => write!(f, "io"),
            ErrorKind::Config => write!(f, "config"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
