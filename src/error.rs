//! Error types
//!
//! Core lookups return `Option` (a missing node or an unmapped path is not an
//! error). `ApiError` covers the fallible edges: configuration, file I/O and
//! document parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by configuration, loading and CLI operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid mapping table: {0}")]
    InvalidMappingTable(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Mapping not found: {0}")]
    MappingNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ApiError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ApiError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
