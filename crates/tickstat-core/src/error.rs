//! Core error types for tickstat-core.
//!
//! This module defines the error hierarchy using thiserror. Fetch and parse
//! errors are recoverable per item; callers are expected to degrade the
//! affected item rather than abort a whole report. `CoreError` covers the
//! local side: configuration files and window validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tickstat-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Dot-path key that names no setting
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value that does not parse as the setting's type
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the HTTP collaborators (Jira, Databricks).
#[derive(Error, Debug)]
pub enum FetchError {
    /// Required connection setting is missing
    #[error("{service} is not configured: missing {what}")]
    NotConfigured { service: String, what: String },

    /// The remote service rejected the credentials
    #[error("Authentication failed for {service} (401 Unauthorized)")]
    Unauthorized { service: String },

    /// Any other non-success status
    #[error("{service} request to {url} failed with HTTP {status}")]
    Http {
        service: String,
        status: u16,
        url: String,
    },

    /// Connection, TLS or timeout failure
    #[error("{service} is unreachable: {source}")]
    Transport {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not have the expected shape
    #[error("Unexpected {service} response: {message}")]
    Decode { service: String, message: String },
}

impl FetchError {
    pub(crate) fn transport(service: &str, source: reqwest::Error) -> Self {
        FetchError::Transport {
            service: service.to_string(),
            source,
        }
    }

    pub(crate) fn decode(service: &str, message: impl Into<String>) -> Self {
        FetchError::Decode {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

/// Parsing errors for changelog data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Timestamp not in any accepted format
    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Reporting window ends before it starts
    #[error("Invalid reporting window: end ({end}) is before start ({start})")]
    InvalidWindow {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
