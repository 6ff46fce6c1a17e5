//! # Core Error Module
//!
//! This module defines the central `LogError` type used throughout the library.
//! It leverages `thiserror` for error message formatting and `serde` for serialization.

use serde::Serialize;
use thiserror::Error;

/// Central error type for the `pino_ng` library.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
pub enum LogError {
    /// Invalid logger configuration (bad settings, unusable builder input).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A level name or numeric code that is not in the level catalog.
    /// Raised at construction and on `set_level`; there is no fallback level.
    #[error("Unknown log level: {0}")]
    UnknownLevel(String),

    /// A call-site value or an assembled record could not be turned into JSON.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The message template and its arguments do not line up.
    #[error("Format error: {0}")]
    FormatError(String),

    /// Writing to or flushing the sink failed.
    #[error("Sink error: {0}")]
    SinkError(String),
}

impl From<serde_json::Error> for LogError {
    fn from(err: serde_json::Error) -> Self {
        LogError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::SinkError(err.to_string())
    }
}

impl From<figment::Error> for LogError {
    fn from(err: figment::Error) -> Self {
        LogError::ConfigError(err.to_string())
    }
}
