//! Domain error types

use thiserror::Error;

/// Error when parsing a time limit string
#[derive(Debug, Clone, Error)]
#[error("Invalid time limit: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct TimeLimitParseError {
    pub input: String,
}

/// Error when an invalid capture kind is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid capture kind: \"{input}\". Valid kinds are: video, audio, location, panic")]
pub struct InvalidCaptureKindError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
