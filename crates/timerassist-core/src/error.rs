//! Core error types for timerassist-core.
//!
//! Registry and sequencer operations fail fast with the typed errors below.
//! The [`Session`](crate::Session) is the boundary that turns them into a
//! single `Error: ...` output line, so none of them ever ends the process.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timerassist-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Timer registry errors
    #[error(transparent)]
    Timer(#[from] TimerError),

    /// Regimen store / sequencer errors
    #[error(transparent)]
    Regimen(#[from] RegimenError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the timer registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Timer '{0}' does not exist")]
    NotFound(String),

    #[error("Timer '{0}' already exists")]
    AlreadyExists(String),

    /// Durations must be a positive number of seconds.
    #[error("Invalid duration for timer '{name}': {secs}s")]
    InvalidDuration { name: String, secs: u64 },
}

/// Errors raised by regimen storage and sequencing.
#[derive(Error, Debug)]
pub enum RegimenError {
    #[error("Regimen '{0}' not found")]
    NotFound(String),

    #[error("Regimen '{0}' is empty")]
    Empty(String),

    #[error("Invalid regimen: {0}")]
    InvalidRegimen(String),

    #[error("Failed to read/write regimens file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse regimens JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access data directory: {0}")]
    DataDir(String),
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

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
