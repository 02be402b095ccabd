//! Application error types.

use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Configuration error.
    Config(String),

    /// Configuration file could not be loaded.
    ConfigFile(ConfigError),

    /// `start()` was called outside a Tokio runtime.
    NoRuntime,

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            AppError::ConfigFile(e) => {
                write!(f, "Failed to load configuration: {}", e)
            }
            AppError::NoRuntime => {
                write!(f, "No Tokio runtime available; use start_sync() outside async code")
            }
            AppError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::ConfigFile(e) => Some(e),
            AppError::Config(_) => None,
            AppError::NoRuntime => None,
            AppError::RuntimeCreation(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::ConfigFile(e)
    }
}
