//! CLI error types.

use std::fmt;
use std::path::PathBuf;

use ghostdrop::config::ConfigError;
use ghostdrop::coord::CoordError;
use ghostdrop::proximity::ListingError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration file problem.
    Config(String),

    /// An input file could not be read.
    ReadFile { path: PathBuf, source: std::io::Error },

    /// An input file is not valid JSON for the expected shape.
    InvalidJson { path: PathBuf, reason: String },

    /// A point argument could not be parsed.
    InvalidPoint(String),

    /// Coordinates out of range.
    Coordinates(CoordError),

    /// A track step holds an out-of-range position.
    InvalidTrackStep { step: usize, source: CoordError },

    /// A catalog listing failed validation.
    Listing(ListingError),

    /// Output could not be serialized.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ReadFile { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            CliError::InvalidJson { path, reason } => {
                write!(f, "Invalid JSON in {}: {}", path.display(), reason)
            }
            CliError::InvalidPoint(value) => write!(
                f,
                "Invalid point '{}': expected LAT,LON (e.g. 19.4326,-99.1332)",
                value
            ),
            CliError::Coordinates(e) => write!(f, "{}", e),
            CliError::InvalidTrackStep { step, source } => {
                write!(f, "Invalid track step #{}: {}", step, source)
            }
            CliError::Listing(e) => write!(f, "Invalid listing: {}", e),
            CliError::Output(msg) => write!(f, "Failed to render output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ReadFile { source, .. } => Some(source),
            CliError::Coordinates(e) => Some(e),
            CliError::InvalidTrackStep { source, .. } => Some(source),
            CliError::Listing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coordinates(e)
    }
}

impl From<ListingError> for CliError {
    fn from(e: ListingError) -> Self {
        CliError::Listing(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
