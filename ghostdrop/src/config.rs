//! INI configuration file.
//!
//! # Example Configuration
//!
//! ```ini
//! [location]
//! high_accuracy = true
//! maximum_age_ms = 1000
//! timeout_ms = 10000
//! event_buffer = 64
//!
//! [logging]
//! directory = ~/.ghostdrop/logs
//! file = ghostdrop.log
//! level = info
//! ```
//!
//! Missing sections and keys fall back to defaults; unknown keys are ignored.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::location::{DEFAULT_EVENT_BUFFER, DEFAULT_MAXIMUM_AGE, DEFAULT_TIMEOUT};

/// Directory under the home directory holding config and logs.
pub const CONFIG_DIR_NAME: &str = ".ghostdrop";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "ghostdrop.log";

/// Default log level filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const SECTION_LOCATION: &str = "location";
const SECTION_LOGGING: &str = "logging";

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid INI.
    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A key holds a value of the wrong type or out of range.
    #[error("Invalid value for [{section}] {key}: '{value}'")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

/// `[location]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSettings {
    pub high_accuracy: bool,
    pub maximum_age_ms: u64,
    pub timeout_ms: u64,
    /// Per-subscriber status buffer; must be at least 1.
    pub event_buffer: usize,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age_ms: DEFAULT_MAXIMUM_AGE.as_millis() as u64,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_dir().join("logs"),
            file: DEFAULT_LOG_FILE.to_string(),
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// The parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub location: LocationSettings,
    pub logging: LoggingSettings,
}

/// `~/.ghostdrop`, or `./.ghostdrop` when no home directory is known.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Expand a leading `~/` to the home directory.
fn expand_tilde(value: &str) -> PathBuf {
    match value.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(value)),
        None => PathBuf::from(value),
    }
}

fn parse_value<T: FromStr>(section: &str, key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        })
}

impl ConfigFile {
    /// Default config path: `~/.ghostdrop/config.ini`.
    pub fn default_path() -> PathBuf {
        config_dir().join(CONFIG_FILE_NAME)
    }

    /// Load configuration from `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => ConfigError::Parse {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;
        Self::from_ini(&ini)
    }

    /// Load `path` if given, else the default path if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse configuration from an in-memory INI document.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let ini = Ini::load_from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some(SECTION_LOCATION)) {
            let location = &mut config.location;
            if let Some(v) = section.get("high_accuracy") {
                location.high_accuracy = parse_value(SECTION_LOCATION, "high_accuracy", v)?;
            }
            if let Some(v) = section.get("maximum_age_ms") {
                location.maximum_age_ms = parse_value(SECTION_LOCATION, "maximum_age_ms", v)?;
            }
            if let Some(v) = section.get("timeout_ms") {
                location.timeout_ms = parse_value(SECTION_LOCATION, "timeout_ms", v)?;
            }
            if let Some(v) = section.get("event_buffer") {
                let buffer: usize = parse_value(SECTION_LOCATION, "event_buffer", v)?;
                if buffer == 0 {
                    return Err(ConfigError::InvalidValue {
                        section: SECTION_LOCATION.to_string(),
                        key: "event_buffer".to_string(),
                        value: v.to_string(),
                    });
                }
                location.event_buffer = buffer;
            }
        }

        if let Some(section) = ini.section(Some(SECTION_LOGGING)) {
            let logging = &mut config.logging;
            if let Some(v) = section.get("directory") {
                logging.directory = expand_tilde(v.trim());
            }
            if let Some(v) = section.get("file") {
                logging.file = v.trim().to_string();
            }
            if let Some(v) = section.get("level") {
                logging.level = v.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some(SECTION_LOCATION))
            .set("high_accuracy", self.location.high_accuracy.to_string())
            .set("maximum_age_ms", self.location.maximum_age_ms.to_string())
            .set("timeout_ms", self.location.timeout_ms.to_string())
            .set("event_buffer", self.location.event_buffer.to_string());
        ini.with_section(Some(SECTION_LOGGING))
            .set("directory", self.logging.directory.to_string_lossy())
            .set("file", self.logging.file.as_str())
            .set("level", self.logging.level.as_str());

        ini.write_to_file(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
