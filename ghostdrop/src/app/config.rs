//! Application configuration for GhostDropApp.
//!
//! `AppConfig` combines everything needed to bootstrap the location session
//! and the proximity monitor.

use std::path::Path;
use std::time::Duration;

use super::error::AppError;
use crate::config::ConfigFile;
use crate::location::{WatchOptions, DEFAULT_EVENT_BUFFER};

/// Application configuration combining all component configs.
///
/// This is the top-level configuration passed to `GhostDropApp::start()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Platform watch parameters.
    pub watch: WatchOptions,

    /// Location updates buffered for the proximity monitor.
    ///
    /// If the monitor falls further behind than this, it skips ahead and
    /// logs a warning.
    pub event_buffer: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watch: WatchOptions::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl AppConfig {
    /// Create application config from the configuration file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        let location = &config.location;
        Self {
            watch: WatchOptions {
                high_accuracy: location.high_accuracy,
                maximum_age: Duration::from_millis(location.maximum_age_ms),
                timeout: Duration::from_millis(location.timeout_ms),
            },
            event_buffer: location.event_buffer,
        }
    }

    /// Load application config from `path`, or from the default config file
    /// if one exists, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConfigFile`] if the file cannot be read or holds
    /// invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file = ConfigFile::load_or_default(path)?;
        Ok(Self::from_config_file(&file))
    }

    /// Set the watch options.
    pub fn with_watch_options(mut self, watch: WatchOptions) -> Self {
        self.watch = watch;
        self
    }

    /// Set the monitor event buffer.
    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }
}
