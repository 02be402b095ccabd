//! Shared setup for commands: configuration and logging.

use std::path::Path;

use console::style;
use ghostdrop::config::ConfigFile;
use ghostdrop::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Loaded configuration plus the logging guard for one CLI invocation.
pub struct CliRunner {
    config: ConfigFile,
    _logging: Option<LoggingGuard>,
}

impl CliRunner {
    /// Load configuration and install logging.
    ///
    /// A logging failure is reported on stderr but does not stop the command.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_or_default(config_path)?;

        let logging = match init_logging(&config.logging, verbose) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("{} {}", style("Warning:").yellow().bold(), e);
                None
            }
        };

        Ok(Self {
            config,
            _logging: logging,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Record which command is running.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            "ghostdrop CLI starting"
        );
    }
}
