//! Logging setup.
//!
//! Installs a `tracing` subscriber with two outputs: a non-blocking log file
//! (full detail, filtered by `RUST_LOG` or the configured level) and stderr
//! (warnings only, or debug when verbose). Timestamps are local time.

use std::path::PathBuf;

use thiserror::Error;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;

/// Errors that can occur while installing the logger.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    #[error("Failed to install logger: {0}")]
    Init(String),
}

/// Keeps the background log writer alive. Hold it for the process lifetime.
#[must_use = "dropping the guard stops log file output"]
pub struct LoggingGuard {
    _worker: WorkerGuard,
    log_path: PathBuf,
}

impl LoggingGuard {
    /// Path of the active log file.
    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }
}

/// Build the file-layer filter: `RUST_LOG` wins over the configured level.
fn file_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|e| LoggingError::Filter {
            filter: level.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the log directory cannot be created, the level is not a valid
/// filter, or a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings, verbose: bool) -> Result<LoggingGuard, LoggingError> {
    std::fs::create_dir_all(&settings.directory).map_err(|source| LoggingError::CreateDir {
        path: settings.directory.clone(),
        source,
    })?;

    let filter = file_filter(&settings.level)?;
    let appender = tracing_appender::rolling::never(&settings.directory, &settings.file);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(timer.clone())
        .with_filter(filter);

    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(timer)
        .with_filter(stderr_level);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    let log_path = settings.directory.join(&settings.file);
    tracing::debug!(path = %log_path.display(), "Logging initialized");

    Ok(LoggingGuard {
        _worker: guard,
        log_path,
    })
}
