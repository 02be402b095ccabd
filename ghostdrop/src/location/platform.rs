//! Platform location capability abstraction.
//!
//! Models a browser-style continuous position watch: the platform is handed
//! a [`PositionSink`] and calls it back on every fix or error until the
//! watch is cleared.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use super::session::PositionSink;
use super::status::UnavailableReason;

/// Default maximum age of a cached fix the platform may re-use.
pub const DEFAULT_MAXIMUM_AGE: Duration = Duration::from_secs(1);

/// Default bound on the wait for a first fix.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifier of an active platform watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch#{}", self.0)
    }
}

/// Parameters passed to the platform when starting a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Request high-accuracy (GPS) fixes.
    pub high_accuracy: bool,
    /// Re-use a cached fix no older than this instead of forcing a new one.
    pub maximum_age: Duration,
    /// How long to wait for a fix before reporting a timeout.
    pub timeout: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age: DEFAULT_MAXIMUM_AGE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl WatchOptions {
    /// Set whether high-accuracy fixes are requested.
    pub fn with_high_accuracy(mut self, enabled: bool) -> Self {
        self.high_accuracy = enabled;
        self
    }

    /// Set the maximum cached fix age.
    pub fn with_maximum_age(mut self, age: Duration) -> Self {
        self.maximum_age = age;
        self
    }

    /// Set the first-fix timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Errors reported by the platform location API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The user refused location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// No position could be determined.
    #[error("Position unavailable")]
    PositionUnavailable,

    /// No fix arrived in time.
    #[error("Timed out waiting for position")]
    Timeout,

    /// The platform has no location capability.
    #[error("Location is not supported on this platform")]
    Unsupported,

    /// Backend-specific failure (e.g. clearing a watch failed).
    #[error("Location backend error: {0}")]
    Backend(String),
}

impl PlatformError {
    /// Map a W3C geolocation error code.
    ///
    /// Codes outside 1..=3 are treated as [`PlatformError::PositionUnavailable`].
    pub fn from_code(code: u16) -> Self {
        match UnavailableReason::from_platform_code(code) {
            Some(UnavailableReason::PermissionDenied) => Self::PermissionDenied,
            Some(UnavailableReason::Timeout) => Self::Timeout,
            Some(_) => Self::PositionUnavailable,
            None => {
                tracing::warn!(code, "Unknown location error code, treating as unavailable");
                Self::PositionUnavailable
            }
        }
    }

    /// The availability reason this error implies.
    pub fn reason(&self) -> UnavailableReason {
        match self {
            Self::PermissionDenied => UnavailableReason::PermissionDenied,
            Self::Timeout => UnavailableReason::Timeout,
            Self::Unsupported => UnavailableReason::Unsupported,
            Self::PositionUnavailable | Self::Backend(_) => UnavailableReason::PositionUnavailable,
        }
    }
}

/// A platform's continuous position-update capability.
///
/// Implementations deliver fixes and errors through the [`PositionSink`]
/// passed to [`watch`](PositionSource::watch), in the order they occur,
/// from any thread.
pub trait PositionSource: Send + Sync {
    /// Whether the platform can provide location at all.
    fn is_supported(&self) -> bool;

    /// Begin delivering position updates to `sink`.
    fn watch(&self, options: &WatchOptions, sink: PositionSink) -> Result<WatchId, PlatformError>;

    /// Stop the watch identified by `id`.
    fn clear_watch(&self, id: WatchId) -> Result<(), PlatformError>;
}
