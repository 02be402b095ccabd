//! Location availability snapshots published by the session.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coord::Coordinates;

/// A single position fix delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    /// Where the device is.
    pub coords: Coordinates,
    /// Reported horizontal accuracy radius in meters.
    pub accuracy_m: f64,
    /// When the fix was captured.
    pub captured_at: DateTime<Utc>,
}

impl PositionFix {
    /// Create a fix stamped with the current time.
    pub fn new(coords: Coordinates, accuracy_m: f64) -> Self {
        Self::with_timestamp(coords, accuracy_m, Utc::now())
    }

    /// Create a fix with an explicit capture time.
    pub fn with_timestamp(coords: Coordinates, accuracy_m: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            coords,
            accuracy_m,
            captured_at,
        }
    }
}

/// Why the device position cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnavailableReason {
    /// The user refused location access.
    PermissionDenied,
    /// The platform could not determine a position.
    PositionUnavailable,
    /// No fix arrived within the configured wait.
    Timeout,
    /// The platform has no location capability at all.
    Unsupported,
}

/// How a host should treat an [`UnavailableReason`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The user can fix it (grant permission).
    Actionable,
    /// Likely to clear up on its own; the platform keeps trying.
    Transient,
    /// The device cannot provide location.
    Permanent,
}

impl UnavailableReason {
    /// Map a W3C geolocation error code (1, 2, 3) to a reason.
    ///
    /// Returns `None` for codes outside the defined set.
    pub fn from_platform_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::PermissionDenied),
            2 => Some(Self::PositionUnavailable),
            3 => Some(Self::Timeout),
            _ => None,
        }
    }

    /// Classify the failure for user-facing messaging.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::PermissionDenied => FailureKind::Actionable,
            Self::PositionUnavailable | Self::Timeout => FailureKind::Transient,
            Self::Unsupported => FailureKind::Permanent,
        }
    }

    /// Short host-renderable hint.
    pub fn hint(&self) -> &'static str {
        match self.kind() {
            FailureKind::Actionable => "enable location to access this",
            FailureKind::Transient => "retrying…",
            FailureKind::Permanent => "location not supported on this device",
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::PositionUnavailable => write!(f, "position unavailable"),
            Self::Timeout => write!(f, "timeout"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Current state of the device location, as seen by consumers.
///
/// Each value is an immutable snapshot; the session publishes a new one on
/// every transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationStatus {
    /// No fix or error has arrived yet.
    #[default]
    Initializing,
    /// A fix is available.
    Available(PositionFix),
    /// Location cannot be used.
    Unavailable(UnavailableReason),
}

impl LocationStatus {
    /// The latest fix, if the status is `Available`.
    pub fn fix(&self) -> Option<&PositionFix> {
        match self {
            Self::Available(fix) => Some(fix),
            _ => None,
        }
    }

    /// The failure reason, if the status is `Unavailable`.
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self {
            Self::Unavailable(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Whether a fix is available.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::Available(fix) => write!(f, "available {} ±{:.0}m", fix.coords, fix.accuracy_m),
            Self::Unavailable(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}
