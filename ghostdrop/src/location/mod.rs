//! Device location session.
//!
//! This module owns the one live subscription to the platform's continuous
//! position updates and turns everything the platform reports into
//! [`LocationStatus`] snapshots. Errors are data here: a denied permission or
//! a timeout becomes `Unavailable(reason)`, never an `Err` handed to consumers.
//!
//! # Architecture
//!
//! ```text
//! PositionSource ──(PositionSink)──► LocationSession ──► status() snapshot
//!   (platform)       fixes/errors      (single writer)  └► broadcast subscribers
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ghostdrop::coord::Coordinates;
//! use ghostdrop::location::{
//!     LocationSession, LocationStatus, PositionFix, ScriptedSource, WatchOptions,
//! };
//!
//! let source = Arc::new(ScriptedSource::new());
//! let session = LocationSession::new(source.clone(), WatchOptions::default());
//! session.start();
//!
//! source.emit_fix(PositionFix::new(Coordinates::from_raw(19.0, -98.2), 5.0));
//! assert!(session.status().is_available());
//!
//! session.stop();
//! ```

mod platform;
mod scripted;
mod session;
mod status;

pub use platform::{
    PlatformError, PositionSource, WatchId, WatchOptions, DEFAULT_MAXIMUM_AGE, DEFAULT_TIMEOUT,
};
pub use scripted::{ScriptedSource, TrackStep};
pub use session::{LocationSession, PositionSink, DEFAULT_EVENT_BUFFER};
pub use status::{FailureKind, LocationStatus, PositionFix, UnavailableReason};
