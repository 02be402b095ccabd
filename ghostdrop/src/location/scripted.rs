//! Deterministic in-process position source.
//!
//! [`ScriptedSource`] stands in for a device location API: callers push
//! fixes and errors through it by hand, which makes position streams
//! reproducible for tests and for replaying recorded tracks.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::platform::{PlatformError, PositionSource, WatchId, WatchOptions};
use super::session::PositionSink;
use super::status::PositionFix;
use crate::coord::{CoordError, Coordinates};

/// One recorded event in a position track.
///
/// Deserializes from either `{"lat": .., "lon": .., "accuracy": ..}` or
/// `{"error": <code>}` where `code` is a W3C geolocation error code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackStep {
    /// A position fix.
    Fix {
        lat: f64,
        lon: f64,
        #[serde(default = "default_accuracy")]
        accuracy: f64,
    },
    /// A platform error code.
    Error { error: u16 },
}

fn default_accuracy() -> f64 {
    10.0
}

impl TrackStep {
    /// The validated fix for a `Fix` step, or `None` for an error step.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError`] if the recorded position is out of range.
    pub fn to_fix(&self) -> Result<Option<PositionFix>, CoordError> {
        match *self {
            TrackStep::Fix { lat, lon, accuracy } => {
                Ok(Some(PositionFix::new(Coordinates::new(lat, lon)?, accuracy)))
            }
            TrackStep::Error { .. } => Ok(None),
        }
    }
}

#[derive(Default)]
struct ScriptedInner {
    active: Option<(WatchId, PositionSink)>,
    next_id: u64,
    watch_calls: usize,
    clear_calls: usize,
    fail_watch: Option<PlatformError>,
    fail_clear: bool,
    last_options: Option<WatchOptions>,
}

/// A [`PositionSource`] driven by explicit calls.
pub struct ScriptedSource {
    supported: bool,
    inner: Mutex<ScriptedInner>,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSource {
    /// A source reporting location support.
    pub fn new() -> Self {
        Self {
            supported: true,
            inner: Mutex::new(ScriptedInner::default()),
        }
    }

    /// A source for a platform with no location capability.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            inner: Mutex::new(ScriptedInner::default()),
        }
    }

    /// Make the next `watch` calls fail with `error` (or succeed with `None`).
    pub fn fail_watch(&self, error: Option<PlatformError>) {
        self.inner.lock().fail_watch = error;
    }

    /// Make `clear_watch` report an error.
    pub fn fail_clear_watch(&self, fail: bool) {
        self.inner.lock().fail_clear = fail;
    }

    /// Deliver a fix to the active watch. Returns `false` if none is active.
    pub fn emit_fix(&self, fix: PositionFix) -> bool {
        match self.sink() {
            Some(sink) => sink.deliver_fix(fix),
            None => false,
        }
    }

    /// Deliver an error to the active watch. Returns `false` if none is active.
    pub fn emit_error(&self, error: PlatformError) -> bool {
        match self.sink() {
            Some(sink) => sink.deliver_error(error),
            None => false,
        }
    }

    /// Deliver a W3C geolocation error code to the active watch.
    pub fn emit_code(&self, code: u16) -> bool {
        self.emit_error(PlatformError::from_code(code))
    }

    /// Deliver one recorded track step.
    ///
    /// Returns `Ok(false)` if no watch is active.
    ///
    /// # Errors
    ///
    /// An out-of-range fix is rejected and nothing is delivered.
    pub fn play(&self, step: &TrackStep) -> Result<bool, CoordError> {
        if let TrackStep::Error { error } = *step {
            return Ok(self.emit_code(error));
        }
        Ok(step.to_fix()?.map_or(false, |fix| self.emit_fix(fix)))
    }

    /// The sink of the active watch, if any.
    pub fn sink(&self) -> Option<PositionSink> {
        self.inner
            .lock()
            .active
            .as_ref()
            .map(|(_, sink)| sink.clone())
    }

    /// Number of watches currently held open.
    pub fn active_watches(&self) -> usize {
        usize::from(self.inner.lock().active.is_some())
    }

    /// Number of times `watch` was called.
    pub fn watch_calls(&self) -> usize {
        self.inner.lock().watch_calls
    }

    /// Number of times `clear_watch` was called.
    pub fn clear_calls(&self) -> usize {
        self.inner.lock().clear_calls
    }

    /// Options passed to the most recent `watch` call.
    pub fn last_options(&self) -> Option<WatchOptions> {
        self.inner.lock().last_options
    }
}

impl PositionSource for ScriptedSource {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn watch(&self, options: &WatchOptions, sink: PositionSink) -> Result<WatchId, PlatformError> {
        let mut inner = self.inner.lock();
        inner.watch_calls += 1;
        inner.last_options = Some(*options);
        if let Some(error) = inner.fail_watch.clone() {
            return Err(error);
        }
        inner.next_id += 1;
        let id = WatchId(inner.next_id);
        inner.active = Some((id, sink));
        Ok(id)
    }

    fn clear_watch(&self, id: WatchId) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        inner.clear_calls += 1;
        if inner.fail_clear {
            return Err(PlatformError::Backend(format!("cannot clear {}", id)));
        }
        match inner.active {
            Some((active, _)) if active == id => {
                inner.active = None;
                Ok(())
            }
            _ => Err(PlatformError::Backend(format!("unknown {}", id))),
        }
    }
}
