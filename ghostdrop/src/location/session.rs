//! The single live device-position subscription.
//!
//! [`LocationSession`] is the only writer of [`LocationStatus`]. Every
//! transition replaces the snapshot under a write lock and is broadcast to
//! subscribers while that lock is held, so all subscribers observe updates
//! in exactly the order the platform delivered them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use super::platform::{PlatformError, PositionSource, WatchId, WatchOptions};
use super::status::{LocationStatus, PositionFix, UnavailableReason};

/// Default number of status updates buffered per subscriber.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Generation value meaning "no active watch".
const NO_WATCH: u64 = 0;

/// State shared between the session and the sinks it hands to the platform.
struct SessionShared {
    status: RwLock<LocationStatus>,
    events: broadcast::Sender<LocationStatus>,
    /// Generation of the active watch, or [`NO_WATCH`].
    ///
    /// Only written while holding the `status` write lock.
    active_generation: AtomicU64,
}

impl SessionShared {
    fn new(event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            status: RwLock::new(LocationStatus::Initializing),
            events,
            active_generation: AtomicU64::new(NO_WATCH),
        }
    }

    /// Publish unconditionally.
    fn publish(&self, status: LocationStatus) {
        let mut current = self.status.write();
        *current = status;
        // No receivers is fine; the snapshot is still updated.
        let _ = self.events.send(status);
    }

    /// Publish only if `generation` is the active watch.
    fn publish_for(&self, generation: u64, status: LocationStatus) -> bool {
        let mut current = self.status.write();
        if generation == NO_WATCH || self.active_generation.load(Ordering::Acquire) != generation {
            return false;
        }
        *current = status;
        let _ = self.events.send(status);
        true
    }

    /// Make `generation` the active watch and drop any status left over
    /// from a previous watch.
    fn activate(&self, generation: u64) {
        let mut current = self.status.write();
        self.active_generation.store(generation, Ordering::Release);
        if !matches!(*current, LocationStatus::Initializing) {
            *current = LocationStatus::Initializing;
            let _ = self.events.send(LocationStatus::Initializing);
        }
    }

    fn set_active_generation(&self, generation: u64) {
        let _guard = self.status.write();
        self.active_generation.store(generation, Ordering::Release);
    }

    fn active_generation(&self) -> u64 {
        self.active_generation.load(Ordering::Acquire)
    }
}

/// Callback handle the platform uses to deliver fixes and errors.
///
/// Deliveries after the owning watch has been stopped are discarded.
#[derive(Clone)]
pub struct PositionSink {
    shared: Arc<SessionShared>,
    generation: u64,
}

impl PositionSink {
    /// Deliver a new fix. Returns `false` if the watch is no longer active.
    pub fn deliver_fix(&self, fix: PositionFix) -> bool {
        let accepted = self
            .shared
            .publish_for(self.generation, LocationStatus::Available(fix));
        if accepted {
            trace!(
                lat = fix.coords.latitude,
                lon = fix.coords.longitude,
                accuracy_m = fix.accuracy_m,
                "Position fix"
            );
        } else {
            trace!(generation = self.generation, "Discarding fix for stopped watch");
        }
        accepted
    }

    /// Deliver a platform error. Returns `false` if the watch is no longer active.
    ///
    /// The watch stays alive; a later fix moves the status back to available.
    pub fn deliver_error(&self, error: PlatformError) -> bool {
        let reason = error.reason();
        let accepted = self
            .shared
            .publish_for(self.generation, LocationStatus::Unavailable(reason));
        if accepted {
            warn!(error = %error, reason = %reason, "Location error");
        }
        accepted
    }

    /// Whether the watch this sink belongs to is still active.
    pub fn is_active(&self) -> bool {
        self.shared.active_generation() == self.generation
    }
}

impl std::fmt::Debug for PositionSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionSink")
            .field("generation", &self.generation)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Owns the platform watch and publishes location status.
///
/// Create one per running client, share it behind an `Arc`, and tear it
/// down with [`stop`](Self::stop). Dropping the session also stops it.
///
/// # Example
///
/// ```ignore
/// let session = LocationSession::new(source, WatchOptions::default());
/// let (initial, rx) = session.subscribe();
/// session.start();
/// // ... consumers read session.status() or drain rx ...
/// session.stop();
/// ```
pub struct LocationSession {
    source: Arc<dyn PositionSource>,
    options: WatchOptions,
    shared: Arc<SessionShared>,
    watch: Mutex<Option<WatchId>>,
    next_generation: AtomicU64,
}

impl LocationSession {
    /// Create a session with the default event buffer.
    pub fn new(source: Arc<dyn PositionSource>, options: WatchOptions) -> Self {
        Self::with_event_buffer(source, options, DEFAULT_EVENT_BUFFER)
    }

    /// Create a session with a specific per-subscriber event buffer.
    pub fn with_event_buffer(
        source: Arc<dyn PositionSource>,
        options: WatchOptions,
        event_buffer: usize,
    ) -> Self {
        Self {
            source,
            options,
            shared: Arc::new(SessionShared::new(event_buffer)),
            watch: Mutex::new(None),
            next_generation: AtomicU64::new(NO_WATCH),
        }
    }

    /// Begin watching the device position.
    ///
    /// Idempotent while running. If the platform has no location capability
    /// the status becomes `Unavailable(Unsupported)` and nothing else happens.
    /// A failure to start the watch is published as status, never returned.
    pub fn start(&self) {
        let mut watch = self.watch.lock();
        if watch.is_some() {
            debug!("Location session already running");
            return;
        }

        if !self.source.is_supported() {
            warn!("Platform has no location capability");
            self.shared
                .publish(LocationStatus::Unavailable(UnavailableReason::Unsupported));
            return;
        }

        // Activate before calling the platform: it may deliver a cached fix
        // synchronously from inside `watch`.
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.shared.activate(generation);
        let sink = PositionSink {
            shared: Arc::clone(&self.shared),
            generation,
        };

        match self.source.watch(&self.options, sink) {
            Ok(id) => {
                info!(
                    watch = %id,
                    high_accuracy = self.options.high_accuracy,
                    maximum_age_ms = self.options.maximum_age.as_millis() as u64,
                    timeout_ms = self.options.timeout.as_millis() as u64,
                    "Location session started"
                );
                *watch = Some(id);
            }
            Err(e) => {
                warn!(error = %e, "Failed to start location watch");
                self.shared.set_active_generation(NO_WATCH);
                self.shared.publish(LocationStatus::Unavailable(e.reason()));
            }
        }
    }

    /// Cancel the platform watch.
    ///
    /// A no-op when not running. The watch is considered released even if
    /// the platform reports an error while clearing it.
    pub fn stop(&self) {
        let Some(id) = self.watch.lock().take() else {
            return;
        };

        self.shared.set_active_generation(NO_WATCH);

        match self.source.clear_watch(id) {
            Ok(()) => info!(watch = %id, "Location session stopped"),
            Err(e) => warn!(watch = %id, error = %e, "Error clearing location watch"),
        }
    }

    /// Whether a platform watch is currently held.
    pub fn is_running(&self) -> bool {
        self.watch.lock().is_some()
    }

    /// Apply a fix as if delivered by the active watch.
    ///
    /// Returns `false` (and changes nothing) when the session is not running.
    pub fn on_update(&self, fix: PositionFix) -> bool {
        self.current_sink()
            .map(|sink| sink.deliver_fix(fix))
            .unwrap_or(false)
    }

    /// Apply a platform error as if delivered by the active watch.
    ///
    /// Returns `false` (and changes nothing) when the session is not running.
    pub fn on_error(&self, error: PlatformError) -> bool {
        self.current_sink()
            .map(|sink| sink.deliver_error(error))
            .unwrap_or(false)
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> LocationStatus {
        *self.shared.status.read()
    }

    /// Subscribe to status updates.
    ///
    /// Returns the current snapshot together with a receiver that yields
    /// every subsequent update, with nothing lost in between.
    pub fn subscribe(&self) -> (LocationStatus, broadcast::Receiver<LocationStatus>) {
        let current = self.shared.status.read();
        (*current, self.shared.events.subscribe())
    }

    /// The watch options this session was created with.
    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    fn current_sink(&self) -> Option<PositionSink> {
        match self.shared.active_generation() {
            NO_WATCH => None,
            generation => Some(PositionSink {
                shared: Arc::clone(&self.shared),
                generation,
            }),
        }
    }
}

impl Drop for LocationSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for LocationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSession")
            .field("options", &self.options)
            .field("watch", &*self.watch.lock())
            .field("status", &self.status())
            .finish()
    }
}
