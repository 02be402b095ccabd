//! Registry of active controllers, driven by the location session.
//!
//! One [`ProximityMonitor`] holds a controller per visible gated listing.
//! Each location update is applied to every controller under a single
//! write lock, so no controller sees update N+1 before all of them have
//! seen update N.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::controller::{ListingView, ProximityAccessController, PurchaseClearance};
use super::decision::AccessDecision;
use super::error::AccessDenied;
use super::listing::{GhostListing, ListingId};
use crate::location::LocationStatus;

struct MonitorState {
    status: LocationStatus,
    controllers: BTreeMap<ListingId, ProximityAccessController>,
}

/// Tracks access decisions for every visible listing.
///
/// # Example
///
/// ```ignore
/// let (initial, rx) = session.subscribe();
/// let monitor = Arc::new(ProximityMonitor::new(initial));
/// tokio::spawn(Arc::clone(&monitor).run(rx, cancel.clone()));
///
/// monitor.show(listing);
/// let view = monitor.view(&id);
/// ```
pub struct ProximityMonitor {
    state: RwLock<MonitorState>,
}

impl Default for ProximityMonitor {
    fn default() -> Self {
        Self::new(LocationStatus::Initializing)
    }
}

impl ProximityMonitor {
    /// Create a monitor seeded with the current location status.
    pub fn new(initial: LocationStatus) -> Self {
        Self {
            state: RwLock::new(MonitorState {
                status: initial,
                controllers: BTreeMap::new(),
            }),
        }
    }

    /// Apply a location update to every active controller.
    pub fn apply(&self, status: LocationStatus) {
        let mut state = self.state.write();
        state.status = status;
        let MonitorState {
            status,
            controllers,
        } = &mut *state;
        for controller in controllers.values_mut() {
            controller.observe(status);
        }
    }

    /// Start tracking a listing that became visible.
    ///
    /// The controller is evaluated against the last applied status right
    /// away. Showing a listing that is already tracked replaces it with the
    /// fresh metadata.
    pub fn show(&self, listing: GhostListing) -> AccessDecision {
        let mut state = self.state.write();
        let controller = ProximityAccessController::new(listing, &state.status);
        let decision = *controller.decision();
        state
            .controllers
            .insert(controller.listing().id().clone(), controller);
        decision
    }

    /// Stop tracking a listing. Returns `false` if it was not tracked.
    pub fn hide(&self, id: &ListingId) -> bool {
        let removed = self.state.write().controllers.remove(id).is_some();
        if removed {
            debug!(listing = %id, "Proximity controller removed");
        }
        removed
    }

    /// The last applied location status.
    pub fn status(&self) -> LocationStatus {
        self.state.read().status
    }

    /// Current decision for a listing.
    pub fn decision(&self, id: &ListingId) -> Option<AccessDecision> {
        self.state
            .read()
            .controllers
            .get(id)
            .map(|c| *c.decision())
    }

    /// Host-facing view of a listing.
    pub fn view(&self, id: &ListingId) -> Option<ListingView> {
        self.state.read().controllers.get(id).map(|c| c.view())
    }

    /// Views of all tracked listings, ordered by id.
    pub fn views(&self) -> Vec<ListingView> {
        self.state
            .read()
            .controllers
            .values()
            .map(|c| c.view())
            .collect()
    }

    /// Number of tracked listings.
    pub fn len(&self) -> usize {
        self.state.read().controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gate a purchase on the listing being unlocked.
    ///
    /// # Errors
    ///
    /// [`AccessDenied::NotVisible`] if the listing is not tracked, otherwise
    /// whatever the listing's controller reports.
    pub fn authorize(&self, id: &ListingId) -> Result<PurchaseClearance, AccessDenied> {
        let state = self.state.read();
        match state.controllers.get(id) {
            Some(controller) => controller.authorize_purchase(),
            None => Err(AccessDenied::NotVisible {
                listing: id.clone(),
            }),
        }
    }

    /// Apply session updates in order until cancelled or the session closes.
    pub async fn run(
        self: Arc<Self>,
        mut rx: broadcast::Receiver<LocationStatus>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("Proximity monitor cancelled");
                    break;
                }

                result = rx.recv() => {
                    match result {
                        Ok(status) => self.apply(status),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(skipped = n, "Proximity monitor lagged behind location updates");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            debug!("Location channel closed");
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for ProximityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("ProximityMonitor")
            .field("status", &state.status)
            .field("listings", &state.controllers.len())
            .finish()
    }
}
