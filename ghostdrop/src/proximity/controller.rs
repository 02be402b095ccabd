//! Per-listing proximity access state machine.

use serde::Serialize;
use tracing::{debug, info};

use super::clue::ClueDisclosure;
use super::decision::{evaluate, AccessDecision, AccessState, DistanceSample};
use super::error::AccessDenied;
use super::listing::{GhostListing, ListingId};
use crate::location::{LocationStatus, UnavailableReason};

/// Proof that a privileged action on a listing was allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseClearance {
    pub listing: ListingId,
    /// Distance at the time of clearance (absent for regular listings).
    pub distance_m: Option<f64>,
}

/// Everything a host needs to render one listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub listing: ListingId,
    pub state: AccessState,
    pub distance: Option<DistanceSample>,
    /// Clue text, present only while locked.
    pub clue: Option<String>,
    pub unavailable: Option<UnavailableReason>,
}

/// Decides whether the current viewer may access one listing.
///
/// The controller never patches its decision: every [`observe`](Self::observe)
/// call recomputes it from the listing and the new status. The cached
/// decision exists only so hosts can read it between updates.
#[derive(Debug, Clone)]
pub struct ProximityAccessController {
    listing: GhostListing,
    decision: AccessDecision,
}

impl ProximityAccessController {
    /// Create a controller and evaluate it against `status` immediately.
    pub fn new(listing: GhostListing, status: &LocationStatus) -> Self {
        let decision = evaluate(&listing, status);
        debug!(
            listing = %listing.id(),
            ghost = listing.is_ghost(),
            state = %decision.state,
            "Proximity controller created"
        );
        Self { listing, decision }
    }

    /// Re-evaluate against a new location status.
    pub fn observe(&mut self, status: &LocationStatus) -> &AccessDecision {
        let next = evaluate(&self.listing, status);

        if next.state != self.decision.state {
            info!(
                listing = %self.listing.id(),
                from = %self.decision.state,
                to = %next.state,
                distance_m = next.distance.map(|d| d.meters),
                radius_m = self.listing.radius_m(),
                "Access state transition"
            );
        }

        self.decision = next;
        &self.decision
    }

    pub fn listing(&self) -> &GhostListing {
        &self.listing
    }

    pub fn decision(&self) -> &AccessDecision {
        &self.decision
    }

    pub fn state(&self) -> AccessState {
        self.decision.state
    }

    /// Latest distance sample, if a fix was available for a gated listing.
    pub fn distance(&self) -> Option<&DistanceSample> {
        self.decision.distance.as_ref()
    }

    /// Location failure currently keeping the listing locked.
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        self.decision.unavailable
    }

    /// Clue disclosure for the current state.
    pub fn clue(&self) -> ClueDisclosure<'_> {
        ClueDisclosure::project(&self.listing, self.decision.state)
    }

    /// Allow a purchase only when the listing is unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] describing why the listing is not unlocked.
    pub fn authorize_purchase(&self) -> Result<PurchaseClearance, AccessDenied> {
        let listing = self.listing.id().clone();
        match self.decision.state {
            AccessState::Unlocked => Ok(PurchaseClearance {
                listing,
                distance_m: self.decision.distance.map(|d| d.meters),
            }),
            AccessState::Indeterminate => Err(AccessDenied::Indeterminate { listing }),
            AccessState::Locked => match (self.decision.unavailable, self.decision.distance) {
                (Some(reason), _) => Err(AccessDenied::LocationUnavailable { listing, reason }),
                (None, Some(sample)) => Err(AccessDenied::OutOfRange {
                    listing,
                    distance_m: sample.meters,
                    radius_m: self.listing.radius_m(),
                }),
                (None, None) => Err(AccessDenied::Indeterminate { listing }),
            },
        }
    }

    /// Host-facing snapshot.
    pub fn view(&self) -> ListingView {
        ListingView {
            listing: self.listing.id().clone(),
            state: self.decision.state,
            distance: self.decision.distance,
            clue: self.clue().text().map(str::to_owned),
            unavailable: self.decision.unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{Coordinates, EARTH_RADIUS_M};
    use crate::location::PositionFix;

    const TARGET: Coordinates = Coordinates::from_raw(19.0, -98.2);

    fn meters_north(m: f64) -> LocationStatus {
        let deg = m / (EARTH_RADIUS_M * std::f64::consts::PI / 180.0);
        LocationStatus::Available(PositionFix::new(
            Coordinates::from_raw(TARGET.latitude + deg, TARGET.longitude),
            5.0,
        ))
    }

    fn drop_listing() -> GhostListing {
        GhostListing::ghost("drop-1", TARGET, 50, "Under the old clock")
    }

    #[test]
    fn test_initial_state_ghost_initializing() {
        let controller =
            ProximityAccessController::new(drop_listing(), &LocationStatus::Initializing);
        assert_eq!(controller.state(), AccessState::Indeterminate);
        assert_eq!(controller.clue(), ClueDisclosure::Hidden);
    }

    #[test]
    fn test_initial_state_regular_is_unlocked() {
        let controller = ProximityAccessController::new(
            GhostListing::regular("plain"),
            &LocationStatus::Unavailable(UnavailableReason::Unsupported),
        );
        assert_eq!(controller.state(), AccessState::Unlocked);
        assert!(controller.distance().is_none());
        assert!(controller.authorize_purchase().is_ok());
    }

    #[test]
    fn test_walk_into_range() {
        let mut controller =
            ProximityAccessController::new(drop_listing(), &LocationStatus::Initializing);

        let states: Vec<AccessState> = [200.0, 100.0, 30.0]
            .iter()
            .map(|m| controller.observe(&meters_north(*m)).state)
            .collect();

        assert_eq!(
            states,
            vec![AccessState::Locked, AccessState::Locked, AccessState::Unlocked]
        );
    }

    #[test]
    fn test_walk_out_of_range_relocks() {
        let mut controller = ProximityAccessController::new(drop_listing(), &meters_north(30.0));
        assert_eq!(controller.state(), AccessState::Unlocked);

        controller.observe(&meters_north(49.0));
        assert_eq!(controller.state(), AccessState::Unlocked);

        controller.observe(&meters_north(80.0));
        assert_eq!(controller.state(), AccessState::Locked);
    }

    #[test]
    fn test_permission_denied_after_locked() {
        let mut controller =
            ProximityAccessController::new(drop_listing(), &meters_north(111.0));
        assert_eq!(controller.state(), AccessState::Locked);

        controller.observe(&LocationStatus::Unavailable(
            UnavailableReason::PermissionDenied,
        ));
        assert_eq!(controller.state(), AccessState::Locked);
        assert_eq!(
            controller.unavailable_reason(),
            Some(UnavailableReason::PermissionDenied)
        );
        assert!(controller.distance().is_none(), "Stale distance must not survive");
    }

    #[test]
    fn test_unavailable_relocks_unlocked_listing() {
        let mut controller = ProximityAccessController::new(drop_listing(), &meters_north(0.0));
        assert_eq!(controller.state(), AccessState::Unlocked);

        controller.observe(&LocationStatus::Unavailable(UnavailableReason::Timeout));
        assert_eq!(controller.state(), AccessState::Locked);
    }

    #[test]
    fn test_clue_revealed_when_locked() {
        let controller = ProximityAccessController::new(drop_listing(), &meters_north(200.0));
        assert_eq!(controller.clue().text(), Some("Under the old clock"));
        assert_eq!(
            controller.view().clue.as_deref(),
            Some("Under the old clock")
        );
    }

    #[test]
    fn test_purchase_rejected_out_of_range() {
        let controller = ProximityAccessController::new(drop_listing(), &meters_north(200.0));
        let err = controller.authorize_purchase().unwrap_err();
        match err {
            AccessDenied::OutOfRange {
                distance_m,
                radius_m,
                ..
            } => {
                assert!((distance_m - 200.0).abs() < 0.01);
                assert_eq!(radius_m, 50);
            }
            other => panic!("Expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_purchase_rejected_while_indeterminate() {
        let controller =
            ProximityAccessController::new(drop_listing(), &LocationStatus::Initializing);
        assert!(matches!(
            controller.authorize_purchase(),
            Err(AccessDenied::Indeterminate { .. })
        ));
    }

    #[test]
    fn test_purchase_rejected_when_location_unavailable() {
        let controller = ProximityAccessController::new(
            drop_listing(),
            &LocationStatus::Unavailable(UnavailableReason::PermissionDenied),
        );
        let err = controller.authorize_purchase().unwrap_err();
        assert_eq!(
            err.unavailable_reason(),
            Some(UnavailableReason::PermissionDenied)
        );
    }

    #[test]
    fn test_purchase_allowed_when_unlocked() {
        let controller = ProximityAccessController::new(drop_listing(), &meters_north(10.0));
        let clearance = controller.authorize_purchase().unwrap();
        assert_eq!(clearance.listing.as_str(), "drop-1");
        assert!((clearance.distance_m.unwrap() - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_view_snapshot() {
        let controller = ProximityAccessController::new(drop_listing(), &meters_north(10.0));
        let view = controller.view();
        assert_eq!(view.state, AccessState::Unlocked);
        assert!(view.clue.is_none());
        assert!(view.distance.is_some());
    }
}
