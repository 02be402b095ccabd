//! Access decisions and the pure evaluation function.
//!
//! ```text
//! is_ghost == false            → Unlocked
//! Unavailable(reason)          → Locked   (fail closed)
//! Initializing                 → Indeterminate
//! Available(fix), d <= radius  → Unlocked (boundary inclusive)
//! Available(fix), d >  radius  → Locked
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::listing::GhostListing;
use crate::coord::{distance, Coordinates};
use crate::location::{LocationStatus, UnavailableReason};

/// Whether the viewer may access a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessState {
    /// Viewer is out of range, or location is unavailable.
    Locked,
    /// Viewer is within range, or the listing is not gated.
    Unlocked,
    /// Waiting for the first location reading.
    Indeterminate,
}

impl AccessState {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked)
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Unlocked => write!(f, "unlocked"),
            Self::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// A distance measurement for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceSample {
    /// Great-circle distance to the target in meters.
    pub meters: f64,
    /// Viewer position the distance was computed from.
    pub computed_from: Coordinates,
    /// Capture time of that position.
    pub at: DateTime<Utc>,
}

/// Full result of evaluating one listing against one location status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccessDecision {
    pub state: AccessState,
    /// Present only when the listing is gated and a fix is available.
    pub distance: Option<DistanceSample>,
    /// Present only when location is unavailable for a gated listing.
    pub unavailable: Option<UnavailableReason>,
}

impl AccessDecision {
    fn unlocked() -> Self {
        Self {
            state: AccessState::Unlocked,
            distance: None,
            unavailable: None,
        }
    }
}

/// Whether `meters` falls within `radius_m`. The boundary counts as inside.
#[inline]
pub fn within_radius(meters: f64, radius_m: u32) -> bool {
    meters <= f64::from(radius_m)
}

/// Evaluate access for `listing` under `status`.
///
/// Pure: the result depends only on the two inputs, and is recomputed from
/// scratch on every call.
pub fn evaluate(listing: &GhostListing, status: &LocationStatus) -> AccessDecision {
    if !listing.is_ghost() {
        return AccessDecision::unlocked();
    }

    match status {
        LocationStatus::Unavailable(reason) => AccessDecision {
            state: AccessState::Locked,
            distance: None,
            unavailable: Some(*reason),
        },
        LocationStatus::Initializing => AccessDecision {
            state: AccessState::Indeterminate,
            distance: None,
            unavailable: None,
        },
        LocationStatus::Available(fix) => {
            let meters = distance(fix.coords, listing.target());
            let state = if within_radius(meters, listing.radius_m()) {
                AccessState::Unlocked
            } else {
                AccessState::Locked
            };
            AccessDecision {
                state,
                distance: Some(DistanceSample {
                    meters,
                    computed_from: fix.coords,
                    at: fix.captured_at,
                }),
                unavailable: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::PositionFix;

    fn drop_listing(radius_m: u32) -> GhostListing {
        GhostListing::ghost(
            "drop-1",
            Coordinates::from_raw(19.0, -98.2),
            radius_m,
            "Under the old clock",
        )
    }

    fn at(lat: f64, lon: f64) -> LocationStatus {
        LocationStatus::Available(PositionFix::new(Coordinates::from_raw(lat, lon), 5.0))
    }

    #[test]
    fn test_viewer_at_target_unlocks() {
        let decision = evaluate(&drop_listing(50), &at(19.0, -98.2));
        assert_eq!(decision.state, AccessState::Unlocked);
        assert_eq!(decision.distance.unwrap().meters, 0.0);
    }

    #[test]
    fn test_viewer_111m_north_is_locked() {
        let decision = evaluate(&drop_listing(50), &at(19.001, -98.2));
        assert_eq!(decision.state, AccessState::Locked);
        let meters = decision.distance.unwrap().meters;
        assert!((meters - 111.19).abs() < 0.1, "Expected ~111 m, got {}", meters);
        assert_eq!(decision.unavailable, None);
    }

    #[test]
    fn test_distance_sample_records_source() {
        let fix = PositionFix::new(Coordinates::from_raw(19.001, -98.2), 5.0);
        let decision = evaluate(&drop_listing(50), &LocationStatus::Available(fix));
        let sample = decision.distance.unwrap();
        assert_eq!(sample.computed_from, fix.coords);
        assert_eq!(sample.at, fix.captured_at);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(within_radius(50.0, 50));
        assert!(!within_radius(50.000_001, 50));
        assert!(within_radius(0.0, 0));
    }

    #[test]
    fn test_zero_radius_requires_exact_point() {
        let listing = drop_listing(0);
        assert_eq!(
            evaluate(&listing, &at(19.0, -98.2)).state,
            AccessState::Unlocked
        );
        assert_eq!(
            evaluate(&listing, &at(19.00001, -98.2)).state,
            AccessState::Locked
        );
    }

    #[test]
    fn test_unavailable_fails_closed() {
        for reason in [
            UnavailableReason::PermissionDenied,
            UnavailableReason::PositionUnavailable,
            UnavailableReason::Timeout,
            UnavailableReason::Unsupported,
        ] {
            let decision = evaluate(&drop_listing(50), &LocationStatus::Unavailable(reason));
            assert_eq!(decision.state, AccessState::Locked);
            assert_eq!(decision.distance, None);
            assert_eq!(decision.unavailable, Some(reason));
        }
    }

    #[test]
    fn test_initializing_is_indeterminate() {
        let decision = evaluate(&drop_listing(50), &LocationStatus::Initializing);
        assert_eq!(decision.state, AccessState::Indeterminate);
        assert_eq!(decision.distance, None);
    }

    #[test]
    fn test_regular_listing_bypasses_location() {
        let listing = GhostListing::regular("plain");
        for status in [
            LocationStatus::Initializing,
            LocationStatus::Unavailable(UnavailableReason::Unsupported),
            at(0.0, 0.0),
        ] {
            let decision = evaluate(&listing, &status);
            assert_eq!(decision.state, AccessState::Unlocked);
            assert_eq!(decision.distance, None, "No distance for regular listings");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_reason() -> impl Strategy<Value = UnavailableReason> {
            prop_oneof![
                Just(UnavailableReason::PermissionDenied),
                Just(UnavailableReason::PositionUnavailable),
                Just(UnavailableReason::Timeout),
                Just(UnavailableReason::Unsupported),
            ]
        }

        proptest! {
            #[test]
            fn test_ghost_fails_closed(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
                radius in 0u32..=20_000_000,
                reason in any_reason(),
            ) {
                let listing = GhostListing::ghost("p", Coordinates::from_raw(lat, lon), radius, "");
                let decision = evaluate(&listing, &LocationStatus::Unavailable(reason));
                prop_assert_eq!(decision.state, AccessState::Locked);
            }

            #[test]
            fn test_regular_always_unlocked(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
                reason in any_reason(),
            ) {
                let listing = GhostListing::regular("p");
                prop_assert_eq!(
                    evaluate(&listing, &LocationStatus::Unavailable(reason)).state,
                    AccessState::Unlocked
                );
                prop_assert_eq!(evaluate(&listing, &at(lat, lon)).state, AccessState::Unlocked);
            }

            #[test]
            fn test_unlock_matches_distance(
                lat in -89.0..=89.0_f64,
                lon in -179.0..=179.0_f64,
                dlat in -0.01..=0.01_f64,
                radius in 0u32..=2_000,
            ) {
                let target = Coordinates::from_raw(lat, lon);
                let listing = GhostListing::ghost("p", target, radius, "");
                let status = at(lat + dlat, lon);
                let decision = evaluate(&listing, &status);
                let meters = decision.distance.expect("distance for available fix").meters;
                prop_assert_eq!(
                    decision.state == AccessState::Unlocked,
                    meters <= f64::from(radius)
                );
            }
        }
    }
}
