//! Integration tests for the location session and proximity monitor.
//!
//! These tests drive the full pipeline through `GhostDropApp`:
//! - scripted platform fixes → session → monitor → per-listing views
//! - location failures and recovery
//! - purchase authorization and watch release on shutdown
//!
//! Run with: `cargo test --test proximity_integration`

use std::sync::Arc;
use std::time::Duration;

use ghostdrop::app::{AppConfig, GhostDropApp};
use ghostdrop::coord::{Coordinates, EARTH_RADIUS_M};
use ghostdrop::location::{LocationStatus, PositionFix, ScriptedSource, UnavailableReason};
use ghostdrop::proximity::{
    AccessDenied, AccessState, CatalogListing, GhostListing, ListingId, ProximityMonitor,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Zócalo, Mexico City.
const TARGET: Coordinates = Coordinates::from_raw(19.4326, -99.1332);

/// A point `meters` due north of `origin`.
fn north_of(origin: Coordinates, meters: f64) -> Coordinates {
    let delta = (meters / EARTH_RADIUS_M).to_degrees();
    Coordinates::from_raw(origin.latitude + delta, origin.longitude)
}

fn fix_at(coords: Coordinates) -> PositionFix {
    PositionFix::new(coords, 5.0)
}

fn ghost(id: &str, radius_m: u32) -> GhostListing {
    GhostListing::ghost(id, TARGET, radius_m, format!("Look under the bench ({})", id))
}

async fn start_app() -> (GhostDropApp, Arc<ScriptedSource>) {
    let source = Arc::new(ScriptedSource::new());
    let app = GhostDropApp::start(AppConfig::default(), source.clone())
        .await
        .expect("app should start");
    (app, source)
}

/// Wait until the monitor has applied a status matching `predicate`.
async fn wait_for_status<F>(monitor: &ProximityMonitor, predicate: F)
where
    F: Fn(&LocationStatus) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !predicate(&monitor.status()) {
        assert!(
            tokio::time::Instant::now() < deadline,
            "Timed out waiting for status, last was {}",
            monitor.status()
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Emit a fix and wait for the monitor to apply it.
async fn walk_to(source: &ScriptedSource, monitor: &ProximityMonitor, coords: Coordinates) {
    assert!(source.emit_fix(fix_at(coords)), "Watch should be active");
    wait_for_status(monitor, |status| {
        status.fix().map(|fix| fix.coords) == Some(coords)
    })
    .await;
}

fn state_of(monitor: &ProximityMonitor, id: &str) -> AccessState {
    monitor
        .decision(&ListingId::new(id))
        .map(|decision| decision.state)
        .expect("listing should be visible")
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Walking toward a ghost drop unlocks it once inside the radius.
#[tokio::test]
async fn test_walk_into_range_unlocks() {
    let (app, source) = start_app().await;
    let monitor = app.monitor();
    monitor.show(ghost("drop-1", 50));

    // No fix yet: neither locked nor unlocked
    assert_eq!(state_of(&monitor, "drop-1"), AccessState::Indeterminate);

    walk_to(&source, &monitor, north_of(TARGET, 200.0)).await;
    assert_eq!(state_of(&monitor, "drop-1"), AccessState::Locked);

    walk_to(&source, &monitor, north_of(TARGET, 100.0)).await;
    assert_eq!(state_of(&monitor, "drop-1"), AccessState::Locked);

    walk_to(&source, &monitor, north_of(TARGET, 30.0)).await;
    assert_eq!(state_of(&monitor, "drop-1"), AccessState::Unlocked);

    let view = monitor.view(&ListingId::new("drop-1")).unwrap();
    assert!(view.clue.is_none(), "Clue is resolved once unlocked");
    let distance = view.distance.expect("distance present with a fix");
    assert!((distance.meters - 30.0).abs() < 0.5, "Got {}", distance.meters);

    // Walking back out locks it again
    walk_to(&source, &monitor, north_of(TARGET, 75.0)).await;
    assert_eq!(state_of(&monitor, "drop-1"), AccessState::Locked);

    app.shutdown().await;
}

/// Every visible listing is evaluated against the same update.
#[tokio::test]
async fn test_multiple_listings_share_one_session() {
    let (app, source) = start_app().await;
    let monitor = app.monitor();

    monitor.show(ghost("near", 50));
    monitor.show(ghost("far", 10));
    monitor.show(GhostListing::regular("plain"));
    assert_eq!(monitor.len(), 3);

    // Regular listings never wait for location
    assert_eq!(state_of(&monitor, "plain"), AccessState::Unlocked);

    walk_to(&source, &monitor, north_of(TARGET, 25.0)).await;
    assert_eq!(state_of(&monitor, "near"), AccessState::Unlocked);
    assert_eq!(state_of(&monitor, "far"), AccessState::Locked);
    assert_eq!(state_of(&monitor, "plain"), AccessState::Unlocked);

    assert_eq!(source.watch_calls(), 1, "One platform watch for all listings");

    app.shutdown().await;
}

/// Permission denied locks the listing and surfaces the reason; granting
/// permission later recovers on the next fix.
#[tokio::test]
async fn test_permission_denied_then_recovery() {
    let (app, source) = start_app().await;
    let monitor = app.monitor();
    monitor.show(ghost("drop-1", 50));

    assert!(source.emit_code(1));
    wait_for_status(&monitor, |status| !matches!(status, LocationStatus::Initializing)).await;

    let view = monitor.view(&ListingId::new("drop-1")).unwrap();
    assert_eq!(view.state, AccessState::Locked);
    assert_eq!(view.unavailable, Some(UnavailableReason::PermissionDenied));
    assert!(view.distance.is_none());
    assert!(view.clue.is_some(), "Clue stays visible while locked");

    let denied = monitor.authorize(&ListingId::new("drop-1")).unwrap_err();
    assert_eq!(
        denied.unavailable_reason(),
        Some(UnavailableReason::PermissionDenied)
    );

    walk_to(&source, &monitor, TARGET).await;
    let view = monitor.view(&ListingId::new("drop-1")).unwrap();
    assert_eq!(view.state, AccessState::Unlocked);
    assert_eq!(view.unavailable, None);

    app.shutdown().await;
}

/// A platform without location support keeps ghost drops locked.
#[tokio::test]
async fn test_unsupported_platform_fails_closed() {
    let source = Arc::new(ScriptedSource::unsupported());
    let app = GhostDropApp::start(AppConfig::default(), source.clone())
        .await
        .unwrap();
    let monitor = app.monitor();

    wait_for_status(&monitor, |status| {
        *status == LocationStatus::Unavailable(UnavailableReason::Unsupported)
    })
    .await;

    monitor.show(ghost("drop-1", 5_000_000));
    assert_eq!(state_of(&monitor, "drop-1"), AccessState::Locked);
    assert_eq!(source.watch_calls(), 0);

    app.shutdown().await;
}

/// Purchases are refused until the viewer is in range.
#[tokio::test]
async fn test_purchase_authorization() {
    let (app, source) = start_app().await;
    let monitor = app.monitor();
    let id = ListingId::new("drop-1");
    monitor.show(ghost("drop-1", 50));

    assert!(matches!(
        monitor.authorize(&id),
        Err(AccessDenied::Indeterminate { .. })
    ));

    walk_to(&source, &monitor, north_of(TARGET, 120.0)).await;
    match monitor.authorize(&id) {
        Err(AccessDenied::OutOfRange {
            distance_m,
            radius_m,
            ..
        }) => {
            assert!((distance_m - 120.0).abs() < 0.5);
            assert_eq!(radius_m, 50);
        }
        other => panic!("Expected OutOfRange, got {:?}", other),
    }

    walk_to(&source, &monitor, north_of(TARGET, 10.0)).await;
    let clearance = monitor.authorize(&id).expect("in range");
    assert_eq!(clearance.listing, id);

    assert!(monitor.hide(&id));
    assert!(matches!(
        monitor.authorize(&id),
        Err(AccessDenied::NotVisible { .. })
    ));

    app.shutdown().await;
}

/// Catalog records load straight into the monitor.
#[tokio::test]
async fn test_catalog_listing_flow() {
    let (app, source) = start_app().await;
    let monitor = app.monitor();

    let record: CatalogListing = serde_json::from_str(
        r#"{
            "id": "catalog-7",
            "targetLatitude": 19.4326,
            "targetLongitude": -99.1332,
            "radiusMeters": 40,
            "clue": "Behind the flagpole",
            "isGhost": true
        }"#,
    )
    .unwrap();
    monitor.show(GhostListing::try_from(record).unwrap());

    walk_to(&source, &monitor, north_of(TARGET, 39.0)).await;
    assert_eq!(state_of(&monitor, "catalog-7"), AccessState::Unlocked);

    app.shutdown().await;
}

/// Shutdown releases the platform watch and ignores late platform events.
#[tokio::test]
async fn test_shutdown_releases_watch() {
    let (app, source) = start_app().await;
    let session = app.session();
    let sink = source.sink().expect("watch should be registered");
    assert_eq!(source.active_watches(), 1);

    app.shutdown().await;

    assert_eq!(source.active_watches(), 0);
    assert_eq!(source.clear_calls(), 1);
    assert!(!session.is_running());

    // A callback arriving after teardown changes nothing
    let before = session.status();
    assert!(!sink.deliver_fix(fix_at(TARGET)));
    assert_eq!(session.status(), before);
}

/// Dropping the app without calling shutdown still releases the watch.
#[tokio::test]
async fn test_drop_releases_watch() {
    let (app, source) = start_app().await;
    assert_eq!(source.active_watches(), 1);

    drop(app);
    assert_eq!(source.active_watches(), 0);
}
