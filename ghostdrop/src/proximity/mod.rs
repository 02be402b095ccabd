//! Proximity-gated listing access.
//!
//! A ghost listing stays locked until the viewer's live position falls
//! within the listing's radius of a hidden target. This module turns a
//! listing plus a [`LocationStatus`](crate::location::LocationStatus) into an
//! [`AccessDecision`], exposes the clue while locked, and refuses purchases
//! unless the listing is unlocked.
//!
//! # Architecture
//!
//! ```text
//! LocationSession ──► ProximityMonitor ──► ProximityAccessController (per listing)
//!   (broadcast)        (applies each          └─► evaluate(listing, status)
//!                       update to all)              └─► coord::distance
//! ```
//!
//! Missing or failed location always fails closed: a gated listing is
//! `Locked` whenever the status is `Unavailable`.

mod clue;
mod controller;
mod decision;
mod error;
mod listing;
mod monitor;

pub use clue::ClueDisclosure;
pub use controller::{ListingView, ProximityAccessController, PurchaseClearance};
pub use decision::{evaluate, within_radius, AccessDecision, AccessState, DistanceSample};
pub use error::AccessDenied;
pub use listing::{CatalogListing, GhostListing, ListingError, ListingId};
pub use monitor::ProximityMonitor;
