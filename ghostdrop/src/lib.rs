//! GhostDrop - proximity-gated marketplace listings
//!
//! A "ghost drop" is a listing whose clue and purchase are locked until the
//! buyer is physically within a seller-chosen radius of a hidden target.
//! This library provides the pieces that decide, from a stream of device
//! location updates, whether each visible listing is locked or unlocked:
//!
//! - [`coord`]: coordinates and great-circle distance
//! - [`location`]: the single-writer location session over a platform source
//! - [`proximity`]: per-listing access decisions, clue disclosure and
//!   purchase authorization
//! - [`app`]: wiring and lifecycle for the above
//! - [`config`] and [`logging`]: INI configuration and tracing setup

pub mod app;
pub mod config;
pub mod coord;
pub mod location;
pub mod logging;
pub mod proximity;
