//! Application bootstrap and lifecycle management.
//!
//! `GhostDropApp` owns the single location session and the proximity
//! monitor, starts them in the order that guarantees no update is missed,
//! and releases the platform watch on shutdown or drop.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       GhostDropApp                        │
//! │                                                          │
//! │  PositionSource ──► LocationSession ──broadcast──┐       │
//! │   (platform)         (status snapshot)           │       │
//! │                                                  ▼       │
//! │                                  ProximityMonitor::run   │
//! │                                   └── controller/listing │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ghostdrop::app::{AppConfig, GhostDropApp};
//!
//! let app = GhostDropApp::start(AppConfig::default(), source).await?;
//! app.monitor().show(listing);
//! let view = app.monitor().view(&id);
//!
//! app.shutdown().await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::GhostDropApp;
pub use config::AppConfig;
pub use error::AppError;
