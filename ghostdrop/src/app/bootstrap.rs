//! Application bootstrap implementation.
//!
//! This module contains `GhostDropApp` which wires the location session to
//! the proximity monitor in the right order and guarantees the platform
//! watch is released on shutdown.

use std::sync::Arc;

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::location::{LocationSession, PositionSource};
use crate::proximity::ProximityMonitor;

/// GhostDrop core with proper service lifecycle management.
///
/// Startup order:
/// 1. Location session created (not yet watching)
/// 2. Monitor subscribed to the session and its loop spawned
/// 3. Platform watch started
///
/// Subscribing before starting means the monitor sees every status the
/// session ever publishes.
///
/// # Example
///
/// ```ignore
/// use ghostdrop::app::{AppConfig, GhostDropApp};
///
/// let app = GhostDropApp::start(AppConfig::default(), source).await?;
/// app.monitor().show(listing);
///
/// // Later: graceful shutdown
/// app.shutdown().await;
/// ```
pub struct GhostDropApp {
    /// The single location session.
    session: Arc<LocationSession>,

    /// Registry of visible listings.
    monitor: Arc<ProximityMonitor>,

    /// Stops the monitor loop.
    cancellation: CancellationToken,

    /// Monitor loop task.
    monitor_task: Option<JoinHandle<()>>,

    /// Application configuration (retained for accessors).
    config: AppConfig,

    /// Owned runtime when created via `start_sync()`.
    runtime: Option<Runtime>,
}

impl GhostDropApp {
    /// Start the application inside the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or there is no
    /// current runtime.
    pub async fn start(
        config: AppConfig,
        source: Arc<dyn PositionSource>,
    ) -> Result<Self, AppError> {
        let handle = Handle::try_current().map_err(|_| AppError::NoRuntime)?;
        Self::start_on(&handle, config, source)
    }

    /// Start the application synchronously (creates its own runtime).
    ///
    /// Useful from non-async callers such as CLI commands. The runtime lives
    /// as long as the app, keeping the monitor loop running.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be created or the configuration
    /// is invalid.
    pub fn start_sync(config: AppConfig, source: Arc<dyn PositionSource>) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("ghostdrop-monitor")
            .enable_all()
            .build()
            .map_err(|e| AppError::RuntimeCreation(e.to_string()))?;

        let mut app = Self::start_on(runtime.handle(), config, source)?;
        app.runtime = Some(runtime);
        Ok(app)
    }

    fn start_on(
        handle: &Handle,
        config: AppConfig,
        source: Arc<dyn PositionSource>,
    ) -> Result<Self, AppError> {
        if config.event_buffer == 0 {
            return Err(AppError::Config(
                "event buffer must be at least 1".to_string(),
            ));
        }

        info!(
            high_accuracy = config.watch.high_accuracy,
            event_buffer = config.event_buffer,
            "Starting GhostDropApp"
        );

        // 1. Session first, not yet watching
        let session = Arc::new(LocationSession::with_event_buffer(
            source,
            config.watch,
            config.event_buffer,
        ));

        // 2. Monitor subscribes before the watch starts
        let (initial, rx) = session.subscribe();
        let monitor = Arc::new(ProximityMonitor::new(initial));
        let cancellation = CancellationToken::new();
        let monitor_task = handle.spawn(Arc::clone(&monitor).run(rx, cancellation.clone()));

        // 3. Start watching
        session.start();
        info!(status = %session.status(), "GhostDropApp started");

        Ok(Self {
            session,
            monitor,
            cancellation,
            monitor_task: Some(monitor_task),
            config,
            runtime: None,
        })
    }

    /// The location session.
    pub fn session(&self) -> Arc<LocationSession> {
        Arc::clone(&self.session)
    }

    /// The proximity monitor.
    pub fn monitor(&self) -> Arc<ProximityMonitor> {
        Arc::clone(&self.monitor)
    }

    /// The configuration the app was started with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Stop the watch and the monitor loop. Safe to call more than once.
    fn stop_services(&mut self) {
        self.session.stop();
        self.cancellation.cancel();
    }

    /// Shutdown the application gracefully.
    ///
    /// Releases the platform watch first, then waits for the monitor loop
    /// to exit.
    pub async fn shutdown(mut self) {
        info!("Shutting down GhostDropApp");
        self.stop_services();

        if let Some(task) = self.monitor_task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Monitor task ended abnormally");
            }
        }

        info!("GhostDropApp shutdown complete");
    }
}

impl Drop for GhostDropApp {
    fn drop(&mut self) {
        self.stop_services();
    }
}
