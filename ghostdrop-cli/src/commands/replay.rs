//! Replay command - drive the full session and monitor with a recorded track.
//!
//! Each track step is pushed through a scripted position source, so the
//! listings see exactly the status sequence the session publishes.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use ghostdrop::app::AppConfig;
use ghostdrop::config::ConfigFile;
use ghostdrop::location::{LocationSession, LocationStatus, ScriptedSource, TrackStep};
use ghostdrop::proximity::{CatalogListing, GhostListing, ProximityMonitor};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use super::common::{format_view, read_json};
use crate::error::CliError;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub listings: PathBuf,
    pub track: PathBuf,
}

/// Run the replay command.
pub fn run(args: ReplayArgs, config: &ConfigFile) -> Result<(), CliError> {
    let records: Vec<CatalogListing> = read_json(&args.listings)?;
    let track: Vec<TrackStep> = read_json(&args.track)?;

    let listings = records
        .into_iter()
        .map(GhostListing::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    // Reject the whole track before anything is published
    for (index, step) in track.iter().enumerate() {
        step.to_fix()
            .map_err(|e| CliError::InvalidTrackStep {
                step: index + 1,
                source: e,
            })?;
    }

    let app_config = AppConfig::from_config_file(config);
    let source = Arc::new(ScriptedSource::new());
    let session = LocationSession::with_event_buffer(
        source.clone(),
        app_config.watch,
        app_config.event_buffer,
    );

    let (initial, mut rx) = session.subscribe();
    let monitor = ProximityMonitor::new(initial);
    for listing in listings {
        monitor.show(listing);
    }

    info!(
        listings = monitor.len(),
        steps = track.len(),
        "Replaying track"
    );

    session.start();
    drain(&mut rx, &monitor);
    print_step("start", &monitor);

    for (index, step) in track.iter().enumerate() {
        let delivered = source
            .play(step)
            .map_err(|e| CliError::InvalidTrackStep {
                step: index + 1,
                source: e,
            })?;
        if !delivered {
            warn!(step = index + 1, "Track step dropped; no active watch");
        }
        drain(&mut rx, &monitor);

        let label = match step {
            TrackStep::Fix { lat, lon, .. } => format!("#{} fix {:.6},{:.6}", index + 1, lat, lon),
            TrackStep::Error { error } => format!("#{} error {}", index + 1, error),
        };
        print_step(&label, &monitor);
    }

    session.stop();
    Ok(())
}

/// Apply every queued status to the monitor, skipping past any lag.
fn drain(rx: &mut broadcast::Receiver<LocationStatus>, monitor: &ProximityMonitor) {
    loop {
        match rx.try_recv() {
            Ok(status) => monitor.apply(status),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "Replay lagged behind location updates");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

fn print_step(label: &str, monitor: &ProximityMonitor) {
    println!(
        "{} {}",
        style(label).cyan().bold(),
        style(monitor.status()).dim()
    );
    for view in monitor.views() {
        println!("  {}", format_view(&view));
    }
}
