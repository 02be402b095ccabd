//! Common helpers shared across CLI commands.

use std::path::Path;

use console::style;
use ghostdrop::coord::Coordinates;
use ghostdrop::proximity::{AccessState, ListingView};
use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Parse a `LAT,LON` argument.
pub fn parse_point(value: &str) -> Result<Coordinates, CliError> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| CliError::InvalidPoint(value.to_string()))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidPoint(value.to_string()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidPoint(value.to_string()))?;
    Ok(Coordinates::new(lat, lon)?)
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| CliError::InvalidJson {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Format a distance for display.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.1} m", meters)
    }
}

/// One-line summary of a listing view.
pub fn format_view(view: &ListingView) -> String {
    let state = match view.state {
        AccessState::Unlocked => style("UNLOCKED").green().bold(),
        AccessState::Locked => style("LOCKED").red().bold(),
        AccessState::Indeterminate => style("WAITING").yellow().bold(),
    };

    let mut line = format!("{:<16} {:<10}", view.listing.as_str(), state);
    if let Some(distance) = &view.distance {
        line.push_str(&format!(" {}", format_distance(distance.meters)));
    }
    if let Some(reason) = view.unavailable {
        line.push_str(&format!(" ({}: {})", reason, reason.hint()));
    }
    line
}
