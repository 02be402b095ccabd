//! Check command - evaluate one catalog listing at a given point.

use std::path::PathBuf;

use console::style;
use ghostdrop::location::{LocationStatus, PositionFix};
use ghostdrop::proximity::{CatalogListing, GhostListing, ProximityAccessController};
use tracing::debug;

use super::common::{format_view, parse_point, read_json};
use crate::error::CliError;

/// Arguments for the check command.
pub struct CheckArgs {
    pub listing: PathBuf,
    pub at: String,
    pub accuracy: f64,
    pub json: bool,
}

/// Run the check command.
pub fn run(args: CheckArgs) -> Result<(), CliError> {
    let record: CatalogListing = read_json(&args.listing)?;
    let listing = GhostListing::try_from(record)?;
    let point = parse_point(&args.at)?;

    debug!(listing = %listing.id(), at = %point, "Checking listing");

    let status = LocationStatus::Available(PositionFix::new(point, args.accuracy));
    let controller = ProximityAccessController::new(listing, &status);
    let view = controller.view();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", format_view(&view));
        if let Some(clue) = &view.clue {
            println!("  Clue: {}", clue);
        }
    }

    match controller.authorize_purchase() {
        Ok(_) => println!("{}", style("Purchase allowed").green()),
        Err(denied) => println!("{} {}", style("Purchase denied:").red(), denied),
    }

    Ok(())
}
