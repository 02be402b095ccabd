//! Distance command - great-circle distance between two points.

use ghostdrop::coord::Coordinates;

use super::common::format_distance;
use crate::error::CliError;

/// Arguments for the distance command.
pub struct DistanceArgs {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

/// Run the distance command.
pub fn run(args: DistanceArgs) -> Result<(), CliError> {
    let from = Coordinates::new(args.lat1, args.lon1)?;
    let to = Coordinates::new(args.lat2, args.lon2)?;
    let meters = from.distance_to(&to);

    println!("{} -> {}: {}", from, to, format_distance(meters));
    Ok(())
}
