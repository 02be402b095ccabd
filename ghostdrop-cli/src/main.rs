//! GhostDrop CLI - Command-line interface
//!
//! Distance checks, single-listing evaluation and track replay on top of the
//! `ghostdrop` library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use console::style;

use commands::check::CheckArgs;
use commands::distance::DistanceArgs;
use commands::replay::ReplayArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "ghostdrop")]
#[command(about = "Proximity-gated listing access", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.ghostdrop/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug output on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance in meters between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// Evaluate one catalog listing (JSON) at a point
    Check {
        /// Catalog listing JSON file
        #[arg(long)]
        listing: PathBuf,

        /// Viewer position as LAT,LON
        #[arg(long, allow_hyphen_values = true)]
        at: String,

        /// Reported fix accuracy in meters
        #[arg(long, default_value_t = 10.0)]
        accuracy: f64,

        /// Print the listing view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a position track against a set of listings
    Replay {
        /// JSON array of catalog listings
        #[arg(long)]
        listings: PathBuf,

        /// JSON array of track steps
        #[arg(long)]
        track: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            runner.log_startup("distance");
            commands::distance::run(DistanceArgs {
                lat1,
                lon1,
                lat2,
                lon2,
            })
        }
        Commands::Check {
            listing,
            at,
            accuracy,
            json,
        } => {
            runner.log_startup("check");
            commands::check::run(CheckArgs {
                listing,
                at,
                accuracy,
                json,
            })
        }
        Commands::Replay { listings, track } => {
            runner.log_startup("replay");
            commands::replay::run(ReplayArgs { listings, track }, runner.config())
        }
    }
}
