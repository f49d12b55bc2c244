//! Disc Inspector
//!
//! Identifies CD/GD-ROM disc images and prints their metadata as JSON.

use std::path::PathBuf;

use clap::Parser;

use disc_inspector::config::get_config;
use disc_inspector::inspect::{inspect, DiscClassification, ScanMode};

#[derive(Parser)]
#[command(name = "disc-inspector")]
#[command(about = "Identify disc images and extract their platform metadata", long_about = None)]
struct Cli {
    /// Disc images (.cue, .iso, .cdi)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Quick mode: signatures and ISO 9660 only, no data track scan
    #[arg(short, long)]
    quick: bool,

    /// Skip detection and treat every image as this platform (e.g. SonyPSX, DreamCast)
    #[arg(short, long)]
    platform: Option<DiscClassification>,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = get_config();

    let mode = if cli.quick { ScanMode::Quick } else { config.scan.mode() };
    let pretty = config.output.pretty && !cli.compact;

    for path in &cli.paths {
        let result = inspect(path, mode, cli.platform);
        let json = if pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        println!("{}", json);
    }

    Ok(())
}
