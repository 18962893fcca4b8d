//! `query` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use sync_engine::HoverReadout;
use tracing::info;

use super::session;
use crate::cli::QueryArgs;

#[derive(Serialize)]
struct QueryResult {
    distance: f64,
    readouts: Vec<HoverReadout>,
}

/// Execute the `query` command
pub fn run_query(args: &QueryArgs) -> Result<()> {
    let mut comparison = match &args.config {
        Some(config) => session::session_from_blueprint(&session::load_blueprint(config)?)?,
        None => session::session_from_paths(&args.series)?,
    };

    let readouts = comparison.hover(args.distance);
    info!(
        distance = args.distance,
        series = comparison.len(),
        readouts = readouts.len(),
        "Query complete"
    );

    let result = QueryResult {
        distance: args.distance,
        readouts,
    };
    if args.json {
        let json =
            serde_json::to_string_pretty(&result).context("Failed to serialize query result")?;
        println!("{}", json);
    } else {
        print_readouts(&result);
    }

    Ok(())
}

fn print_readouts(result: &QueryResult) {
    println!("Distance {:.3} m\n", result.distance);
    println!(
        "{:<20} {:>12} {:>12} {:>10} {:>8}",
        "series", "distance_m", "speed_kmh", "accel_g", "frame"
    );
    for readout in &result.readouts {
        println!(
            "{:<20} {:>12.3} {:>12.1} {:>10.3} {:>8}",
            readout.series,
            readout.distance,
            readout.speed,
            readout.acceleration_g,
            readout.frame_index
        );
    }
    if result.readouts.is_empty() {
        println!("(no samples)");
    }
}
