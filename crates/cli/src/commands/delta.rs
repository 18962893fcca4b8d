//! `delta` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use sync_engine::{ComparisonSession, TimeDelta};
use tracing::info;

use super::session;
use crate::cli::DeltaArgs;

/// Delta report for JSON output
#[derive(Serialize)]
struct DeltaReport<'a> {
    series_a: &'a str,
    series_b: &'a str,
    #[serde(flatten)]
    delta: TimeDelta,
}

/// Execute the `delta` command
pub fn run_delta(args: &DeltaArgs) -> Result<()> {
    let session = load_session(args)?;
    let delta = session
        .time_delta(args.from, args.to)
        .context("Failed to compute time delta")?;

    let analyzers = session.analyzers();
    let report = DeltaReport {
        series_a: analyzers[0].name(),
        series_b: analyzers[1].name(),
        delta,
    };
    info!(
        a = report.series_a,
        b = report.series_b,
        x_low = delta.x_low,
        x_high = delta.x_high,
        delta = delta.delta,
        "Time delta computed"
    );

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize time delta")?;
        println!("{}", json);
    } else {
        println!(
            "{} vs {} over {:.3} m .. {:.3} m",
            report.series_a, report.series_b, delta.x_low, delta.x_high
        );
        println!("{}", delta);
    }

    Ok(())
}

fn load_session(args: &DeltaArgs) -> Result<ComparisonSession> {
    if let Some(config) = &args.config {
        let blueprint = session::load_blueprint(config)?;
        return session::session_from_blueprint(&blueprint);
    }

    let (Some(path_a), Some(path_b)) = (&args.series_a, &args.series_b) else {
        anyhow::bail!("Both --a and --b are required without --config");
    };
    let mut name_a = session::series_name(path_a);
    let mut name_b = session::series_name(path_b);
    if name_a == name_b {
        name_a.push_str("#a");
        name_b.push_str("#b");
    }

    let mut comparison = ComparisonSession::default();
    comparison.add(session::load_analyzer(path_a, &name_a, args.offset_a)?)?;
    comparison.add(session::load_analyzer(path_b, &name_b, args.offset_b)?)?;
    Ok(comparison)
}
