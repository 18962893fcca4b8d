//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::SessionBlueprint;
use observability::SeriesStatsAggregator;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::InfoArgs;

/// Session info for JSON output
#[derive(Serialize)]
struct SessionInfo {
    version: String,
    reconstruction: ReconstructionInfo,
    nudge_step_m: f64,
    series: Vec<SeriesInfo>,
}

#[derive(Serialize)]
struct ReconstructionInfo {
    frame_rate: f64,
    outlier_threshold_kmh: f64,
    plausible_speeds_kmh: Vec<f64>,
    slope_window: usize,
}

#[derive(Serialize)]
struct SeriesInfo {
    name: String,
    path: String,
    offset_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SeriesStats>,
}

#[derive(Serialize)]
struct SeriesStats {
    samples: u64,
    span_m: f64,
    duration_s: f64,
    top_speed_kmh: f64,
    mean_speed_kmh: f64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading session info");

    let blueprint = super::session::load_blueprint(&args.config)?;
    let info = build_session_info(&blueprint, args);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize session info")?;
        println!("{}", json);
    } else {
        print_session_info(&info);
    }

    Ok(())
}

fn build_session_info(blueprint: &SessionBlueprint, args: &InfoArgs) -> SessionInfo {
    let series = blueprint
        .series
        .iter()
        .map(|s| SeriesInfo {
            name: s.name.clone(),
            path: s.path.display().to_string(),
            offset_m: s.offset_m,
            stats: if args.series {
                load_stats(&s.name, &s.path)
            } else {
                None
            },
        })
        .collect();

    let reconstruction = &blueprint.reconstruction;
    SessionInfo {
        version: format!("{:?}", blueprint.version),
        reconstruction: ReconstructionInfo {
            frame_rate: reconstruction.frame_rate,
            outlier_threshold_kmh: reconstruction.outlier_threshold_kmh,
            plausible_speeds_kmh: reconstruction.plausible_speeds_kmh.clone(),
            slope_window: reconstruction.slope_window,
        },
        nudge_step_m: blueprint.analysis.nudge_step_m,
        series,
    }
}

/// Statistics of a series file; unreadable files are skipped with a warning
fn load_stats(name: &str, path: &std::path::Path) -> Option<SeriesStats> {
    match series_io::load_series(path) {
        Ok(series) => {
            observability::record_series_loaded(name, series.len());
            let summary = SeriesStatsAggregator::from_series(&series).summary();
            Some(SeriesStats {
                samples: summary.total_samples,
                span_m: summary.span_m,
                duration_s: summary.duration_s,
                top_speed_kmh: summary.speed_kmh.max,
                mean_speed_kmh: summary.speed_kmh.mean,
            })
        }
        Err(e) => {
            warn!(series = %name, error = %e, "Failed to load series");
            None
        }
    }
}

fn print_session_info(info: &SessionInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  speedtrace Session                          ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let reconstruction = &info.reconstruction;
    println!("🎞  Reconstruction");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Frame rate: {} fps", reconstruction.frame_rate);
    println!(
        "   ├─ Outlier threshold: {} km/h",
        reconstruction.outlier_threshold_kmh
    );
    println!(
        "   ├─ Plausible speeds: {:?}",
        reconstruction.plausible_speeds_kmh
    );
    println!("   └─ Slope window: ±{}", reconstruction.slope_window);

    println!("\n📏 Analysis");
    println!("   └─ Nudge step: {} m", info.nudge_step_m);

    println!("\n🚗 Series ({})", info.series.len());
    for (i, series) in info.series.iter().enumerate() {
        let is_last = i == info.series.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!(
            "   {} {} ({}, offset {} m)",
            prefix, series.name, series.path, series.offset_m
        );
        if let Some(ref stats) = series.stats {
            println!(
                "   {}  └─ {} samples, {:.1} m in {:.2} s, top {:.1} km/h, mean {:.1} km/h",
                child_prefix,
                stats.samples,
                stats.span_m,
                stats.duration_s,
                stats.top_speed_kmh,
                stats.mean_speed_kmh
            );
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_with_series_stats() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.csv"),
            "frame,speed,distance,time,accel\n0,36,0,0,0\n1,72,15,1,0\n",
        )
        .unwrap();
        let config = dir.path().join("session.toml");
        std::fs::write(
            &config,
            r#"
[reconstruction]
frame_rate = 1.0

[[series]]
name = "a"
path = "a.csv"

[[series]]
name = "missing"
path = "missing.csv"
"#,
        )
        .unwrap();

        let args = InfoArgs {
            config,
            json: true,
            series: true,
        };
        let blueprint = crate::commands::session::load_blueprint(&args.config).unwrap();
        let info = build_session_info(&blueprint, &args);

        let stats = info.series[0].stats.as_ref().unwrap();
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.top_speed_kmh, 72.0);
        assert!((stats.span_m - 15.0).abs() < 1e-9);
        assert!(info.series[1].stats.is_none());
        run_info(&args).unwrap();
    }
}
