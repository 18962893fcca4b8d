//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// speedtrace - dashcam speedometer telemetry reconstruction and comparison
#[derive(Parser, Debug)]
#[command(
    name = "speedtrace",
    author,
    version,
    about = "Dashcam speedometer telemetry reconstruction and comparison",
    long_about = "Rebuilds speed / distance / acceleration telemetry from per-frame \n\
                  speedometer readings and compares runs on a common distance axis.\n\n\
                  Reconstructed series are stored as CSV tables with the columns \n\
                  frame, speed, distance, time, accel."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SPEEDTRACE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SPEEDTRACE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "SPEEDTRACE_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild a series from recorded speedometer readings
    Reconstruct(ReconstructArgs),

    /// Recompute distance and acceleration of an edited series
    Rebuild(RebuildArgs),

    /// Time difference of two series over a distance window
    Delta(DeltaArgs),

    /// Values of one or more series at a distance
    Query(QueryArgs),

    /// Validate session file without running
    Validate(ValidateArgs),

    /// Display session information
    Info(InfoArgs),
}

/// Arguments for the `reconstruct` command
#[derive(Parser, Debug, Clone)]
pub struct ReconstructArgs {
    /// Recorded readings table (`frame,value`)
    #[arg(short, long)]
    pub readings: PathBuf,

    /// Output series table
    #[arg(short, long)]
    pub output: PathBuf,

    /// Session file with reconstruction settings (TOML or JSON)
    #[arg(short, long, env = "SPEEDTRACE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override video frame rate
    #[arg(long)]
    pub fps: Option<f64>,

    /// Override outlier threshold (km/h)
    #[arg(long)]
    pub threshold: Option<f64>,
}

/// Arguments for the `rebuild` command
#[derive(Parser, Debug, Clone)]
pub struct RebuildArgs {
    /// Edited series table
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output series table (may equal the input)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Regenerate the time column at this frame rate before rebuilding
    #[arg(long)]
    pub fps: Option<f64>,

    /// Neighbours on each side for the acceleration slope
    #[arg(long, default_value = "5")]
    pub slope_window: usize,
}

/// Arguments for the `delta` command
#[derive(Parser, Debug, Clone)]
pub struct DeltaArgs {
    /// First series table
    #[arg(short = 'a', long = "a", required_unless_present = "config")]
    pub series_a: Option<PathBuf>,

    /// Second series table
    #[arg(short = 'b', long = "b", required_unless_present = "config")]
    pub series_b: Option<PathBuf>,

    /// Session file; its first two series are compared
    #[arg(short, long, conflicts_with_all = ["series_a", "series_b"])]
    pub config: Option<PathBuf>,

    /// Window start (m)
    #[arg(long, allow_negative_numbers = true)]
    pub from: f64,

    /// Window end (m)
    #[arg(long, allow_negative_numbers = true)]
    pub to: f64,

    /// Distance recalibration of the first series (m)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub offset_a: f64,

    /// Distance recalibration of the second series (m)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub offset_b: f64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `query` command
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    /// Series tables to query (repeatable)
    #[arg(short, long = "series", required_unless_present = "config")]
    pub series: Vec<PathBuf>,

    /// Session file listing the series
    #[arg(short, long, conflicts_with = "series")]
    pub config: Option<PathBuf>,

    /// Distance to look up (m)
    #[arg(short, long, allow_negative_numbers = true)]
    pub distance: f64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to session file to validate
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to session file
    #[arg(short, long, default_value = "session.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Load each series and show its statistics
    #[arg(long)]
    pub series: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delta_with_negative_offset() {
        let cli = Cli::try_parse_from([
            "speedtrace", "delta", "-a", "a.csv", "-b", "b.csv", "--from", "0", "--to", "400",
            "--offset-b", "-3.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Delta(args) => {
                assert_eq!(args.offset_b, -3.5);
                assert_eq!(args.to, 400.0);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_delta_requires_series_or_config() {
        let result = Cli::try_parse_from(["speedtrace", "delta", "--from", "0", "--to", "10"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "speedtrace", "delta", "--config", "s.toml", "--from", "0", "--to", "10",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Delta(_)));
    }

    #[test]
    fn test_query_repeated_series() {
        let cli = Cli::try_parse_from([
            "speedtrace", "query", "-s", "a.csv", "-s", "b.csv", "-d", "120.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.series.len(), 2);
                assert_eq!(args.distance, 120.5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
