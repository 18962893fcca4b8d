//! `reconstruct` command implementation.

use anyhow::{Context, Result};
use contracts::{ReadingSource, ReconstructionConfig};
use ingestion::{ReconstructionOutcome, ReconstructionWorker};
use observability::SeriesStatsAggregator;
use series_io::ReadingsReplay;
use tracing::{debug, info, warn};

use crate::cli::ReconstructArgs;

/// Execute the `reconstruct` command
pub async fn run_reconstruct(args: &ReconstructArgs) -> Result<()> {
    let config = reconstruction_config(args)?;

    if !args.readings.exists() {
        anyhow::bail!("Readings file not found: {}", args.readings.display());
    }
    let replay = ReadingsReplay::open(&args.readings)
        .with_context(|| format!("Failed to load readings from {}", args.readings.display()))?;

    info!(
        readings = %args.readings.display(),
        frames = replay.len_hint().unwrap_or(0),
        frame_rate = config.frame_rate,
        outlier_threshold_kmh = config.outlier_threshold_kmh,
        "Starting reconstruction..."
    );

    let handle = ReconstructionWorker::new(config)
        .spawn(replay)
        .context("Failed to start reconstruction worker")?;
    let progress = handle.progress();
    let metrics = handle.metrics();

    let shutdown_signal = setup_shutdown_signal();
    tokio::pin!(shutdown_signal);
    let mut stop_requested = false;
    let mut last_percent = None;

    // Progress closes once the worker thread drops its sender
    loop {
        tokio::select! {
            update = progress.recv() => {
                let Ok(update) = update else { break };
                observability::record_reconstruction_progress(
                    update.frames_processed,
                    update.total,
                );
                let percent = update.percent().map(|p| p / 10 * 10);
                if percent != last_percent {
                    last_percent = percent;
                    debug!(
                        frames_processed = update.frames_processed,
                        frame_index = update.frame_index,
                        percent = ?percent,
                        "Reconstruction progress"
                    );
                }
            }
            _ = &mut shutdown_signal, if !stop_requested => {
                warn!("Received shutdown signal, stopping reconstruction...");
                handle.stop();
                stop_requested = true;
            }
        }
    }

    let outcome = tokio::task::spawn_blocking(move || handle.join())
        .await
        .context("Reconstruction join task failed")?
        .context("Reconstruction worker failed")?;

    let cancelled = outcome.is_cancelled();
    let series = outcome.series();
    series_io::save_series(&args.output, series)
        .with_context(|| format!("Failed to write series to {}", args.output.display()))?;
    observability::record_reconstruction_finished(series.len(), cancelled);

    let snapshot = metrics.snapshot();
    info!(
        output = %args.output.display(),
        samples = series.len(),
        cancelled,
        unrecognized = snapshot.unrecognized,
        outliers_corrected = snapshot.outliers_corrected,
        "Reconstruction finished"
    );

    print_outcome(&outcome, &SeriesStatsAggregator::from_series(series));
    println!(
        "Readings: {} frames, {} unrecognized, {} outliers corrected ({:.1}% accepted)",
        snapshot.frames_processed,
        snapshot.unrecognized,
        snapshot.outliers_corrected,
        snapshot.acceptance_ratio() * 100.0
    );

    Ok(())
}

/// Session settings (or defaults) with CLI overrides applied
fn reconstruction_config(args: &ReconstructArgs) -> Result<ReconstructionConfig> {
    let mut config = match &args.config {
        Some(path) => super::session::load_blueprint(path)?.reconstruction,
        None => ReconstructionConfig::default(),
    };

    if let Some(fps) = args.fps {
        if !(fps.is_finite() && fps > 0.0) {
            anyhow::bail!("Frame rate must be positive, got {fps}");
        }
        info!(fps, "Overriding frame rate from CLI");
        config.frame_rate = fps;
    }
    if let Some(threshold) = args.threshold {
        if !(threshold.is_finite() && threshold > 0.0) {
            anyhow::bail!("Outlier threshold must be positive, got {threshold}");
        }
        info!(threshold, "Overriding outlier threshold from CLI");
        config.outlier_threshold_kmh = threshold;
    }

    Ok(config)
}

/// Wait for Ctrl+C or SIGTERM; a handler that fails to install never fires
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn print_outcome(outcome: &ReconstructionOutcome, stats: &SeriesStatsAggregator) {
    match outcome {
        ReconstructionOutcome::Completed(_) => println!("\nReconstruction completed\n"),
        ReconstructionOutcome::Cancelled(_) => {
            println!("\nReconstruction cancelled, partial series written\n")
        }
    }
    println!("{}", stats.summary());
}
