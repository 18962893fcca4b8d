//! `rebuild` command implementation.

use anyhow::{Context, Result};
use contracts::{TelemetrySample, MAX_SLOPE_WINDOW};
use tracing::info;

use crate::cli::RebuildArgs;

/// Execute the `rebuild` command
pub fn run_rebuild(args: &RebuildArgs) -> Result<()> {
    if !(1..=MAX_SLOPE_WINDOW).contains(&args.slope_window) {
        anyhow::bail!(
            "Slope window must be between 1 and {MAX_SLOPE_WINDOW}, got {}",
            args.slope_window
        );
    }
    if let Some(fps) = args.fps {
        if !(fps.is_finite() && fps > 0.0) {
            anyhow::bail!("Frame rate must be positive, got {fps}");
        }
    }

    let series = series_io::load_series(&args.input)
        .with_context(|| format!("Failed to load series from {}", args.input.display()))?;
    let mut samples = series.into_samples();
    if let Some(fps) = args.fps {
        retime(&mut samples, fps);
    }

    let rebuilt = ingestion::rebuild_series(&samples, args.slope_window);
    series_io::save_series(&args.output, &rebuilt)
        .with_context(|| format!("Failed to write series to {}", args.output.display()))?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        samples = rebuilt.len(),
        span_m = rebuilt.span(),
        "Series rebuilt"
    );
    println!(
        "Rebuilt {} samples: {:.3} m over {:.3} s",
        rebuilt.len(),
        rebuilt.span(),
        rebuilt.duration()
    );

    Ok(())
}

/// Fixed-step time column: sample i sits at i / fps
fn retime(samples: &mut [TelemetrySample], fps: f64) {
    for (i, sample) in samples.iter_mut().enumerate() {
        sample.time = i as f64 / fps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_recomputes_distance() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("edited.csv");
        let output = dir.path().join("rebuilt.csv");
        // distance column is stale after editing speeds
        std::fs::write(
            &input,
            "frame,speed,distance,time,accel\n0,36,0,0,0\n1,72,99,0,0\n2,72,99,0,0\n",
        )
        .unwrap();

        run_rebuild(&RebuildArgs {
            input,
            output: output.clone(),
            fps: Some(1.0),
            slope_window: 5,
        })
        .unwrap();

        let series = series_io::load_series(&output).unwrap();
        let distances: Vec<f64> = series.iter().map(|s| s.distance).collect();
        assert_eq!(distances.len(), 3);
        assert!((distances[1] - 15.0).abs() < 1e-3, "got {distances:?}");
        assert!((distances[2] - 35.0).abs() < 1e-3, "got {distances:?}");
        assert!((series.duration() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_zero_window() {
        let result = run_rebuild(&RebuildArgs {
            input: "missing.csv".into(),
            output: "out.csv".into(),
            fps: None,
            slope_window: 0,
        });
        assert!(result.unwrap_err().to_string().contains("Slope window"));
    }

    #[test]
    fn test_rejects_oversized_window() {
        let result = run_rebuild(&RebuildArgs {
            input: "missing.csv".into(),
            output: "out.csv".into(),
            fps: None,
            slope_window: usize::MAX,
        });
        assert!(result.unwrap_err().to_string().contains("between 1 and"));
    }
}
