//! Dual-Series Synchronizer
//!
//! Elapsed-time comparison of two series over a common distance window.

use std::fmt;

use contracts::{TelemetrySample, KMH_PER_MPS};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::analyzer::DistanceAnalyzer;
use crate::error::{Result, SyncError};

/// Elapsed times of two series over the same window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeDelta {
    /// Window start (m)
    pub x_low: f64,
    /// Window end (m)
    pub x_high: f64,
    /// Time series A needed to cover the window (s)
    pub elapsed_a: f64,
    /// Time series B needed to cover the window (s)
    pub elapsed_b: f64,
    /// `elapsed_a - elapsed_b` (s); negative when A was quicker
    pub delta: f64,
    /// Pairs of A that contributed a term
    pub valid_pairs_a: usize,
    /// Pairs of B that contributed a term
    pub valid_pairs_b: usize,
}

impl fmt::Display for TimeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Δt = t1 - t2 = {:.3} - {:.3} = {:.3} s",
            self.elapsed_a, self.elapsed_b, self.delta
        )
    }
}

/// Elapsed time over a run of samples and the number of pairs that counted.
///
/// Speeds are taken in m/s; a non-positive or non-finite speed makes both pairs
/// touching that sample undefined. Only finite `Δx / mean(v)` terms are summed, so a
/// run with no valid pair yields 0.
pub fn elapsed_time<'a, I>(samples: I) -> (f64, usize)
where
    I: IntoIterator<Item = &'a TelemetrySample>,
{
    let mut total = 0.0;
    let mut valid = 0;
    let mut prev: Option<(f64, f64)> = None;

    for sample in samples {
        let v = usable_speed(sample.speed);
        if let Some((prev_distance, prev_v)) = prev {
            let term = (sample.distance - prev_distance) / ((prev_v + v) / 2.0);
            if term.is_finite() {
                total += term;
                valid += 1;
            }
        }
        prev = Some((sample.distance, v));
    }
    (total, valid)
}

/// Speed in m/s, NaN when it cannot be inverted
#[inline]
fn usable_speed(speed_kmh: f64) -> f64 {
    if speed_kmh > 0.0 && speed_kmh.is_finite() {
        speed_kmh / KMH_PER_MPS
    } else {
        f64::NAN
    }
}

/// Samples with distance in `[x_low, x_high]`, in series order
pub fn window_samples(
    analyzer: &DistanceAnalyzer,
    x_low: f64,
    x_high: f64,
) -> Vec<&TelemetrySample> {
    analyzer
        .series()
        .iter()
        .filter(|s| s.distance >= x_low && s.distance <= x_high)
        .collect()
}

/// Time difference between `a` and `b` over the window between `x_low` and `x_high`.
///
/// Endpoints may be given in either order; the window is inclusive.
#[instrument(name = "sync_time_delta", skip(a, b), fields(a = %a.name(), b = %b.name()))]
pub fn time_delta(
    a: &DistanceAnalyzer,
    b: &DistanceAnalyzer,
    x_low: f64,
    x_high: f64,
) -> Result<TimeDelta> {
    let (x_low, x_high) = if x_low <= x_high {
        (x_low, x_high)
    } else {
        (x_high, x_low)
    };

    let segment_a = checked_window(a, x_low, x_high)?;
    let segment_b = checked_window(b, x_low, x_high)?;

    let (elapsed_a, valid_pairs_a) = elapsed_time(segment_a);
    let (elapsed_b, valid_pairs_b) = elapsed_time(segment_b);
    let delta = elapsed_a - elapsed_b;

    debug!(elapsed_a, elapsed_b, delta, "time delta computed");
    observability::metrics::record_time_delta(delta);

    Ok(TimeDelta {
        x_low,
        x_high,
        elapsed_a,
        elapsed_b,
        delta,
        valid_pairs_a,
        valid_pairs_b,
    })
}

fn checked_window(
    analyzer: &DistanceAnalyzer,
    x_low: f64,
    x_high: f64,
) -> Result<Vec<&TelemetrySample>> {
    let segment = window_samples(analyzer, x_low, x_high);
    if segment.len() < 2 {
        warn!(
            series = %analyzer.name(),
            samples = segment.len(),
            x_low,
            x_high,
            "insufficient data in selection"
        );
        observability::metrics::record_insufficient_selection(analyzer.name());
        return Err(SyncError::InsufficientData {
            series: analyzer.name().to_string(),
            samples: segment.len(),
            x_low,
            x_high,
        });
    }
    Ok(segment)
}
