//! Kinematics helpers shared by the builder and the series rebuild
//!
//! Trapezoidal distance integration and local least-squares slope.

use contracts::{TelemetrySample, TelemetrySeries, ACCEL_UNIT_FACTOR, KMH_PER_MPS};
use nalgebra::DVector;

/// Spread of distances below which a window has no usable slope
const DEGENERATE_SPREAD: f64 = 1e-12;

/// Distance covered between two samples (m), trapezoidal rule on m/s speeds.
///
/// Negative speeds count as standstill and a negative step contributes nothing,
/// so the result is never negative.
#[inline]
pub fn trapezoid_step(prev_speed_kmh: f64, speed_kmh: f64, dt: f64) -> f64 {
    let v0 = prev_speed_kmh.max(0.0) / KMH_PER_MPS;
    let v1 = speed_kmh.max(0.0) / KMH_PER_MPS;
    ((v0 + v1) / 2.0 * dt).max(0.0)
}

/// Cumulative distance for paired `times` (s) and `speeds` (km/h), starting at 0
pub fn integrate_distance(times: &[f64], speeds: &[f64]) -> Vec<f64> {
    let n = times.len().min(speeds.len());
    let mut distances = Vec::with_capacity(n);
    let mut total = 0.0;
    for i in 0..n {
        if i > 0 {
            total += trapezoid_step(speeds[i - 1], speeds[i], times[i] - times[i - 1]);
        }
        distances.push(total);
    }
    distances
}

/// Ordinary least-squares slope of `ys` against `xs` over `idx ± window`.
///
/// Fewer than two points or no spread in `xs` gives 0.
pub fn local_slope(xs: &[f64], ys: &[f64], idx: usize, window: usize) -> f64 {
    let n = xs.len().min(ys.len());
    if idx >= n {
        return 0.0;
    }
    let lo = idx.saturating_sub(window);
    let hi = idx.saturating_add(window).min(n - 1);
    if hi - lo + 1 < 2 {
        return 0.0;
    }

    let x = DVector::from_column_slice(&xs[lo..=hi]);
    let y = DVector::from_column_slice(&ys[lo..=hi]);
    let xc = x.add_scalar(-x.mean());
    let yc = y.add_scalar(-y.mean());

    let sxx = xc.dot(&xc);
    if !sxx.is_finite() || sxx <= DEGENERATE_SPREAD {
        return 0.0;
    }
    let slope = xc.dot(&yc) / sxx;
    if slope.is_finite() {
        slope
    } else {
        0.0
    }
}

/// Acceleration (m/s²) at `idx`: `speed * d(speed)/d(distance) * 25/324`
#[inline]
pub fn acceleration_at(speeds: &[f64], distances: &[f64], idx: usize, window: usize) -> f64 {
    match speeds.get(idx) {
        Some(v) => v * local_slope(distances, speeds, idx, window) * ACCEL_UNIT_FACTOR,
        None => 0.0,
    }
}

/// Per-sample accelerations for a whole series
pub fn accelerations(speeds: &[f64], distances: &[f64], window: usize) -> Vec<f64> {
    (0..speeds.len().min(distances.len()))
        .map(|i| acceleration_at(speeds, distances, i, window))
        .collect()
}

/// Recompute distance and acceleration from edited `(time, speed)` columns.
///
/// Frame indices, times and speeds are kept as given.
pub fn rebuild_series(samples: &[TelemetrySample], slope_window: usize) -> TelemetrySeries {
    let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
    let speeds: Vec<f64> = samples.iter().map(|s| s.speed).collect();
    let distances = integrate_distance(&times, &speeds);
    let accels = accelerations(&speeds, &distances, slope_window);

    samples
        .iter()
        .zip(distances)
        .zip(accels)
        .map(|((s, distance), acceleration)| TelemetrySample {
            distance,
            acceleration,
            ..*s
        })
        .collect::<Vec<_>>()
        .into()
}
