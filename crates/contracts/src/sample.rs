//! TelemetrySeries - Telemetry Builder output
//!
//! Reconstructed per-frame record of one vehicle run.

use serde::{Deserialize, Serialize};

/// km/h per m/s
pub const KMH_PER_MPS: f64 = 3.6;

/// Converts `speed (km/h) * dv/dx (km/h per m)` into m/s²: `(1000/3600)² = 25/324`
pub const ACCEL_UNIT_FACTOR: f64 = 25.0 / 324.0;

/// Gravity used to express acceleration in g
pub const STANDARD_GRAVITY: f64 = 9.8;

/// One reconstructed sample.
///
/// Field order matches the persisted column order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Source video frame
    pub frame_index: u64,

    /// Corrected speed (km/h)
    pub speed: f64,

    /// Cumulative distance (m)
    pub distance: f64,

    /// Elapsed time (s), fixed step of one frame interval
    pub time: f64,

    /// Local longitudinal acceleration (m/s²)
    pub acceleration: f64,
}

impl TelemetrySample {
    /// Speed in m/s
    #[inline]
    pub fn speed_mps(&self) -> f64 {
        self.speed / KMH_PER_MPS
    }

    /// Acceleration in g
    #[inline]
    pub fn acceleration_g(&self) -> f64 {
        self.acceleration / STANDARD_GRAVITY
    }
}

/// Ordered sequence of samples for one run.
///
/// Content is fixed once built; the only permitted edit is a global distance shift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySeries {
    samples: Vec<TelemetrySample>,
}

impl TelemetrySeries {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples in series order
    #[inline]
    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&TelemetrySample> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TelemetrySample> {
        self.samples.iter()
    }

    pub fn first(&self) -> Option<&TelemetrySample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&TelemetrySample> {
        self.samples.last()
    }

    /// Add `delta` meters to every sample's distance
    pub fn shift_distance(&mut self, delta: f64) {
        for sample in &mut self.samples {
            sample.distance += delta;
        }
    }

    /// Distance covered between first and last sample (m)
    pub fn span(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.distance - first.distance,
            _ => 0.0,
        }
    }

    /// Elapsed time between first and last sample (s)
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Highest speed in the series (km/h)
    pub fn top_speed(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.speed).reduce(f64::max)
    }

    /// Frame index of the first sample
    pub fn initial_frame(&self) -> Option<u64> {
        self.samples.first().map(|s| s.frame_index)
    }

    pub fn into_samples(self) -> Vec<TelemetrySample> {
        self.samples
    }
}

impl From<Vec<TelemetrySample>> for TelemetrySeries {
    fn from(samples: Vec<TelemetrySample>) -> Self {
        Self { samples }
    }
}

impl<'a> IntoIterator for &'a TelemetrySeries {
    type Item = &'a TelemetrySample;
    type IntoIter = std::slice::Iter<'a, TelemetrySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
