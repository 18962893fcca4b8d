//! Telemetry Builder
//!
//! Turns `(frame_index, raw reading)` pairs into a telemetry series, one sample per
//! processed frame at a fixed time step.

use std::sync::Arc;

use contracts::{RawReading, ReconstructionConfig, TelemetrySample, TelemetrySeries};
use tracing::{debug, instrument, warn};

use crate::corrector::{Correction, CorrectionKind, ReadingCorrector};
use crate::kinematics;
use crate::metrics::IngestionMetrics;

/// Seconds between samples; unusable frame rates fall back to the default
fn sample_interval(config: &ReconstructionConfig) -> f64 {
    if config.frame_rate.is_finite() && config.frame_rate > 0.0 {
        return config.time_interval();
    }
    let fallback = ReconstructionConfig::default();
    warn!(
        frame_rate = config.frame_rate,
        fallback = fallback.frame_rate,
        "invalid frame rate, using default"
    );
    fallback.time_interval()
}

/// Incremental series builder
///
/// Distance is integrated in [`process`](Self::process); acceleration needs
/// neighbours on both sides and is filled in by [`finalize`](Self::finalize).
#[derive(Debug)]
pub struct TelemetryBuilder {
    corrector: ReadingCorrector,
    time_interval: f64,
    slope_window: usize,
    samples: Vec<TelemetrySample>,
    last_accepted: Option<f64>,
    sample_index: u64,
    metrics: Arc<IngestionMetrics>,
}

impl TelemetryBuilder {
    pub fn new(config: &ReconstructionConfig) -> Self {
        Self::with_metrics(config, Arc::new(IngestionMetrics::new()))
    }

    /// Builder reporting into shared metrics
    pub fn with_metrics(config: &ReconstructionConfig, metrics: Arc<IngestionMetrics>) -> Self {
        Self {
            corrector: ReadingCorrector::from_config(config),
            time_interval: sample_interval(config),
            slope_window: config.slope_window,
            samples: Vec::new(),
            last_accepted: None,
            sample_index: 0,
            metrics,
        }
    }

    /// Builder for a frame rate with default correction settings.
    ///
    /// A frame rate that is not a positive finite number falls back to the
    /// default one, so sample times stay finite.
    pub fn with_frame_rate(frame_rate: f64) -> Self {
        Self::new(&ReconstructionConfig::with_frame_rate(frame_rate))
    }

    /// Correct one reading and append the resulting sample.
    ///
    /// The returned sample carries a provisional acceleration of 0.
    pub fn process(&mut self, frame_index: u64, raw: Option<f64>) -> TelemetrySample {
        let Correction { value: speed, kind } = self.corrector.assess(raw, self.last_accepted);
        self.metrics.record_frame(kind);
        if kind != CorrectionKind::Accepted {
            debug!(frame_index, raw = ?raw, corrected = speed, kind = ?kind, "reading corrected");
        }

        let time = self.sample_index as f64 * self.time_interval;
        let distance = match self.samples.last() {
            Some(prev) => {
                prev.distance + kinematics::trapezoid_step(prev.speed, speed, time - prev.time)
            }
            None => 0.0,
        };

        let sample = TelemetrySample {
            frame_index,
            speed,
            distance,
            time,
            acceleration: 0.0,
        };
        self.samples.push(sample);
        self.last_accepted = Some(speed);
        self.sample_index += 1;
        sample
    }

    /// Process a [`RawReading`]
    #[inline]
    pub fn process_reading(&mut self, reading: RawReading) -> TelemetrySample {
        self.process(reading.frame_index, reading.value)
    }

    /// Compute accelerations and hand out the series; the builder is left empty.
    #[instrument(name = "builder_finalize", skip(self), fields(samples = self.samples.len()))]
    pub fn finalize(&mut self) -> TelemetrySeries {
        let mut samples = std::mem::take(&mut self.samples);
        let speeds: Vec<f64> = samples.iter().map(|s| s.speed).collect();
        let distances: Vec<f64> = samples.iter().map(|s| s.distance).collect();
        let accels = kinematics::accelerations(&speeds, &distances, self.slope_window);
        for (sample, acceleration) in samples.iter_mut().zip(accels) {
            sample.acceleration = acceleration;
        }
        self.last_accepted = None;
        self.sample_index = 0;
        debug!(samples = samples.len(), "series finalized");
        TelemetrySeries::from(samples)
    }

    /// Drop all state and start over at sample index 0
    pub fn restart(&mut self) {
        self.samples.clear();
        self.last_accepted = None;
        self.sample_index = 0;
    }

    /// Samples built so far
    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last_accepted(&self) -> Option<f64> {
        self.last_accepted
    }

    pub fn metrics(&self) -> &IngestionMetrics {
        &self.metrics
    }
}
