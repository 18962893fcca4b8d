//! Reconstruction metrics

use std::sync::atomic::{AtomicU64, Ordering};

use ::metrics::counter;

use crate::corrector::CorrectionKind;

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Total frames processed
    pub frames_processed: AtomicU64,

    /// Readings replaced by the 0 sentinel
    pub unrecognized: AtomicU64,

    /// Readings replaced by a plausible speed
    pub outliers_corrected: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed frame and how its reading was treated
    pub fn record_frame(&self, kind: CorrectionKind) {
        self.frames_processed.fetch_add(1, Ordering::Relaxed);
        let label = match kind {
            CorrectionKind::Accepted => "accepted",
            CorrectionKind::Unrecognized => {
                self.unrecognized.fetch_add(1, Ordering::Relaxed);
                "unrecognized"
            }
            CorrectionKind::Substituted => {
                self.outliers_corrected.fetch_add(1, Ordering::Relaxed);
                "substituted"
            }
        };
        counter!("speedtrace_frames_total", "reading" => label).increment(1);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_processed: self.frames_processed.load(Ordering::Relaxed),
            unrecognized: self.unrecognized.load(Ordering::Relaxed),
            outliers_corrected: self.outliers_corrected.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total frames processed
    pub frames_processed: u64,

    /// Readings replaced by the 0 sentinel
    pub unrecognized: u64,

    /// Readings replaced by a plausible speed
    pub outliers_corrected: u64,
}

impl MetricsSnapshot {
    /// Share of frames whose reading was kept as is
    pub fn acceptance_ratio(&self) -> f64 {
        if self.frames_processed == 0 {
            return 0.0;
        }
        let accepted = self
            .frames_processed
            .saturating_sub(self.unrecognized + self.outliers_corrected);
        accepted as f64 / self.frames_processed as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_frame() {
        let metrics = IngestionMetrics::new();
        metrics.record_frame(CorrectionKind::Accepted);
        metrics.record_frame(CorrectionKind::Accepted);
        metrics.record_frame(CorrectionKind::Unrecognized);
        metrics.record_frame(CorrectionKind::Substituted);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_processed, 4);
        assert_eq!(snapshot.unrecognized, 1);
        assert_eq!(snapshot.outliers_corrected, 1);
        assert!((snapshot.acceptance_ratio() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_ratio() {
        assert_eq!(MetricsSnapshot::default().acceptance_ratio(), 0.0);
    }
}
