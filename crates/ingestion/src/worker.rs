//! Reconstruction worker
//!
//! Runs a reading source through a [`TelemetryBuilder`] on a dedicated thread.
//! Cancellation is cooperative: the stop flag is checked once per frame, and a
//! cancelled run still hands back the series built so far.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use async_channel::{bounded, Receiver, Sender, TrySendError};
use contracts::{ReadingSource, ReconstructionConfig, TelemetrySeries};
use tracing::{debug, info, instrument, warn};

use crate::builder::TelemetryBuilder;
use crate::error::{IngestionError, Result};
use crate::metrics::IngestionMetrics;

/// Progress report sent after every processed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionProgress {
    /// Frames processed so far
    pub frames_processed: u64,

    /// Expected frame count, when the source knows it
    pub total: Option<u64>,

    /// Frame index of the last processed reading
    pub frame_index: u64,
}

impl ReconstructionProgress {
    /// Completion in percent (0..=100)
    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(0) => Some(100),
            Some(total) => Some(((self.frames_processed.min(total) * 100) / total) as u8),
            None => None,
        }
    }
}

/// How a reconstruction run ended
#[derive(Debug, Clone, PartialEq)]
pub enum ReconstructionOutcome {
    /// Source exhausted
    Completed(TelemetrySeries),
    /// Stopped early; carries the prefix built before the stop
    Cancelled(TelemetrySeries),
}

impl ReconstructionOutcome {
    pub fn series(&self) -> &TelemetrySeries {
        match self {
            Self::Completed(series) | Self::Cancelled(series) => series,
        }
    }

    pub fn into_series(self) -> TelemetrySeries {
        match self {
            Self::Completed(series) | Self::Cancelled(series) => series,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// Drain `source` through `builder` while `running` stays set
pub fn run_reconstruction<S: ReadingSource + ?Sized>(
    source: &mut S,
    builder: &mut TelemetryBuilder,
    running: &AtomicBool,
    progress: Option<&Sender<ReconstructionProgress>>,
) -> ReconstructionOutcome {
    let total = source.len_hint();
    let mut frames_processed = 0u64;

    loop {
        if !running.load(Ordering::Relaxed) {
            info!(frames_processed, "reconstruction cancelled");
            return ReconstructionOutcome::Cancelled(builder.finalize());
        }

        let Some(reading) = source.next_reading() else {
            break;
        };
        builder.process_reading(reading);
        frames_processed += 1;

        if let Some(tx) = progress {
            let update = ReconstructionProgress {
                frames_processed,
                total,
                frame_index: reading.frame_index,
            };
            match tx.try_send(update) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Closed(_)) => {
                    debug!("progress receiver dropped");
                }
            }
        }
    }

    info!(frames_processed, "reconstruction completed");
    ReconstructionOutcome::Completed(builder.finalize())
}

/// Synchronous reconstruction of a whole source on the calling thread
pub fn reconstruct<S: ReadingSource>(
    mut source: S,
    config: &ReconstructionConfig,
) -> TelemetrySeries {
    let mut builder = TelemetryBuilder::new(config);
    let running = AtomicBool::new(true);
    run_reconstruction(&mut source, &mut builder, &running, None).into_series()
}

/// Spawns reconstruction runs on their own thread
#[derive(Debug, Clone)]
pub struct ReconstructionWorker {
    config: ReconstructionConfig,
    progress_capacity: usize,
    metrics: Arc<IngestionMetrics>,
}

impl ReconstructionWorker {
    pub fn new(config: ReconstructionConfig) -> Self {
        Self {
            config,
            progress_capacity: 64,
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    /// Progress channel capacity; updates are dropped while it is full
    pub fn with_progress_capacity(mut self, capacity: usize) -> Self {
        self.progress_capacity = capacity.max(1);
        self
    }

    /// Report into shared metrics
    pub fn with_metrics(mut self, metrics: Arc<IngestionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Start the run
    #[instrument(
        name = "reconstruction_worker_spawn",
        skip(self, source),
        fields(frame_rate = self.config.frame_rate)
    )]
    pub fn spawn<S>(self, mut source: S) -> Result<WorkerHandle>
    where
        S: ReadingSource + 'static,
    {
        let (tx, rx) = bounded(self.progress_capacity);
        let running = Arc::new(AtomicBool::new(true));
        let metrics = self.metrics.clone();

        let thread_running = running.clone();
        let mut builder = TelemetryBuilder::with_metrics(&self.config, self.metrics);
        let thread = thread::Builder::new()
            .name("speedtrace-reconstruct".to_string())
            .spawn(move || {
                info!("reconstruction worker started");
                let outcome =
                    run_reconstruction(&mut source, &mut builder, &thread_running, Some(&tx));
                thread_running.store(false, Ordering::SeqCst);
                info!(
                    samples = outcome.series().len(),
                    cancelled = outcome.is_cancelled(),
                    "reconstruction worker stopped"
                );
                outcome
            })?;

        Ok(WorkerHandle {
            running,
            thread,
            progress: rx,
            metrics,
        })
    }
}

/// Handle to a running reconstruction
#[derive(Debug)]
pub struct WorkerHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<ReconstructionOutcome>,
    progress: Receiver<ReconstructionProgress>,
    metrics: Arc<IngestionMetrics>,
}

impl WorkerHandle {
    /// Ask the worker to stop after the current frame
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            debug!("reconstruction stop requested");
        }
    }

    /// Shared stop flag, for wiring into signal handlers
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Progress receiver; closes when the worker exits
    pub fn progress(&self) -> Receiver<ReconstructionProgress> {
        self.progress.clone()
    }

    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Wait for the worker and take its outcome
    pub fn join(self) -> Result<ReconstructionOutcome> {
        self.thread.join().map_err(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(message = %message, "reconstruction worker panicked");
            IngestionError::WorkerPanicked { message }
        })
    }
}
