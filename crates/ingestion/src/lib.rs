//! # Ingestion
//!
//! Telemetry reconstruction module.
//!
//! Responsibilities:
//! - Correct noisy speedometer readings (`ReadingCorrector`)
//! - Build a speed / distance / acceleration series (`TelemetryBuilder`)
//! - Run reconstruction on a dedicated worker thread with cooperative cancellation
//! - Report progress via async-channel and counters via `metrics`
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{ReconstructionWorker, RecognizedReadings};
//! use contracts::ReconstructionConfig;
//!
//! let source = RecognizedReadings::new(frames, recognizer);
//! let handle = ReconstructionWorker::new(ReconstructionConfig::with_frame_rate(30.0))
//!     .spawn(source)?;
//!
//! let progress = handle.progress();
//! while let Ok(update) = progress.recv().await {
//!     println!("{:?}%", update.percent());
//! }
//! let series = handle.join()?.into_series();
//! ```
//!
//! ## Mock Testing
//!
//! ```ignore
//! use ingestion::{reconstruct, ScriptedReadings};
//!
//! let source = ScriptedReadings::from_values(0, &[Some(60.0), Some(61.0), None]);
//! let series = reconstruct(source, &Default::default());
//! ```

mod adapter;
mod builder;
mod corrector;
mod error;
pub mod kinematics;
mod metrics;
mod mock;
mod worker;

// Re-exports
pub use adapter::RecognizedReadings;
pub use builder::TelemetryBuilder;
pub use contracts::{RawReading, TelemetrySample, TelemetrySeries};
pub use corrector::{parse_reading_text, Correction, CorrectionKind, ReadingCorrector};
pub use error::{IngestionError, Result};
pub use kinematics::rebuild_series;
pub use self::metrics::{IngestionMetrics, MetricsSnapshot};
pub use mock::{ScriptedFrames, ScriptedReadings, ScriptedRecognizer};
pub use worker::{
    reconstruct, run_reconstruction, ReconstructionOutcome, ReconstructionProgress,
    ReconstructionWorker, WorkerHandle,
};
