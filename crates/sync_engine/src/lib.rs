//! # Sync Engine
//!
//! 距离轴上的多序列对齐与比较。
//!
//! 负责：
//! - 距离索引与最近邻查询 (`DistanceAnalyzer`)
//! - 距离整体平移（手动校准）
//! - 区间内两序列用时差 (`time_delta`)
//! - 多序列比较会话 (`ComparisonSession`)
//!
//! ## 使用示例
//!
//! ```ignore
//! use sync_engine::{time_delta, DistanceAnalyzer};
//!
//! let a = DistanceAnalyzer::new("u9x", series_a);
//! let mut b = DistanceAnalyzer::new("su7u", series_b);
//! b.shift_distance(-3.0);
//!
//! let delta = time_delta(&a, &b, 0.0, 400.0)?;
//! println!("{delta}");
//! ```

mod analyzer;
mod comparison;
mod error;
mod index;
mod synchronizer;

// Re-exports
pub use analyzer::{AnalyzerEvent, DistanceAnalyzer};
pub use comparison::{ComparisonSession, HoverReadout};
pub use error::{Result, SyncError};
pub use index::DistanceIndex;
pub use synchronizer::{elapsed_time, time_delta, window_samples, TimeDelta};

// Re-export contracts types
pub use contracts::{TelemetrySample, TelemetrySeries};
