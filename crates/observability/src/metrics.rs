//! 指标收集模块
//!
//! 重建与比较过程的 `metrics` 门面记录，以及序列统计聚合。

use contracts::{TelemetrySample, TelemetrySeries};
use metrics::{counter, gauge, histogram};

/// 记录重建进度
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_reconstruction_progress;
///
/// while let Ok(update) = progress.recv().await {
///     record_reconstruction_progress(update.frames_processed, update.total);
/// }
/// ```
pub fn record_reconstruction_progress(frames_processed: u64, total: Option<u64>) {
    gauge!("speedtrace_reconstruction_frames_processed").set(frames_processed as f64);
    if let Some(total) = total {
        gauge!("speedtrace_reconstruction_frames_expected").set(total as f64);
    }
}

/// 记录一次重建结束
pub fn record_reconstruction_finished(samples: usize, cancelled: bool) {
    let status = if cancelled { "cancelled" } else { "completed" };
    counter!(
        "speedtrace_reconstructions_total",
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("speedtrace_reconstruction_samples").record(samples as f64);
}

/// 记录序列加载
pub fn record_series_loaded(series: &str, samples: usize) {
    counter!(
        "speedtrace_series_loaded_total",
        "series" => series.to_string()
    )
    .increment(1);
    gauge!(
        "speedtrace_series_samples",
        "series" => series.to_string()
    )
    .set(samples as f64);
}

/// 记录用时差 (秒)
pub fn record_time_delta(delta_s: f64) {
    counter!("speedtrace_time_deltas_total").increment(1);
    histogram!("speedtrace_time_delta_abs_ms").record(delta_s.abs() * 1000.0);
}

/// 记录数据不足的区间选择
pub fn record_insufficient_selection(series: &str) {
    counter!(
        "speedtrace_insufficient_selections_total",
        "series" => series.to_string()
    )
    .increment(1);
}

/// 序列统计聚合器
///
/// 在内存中聚合速度 / 加速度，便于输出摘要。
#[derive(Debug, Clone, Default)]
pub struct SeriesStatsAggregator {
    /// 样本数
    pub total_samples: u64,

    /// 速度为 0 的样本数 (识别失败或静止)
    pub zero_speed_samples: u64,

    /// 起止距离
    first_distance: Option<f64>,
    last_distance: f64,

    /// 起止时间
    first_time: Option<f64>,
    last_time: f64,

    /// 速度统计 (km/h)
    pub speed_stats: RunningStats,

    /// 加速度统计 (g)
    pub acceleration_stats: RunningStats,
}

impl SeriesStatsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 聚合整条序列
    pub fn from_series(series: &TelemetrySeries) -> Self {
        let mut aggregator = Self::new();
        for sample in series {
            aggregator.update(sample);
        }
        aggregator
    }

    /// 更新聚合统计
    pub fn update(&mut self, sample: &TelemetrySample) {
        self.total_samples += 1;
        if sample.speed == 0.0 {
            self.zero_speed_samples += 1;
        }
        self.first_distance.get_or_insert(sample.distance);
        self.last_distance = sample.distance;
        self.first_time.get_or_insert(sample.time);
        self.last_time = sample.time;

        self.speed_stats.push(sample.speed);
        self.acceleration_stats.push(sample.acceleration_g());
    }

    /// 生成摘要报告
    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            total_samples: self.total_samples,
            zero_speed_samples: self.zero_speed_samples,
            zero_speed_rate: if self.total_samples > 0 {
                self.zero_speed_samples as f64 / self.total_samples as f64 * 100.0
            } else {
                0.0
            },
            span_m: self
                .first_distance
                .map_or(0.0, |first| self.last_distance - first),
            duration_s: self.first_time.map_or(0.0, |first| self.last_time - first),
            speed_kmh: StatsSummary::from(&self.speed_stats),
            acceleration_g: StatsSummary::from(&self.acceleration_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 序列摘要
#[derive(Debug, Clone, Default)]
pub struct SeriesSummary {
    pub total_samples: u64,
    pub zero_speed_samples: u64,
    pub zero_speed_rate: f64,
    pub span_m: f64,
    pub duration_s: f64,
    pub speed_kmh: StatsSummary,
    pub acceleration_g: StatsSummary,
}

impl std::fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Series Summary ===")?;
        writeln!(f, "Samples: {}", self.total_samples)?;
        writeln!(
            f,
            "Zero-speed samples: {} ({:.2}%)",
            self.zero_speed_samples, self.zero_speed_rate
        )?;
        writeln!(f, "Distance span (m): {:.3}", self.span_m)?;
        writeln!(f, "Duration (s): {:.3}", self.duration_s)?;
        writeln!(f, "Speed (km/h): {}", self.speed_kmh)?;
        writeln!(f, "Acceleration (g): {}", self.acceleration_g)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(speed: f64, distance: f64, time: f64, acceleration: f64) -> TelemetrySample {
        TelemetrySample {
            frame_index: 0,
            speed,
            distance,
            time,
            acceleration,
        }
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_series_aggregator() {
        let series = TelemetrySeries::from(vec![
            sample(0.0, 10.0, 1.0, 0.0),
            sample(36.0, 15.0, 2.0, 9.8),
            sample(72.0, 40.0, 3.0, -9.8),
        ]);
        let summary = SeriesStatsAggregator::from_series(&series).summary();

        assert_eq!(summary.total_samples, 3);
        assert_eq!(summary.zero_speed_samples, 1);
        assert!((summary.span_m - 30.0).abs() < 1e-12);
        assert!((summary.duration_s - 2.0).abs() < 1e-12);
        assert!((summary.speed_kmh.mean - 36.0).abs() < 1e-12);
        assert!((summary.acceleration_g.max - 1.0).abs() < 1e-12);
        assert!((summary.acceleration_g.min + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary_display() {
        let summary = SeriesStatsAggregator::new().summary();
        let text = summary.to_string();
        assert!(text.contains("Samples: 0"));
        assert!(text.contains("Speed (km/h): N/A"));
    }

    #[test]
    fn test_recorders_without_installed_recorder() {
        // The metrics facade is a no-op until a recorder is installed
        record_reconstruction_progress(10, Some(20));
        record_reconstruction_finished(10, true);
        record_series_loaded("a", 10);
        record_time_delta(-1.5);
        record_insufficient_selection("a");
    }
}
