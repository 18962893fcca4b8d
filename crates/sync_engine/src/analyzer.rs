//! Distance-Indexed Analyzer
//!
//! Wraps one finalized series and answers "what was happening at distance x".

use contracts::{TelemetrySample, TelemetrySeries, STANDARD_GRAVITY};
use ingestion::kinematics;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::index::DistanceIndex;

const EVENT_CHANNEL_CAPACITY: usize = 64;
const DEFAULT_SLOPE_WINDOW: usize = 5;

/// Change notification
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerEvent {
    /// Cursor now points at `index`
    CursorMoved { index: usize, distance: f64 },
    /// Every distance moved by `delta` meters
    DistanceShifted { delta: f64 },
}

/// One series plus its distance index and cursor
#[derive(Debug)]
pub struct DistanceAnalyzer {
    name: String,
    series: TelemetrySeries,
    index: DistanceIndex,
    cursor: usize,
    slope_window: usize,
    events: broadcast::Sender<AnalyzerEvent>,
}

impl DistanceAnalyzer {
    pub fn new(name: impl Into<String>, series: TelemetrySeries) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut analyzer = Self {
            name: name.into(),
            series,
            index: DistanceIndex::default(),
            cursor: 0,
            slope_window: DEFAULT_SLOPE_WINDOW,
            events,
        };
        analyzer.build_index();
        analyzer
    }

    /// Neighbours used by [`current_acceleration`](Self::current_acceleration)
    pub fn with_slope_window(mut self, slope_window: usize) -> Self {
        self.slope_window = slope_window;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn series(&self) -> &TelemetrySeries {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Receive cursor and shift notifications
    pub fn subscribe(&self) -> broadcast::Receiver<AnalyzerEvent> {
        self.events.subscribe()
    }

    /// Rebuild the distance index from the current series
    pub fn build_index(&mut self) {
        self.index = DistanceIndex::build(self.series.iter().map(|s| s.distance));
    }

    /// Index of the sample nearest to `distance`; `None` only for an empty series
    #[inline]
    pub fn nearest_index(&self, distance: f64) -> Option<usize> {
        self.index.nearest(distance)
    }

    /// Sample nearest to `distance`
    pub fn sample_at(&self, distance: f64) -> Option<&TelemetrySample> {
        self.nearest_index(distance).and_then(|i| self.series.get(i))
    }

    /// Speed (km/h) at `distance`, 0 for an empty series
    pub fn speed_at(&self, distance: f64) -> f64 {
        self.sample_at(distance).map_or(0.0, |s| s.speed)
    }

    /// Stored acceleration (m/s²) at `distance`, 0 for an empty series
    pub fn acceleration_at(&self, distance: f64) -> f64 {
        self.sample_at(distance).map_or(0.0, |s| s.acceleration)
    }

    /// Source frame at `distance`, 0 for an empty series
    pub fn frame_at(&self, distance: f64) -> u64 {
        self.sample_at(distance).map_or(0, |s| s.frame_index)
    }

    /// Add `delta` meters to every distance and rebuild the index
    #[instrument(name = "analyzer_shift_distance", skip(self), fields(series = %self.name))]
    pub fn shift_distance(&mut self, delta: f64) {
        self.series.shift_distance(delta);
        self.build_index();
        debug!(delta, "distance shifted");
        let _ = self.events.send(AnalyzerEvent::DistanceShifted { delta });
    }

    /// Move the cursor to the sample nearest to `distance`.
    ///
    /// Returns the distance of the sample the cursor landed on.
    pub fn set_cursor_by_distance(&mut self, distance: f64) -> Option<f64> {
        self.cursor = self.nearest_index(distance).unwrap_or(0);
        let landed = self.series.get(self.cursor).map(|s| s.distance)?;
        self.notify_cursor(landed);
        Some(landed)
    }

    /// Step the cursor forward; stays on the last sample once there
    pub fn advance_cursor(&mut self) -> usize {
        if self.cursor + 1 < self.series.len() {
            self.cursor += 1;
            if let Some(distance) = self.series.get(self.cursor).map(|s| s.distance) {
                self.notify_cursor(distance);
            }
        }
        self.cursor
    }

    /// Cursor position, always within `[0, len - 1]` for a non-empty series
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_sample(&self) -> Option<&TelemetrySample> {
        self.series.get(self.cursor)
    }

    pub fn current_frame(&self) -> Option<u64> {
        self.current_sample().map(|s| s.frame_index)
    }

    /// Acceleration (m/s²) at the cursor from the local speed/distance slope
    pub fn current_acceleration(&self) -> f64 {
        let samples = self.series.samples();
        if self.cursor >= samples.len() {
            return 0.0;
        }
        // only the slope neighbourhood of the cursor
        let lo = self.cursor.saturating_sub(self.slope_window);
        let hi = self.cursor.saturating_add(self.slope_window).min(samples.len() - 1);
        let speeds: Vec<f64> = samples[lo..=hi].iter().map(|s| s.speed).collect();
        let distances: Vec<f64> = samples[lo..=hi].iter().map(|s| s.distance).collect();
        kinematics::acceleration_at(&speeds, &distances, self.cursor - lo, self.slope_window)
    }

    /// [`current_acceleration`](Self::current_acceleration) in g
    pub fn current_acceleration_g(&self) -> f64 {
        self.current_acceleration() / STANDARD_GRAVITY
    }

    pub fn initial_frame(&self) -> Option<u64> {
        self.series.initial_frame()
    }

    fn notify_cursor(&self, distance: f64) {
        let _ = self.events.send(AnalyzerEvent::CursorMoved {
            index: self.cursor,
            distance,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn series(points: &[(f64, f64)]) -> TelemetrySeries {
        points
            .iter()
            .enumerate()
            .map(|(i, &(distance, speed))| TelemetrySample {
                frame_index: 100 + i as u64,
                speed,
                distance,
                time: i as f64 * 0.1,
                acceleration: i as f64,
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_point_queries() {
        let analyzer =
            DistanceAnalyzer::new("a", series(&[(0.0, 10.0), (5.0, 20.0), (10.0, 30.0)]));
        assert_eq!(analyzer.speed_at(4.0), 20.0);
        assert_eq!(analyzer.acceleration_at(9.0), 2.0);
        assert_eq!(analyzer.frame_at(-1.0), 100);
        assert_eq!(analyzer.initial_frame(), Some(100));
    }

    #[test]
    fn test_empty_analyzer() {
        let mut analyzer = DistanceAnalyzer::new("empty", TelemetrySeries::new());
        assert_eq!(analyzer.nearest_index(5.0), None);
        assert_eq!(analyzer.speed_at(5.0), 0.0);
        assert_eq!(analyzer.acceleration_at(5.0), 0.0);
        assert_eq!(analyzer.frame_at(5.0), 0);
        assert_eq!(analyzer.set_cursor_by_distance(5.0), None);
        assert_eq!(analyzer.advance_cursor(), 0);
        assert!(analyzer.current_sample().is_none());
        assert_eq!(analyzer.current_acceleration(), 0.0);
    }

    #[test]
    fn test_shift_invariance() {
        let mut rng = rand::rng();
        let mut total = 0.0;
        let points: Vec<(f64, f64)> = (0..200)
            .map(|_| {
                total += rng.random_range(0.01..2.0);
                (total, rng.random_range(0.0..200.0))
            })
            .collect();
        let mut analyzer = DistanceAnalyzer::new("a", series(&points));
        let distances: Vec<f64> = analyzer.series().iter().map(|s| s.distance).collect();
        let nearest: Vec<Option<usize>> =
            distances.iter().map(|&x| analyzer.nearest_index(x)).collect();

        for _ in 0..50 {
            let d = rng.random_range(-50.0..50.0);
            analyzer.shift_distance(d);
            for (i, &x) in distances.iter().enumerate() {
                assert_eq!(analyzer.nearest_index(x + d), nearest[i], "i {i}, d {d}");
            }
            analyzer.shift_distance(-d);

            for (i, sample) in analyzer.series().iter().enumerate() {
                assert!((sample.distance - distances[i]).abs() < 1e-9, "i {i}, d {d}");
            }
            for (i, &x) in distances.iter().enumerate() {
                assert_eq!(analyzer.nearest_index(x), nearest[i], "i {i}, d {d}");
            }
        }
    }

    #[test]
    fn test_shift_moves_queries() {
        let mut analyzer =
            DistanceAnalyzer::new("a", series(&[(0.0, 10.0), (5.0, 20.0), (10.0, 30.0)]));
        analyzer.shift_distance(100.0);
        assert_eq!(analyzer.speed_at(105.0), 20.0);
        assert_eq!(analyzer.series().samples()[0].distance, 100.0);
    }

    #[test]
    fn test_cursor_clamps_at_end() {
        let mut analyzer =
            DistanceAnalyzer::new("a", series(&[(0.0, 10.0), (5.0, 20.0), (10.0, 30.0)]));
        assert_eq!(analyzer.set_cursor_by_distance(6.0), Some(5.0));
        assert_eq!(analyzer.cursor(), 1);
        assert_eq!(analyzer.advance_cursor(), 2);
        assert_eq!(analyzer.advance_cursor(), 2);
        assert_eq!(analyzer.advance_cursor(), 2);
        assert_eq!(analyzer.current_frame(), Some(102));
    }

    #[test]
    fn test_current_acceleration_from_slope() {
        // speed rises 1 km/h per meter; at 36 km/h that is 36 * 25/324 m/s²
        let points: Vec<(f64, f64)> = (0..11).map(|i| (i as f64, 31.0 + i as f64)).collect();
        let mut analyzer = DistanceAnalyzer::new("a", series(&points));
        analyzer.set_cursor_by_distance(5.0);
        let expected = 36.0 * 25.0 / 324.0;
        assert!((analyzer.current_acceleration() - expected).abs() < 1e-9);
        assert!((analyzer.current_acceleration_g() - expected / 9.8).abs() < 1e-9);
    }

    #[test]
    fn test_current_acceleration_matches_whole_series() {
        let mut rng = rand::rng();
        let mut total = 0.0;
        let points: Vec<(f64, f64)> = (0..60)
            .map(|_| {
                total += rng.random_range(0.1..3.0);
                (total, rng.random_range(0.0..200.0))
            })
            .collect();
        let speeds: Vec<f64> = points.iter().map(|p| p.1).collect();
        let distances: Vec<f64> = points.iter().map(|p| p.0).collect();

        for window in [1, 5, 100] {
            let mut analyzer =
                DistanceAnalyzer::new("a", series(&points)).with_slope_window(window);
            for i in 0..points.len() {
                let expected = kinematics::acceleration_at(&speeds, &distances, i, window);
                let got = analyzer.current_acceleration();
                assert!((got - expected).abs() < 1e-9, "i {i}, window {window}");
                analyzer.advance_cursor();
            }
        }
    }

    #[test]
    fn test_events_published() {
        let mut analyzer = DistanceAnalyzer::new("a", series(&[(0.0, 10.0), (5.0, 20.0)]));
        let mut rx = analyzer.subscribe();

        analyzer.shift_distance(1.0);
        analyzer.set_cursor_by_distance(6.0);
        analyzer.advance_cursor();

        assert_eq!(rx.try_recv().unwrap(), AnalyzerEvent::DistanceShifted { delta: 1.0 });
        assert_eq!(
            rx.try_recv().unwrap(),
            AnalyzerEvent::CursorMoved {
                index: 1,
                distance: 6.0
            }
        );
        // cursor already at the end: no event
        assert!(rx.try_recv().is_err());
    }
}
