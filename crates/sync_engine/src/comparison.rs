//! Comparison session
//!
//! Several named analyzers on a shared distance axis, one of them selected for
//! manual recalibration.

use contracts::AnalysisConfig;
use serde::Serialize;
use tracing::{info, instrument};

use crate::analyzer::DistanceAnalyzer;
use crate::error::{Result, SyncError};
use crate::synchronizer::{self, TimeDelta};

/// Per-series values under the hover position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverReadout {
    pub series: String,
    /// Distance of the sample the cursor landed on (m)
    pub distance: f64,
    /// km/h
    pub speed: f64,
    /// Local acceleration in g
    pub acceleration_g: f64,
    pub frame_index: u64,
}

/// Analyzers compared together
#[derive(Debug)]
pub struct ComparisonSession {
    analyzers: Vec<DistanceAnalyzer>,
    selected: Option<usize>,
    nudge_step_m: f64,
}

impl Default for ComparisonSession {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl ComparisonSession {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            analyzers: Vec::new(),
            selected: None,
            nudge_step_m: config.nudge_step_m,
        }
    }

    /// Add an analyzer; names must be unique
    pub fn add(&mut self, analyzer: DistanceAnalyzer) -> Result<()> {
        if self.position(analyzer.name()).is_some() {
            return Err(SyncError::DuplicateSeries {
                name: analyzer.name().to_string(),
            });
        }
        info!(series = %analyzer.name(), samples = analyzer.len(), "series added to session");
        self.analyzers.push(analyzer);
        Ok(())
    }

    /// Remove an analyzer, clearing the selection if it pointed there
    pub fn remove(&mut self, name: &str) -> Option<DistanceAnalyzer> {
        let pos = self.position(name)?;
        self.selected = match self.selected {
            Some(sel) if sel == pos => None,
            Some(sel) if sel > pos => Some(sel - 1),
            other => other,
        };
        Some(self.analyzers.remove(pos))
    }

    pub fn analyzers(&self) -> &[DistanceAnalyzer] {
        &self.analyzers
    }

    pub fn get(&self, name: &str) -> Option<&DistanceAnalyzer> {
        self.analyzers.iter().find(|a| a.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DistanceAnalyzer> {
        self.analyzers.iter_mut().find(|a| a.name() == name)
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Select the series that nudges apply to
    pub fn select(&mut self, name: &str) -> Result<()> {
        let pos = self
            .position(name)
            .ok_or_else(|| SyncError::unknown_series(name))?;
        self.selected = Some(pos);
        Ok(())
    }

    pub fn selected(&self) -> Option<&DistanceAnalyzer> {
        self.selected.and_then(|i| self.analyzers.get(i))
    }

    /// Shift the selected series by `steps` nudge steps; returns the applied offset (m)
    #[instrument(name = "session_nudge_selected", skip(self))]
    pub fn nudge_selected(&mut self, steps: i32) -> Result<f64> {
        let delta = f64::from(steps) * self.nudge_step_m;
        let analyzer = self
            .selected
            .and_then(|i| self.analyzers.get_mut(i))
            .ok_or(SyncError::NoSelection)?;
        analyzer.shift_distance(delta);
        Ok(delta)
    }

    /// Move every cursor to `distance` and read the values there
    pub fn hover(&mut self, distance: f64) -> Vec<HoverReadout> {
        self.analyzers
            .iter_mut()
            .filter_map(|analyzer| {
                let landed = analyzer.set_cursor_by_distance(distance)?;
                let sample = analyzer.current_sample()?;
                Some(HoverReadout {
                    series: analyzer.name().to_string(),
                    distance: landed,
                    speed: sample.speed,
                    acceleration_g: analyzer.current_acceleration_g(),
                    frame_index: sample.frame_index,
                })
            })
            .collect()
    }

    /// Time delta between the first two series; endpoints in any order
    pub fn time_delta(&self, x_a: f64, x_b: f64) -> Result<TimeDelta> {
        match self.analyzers.as_slice() {
            [a, b, ..] => synchronizer::time_delta(a, b, x_a, x_b),
            other => Err(SyncError::NotEnoughSeries { count: other.len() }),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.analyzers.iter().position(|a| a.name() == name)
    }
}
