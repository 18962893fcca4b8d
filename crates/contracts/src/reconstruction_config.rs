//! Reconstruction and analysis settings shared across crates.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Speedometer values a misread digit string is most likely standing in for
pub const DEFAULT_PLAUSIBLE_SPEEDS_KMH: [f64; 9] =
    [65.0, 115.0, 155.0, 105.0, 205.0, 150.0, 250.0, 135.0, 165.0];

/// Largest accepted slope window (neighbours on each side)
pub const MAX_SLOPE_WINDOW: usize = 1000;

/// Telemetry Builder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReconstructionConfig {
    /// Video frame rate (frames per second); one sample per frame
    #[validate(range(exclusive_min = 0.0))]
    pub frame_rate: f64,

    /// Jump from the last accepted speed above which a reading is treated as misread (km/h)
    #[serde(default = "default_outlier_threshold")]
    #[validate(range(exclusive_min = 0.0))]
    pub outlier_threshold_kmh: f64,

    /// Replacement candidates for misread readings, in preference order for ties
    #[serde(default = "default_plausible_speeds")]
    #[validate(length(min = 1))]
    pub plausible_speeds_kmh: Vec<f64>,

    /// Neighbours on each side used for the local speed/distance slope
    #[serde(default = "default_slope_window")]
    #[validate(range(min = 1, max = 1000))]
    pub slope_window: usize,
}

fn default_outlier_threshold() -> f64 {
    50.0
}

fn default_plausible_speeds() -> Vec<f64> {
    DEFAULT_PLAUSIBLE_SPEEDS_KMH.to_vec()
}

fn default_slope_window() -> usize {
    5
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            outlier_threshold_kmh: default_outlier_threshold(),
            plausible_speeds_kmh: default_plausible_speeds(),
            slope_window: default_slope_window(),
        }
    }
}

impl ReconstructionConfig {
    /// Config for a given frame rate, other settings at their defaults
    pub fn with_frame_rate(frame_rate: f64) -> Self {
        Self {
            frame_rate,
            ..Default::default()
        }
    }

    /// Seconds between consecutive samples
    #[inline]
    pub fn time_interval(&self) -> f64 {
        1.0 / self.frame_rate
    }
}

/// Comparison session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisConfig {
    /// Distance moved by one manual recalibration step (m)
    #[serde(default = "default_nudge_step")]
    #[validate(range(exclusive_min = 0.0))]
    pub nudge_step_m: f64,
}

fn default_nudge_step() -> f64 {
    1.0
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            nudge_step_m: default_nudge_step(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ReconstructionConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.time_interval() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_frame_rate_rejected() {
        let config = ReconstructionConfig::with_frame_rate(0.0);
        let err = config.validate().unwrap_err();
        assert!(err.field_errors().contains_key("frame_rate"));
    }

    #[test]
    fn test_empty_candidates_rejected() {
        let config = ReconstructionConfig {
            plausible_speeds_kmh: Vec::new(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.field_errors().contains_key("plausible_speeds_kmh"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ReconstructionConfig =
            serde_json::from_str(r#"{ "frame_rate": 60.0 }"#).unwrap();
        assert_eq!(config.slope_window, 5);
        assert_eq!(config.outlier_threshold_kmh, 50.0);
        assert_eq!(config.plausible_speeds_kmh.len(), 9);
    }
}
