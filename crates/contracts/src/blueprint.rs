//! SessionBlueprint - Config Loader output
//!
//! Describes one analysis session: how readings are reconstructed, how series are
//! compared, and which persisted series take part.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::{AnalysisConfig, ReconstructionConfig};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete session configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SessionBlueprint {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Telemetry reconstruction settings
    #[serde(default)]
    #[validate(nested)]
    pub reconstruction: ReconstructionConfig,

    /// Comparison settings
    #[serde(default)]
    #[validate(nested)]
    pub analysis: AnalysisConfig,

    /// Persisted series taking part in the comparison
    #[serde(default)]
    #[validate(nested)]
    pub series: Vec<SeriesConfig>,
}

/// One persisted series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SeriesConfig {
    /// Display name, unique within the session
    #[validate(length(min = 1))]
    pub name: String,

    /// Path of the series table
    pub path: PathBuf,

    /// Distance recalibration applied after loading (m)
    #[serde(default)]
    pub offset_m: f64,
}
