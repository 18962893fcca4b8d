//! Reading Corrector
//!
//! Maps a noisy speedometer reading plus the last accepted value to a corrected value.
//! Stateless: the caller owns `last_accepted`.

use contracts::{ReconstructionConfig, DEFAULT_PLAUSIBLE_SPEEDS_KMH};
use tracing::debug;

/// How a reading was treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionKind {
    /// Reading kept as is
    Accepted,
    /// Absent, NaN, infinite or negative reading, replaced by the 0 sentinel
    Unrecognized,
    /// Implausible jump, replaced by the nearest plausible speed
    Substituted,
}

/// Result of correcting one reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Corrected speed (km/h)
    pub value: f64,
    pub kind: CorrectionKind,
}

/// Outlier heuristic for misread speedometer digits
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingCorrector {
    outlier_threshold_kmh: f64,
    plausible_speeds_kmh: Vec<f64>,
}

impl Default for ReadingCorrector {
    fn default() -> Self {
        Self::new(50.0, DEFAULT_PLAUSIBLE_SPEEDS_KMH.to_vec())
    }
}

impl ReadingCorrector {
    /// Create a corrector; candidate order decides ties
    pub fn new(outlier_threshold_kmh: f64, plausible_speeds_kmh: Vec<f64>) -> Self {
        Self {
            outlier_threshold_kmh,
            plausible_speeds_kmh,
        }
    }

    pub fn from_config(config: &ReconstructionConfig) -> Self {
        Self::new(
            config.outlier_threshold_kmh,
            config.plausible_speeds_kmh.clone(),
        )
    }

    pub fn outlier_threshold_kmh(&self) -> f64 {
        self.outlier_threshold_kmh
    }

    pub fn plausible_speeds_kmh(&self) -> &[f64] {
        &self.plausible_speeds_kmh
    }

    /// Corrected value of `raw` given the last accepted speed. Never fails.
    #[inline]
    pub fn correct(&self, raw: Option<f64>, last_accepted: Option<f64>) -> f64 {
        self.assess(raw, last_accepted).value
    }

    /// Like [`correct`](Self::correct), also reporting which rule applied
    pub fn assess(&self, raw: Option<f64>, last_accepted: Option<f64>) -> Correction {
        let raw = match raw {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            other => {
                debug!(raw = ?other, "unrecognized reading, using 0");
                return Correction {
                    value: 0.0,
                    kind: CorrectionKind::Unrecognized,
                };
            }
        };

        let Some(last) = last_accepted else {
            return Correction {
                value: raw,
                kind: CorrectionKind::Accepted,
            };
        };

        if last < 0.0 || (raw - last).abs() <= self.outlier_threshold_kmh {
            return Correction {
                value: raw,
                kind: CorrectionKind::Accepted,
            };
        }

        match self.nearest_plausible(last) {
            Some(candidate) => {
                debug!(raw, last, corrected = candidate, "outlier reading substituted");
                Correction {
                    value: candidate,
                    kind: CorrectionKind::Substituted,
                }
            }
            None => Correction {
                value: raw,
                kind: CorrectionKind::Accepted,
            },
        }
    }

    /// First candidate minimizing `|candidate - last|`
    fn nearest_plausible(&self, last: f64) -> Option<f64> {
        self.plausible_speeds_kmh
            .iter()
            .copied()
            .min_by(|a, b| (a - last).abs().total_cmp(&(b - last).abs()))
    }
}

/// Parse recognizer text into a reading: keeps digits and `.`, `None` when nothing parses
pub fn parse_reading_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}
