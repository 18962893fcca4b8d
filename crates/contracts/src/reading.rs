//! Per-frame inputs of a recognition pass.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One recognized speedometer value.
///
/// `value` is `None` when the recognizer could not decode a number for the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Video frame the reading came from
    pub frame_index: u64,

    /// Decoded speed (km/h), if any
    pub value: Option<f64>,
}

impl RawReading {
    pub fn new(frame_index: u64, value: Option<f64>) -> Self {
        Self { frame_index, value }
    }

    /// Reading for a frame the recognizer could not decode
    pub fn unrecognized(frame_index: u64) -> Self {
        Self {
            frame_index,
            value: None,
        }
    }
}

/// Cropped speedometer region of one video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame position in the video (0-based)
    pub index: u64,

    /// Region width in pixels
    pub width: u32,

    /// Region height in pixels
    pub height: u32,

    /// Packed BGR pixels of the region
    pub data: Bytes,
}
