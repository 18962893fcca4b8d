//! Collaborator interfaces for a recognition pass.
//!
//! Frame decoding and OCR live outside this workspace; they are consumed through
//! these narrow traits so the reconstruction worker can run against real video,
//! recorded readings, or scripted test data.

use crate::{Frame, RawReading};

/// Supplies cropped speedometer regions in strictly increasing frame order.
pub trait FrameSource: Send {
    /// Next frame, or `None` at end of stream
    fn next_frame(&mut self) -> Option<Frame>;

    /// Total frames expected, when known (used for progress reporting)
    fn frame_count_hint(&self) -> Option<u64> {
        None
    }
}

/// Optical character recognizer for a speedometer region.
///
/// Must return `None` for garbage instead of failing.
pub trait ReadingRecognizer: Send {
    fn recognize(&mut self, frame: &Frame) -> Option<f64>;
}

/// Ordered stream of raw readings consumed by the reconstruction worker.
pub trait ReadingSource: Send {
    /// Next reading, or `None` at end of stream
    fn next_reading(&mut self) -> Option<RawReading>;

    /// Total readings expected, when known
    fn len_hint(&self) -> Option<u64> {
        None
    }
}

impl<S: ReadingSource + ?Sized> ReadingSource for Box<S> {
    fn next_reading(&mut self) -> Option<RawReading> {
        (**self).next_reading()
    }

    fn len_hint(&self) -> Option<u64> {
        (**self).len_hint()
    }
}
