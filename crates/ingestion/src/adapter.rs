//! 识别读数适配器
//!
//! 将 `FrameSource` + `ReadingRecognizer` 组合为 `ReadingSource`。

use contracts::{FrameSource, RawReading, ReadingRecognizer, ReadingSource};
use tracing::trace;

/// 逐帧识别读数
///
/// 每取一帧调用一次识别器；识别失败的帧产生 `value = None` 的读数。
pub struct RecognizedReadings<F, R> {
    frames: F,
    recognizer: R,
}

impl<F: FrameSource, R: ReadingRecognizer> RecognizedReadings<F, R> {
    /// 创建新的适配器
    pub fn new(frames: F, recognizer: R) -> Self {
        Self { frames, recognizer }
    }

    /// 拆回帧源和识别器
    pub fn into_parts(self) -> (F, R) {
        (self.frames, self.recognizer)
    }
}

impl<F: FrameSource, R: ReadingRecognizer> ReadingSource for RecognizedReadings<F, R> {
    fn next_reading(&mut self) -> Option<RawReading> {
        let frame = self.frames.next_frame()?;
        let value = self.recognizer.recognize(&frame);
        trace!(frame_index = frame.index, value = ?value, "frame recognized");
        Some(RawReading::new(frame.index, value))
    }

    fn len_hint(&self) -> Option<u64> {
        self.frames.frame_count_hint()
    }
}
