//! Mock 读数源
//!
//! 用于无视频 / 无 OCR 环境的测试。

use std::collections::VecDeque;
use std::time::Duration;

use bytes::Bytes;
use contracts::{Frame, FrameSource, RawReading, ReadingRecognizer, ReadingSource};

use crate::corrector::parse_reading_text;

/// 预设读数序列
///
/// 可选的逐条延迟用于模拟 OCR 耗时。
#[derive(Debug, Clone, Default)]
pub struct ScriptedReadings {
    readings: VecDeque<RawReading>,
    total: u64,
    delay: Option<Duration>,
}

impl ScriptedReadings {
    /// 从读数列表创建
    pub fn new(readings: Vec<RawReading>) -> Self {
        let total = readings.len() as u64;
        Self {
            readings: readings.into(),
            total,
            delay: None,
        }
    }

    /// 从连续帧的速度值创建，帧号从 `start_frame` 开始
    pub fn from_values(start_frame: u64, values: &[Option<f64>]) -> Self {
        Self::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| RawReading::new(start_frame + i as u64, *v))
                .collect(),
        )
    }

    /// 每条读数前休眠 `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl ReadingSource for ScriptedReadings {
    fn next_reading(&mut self) -> Option<RawReading> {
        let reading = self.readings.pop_front()?;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Some(reading)
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.total)
    }
}

/// 生成固定数量的空白帧
#[derive(Debug, Clone)]
pub struct ScriptedFrames {
    next_index: u64,
    remaining: u64,
    total: u64,
}

impl ScriptedFrames {
    /// 从 `start_index` 开始生成 `count` 帧
    pub fn new(start_index: u64, count: u64) -> Self {
        Self {
            next_index: start_index,
            remaining: count,
            total: count,
        }
    }
}

impl FrameSource for ScriptedFrames {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.remaining == 0 {
            return None;
        }
        let frame = Frame {
            index: self.next_index,
            width: 4,
            height: 2,
            data: Bytes::from(vec![0u8; 4 * 2 * 3]),
        };
        self.next_index += 1;
        self.remaining -= 1;
        Some(frame)
    }

    fn frame_count_hint(&self) -> Option<u64> {
        Some(self.total)
    }
}

/// 按顺序返回预设 OCR 文本的识别器
///
/// 文本经 [`parse_reading_text`] 解析；脚本耗尽后一律识别失败。
#[derive(Debug, Clone, Default)]
pub struct ScriptedRecognizer {
    texts: VecDeque<Option<String>>,
}

impl ScriptedRecognizer {
    pub fn new(texts: Vec<Option<&str>>) -> Self {
        Self {
            texts: texts.into_iter().map(|t| t.map(str::to_owned)).collect(),
        }
    }
}

impl ReadingRecognizer for ScriptedRecognizer {
    fn recognize(&mut self, _frame: &Frame) -> Option<f64> {
        self.texts
            .pop_front()
            .flatten()
            .and_then(|text| parse_reading_text(&text))
    }
}
