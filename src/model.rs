use serde::{Deserialize, Serialize};

use crate::formats::lrc::find_active_line_index;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLrc {
    #[serde(default)]
    pub metadata: LrcMetadata,
    pub lines: Vec<LyricLine>,
}

impl ParsedLrc {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Timestamp of the last line, or 0 when there are no lines.
    pub fn last_time_ms(&self) -> u64 {
        self.lines.last().map(|l| l.time_ms).unwrap_or(0)
    }

    pub fn active_index(&self, time_ms: i64) -> Option<usize> {
        find_active_line_index(&self.lines, time_ms)
    }

    /// Shift every line by `delta_ms`, clamping at zero. Order is preserved
    /// because the shift is uniform and clamping is monotonic.
    pub fn shift(&mut self, delta_ms: i64) {
        if delta_ms == 0 {
            return;
        }
        for line in &mut self.lines {
            line.time_ms = shift_ms(line.time_ms, delta_ms);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrcMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, rename = "offset", skip_serializing_if = "Option::is_none")]
    pub offset_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    pub time_ms: u64,
    pub text: String,
}

impl LyricLine {
    pub fn new(time_ms: u64, text: impl Into<String>) -> Self {
        Self {
            time_ms,
            text: text.into(),
        }
    }
}

pub(crate) fn shift_ms(time_ms: u64, delta_ms: i64) -> u64 {
    let shifted = i128::from(time_ms) + i128::from(delta_ms);
    u64::try_from(shifted.max(0)).unwrap_or(u64::MAX)
}
