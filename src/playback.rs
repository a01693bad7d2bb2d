use std::time::{Duration, Instant};

use crate::{
    formats::{lrc::find_active_line_index, time::format_elapsed},
    model::LyricLine,
};

/// The active line moved to `index` (`None`: before the first line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChange {
    pub at_ms: u64,
    pub index: Option<usize>,
}

/// Elapsed-time clock of one lyric card. Positions are clamped to
/// `[0, duration_ms]` and the active line is only reported when it changes.
#[derive(Debug, Clone)]
pub struct Playback<'a> {
    lines: &'a [LyricLine],
    duration_ms: u64,
    position_ms: u64,
    active: Option<usize>,
    displayed_second: Option<u64>,
}

impl<'a> Playback<'a> {
    pub fn new(lines: &'a [LyricLine], duration_ms: u64) -> Self {
        Self {
            lines,
            duration_ms,
            position_ms: 0,
            active: None,
            displayed_second: None,
        }
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_line(&self) -> Option<&'a LyricLine> {
        self.active.and_then(|i| self.lines.get(i))
    }

    pub fn is_finished(&self) -> bool {
        self.position_ms >= self.duration_ms
    }

    /// Line to keep centered: the active one, or the first line while
    /// nothing is active yet. `None` only when there are no lines.
    pub fn scroll_index(&self) -> Option<usize> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.active.unwrap_or(0))
        }
    }

    pub fn advance_to(&mut self, elapsed_ms: u64) -> Option<LineChange> {
        self.set_position(elapsed_ms.min(self.duration_ms))
    }

    /// Move by `delta_ms` (negative rewinds), staying within the track.
    pub fn seek_by(&mut self, delta_ms: i64) -> Option<LineChange> {
        let target = i128::from(self.position_ms) + i128::from(delta_ms);
        let clamped = target.clamp(0, i128::from(self.duration_ms));
        self.set_position(u64::try_from(clamped).unwrap_or(self.duration_ms))
    }

    /// New `m:ss` label when the whole second changed since the last call.
    pub fn take_display_update(&mut self) -> Option<String> {
        let second = self.position_ms / 1_000;
        if self.displayed_second == Some(second) {
            return None;
        }
        self.displayed_second = Some(second);
        Some(format_elapsed(i64::try_from(self.position_ms).unwrap_or(i64::MAX)))
    }

    /// Drive the clock from its current position to the end in `tick_ms`
    /// steps. With `realtime` the steps follow the wall clock, otherwise they
    /// are simulated back to back.
    pub fn run_to_end(
        &mut self,
        tick_ms: u64,
        realtime: bool,
        mut on_change: impl FnMut(&LineChange, Option<&'a LyricLine>),
    ) {
        let tick = tick_ms.max(1);
        let start_ms = self.position_ms;
        let started = Instant::now();

        if let Some(change) = self.set_position(start_ms) {
            on_change(&change, self.active_line());
        }

        while !self.is_finished() {
            let next = if realtime {
                std::thread::sleep(Duration::from_millis(tick));
                let wall = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                start_ms.saturating_add(wall)
            } else {
                self.position_ms.saturating_add(tick)
            };

            if let Some(change) = self.advance_to(next) {
                on_change(&change, self.active_line());
            }
        }
    }

    fn set_position(&mut self, position_ms: u64) -> Option<LineChange> {
        self.position_ms = position_ms;
        let next = find_active_line_index(
            self.lines,
            i64::try_from(position_ms).unwrap_or(i64::MAX),
        );
        if next == self.active {
            return None;
        }
        self.active = next;
        Some(LineChange {
            at_ms: position_ms,
            index: next,
        })
    }
}
