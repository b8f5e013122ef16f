use crate::utils::Millis;
use std::time::Instant;

/// Wall-clock playback position, in milliseconds
#[derive(Debug)]
pub struct PlaybackClock {
    start_time: Option<Instant>,
    paused_ms: Millis,
    offset_ms: Millis,
    is_paused: bool,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            start_time: None,
            paused_ms: 0,
            offset_ms: 0,
            is_paused: true,
        }
    }

    /// Start or resume playback
    pub fn resume(&mut self) {
        if self.is_paused {
            self.start_time = Some(Instant::now());
            self.offset_ms = self.paused_ms;
            self.is_paused = false;
        }
    }

    pub fn pause(&mut self) {
        if !self.is_paused {
            self.paused_ms = self.position_ms();
            self.is_paused = true;
        }
    }

    /// Jump to `ms` without changing the play state
    pub fn set_position(&mut self, ms: Millis) {
        if self.is_paused {
            self.paused_ms = ms;
        } else {
            self.start_time = Some(Instant::now());
            self.offset_ms = ms;
        }
    }

    pub fn position_ms(&self) -> Millis {
        if self.is_paused {
            self.paused_ms
        } else if let Some(start) = self.start_time {
            start.elapsed().as_millis() as Millis + self.offset_ms
        } else {
            0
        }
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
