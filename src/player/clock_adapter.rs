use crate::utils::{clamp_ms, Millis, Throttle};
use std::time::Instant;

/// Default rate at which playback publishes `current_ms`
pub const DEFAULT_PUBLISH_HZ: f64 = 15.0;

/// Publishes the playhead position.
///
/// While playing, source samples are throttled to the publish rate (latest
/// sample wins). While paused, positions are set directly.
#[derive(Debug)]
pub struct PlaybackClockAdapter {
    throttle: Throttle<Millis>,
    current_ms: Millis,
    duration_ms: Millis,
    playing: bool,
}

impl PlaybackClockAdapter {
    pub fn new(publish_hz: f64) -> Self {
        Self {
            throttle: Throttle::new(publish_hz),
            current_ms: 0,
            duration_ms: 0,
            playing: false,
        }
    }

    pub fn current_ms(&self) -> Millis {
        self.current_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Unknown duration counts as zero; the position is re-clamped either way
    pub fn set_duration(&mut self, duration_ms: Option<Millis>) {
        self.duration_ms = duration_ms.unwrap_or(0).max(0);
        self.current_ms = self.clamp(self.current_ms);
    }

    /// Set the position right away, dropping any throttled sample
    pub fn set_position(&mut self, ms: Millis) -> Millis {
        self.throttle.take_pending();
        self.current_ms = self.clamp(ms);
        self.current_ms
    }

    pub fn start(&mut self) {
        if !self.playing {
            self.playing = true;
            self.throttle.reset();
        }
    }

    /// Stop sampling; `position` is the source's real position, if it should win
    pub fn stop(&mut self, position: Option<Millis>) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.throttle.reset();
        if let Some(ms) = position {
            self.current_ms = self.clamp(ms);
        }
    }

    /// Feed one sample from the running source; returns the published value
    pub fn tick(&mut self, sample_ms: Millis, now: Instant) -> Option<Millis> {
        if !self.playing {
            return None;
        }
        let published = self.throttle.offer(sample_ms, now)?;
        self.current_ms = self.clamp(published);
        Some(self.current_ms)
    }

    fn clamp(&self, ms: Millis) -> Millis {
        clamp_ms(ms, 0, self.duration_ms)
    }
}

impl Default for PlaybackClockAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLISH_HZ)
    }
}
