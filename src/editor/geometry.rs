use crate::utils::Millis;

/// Maps timeline pixels to milliseconds and back.
///
/// `origin_x` is the screen x of 0 ms (already shifted by scrolling).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    pub origin_x: f32,
    pub px_per_sec: f32,
    pub duration_ms: Millis,
}

impl TimelineGeometry {
    pub fn new(origin_x: f32, px_per_sec: f32, duration_ms: Millis) -> Self {
        Self {
            origin_x,
            px_per_sec,
            duration_ms: duration_ms.max(0),
        }
    }

    /// Full width of the track in pixels
    pub fn total_width(&self) -> f32 {
        self.ms_to_width(self.duration_ms)
    }

    pub fn ms_to_width(&self, ms: Millis) -> f32 {
        ms as f32 / 1000.0 * self.px_per_sec
    }

    pub fn ms_to_x(&self, ms: Millis) -> f32 {
        self.origin_x + self.ms_to_width(ms)
    }

    /// Screen x to a position on the track, clamped to `[0, duration]`
    pub fn x_to_ms(&self, x: f32) -> Millis {
        if self.px_per_sec <= 0.0 || !x.is_finite() {
            return 0;
        }
        let offset = (x - self.origin_x).clamp(0.0, self.total_width());
        let ms = (offset / self.px_per_sec * 1000.0).round() as Millis;
        ms.clamp(0, self.duration_ms)
    }

    /// Ruler step giving labels at least `min_gap_px` apart
    pub fn tick_step_ms(&self, min_gap_px: f32) -> Millis {
        const STEPS: [Millis; 12] = [
            100, 250, 500, 1_000, 2_000, 5_000, 10_000, 15_000, 30_000, 60_000, 300_000, 600_000,
        ];
        STEPS
            .iter()
            .copied()
            .find(|step| self.ms_to_width(*step) >= min_gap_px)
            .unwrap_or(3_600_000)
    }
}

/// Scroll offset that keeps `target_x` at least `pad` pixels inside the view.
///
/// Only moves when the target gets close to an edge, so a playing playhead
/// pages the view instead of dragging it every frame.
pub fn nudge_scroll(target_x: f32, scroll: f32, view_width: f32, content_width: f32, pad: f32) -> f32 {
    let max_scroll = (content_width - view_width).max(0.0);
    let pad = pad.min(view_width / 2.0);
    let next = if target_x < scroll + pad {
        target_x - pad
    } else if target_x > scroll + view_width - pad {
        target_x - view_width + pad
    } else {
        scroll
    };
    next.clamp(0.0, max_scroll)
}

/// Keep a zoom level inside the configured range
pub fn clamp_zoom(px_per_sec: f32, min: f32, max: f32) -> f32 {
    if !px_per_sec.is_finite() {
        return min;
    }
    px_per_sec.max(min).min(max)
}
