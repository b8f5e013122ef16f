use once_cell::sync::Lazy;
use regex::Regex;

/// Milliseconds on the media timeline.
pub type Millis = i64;

static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d{2}):(\d{2}),(\d{3})$").expect("valid timestamp pattern"));

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn ms_to_timestamp(ms: Millis) -> String {
    let ms = ms.max(0);
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let secs = total_seconds % 60;
    let millis = ms % 1000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds.
///
/// Anything that does not match the exact pattern yields 0, so a single bad
/// timestamp never aborts a whole file.
pub fn timestamp_to_ms(ts: &str) -> Millis {
    let Some(caps) = TIMESTAMP_RE.captures(ts.trim()) else {
        return 0;
    };

    let field = |i: usize| caps[i].parse::<Millis>().ok();
    let (Some(h), Some(m), Some(s), Some(ms)) = (field(1), field(2), field(3), field(4)) else {
        return 0;
    };

    h.checked_mul(3600)
        .and_then(|v| v.checked_add(m * 60 + s))
        .and_then(|v| v.checked_mul(1000))
        .and_then(|v| v.checked_add(ms))
        .unwrap_or(0)
}

/// Format milliseconds as a minute clock (MM:SS:mmm) for the timeline header
pub fn format_clock(ms: Millis) -> String {
    let total_ms = ms.max(0);
    let total_seconds = total_ms / 1000;
    format!(
        "{:02}:{:02}:{:03}",
        total_seconds / 60,
        total_seconds % 60,
        total_ms % 1000
    )
}

/// Short label for ruler ticks (MM:SS or H:MM:SS, tenths when below a second step)
pub fn format_ruler_label(ms: Millis, step_ms: Millis) -> String {
    let ms = ms.max(0);
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    let base = if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    };

    if step_ms < 1000 {
        format!("{}.{}", base, (ms % 1000) / 100)
    } else {
        base
    }
}
