use crate::utils::Millis;
use std::fmt;
use uuid::Uuid;

/// Shortest cue the editor will keep
pub const MIN_CUE_LEN_MS: Millis = 50;

/// Text given to parsed or committed cues that came out empty
pub const PLACEHOLDER_TEXT: &str = "Subtitle";

/// Text given to cues created from the timeline
pub const NEW_CUE_TEXT: &str = "New subtitle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CueId(Uuid);

impl CueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell cues apart in logs
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for CueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// A single timed subtitle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub id: CueId,
    pub start_ms: Millis,
    pub end_ms: Millis,
    pub text: String,
}

impl Cue {
    pub fn new(start_ms: Millis, end_ms: Millis, text: impl Into<String>) -> Self {
        Self {
            id: CueId::new(),
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    pub fn len_ms(&self) -> Millis {
        self.end_ms - self.start_ms
    }

    /// Half-open: a cue ending exactly where the next begins hands over at that instant
    pub fn contains(&self, ms: Millis) -> bool {
        ms >= self.start_ms && ms < self.end_ms
    }

    /// Timing and text without the id, for comparing cue sets across parses
    pub fn content(&self) -> (Millis, Millis, &str) {
        (self.start_ms, self.end_ms, self.text.as_str())
    }

    /// Text with newlines flattened, for one-line labels
    pub fn label(&self) -> String {
        self.text.replace('\n', " ")
    }
}

/// Trim text and fall back to the placeholder when nothing is left
pub fn text_or_placeholder(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        PLACEHOLDER_TEXT.to_string()
    } else {
        trimmed.to_string()
    }
}
