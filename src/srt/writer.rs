use super::normalize;
use crate::project::Cue;
use crate::utils::{ms_to_timestamp, Millis};
use std::fmt::Write;

/// Serialize cues to SRT text, normalizing against `total_ms` first
pub fn serialize(cues: &[Cue], total_ms: Option<Millis>) -> String {
    let items = normalize(cues, total_ms);

    let mut out = String::new();
    for (i, cue) in items.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            ms_to_timestamp(cue.start_ms),
            ms_to_timestamp(cue.end_ms),
            cue.text
        );
    }

    if out.is_empty() {
        return out;
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push('\n');
    out
}
