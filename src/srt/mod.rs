//! SRT import/export.
//!
//! `parse` is tolerant and never fails; `serialize` always writes the
//! normalized form of the cue set.

mod normalize;
mod parser;
mod writer;

pub use normalize::normalize;
pub use parser::parse;
pub use writer::serialize;

use crate::error::{EditorError, Result};
use crate::project::Cue;
use crate::utils::Millis;
use std::path::Path;

/// Read and parse an SRT file
pub fn load_file(path: &Path) -> Result<Vec<Cue>> {
    let bytes = std::fs::read(path).map_err(|e| EditorError::io(path, e))?;
    // Subtitle files in the wild are not always valid UTF-8
    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let cues = parse(text);
    tracing::info!(path = %path.display(), cues = cues.len(), "Loaded subtitles");
    Ok(cues)
}

/// Normalize and write cues as an SRT file
pub fn save_file(path: &Path, cues: &[Cue], total_ms: Option<Millis>) -> Result<()> {
    if cues.is_empty() {
        return Err(EditorError::NothingToExport);
    }

    let text = serialize(cues, total_ms);
    std::fs::write(path, text).map_err(|e| EditorError::io(path, e))?;
    tracing::info!(path = %path.display(), cues = cues.len(), "Exported subtitles");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");

        let cues = vec![Cue::new(1_000, 2_000, "one"), Cue::new(1_500, 3_000, "two")];
        save_file(&path, &cues, Some(10_000)).unwrap();

        let loaded = load_file(&path).unwrap();
        let got: Vec<_> = loaded.iter().map(|c| c.content()).collect();
        assert_eq!(got, vec![(1_000, 2_000, "one"), (2_000, 3_000, "two")]);
    }

    #[test]
    fn test_load_with_bom_and_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.srt");
        let mut bytes = "\u{feff}1\n00:00:01,000 --> 00:00:02,000\ncaf".as_bytes().to_vec();
        bytes.push(0xE9);
        bytes.push(b'\n');
        std::fs::write(&path, bytes).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].text.starts_with("caf"));
    }

    #[test]
    fn test_save_empty_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.srt");
        assert!(matches!(save_file(&path, &[], None), Err(EditorError::NothingToExport)));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/definitely/not/here.srt")).unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }
}
