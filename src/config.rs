//! Editor settings, stored as JSON in the user's config directory.

use crate::error::{EditorError, Result};
use crate::utils::Millis;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Length of a cue created at the playhead
    pub default_cue_len_ms: Millis,
    /// Up/Down arrow step for the selected cue's end
    pub block_adjust_ms: Millis,
    /// `[` / `]` seek step
    pub seek_step_ms: Millis,
    /// Ctrl+Left/Right step when moving a cue
    pub move_step_ms: Millis,
    pub zoom_min_px_per_sec: f32,
    pub zoom_max_px_per_sec: f32,
    pub zoom_default_px_per_sec: f32,
    /// How often playback updates the playhead
    pub playback_publish_hz: f64,
    pub seek_tolerance_ms: Millis,
    pub volume: f32,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_cue_len_ms: 2_000,
            block_adjust_ms: 500,
            seek_step_ms: 100,
            move_step_ms: 100,
            zoom_min_px_per_sec: 40.0,
            zoom_max_px_per_sec: 400.0,
            zoom_default_px_per_sec: 120.0,
            playback_publish_hz: 15.0,
            seek_tolerance_ms: 10,
            volume: 1.0,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

impl EditorConfig {
    /// `<config dir>/subtitle-editor/config.json`, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "subtitle-editor").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config.sanitized())
    }

    /// Load the file, writing defaults first when it does not exist yet
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let config = Self::default();
        config.save(path)?;
        tracing::info!(path = %path.display(), "Wrote default config");
        Ok(config)
    }

    /// Write through a temp file and rename so a crash never leaves half a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| EditorError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| EditorError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| EditorError::io(path, e))?;
        Ok(())
    }

    /// Repair values that would break the editor
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.default_cue_len_ms <= 0 {
            self.default_cue_len_ms = defaults.default_cue_len_ms;
        }
        self.block_adjust_ms = self.block_adjust_ms.max(1);
        self.seek_step_ms = self.seek_step_ms.max(1);
        self.move_step_ms = self.move_step_ms.max(1);
        self.seek_tolerance_ms = self.seek_tolerance_ms.max(0);
        if !(self.zoom_min_px_per_sec > 0.0 && self.zoom_min_px_per_sec <= self.zoom_max_px_per_sec) {
            self.zoom_min_px_per_sec = defaults.zoom_min_px_per_sec;
            self.zoom_max_px_per_sec = defaults.zoom_max_px_per_sec;
        }
        self.zoom_default_px_per_sec = self
            .zoom_default_px_per_sec
            .clamp(self.zoom_min_px_per_sec, self.zoom_max_px_per_sec);
        if !(self.playback_publish_hz > 0.0) {
            self.playback_publish_hz = defaults.playback_publish_hz;
        }
        self.volume = self.volume.clamp(0.0, 2.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.default_cue_len_ms, 2_000);
        assert_eq!(config.block_adjust_ms, 500);
        assert_eq!(config.seek_step_ms, 100);
        assert_eq!(config.move_step_ms, 100);
        assert_eq!(config.zoom_default_px_per_sec, 120.0);
        assert_eq!(config.playback_publish_hz, 15.0);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let created = EditorConfig::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, EditorConfig::default());
        assert_eq!(EditorConfig::load(&path).unwrap(), created);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "seek_step_ms": 250, "unknown_key": true }"#).unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.seek_step_ms, 250);
        assert_eq!(config.block_adjust_ms, 500);
    }

    #[test]
    fn test_bad_values_are_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"{ "default_cue_len_ms": 0, "zoom_min_px_per_sec": 500, "zoom_max_px_per_sec": 100,
                 "zoom_default_px_per_sec": 9000, "playback_publish_hz": -1, "volume": 7 }"#,
        )
        .unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.default_cue_len_ms, 2_000);
        assert_eq!(config.zoom_min_px_per_sec, 40.0);
        assert_eq!(config.zoom_max_px_per_sec, 400.0);
        assert_eq!(config.zoom_default_px_per_sec, 400.0);
        assert_eq!(config.playback_publish_hz, 15.0);
        assert_eq!(config.volume, 2.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(EditorError::Config(_))));
    }
}
