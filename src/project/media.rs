use crate::ffmpeg::MediaInfo;
use crate::utils::{format_clock, Millis};
use std::path::{Path, PathBuf};

/// The media file subtitles are being timed against
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub path: PathBuf,
    pub info: MediaInfo,
}

impl MediaFile {
    pub fn new(path: &Path, info: MediaInfo) -> Self {
        Self {
            path: path.to_path_buf(),
            info,
        }
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn duration_ms(&self) -> Option<Millis> {
        self.info.duration_ms
    }

    pub fn has_audio(&self) -> bool {
        self.info.audio_codec.is_some()
    }

    pub fn resolution_string(&self) -> String {
        if self.info.width > 0 && self.info.height > 0 {
            format!("{}x{}", self.info.width, self.info.height)
        } else {
            "N/A".to_string()
        }
    }

    pub fn duration_string(&self) -> String {
        self.info
            .duration_ms
            .map(format_clock)
            .unwrap_or_else(|| "--:--:---".to_string())
    }

    /// One-line description for the status bar
    pub fn summary(&self) -> String {
        format!(
            "{} | {} | {}",
            self.filename(),
            self.resolution_string(),
            self.duration_string()
        )
    }

    /// Default name for exported subtitles: the media name with `.srt`
    pub fn default_srt_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| format!("{}.srt", s.to_string_lossy()))
            .unwrap_or_else(|| "subtitles.srt".to_string())
    }
}
