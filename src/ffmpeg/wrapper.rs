use super::probe::{probe_file, MediaInfo};
use anyhow::{anyhow, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Sample rate of the WAV handed to the audio player
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone)]
pub struct FFmpegWrapper {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FFmpegWrapper {
    pub fn new() -> Self {
        Self::with_paths("ffmpeg".to_string(), "ffprobe".to_string())
    }

    pub fn with_paths(ffmpeg_path: String, ffprobe_path: String) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
        }
    }

    /// Check if FFmpeg is available
    pub fn is_available(&self) -> bool {
        std::process::Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Probe a media file for duration and streams (blocking)
    pub fn probe(&self, path: &Path) -> Result<MediaInfo> {
        probe_file(&self.ffprobe_path, path)
    }

    /// Decode the first audio track of `input` into a PCM WAV at `output`
    pub async fn extract_audio(&self, input: &Path, output: &Path) -> Result<()> {
        let args = build_audio_extract_args(input, output);
        self.execute_ffmpeg(&args).await
    }

    /// Execute an FFmpeg command with the given arguments
    async fn execute_ffmpeg(&self, args: &[String]) -> Result<()> {
        tracing::debug!(program = %self.ffmpeg_path, ?args, "Running ffmpeg");

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = command.spawn()?;

        let stderr = child.stderr.take().ok_or_else(|| anyhow!("Failed to capture stderr"))?;
        let mut reader = BufReader::new(stderr).lines();

        while let Some(line) = reader.next_line().await? {
            if line.contains("Error") || line.contains("error") {
                tracing::warn!("ffmpeg: {}", line);
            }
        }

        let status = child.wait().await?;

        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("FFmpeg exited with status: {}", status))
        }
    }
}

impl Default for FFmpegWrapper {
    fn default() -> Self {
        Self::new()
    }
}

fn build_audio_extract_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-vn".to_string(),
        "-acodec".to_string(),
        "pcm_s16le".to_string(),
        "-ar".to_string(),
        AUDIO_SAMPLE_RATE.to_string(),
        "-ac".to_string(),
        "2".to_string(),
        output.to_string_lossy().to_string(),
    ]
}
