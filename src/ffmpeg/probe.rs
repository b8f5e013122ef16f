use crate::utils::Millis;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// What the editor needs to know about a media file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaInfo {
    /// None until a usable duration has been read
    pub duration_ms: Option<Millis>,
    pub width: u32,
    pub height: u32,
    pub audio_codec: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFProbeOutput {
    format: Option<FFProbeFormat>,
    streams: Option<Vec<FFProbeStream>>,
}

#[derive(Debug, Deserialize)]
struct FFProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

/// Run ffprobe on `path` and collect duration and stream info
pub fn probe_file(ffprobe: &str, path: &Path) -> Result<MediaInfo> {
    let output = Command::new(ffprobe)
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffprobe failed: {}", stderr.trim()));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

/// Turn ffprobe's JSON into `MediaInfo`
pub fn parse_probe_output(json: &str) -> Result<MediaInfo> {
    let probe_output: FFProbeOutput = serde_json::from_str(json)
        .map_err(|e| anyhow!("Failed to parse ffprobe output: {}", e))?;

    let mut info = MediaInfo::default();
    let mut stream_duration = None;

    if let Some(format) = probe_output.format {
        info.duration_ms = format.duration.as_deref().and_then(parse_seconds_to_ms);
    }

    for stream in probe_output.streams.unwrap_or_default() {
        match stream.codec_type.as_deref().unwrap_or("") {
            "video" => {
                info.width = stream.width.unwrap_or(0);
                info.height = stream.height.unwrap_or(0);
            }
            "audio" => {
                info.audio_codec = stream.codec_name;
            }
            _ => continue,
        }
        // Some containers only carry a per-stream duration
        let d = stream.duration.as_deref().and_then(parse_seconds_to_ms);
        stream_duration = stream_duration.max(d);
    }

    if info.duration_ms.is_none() {
        info.duration_ms = stream_duration;
    }

    Ok(info)
}

/// "12.345678" seconds -> 12346 ms; zero, negative and garbage give None
fn parse_seconds_to_ms(value: &str) -> Option<Millis> {
    let seconds: f64 = value.trim().parse().ok()?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return None;
    }
    Some((seconds * 1000.0).round() as Millis)
}
