use crate::error::{EditorError, Result};
use crate::ffmpeg::FFmpegWrapper;
use crate::utils::Millis;
use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Temp WAV produced by the background extraction. Once the player lets go
/// of it, an extraction that finishes late removes its own output.
#[derive(Debug, Default)]
struct ExtractedTrack {
    path: Option<PathBuf>,
    released: bool,
}

impl ExtractedTrack {
    /// Publish a finished extraction; false when the player is already gone
    fn fill(&mut self, path: PathBuf) -> bool {
        if self.released {
            let _ = std::fs::remove_file(&path);
            return false;
        }
        self.path = Some(path);
        true
    }

    fn release(&mut self) {
        self.released = true;
        if let Some(path) = self.path.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Audio player using rodio for playback.
/// The audio track is extracted to a temporary WAV in the background; until it
/// is ready every call is a silent no-op.
pub struct AudioPlayer {
    // Keeps the output device open
    _stream: Option<OutputStream>,
    sink: Sink,
    track: Arc<Mutex<ExtractedTrack>>,
    // A load was attempted since the last seek or stop
    loaded: bool,
    volume: f32,
}

impl AudioPlayer {
    /// Open the output device and start extracting audio on `runtime`
    pub fn new(media_path: &Path, ffmpeg: FFmpegWrapper, runtime: &Handle) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| EditorError::Audio(format!("Failed to initialize audio output: {}", e)))?;

        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| EditorError::Audio(format!("Failed to create audio sink: {}", e)))?;
        sink.pause();

        let track = Arc::new(Mutex::new(ExtractedTrack::default()));

        let input = media_path.to_path_buf();
        let output = temp_wav_path(media_path);
        let slot = track.clone();
        runtime.spawn(async move {
            let _ = std::fs::remove_file(&output);
            match ffmpeg.extract_audio(&input, &output).await {
                Ok(()) if is_non_empty(&output) => {
                    if slot.lock().fill(output.clone()) {
                        tracing::info!(path = %output.display(), "Audio track ready");
                    } else {
                        tracing::debug!(path = %output.display(), "Audio track discarded");
                    }
                }
                Ok(()) => {
                    let _ = std::fs::remove_file(&output);
                    tracing::warn!(path = %input.display(), "No audio track extracted");
                }
                Err(e) => {
                    let _ = std::fs::remove_file(&output);
                    tracing::warn!(path = %input.display(), "Audio extraction failed: {}", e);
                }
            }
        });

        Ok(Self::with_sink(Some(stream), sink, track))
    }

    fn with_sink(stream: Option<OutputStream>, sink: Sink, track: Arc<Mutex<ExtractedTrack>>) -> Self {
        Self {
            _stream: stream,
            sink,
            track,
            loaded: false,
            volume: 1.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.track.lock().path.is_some()
    }

    /// Replace the sink contents with the track starting at `position_ms`
    fn load_at(&mut self, position_ms: Millis) -> Result<bool> {
        let Some(temp_path) = self.track.lock().path.clone() else {
            return Ok(false);
        };
        // Ready from here on, whether or not the track decodes
        self.loaded = true;

        let file = File::open(&temp_path).map_err(|e| EditorError::io(&temp_path, e))?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| EditorError::Audio(format!("Failed to decode audio: {}", e)))?;

        self.sink.clear();
        let offset = Duration::from_millis(position_ms.max(0) as u64);
        self.sink.append(source.skip_duration(offset));
        self.sink.set_volume(self.volume);
        Ok(true)
    }

    /// Load the track at `position_ms` on the first call of a run, then resume.
    /// A track that already played out stays silent until the next seek.
    pub fn play(&mut self, position_ms: Millis) {
        if !self.loaded {
            match self.load_at(position_ms) {
                Ok(true) => {}
                Ok(false) => return,
                Err(e) => {
                    tracing::warn!("{}", e);
                    return;
                }
            }
        }
        self.sink.play();
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn stop(&mut self) {
        self.sink.stop();
        self.sink.clear();
        self.loaded = false;
    }

    /// Set volume (0.0 to 2.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 2.0);
        self.sink.set_volume(self.volume);
    }

    /// Reposition the track, keeping the current play/pause state
    pub fn seek(&mut self, position_ms: Millis) {
        let was_playing = !self.sink.is_paused() && !self.sink.empty();
        match self.load_at(position_ms) {
            Ok(true) if was_playing => self.sink.play(),
            Ok(_) => self.sink.pause(),
            Err(e) => tracing::warn!("{}", e),
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.track.lock().release();
    }
}

fn temp_wav_path(media_path: &Path) -> PathBuf {
    let file_stem = media_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();
    std::env::temp_dir().join(format!(
        "subtitle_editor_audio_{}_{}.wav",
        file_stem,
        uuid::Uuid::new_v4().simple()
    ))
}

fn is_non_empty(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
