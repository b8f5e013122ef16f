use super::{AudioPlayer, MediaSource, PlaybackClock, PlaybackState};
use crate::error::{EditorError, Result};
use crate::ffmpeg::{FFmpegWrapper, MediaInfo};
use crate::project::MediaFile;
use crate::utils::{clamp_ms, Millis};
use crossbeam_channel::{Receiver, TryRecvError};
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;

/// Media player driven by a wall clock, with optional audio.
///
/// Metadata is probed on a blocking task and picked up by `poll_metadata`;
/// until then the duration is unknown.
pub struct MediaPlayer {
    path: PathBuf,
    media: Option<MediaFile>,
    clock: PlaybackClock,
    state: PlaybackState,
    duration_ms: Option<Millis>,
    metadata_rx: Receiver<Result<MediaInfo>>,
    audio: Option<AudioPlayer>,
    ffmpeg: FFmpegWrapper,
    runtime: Handle,
    volume: f32,
}

impl MediaPlayer {
    /// Start probing `path`; returns immediately
    pub fn open(path: &Path, ffmpeg: FFmpegWrapper, runtime: &Handle) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);

        let probe_path = path.to_path_buf();
        let prober = ffmpeg.clone();
        runtime.spawn_blocking(move || {
            let result = prober
                .probe(&probe_path)
                .map_err(|e| EditorError::Probe(e.to_string()));
            // The player may already be gone
            let _ = tx.send(result);
        });

        tracing::info!(path = %path.display(), "Opening media");

        Self {
            path: path.to_path_buf(),
            media: None,
            clock: PlaybackClock::new(),
            state: PlaybackState::Stopped,
            duration_ms: None,
            metadata_rx: rx,
            audio: None,
            ffmpeg,
            runtime: runtime.clone(),
            volume: 1.0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media(&self) -> Option<&MediaFile> {
        self.media.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Metadata-ready signal: yields the probe outcome exactly once
    pub fn poll_metadata(&mut self) -> Option<Result<MediaFile>> {
        let result = match self.metadata_rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
        };

        let info = match result {
            Ok(info) => info,
            Err(e) => {
                tracing::error!(path = %self.path.display(), "{}", e);
                return Some(Err(e));
            }
        };

        let media = MediaFile::new(&self.path, info);
        self.duration_ms = media.duration_ms();
        tracing::info!(media = %media.summary(), "Media metadata ready");

        if media.has_audio() {
            match AudioPlayer::new(&self.path, self.ffmpeg.clone(), &self.runtime) {
                Ok(mut audio) => {
                    audio.set_volume(self.volume);
                    self.audio = Some(audio);
                }
                Err(e) => tracing::warn!("Playing without sound: {}", e),
            }
        }

        self.media = Some(media.clone());
        Some(Ok(media))
    }

    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol;
        if let Some(audio) = self.audio.as_mut() {
            audio.set_volume(vol);
        }
    }

    pub fn audio_ready(&self) -> bool {
        self.audio.as_ref().is_some_and(|a| a.is_ready())
    }

    /// Per-frame housekeeping; stops at the end of the media
    pub fn update(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        // Audio may have finished extracting after playback started; the
        // player loads it once per run
        if let Some(audio) = self.audio.as_mut() {
            audio.play(self.clock.position_ms());
        }
        if let Some(duration) = self.duration_ms {
            if self.clock.position_ms() >= duration {
                self.clock.pause();
                self.clock.set_position(duration);
                self.state = PlaybackState::Stopped;
                if let Some(audio) = self.audio.as_mut() {
                    audio.stop();
                }
                tracing::debug!(duration, "Reached end of media");
            }
        }
    }

    fn clamp(&self, ms: Millis) -> Millis {
        match self.duration_ms {
            Some(duration) => clamp_ms(ms, 0, duration),
            None => ms.max(0),
        }
    }
}

impl MediaSource for MediaPlayer {
    fn position_ms(&self) -> Millis {
        self.clamp(self.clock.position_ms())
    }

    fn seek_to(&mut self, ms: Millis) {
        let ms = self.clamp(ms);
        self.clock.set_position(ms);
        if let Some(audio) = self.audio.as_mut() {
            audio.seek(ms);
        }
    }

    fn duration_ms(&self) -> Option<Millis> {
        self.duration_ms
    }

    fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            return;
        }
        // Replay from the top once the end was reached
        if self.duration_ms.is_some_and(|d| self.clock.position_ms() >= d) {
            self.seek_to(0);
        }
        self.clock.resume();
        self.state = PlaybackState::Playing;
        if let Some(audio) = self.audio.as_mut() {
            audio.play(self.clock.position_ms());
        }
    }

    fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.clock.pause();
        self.state = PlaybackState::Paused;
        if let Some(audio) = self.audio.as_ref() {
            audio.pause();
        }
    }

    fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}
