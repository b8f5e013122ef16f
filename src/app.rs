use crate::config::EditorConfig;
use crate::editor::{clamp_zoom, EditSteps, EditorSession, Intent};
use crate::ffmpeg::FFmpegWrapper;
use crate::player::{MediaPlayer, MediaSource, PlaybackState};
use crate::project::MediaFile;
use crate::srt;
use eframe::egui;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

const MEDIA_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm", "ts", "flv", "mp3", "wav", "m4a"];

pub struct SubtitleApp {
    pub session: EditorSession,
    pub ffmpeg: FFmpegWrapper,
    pub runtime: Runtime,
    pub config: EditorConfig,
    config_path: Option<PathBuf>,
    pub status_message: String,

    // Player state
    pub player: Option<MediaPlayer>,
    awaiting_metadata: bool,
    pub volume: f32,

    // Timeline state
    pub timeline_zoom: f32,
    pub timeline_scroll: f32,

    pub subtitle_path: Option<PathBuf>,
}

impl SubtitleApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        runtime: Runtime,
        config: EditorConfig,
        config_path: Option<PathBuf>,
    ) -> Self {
        let ffmpeg = FFmpegWrapper::with_paths(config.ffmpeg_path.clone(), config.ffprobe_path.clone());
        let status_message = if ffmpeg.is_available() {
            String::from("Ready")
        } else {
            tracing::warn!(ffmpeg = %config.ffmpeg_path, "ffmpeg not found");
            String::from("ffmpeg not found: media will play without sound")
        };

        Self {
            session: EditorSession::new(
                EditSteps::from(&config),
                config.playback_publish_hz,
                config.seek_tolerance_ms,
            ),
            ffmpeg,
            runtime,
            config_path,
            status_message,

            player: None,
            awaiting_metadata: false,
            volume: config.volume,

            timeline_zoom: config.zoom_default_px_per_sec,
            timeline_scroll: 0.0,

            subtitle_path: None,
            config,
        }
    }

    pub fn media(&self) -> Option<&MediaFile> {
        self.player.as_ref().and_then(|p| p.media())
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.player
            .as_ref()
            .map(|p| p.state())
            .unwrap_or(PlaybackState::Stopped)
    }

    /// Load a media file; cues already in the editor are kept
    pub fn open_media(&mut self, path: &Path) {
        let mut player = MediaPlayer::open(path, self.ffmpeg.clone(), self.runtime.handle());
        player.set_volume(self.volume);
        self.player = Some(player);
        self.awaiting_metadata = true;
        self.timeline_scroll = 0.0;
        self.session.on_media_loaded();
        self.status_message = format!("Loading {}...", path.display());
    }

    pub fn open_media_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Media", MEDIA_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.open_media(&path);
        }
    }

    pub fn open_subtitles(&mut self, path: &Path) {
        match srt::load_file(path) {
            Ok(cues) => {
                let count = cues.len();
                self.session.load_subtitles(cues);
                self.subtitle_path = Some(path.to_path_buf());
                self.status_message = format!("Loaded {} subtitle(s) from {}", count, path.display());
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.status_message = format!("Failed to load subtitles: {}", e);
            }
        }
    }

    pub fn open_subtitles_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("SubRip", &["srt"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.open_subtitles(&path);
        }
    }

    pub fn export_dialog(&mut self) {
        if self.session.cues().is_empty() {
            self.status_message = String::from("Nothing to export");
            return;
        }

        let file_name = self
            .media()
            .map(|m| m.default_srt_name())
            .unwrap_or_else(|| "subtitles.srt".to_string());
        let mut dialog = rfd::FileDialog::new()
            .add_filter("SubRip", &["srt"])
            .set_file_name(file_name);
        if let Some(dir) = self.subtitle_path.as_ref().and_then(|p| p.parent()) {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.save_file() {
            self.export_to(&path);
        }
    }

    pub fn export_to(&mut self, path: &Path) {
        match self.session.export_to(path) {
            Ok(()) => {
                self.subtitle_path = Some(path.to_path_buf());
                self.status_message = format!("Exported {}", path.display());
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.status_message = format!("Export failed: {}", e);
            }
        }
    }

    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 2.0);
        if let Some(player) = self.player.as_mut() {
            player.set_volume(self.volume);
        }
    }

    pub fn set_zoom(&mut self, px_per_sec: f32) {
        self.timeline_zoom = clamp_zoom(
            px_per_sec,
            self.config.zoom_min_px_per_sec,
            self.config.zoom_max_px_per_sec,
        );
    }

    /// Remember zoom and volume for the next start
    pub fn save_view_settings(&mut self) {
        self.config.zoom_default_px_per_sec = self.timeline_zoom;
        self.config.volume = self.volume;
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        if let Err(e) = self.config.save(path) {
            tracing::warn!("Could not save settings: {}", e);
        }
    }

    /// Metadata, end of media, seeks and clock sampling, once per frame
    pub fn update_player(&mut self, ctx: &egui::Context) {
        let Some(player) = self.player.as_mut() else {
            return;
        };

        if let Some(result) = player.poll_metadata() {
            self.awaiting_metadata = false;
            match result {
                Ok(media) => {
                    self.session.on_duration(media.duration_ms());
                    self.status_message = media.summary();
                    if media.duration_ms().is_none() {
                        self.status_message.push_str(" (unknown duration, editing disabled)");
                    }
                }
                Err(e) => {
                    tracing::error!(path = %player.path().display(), "Probe failed: {}", e);
                    self.status_message = format!("Failed to load {}: {}", player.path().display(), e);
                }
            }
        }

        player.update();
        self.session.sync(player, Instant::now());

        if player.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else if self.awaiting_metadata {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    /// Handle keyboard shortcuts
    pub fn handle_input(&mut self, ctx: &egui::Context) {
        let editing = self.session.is_editing_text();
        let (intents, open, export) = ctx.input(|i| {
            let mut intents = Vec::new();
            for event in &i.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    if let Some(intent) = intent_for_key(*key, *modifiers, editing) {
                        intents.push(intent);
                    }
                }
            }
            let open = i.modifiers.command && i.key_pressed(egui::Key::O);
            let export = i.modifiers.command && i.key_pressed(egui::Key::S);
            (intents, open, export)
        });

        for intent in intents {
            self.session.handle(intent);
        }
        if !editing {
            if open {
                self.open_media_dialog();
            }
            if export {
                self.export_dialog();
            }
        }
    }
}

/// Keyboard layout of the editor. Text editing only listens for Escape.
pub fn intent_for_key(key: egui::Key, modifiers: egui::Modifiers, editing: bool) -> Option<Intent> {
    use egui::Key;

    if editing {
        return (key == Key::Escape).then_some(Intent::CommitTextEdit);
    }

    if modifiers.command {
        return match key {
            Key::ArrowLeft => Some(Intent::MoveSelectedEarlier),
            Key::ArrowRight => Some(Intent::MoveSelectedLater),
            _ => None,
        };
    }

    match key {
        Key::Space => Some(Intent::TogglePlay),
        Key::OpenBracket => Some(Intent::SeekBackward),
        Key::CloseBracket => Some(Intent::SeekForward),
        Key::Plus | Key::Equals => Some(Intent::CreateAtPlayhead),
        Key::Delete => Some(Intent::DeleteSelected),
        Key::ArrowLeft => Some(Intent::SelectPrevious),
        Key::ArrowRight => Some(Intent::SelectNext),
        Key::ArrowUp => Some(Intent::GrowSelected),
        Key::ArrowDown => Some(Intent::ShrinkSelected),
        Key::Enter => Some(Intent::BeginTextEdit),
        _ => None,
    }
}

impl eframe::App for SubtitleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard input
        self.handle_input(ctx);

        // Metadata, seeks and playhead
        self.update_player(ctx);

        // Render UI
        crate::ui::render_main_window(self, ctx);

        // Dropped files: media or subtitles, by extension
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        for path in dropped {
            let is_srt = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("srt"));
            if is_srt {
                self.open_subtitles(&path);
            } else {
                self.open_media(&path);
            }
        }
    }
}
