use super::intent::{EditSteps, Intent};
use crate::player::{MediaSource, PlaybackClockAdapter, SeekCoordinator};
use crate::error::Result;
use crate::project::{Cue, CueId, CueTimeline, Direction};
use crate::srt;
use crate::utils::{clamp_ms, Millis};
use std::path::Path;
use std::time::Instant;

/// Whether keyboard editing or the text editor owns input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    EditingText { cue: CueId, draft: String },
}

/// One editing session: cues, selection, playhead and pending seeks.
///
/// Intents mutate the session directly. Anything that has to reach the media
/// source is parked and applied by `sync`, once per frame.
#[derive(Debug)]
pub struct EditorSession {
    timeline: CueTimeline,
    selection: Option<CueId>,
    mode: EditMode,
    clock: PlaybackClockAdapter,
    seeks: SeekCoordinator,
    steps: EditSteps,
    duration_ms: Option<Millis>,
    playing: bool,
    play_request: Option<bool>,
}

impl EditorSession {
    pub fn new(steps: EditSteps, publish_hz: f64, seek_tolerance_ms: Millis) -> Self {
        Self {
            timeline: CueTimeline::new(),
            selection: None,
            mode: EditMode::Idle,
            clock: PlaybackClockAdapter::new(publish_hz),
            seeks: SeekCoordinator::new(seek_tolerance_ms),
            steps,
            duration_ms: None,
            playing: false,
            play_request: None,
        }
    }

    pub fn cues(&self) -> &[Cue] {
        self.timeline.cues()
    }

    pub fn selection(&self) -> Option<CueId> {
        self.selection
    }

    pub fn selected_cue(&self) -> Option<&Cue> {
        self.selection.and_then(|id| self.timeline.get(id))
    }

    pub fn is_editing_text(&self) -> bool {
        matches!(self.mode, EditMode::EditingText { .. })
    }

    /// Text being edited, for the editor widget
    pub fn draft_mut(&mut self) -> Option<&mut String> {
        match &mut self.mode {
            EditMode::EditingText { draft, .. } => Some(draft),
            EditMode::Idle => None,
        }
    }

    pub fn position_ms(&self) -> Millis {
        self.clock.current_ms()
    }

    pub fn duration_ms(&self) -> Option<Millis> {
        self.duration_ms
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Cue under the playhead, for the overlay
    pub fn active_cue(&self) -> Option<&Cue> {
        self.timeline.active_at(self.clock.current_ms())
    }

    /// Metadata-ready: record the duration and pull cues inside it
    pub fn on_duration(&mut self, duration_ms: Option<Millis>) {
        self.duration_ms = duration_ms.filter(|d| *d > 0);
        self.clock.set_duration(self.duration_ms);
        if let Some(d) = self.duration_ms {
            self.timeline.conform_to_duration(d);
        }
        // Cues past a shorter duration are gone
        if self.selection.is_some_and(|id| self.timeline.get(id).is_none()) {
            self.selection = None;
        }
        if matches!(&self.mode, EditMode::EditingText { cue, .. } if self.timeline.get(*cue).is_none()) {
            self.mode = EditMode::Idle;
        }
        tracing::debug!(duration_ms = ?self.duration_ms, "Duration updated");
    }

    /// New media: forget playback state but keep the cues
    pub fn on_media_loaded(&mut self) {
        self.playing = false;
        self.play_request = None;
        self.clock.stop(None);
        self.on_duration(None);
        self.seek_to(0);
    }

    /// Replace all cues with freshly parsed ones and select the first
    pub fn load_subtitles(&mut self, cues: Vec<Cue>) {
        self.mode = EditMode::Idle;
        self.timeline.replace_all(cues, self.duration_ms);
        self.selection = self.timeline.first_id();
        tracing::info!(count = self.timeline.len(), "Subtitles loaded");
    }

    /// Write the cues as SRT, normalized against the known duration
    pub fn export_to(&self, path: &Path) -> Result<()> {
        srt::save_file(path, self.timeline.cues(), self.duration_ms)
    }

    pub fn handle(&mut self, intent: Intent) {
        if self.is_editing_text() && !intent.allowed_while_editing() {
            tracing::trace!(?intent, "Ignored while editing text");
            return;
        }

        match intent {
            Intent::TogglePlay => {
                let playing = self.play_request.unwrap_or(self.playing);
                self.play_request = Some(!playing);
            }
            Intent::SeekBackward => {
                self.seek_to(self.position_ms() - self.steps.seek_step_ms);
            }
            Intent::SeekForward => {
                self.seek_to(self.position_ms() + self.steps.seek_step_ms);
            }
            Intent::SeekTo(ms) => {
                self.seek_to(ms);
            }
            Intent::CreateAtPlayhead => {
                let created = self.timeline.create(
                    self.position_ms(),
                    self.steps.default_cue_len_ms,
                    self.duration_ms,
                );
                if let Some(id) = created {
                    self.select(id);
                }
            }
            Intent::DeleteSelected => self.delete_selected(),
            Intent::SelectPrevious => self.navigate(Direction::Previous),
            Intent::SelectNext => self.navigate(Direction::Next),
            Intent::SelectCue(id) => {
                if self.timeline.get(id).is_some() {
                    self.select(id);
                }
            }
            Intent::GrowSelected => self.adjust_selected(self.steps.block_adjust_ms),
            Intent::ShrinkSelected => self.adjust_selected(-self.steps.block_adjust_ms),
            Intent::MoveSelectedEarlier => self.move_selected(-self.steps.move_step_ms),
            Intent::MoveSelectedLater => self.move_selected(self.steps.move_step_ms),
            Intent::ResizeEdge { id, edge, ms } => {
                self.timeline.resize_edge(id, edge, ms, self.duration_ms);
            }
            Intent::BeginTextEdit => {
                if let Some(cue) = self.selected_cue() {
                    self.mode = EditMode::EditingText {
                        cue: cue.id,
                        draft: cue.text.clone(),
                    };
                }
            }
            Intent::CommitTextEdit => {
                if let EditMode::EditingText { cue, draft } = std::mem::take(&mut self.mode) {
                    self.timeline.set_text(cue, &draft);
                }
            }
        }
    }

    /// Once per frame: apply play requests, hand pending seeks to the source,
    /// then sample its position while it plays.
    pub fn sync(&mut self, source: &mut dyn MediaSource, now: Instant) {
        if let Some(play) = self.play_request.take() {
            if play {
                source.play();
            } else {
                source.pause();
            }
        }

        let playing = source.is_playing();
        if playing != self.playing {
            self.playing = playing;
            if playing {
                self.clock.start();
            } else {
                // A seek issued this frame wins over where the source stopped
                let stopped_at = match self.seeks.pending() {
                    Some(_) => None,
                    None => Some(source.position_ms()),
                };
                self.clock.stop(stopped_at);
            }
        }

        self.seeks.reconcile(source, self.clock.current_ms(), playing);

        // Every frame carries a fresh sample, so the newest one is offered and
        // a parked one is simply superseded
        if playing {
            self.clock.tick(source.position_ms(), now);
        }
    }

    fn seek_to(&mut self, ms: Millis) {
        let ms = self.clock.set_position(ms);
        self.seeks.request(ms);
    }

    /// Select a cue and put the playhead on its start
    fn select(&mut self, id: CueId) {
        self.selection = Some(id);
        if let Some(start) = self.timeline.get(id).map(|c| c.start_ms) {
            self.seek_to(start);
        }
    }

    fn navigate(&mut self, direction: Direction) {
        if let Some(id) = self.timeline.navigate(self.selection, direction) {
            self.select(id);
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selection else {
            return;
        };
        let Some(deleted) = self.timeline.delete(id) else {
            return;
        };

        if matches!(&self.mode, EditMode::EditingText { cue, .. } if *cue == deleted.cue.id) {
            self.mode = EditMode::Idle;
        }

        match deleted.fallback {
            Some(next) => self.select(next),
            None => {
                self.selection = None;
                let current = self.position_ms();
                self.clock
                    .set_position(clamp_ms(current, 0, self.duration_ms.unwrap_or(0)));
            }
        }
    }

    fn adjust_selected(&mut self, delta_ms: Millis) {
        if let Some(id) = self.selection {
            self.timeline.adjust_length(id, delta_ms, self.duration_ms);
        }
    }

    fn move_selected(&mut self, delta_ms: Millis) {
        if let Some(id) = self.selection {
            self.timeline.move_by(id, delta_ms, self.duration_ms);
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(
            EditSteps::default(),
            crate::player::DEFAULT_PUBLISH_HZ,
            crate::player::DEFAULT_SEEK_TOLERANCE_MS,
        )
    }
}
