use crate::project::{CueId, Edge};
use crate::utils::Millis;

/// Everything the user can ask the editor to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    TogglePlay,
    SeekBackward,
    SeekForward,
    SeekTo(Millis),
    CreateAtPlayhead,
    DeleteSelected,
    SelectPrevious,
    SelectNext,
    SelectCue(CueId),
    GrowSelected,
    ShrinkSelected,
    MoveSelectedEarlier,
    MoveSelectedLater,
    ResizeEdge { id: CueId, edge: Edge, ms: Millis },
    BeginTextEdit,
    CommitTextEdit,
}

impl Intent {
    /// Allowed while the text editor has focus
    pub fn allowed_while_editing(&self) -> bool {
        matches!(self, Intent::CommitTextEdit)
    }
}

/// Step sizes for keyboard intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSteps {
    pub default_cue_len_ms: Millis,
    pub block_adjust_ms: Millis,
    pub seek_step_ms: Millis,
    pub move_step_ms: Millis,
}

impl Default for EditSteps {
    fn default() -> Self {
        Self {
            default_cue_len_ms: 2_000,
            block_adjust_ms: 500,
            seek_step_ms: 100,
            move_step_ms: 100,
        }
    }
}

impl From<&crate::config::EditorConfig> for EditSteps {
    fn from(config: &crate::config::EditorConfig) -> Self {
        Self {
            default_cue_len_ms: config.default_cue_len_ms,
            block_adjust_ms: config.block_adjust_ms,
            seek_step_ms: config.seek_step_ms,
            move_step_ms: config.move_step_ms,
        }
    }
}
