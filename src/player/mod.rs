mod audio_player;
mod clock_adapter;
mod media_player;
mod seek;
mod sync;

pub use audio_player::*;
pub use clock_adapter::*;
pub use media_player::*;
pub use seek::*;
pub use sync::*;

use crate::utils::Millis;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Anything that plays media on a timeline and can be driven by the editor
pub trait MediaSource {
    fn position_ms(&self) -> Millis;

    fn seek_to(&mut self, ms: Millis);

    /// Known once metadata has been read
    fn duration_ms(&self) -> Option<Millis>;

    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool;
}
