mod cue;
mod media;
mod timeline;

pub use cue::*;
pub use media::*;
pub use timeline::*;
