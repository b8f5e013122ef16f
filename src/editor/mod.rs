//! Editing session: intents in, cue mutations and seeks out.

mod geometry;
mod intent;
mod session;

pub use geometry::*;
pub use intent::*;
pub use session::*;
