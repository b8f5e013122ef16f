mod main_window;
mod subtitle_editor;
mod timeline_widget;

pub use main_window::*;
pub use subtitle_editor::*;
pub use timeline_widget::*;
