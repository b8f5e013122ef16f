mod probe;
mod wrapper;

pub use probe::*;
pub use wrapper::*;
