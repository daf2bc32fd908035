mod render;
mod segment;
mod transcribe;

pub use render::*;
pub use segment::*;
pub use transcribe::*;
