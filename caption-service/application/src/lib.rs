pub mod dto;
pub mod editor;
pub mod error;
pub mod usecase;

pub use dto::*;
pub use editor::{EditorSession, WordEdit};
pub use error::*;
pub use usecase::*;
