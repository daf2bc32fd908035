mod captions;

pub use captions::*;
