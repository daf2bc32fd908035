mod render;
mod segment;
mod transcribe;

pub use render::{RenderDefaults, RenderVideoUseCase, RenderVideoUseCaseImpl, TracingProgressSink};
pub use segment::{SegmentSubtitlesUseCase, SegmentSubtitlesUseCaseImpl};
pub use transcribe::{TranscribeMediaUseCase, TranscribeMediaUseCaseImpl, TranscriptionSettings};
