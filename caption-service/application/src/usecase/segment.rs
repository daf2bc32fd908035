use async_trait::async_trait;
use validator::Validate;

use caption_domain::CueSegmenter;

use crate::{ApplicationError, ResegmentRequest, ResegmentResponse};

#[async_trait]
pub trait SegmentSubtitlesUseCase: Send + Sync {
    async fn resegment(
        &self,
        request: ResegmentRequest,
    ) -> Result<ResegmentResponse, ApplicationError>;
}

#[derive(Debug, Default)]
pub struct SegmentSubtitlesUseCaseImpl;

impl SegmentSubtitlesUseCaseImpl {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SegmentSubtitlesUseCase for SegmentSubtitlesUseCaseImpl {
    async fn resegment(
        &self,
        request: ResegmentRequest,
    ) -> Result<ResegmentResponse, ApplicationError> {
        request.validate()?;
        let segmenter = CueSegmenter::new(request.max_words_per_cue)?;
        let subtitles = segmenter.resegment(&request.subtitles);

        Ok(ResegmentResponse {
            cue_count: subtitles.len(),
            subtitles,
        })
    }
}
