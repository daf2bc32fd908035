use serde::{Deserialize, Serialize};
use validator::Validate;

use caption_domain::Subtitle;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResegmentRequest {
    pub subtitles: Vec<Subtitle>,
    #[validate(range(min = 1, max = 50))]
    pub max_words_per_cue: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResegmentResponse {
    pub subtitles: Vec<Subtitle>,
    pub cue_count: usize,
}
