use serde::{Deserialize, Serialize};
use validator::Validate;

use caption_domain::{Subtitle, Word};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TranscribeMediaRequest {
    #[validate(url)]
    pub media_url: String,
    #[validate(length(min = 2, max = 16))]
    pub language_code: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub max_words_per_cue: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeMediaResponse {
    pub job_id: String,
    pub text: String,
    pub words: Vec<Word>,
    pub subtitles: Vec<Subtitle>,
}
