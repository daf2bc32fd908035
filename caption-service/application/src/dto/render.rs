use serde::{Deserialize, Serialize};
use validator::Validate;

use caption_domain::{Subtitle, SubtitleStyle};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenderVideoRequest {
    #[validate(url)]
    pub video_url: String,
    #[validate(range(exclusive_min = 0.0))]
    pub video_duration: f64,
    pub subtitles: Vec<Subtitle>,
    pub style: Option<SubtitleStyle>,
    #[validate(range(min = 16, max = 7680))]
    pub width: Option<u32>,
    #[validate(range(min = 16, max = 7680))]
    pub height: Option<u32>,
    #[validate(range(min = 1, max = 120))]
    pub fps: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderVideoResponse {
    pub output_url: String,
}
