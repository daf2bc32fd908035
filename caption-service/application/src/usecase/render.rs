use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use caption_domain::{ProgressSink, RenderPort, RenderRequest};

use crate::{ApplicationError, RenderVideoRequest, RenderVideoResponse};

#[async_trait]
pub trait RenderVideoUseCase: Send + Sync {
    async fn render(
        &self,
        request: RenderVideoRequest,
    ) -> Result<RenderVideoResponse, ApplicationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDefaults {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Logs render progress in whole percent steps.
pub struct TracingProgressSink {
    video_url: String,
}

impl TracingProgressSink {
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
        }
    }
}

impl ProgressSink for TracingProgressSink {
    fn report(&self, fraction: f32) {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as u32;
        tracing::debug!(video_url = %self.video_url, percent, "render progress");
    }
}

pub struct RenderVideoUseCaseImpl {
    renderer: Arc<dyn RenderPort>,
    defaults: RenderDefaults,
}

impl RenderVideoUseCaseImpl {
    pub fn new(renderer: Arc<dyn RenderPort>, defaults: RenderDefaults) -> Self {
        Self { renderer, defaults }
    }
}

#[async_trait]
impl RenderVideoUseCase for RenderVideoUseCaseImpl {
    async fn render(
        &self,
        request: RenderVideoRequest,
    ) -> Result<RenderVideoResponse, ApplicationError> {
        request.validate()?;
        if let Some(cue) = request.subtitles.iter().find(|cue| cue.end < cue.start) {
            return Err(ApplicationError::Validation(format!(
                "subtitle {} ends before it starts",
                cue.id
            )));
        }

        let render_request = RenderRequest {
            video_url: request.video_url,
            video_duration: request.video_duration,
            subtitles: request.subtitles,
            style: request.style.unwrap_or_default(),
            width: request.width.unwrap_or(self.defaults.width),
            height: request.height.unwrap_or(self.defaults.height),
            fps: request.fps.unwrap_or(self.defaults.fps),
        };
        let progress = TracingProgressSink::new(render_request.video_url.clone());

        tracing::info!(
            video_url = %render_request.video_url,
            cue_count = render_request.subtitles.len(),
            width = render_request.width,
            height = render_request.height,
            fps = render_request.fps,
            "starting render"
        );

        let output = self
            .renderer
            .render(render_request, &progress)
            .await
            .inspect_err(|error| tracing::error!(error = %error, "render failed"))?;

        tracing::info!(output_url = %output.output_url, "render completed");
        Ok(RenderVideoResponse {
            output_url: output.output_url,
        })
    }
}
