use async_trait::async_trait;

use crate::{
    DomainError, ProviderTranscript, RenderOutput, RenderRequest, TranscriptionJob,
};

#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// Submits a media file and returns the provider's job id.
    async fn submit(&self, job: TranscriptionJob) -> Result<String, DomainError>;

    async fn fetch(&self, job_id: &str) -> Result<ProviderTranscript, DomainError>;
}

pub trait ProgressSink: Send + Sync {
    /// `fraction` is in `[0, 1]`.
    fn report(&self, fraction: f32);
}

#[async_trait]
pub trait RenderPort: Send + Sync {
    async fn render(
        &self,
        request: RenderRequest,
        progress: &dyn ProgressSink,
    ) -> Result<RenderOutput, DomainError>;
}
