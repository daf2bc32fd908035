use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use caption_application::{
    ApplicationError, RenderDefaults, RenderVideoRequest, RenderVideoUseCase,
    RenderVideoUseCaseImpl,
};
use caption_domain::{
    DomainError, ProgressSink, RenderOutput, RenderPort, RenderRequest, Subtitle, Word,
};

#[derive(Default)]
struct RecordingRenderer {
    requests: Mutex<Vec<RenderRequest>>,
    fail_with: Option<String>,
}

#[async_trait]
impl RenderPort for RecordingRenderer {
    async fn render(
        &self,
        request: RenderRequest,
        progress: &dyn ProgressSink,
    ) -> Result<RenderOutput, DomainError> {
        self.requests.lock().expect("lock").push(request);
        progress.report(0.5);
        if let Some(message) = &self.fail_with {
            return Err(DomainError::external_service_error("render", message));
        }
        progress.report(1.0);
        Ok(RenderOutput {
            output_url: "https://cdn.example.com/renders/out.mp4".to_string(),
        })
    }
}

fn defaults() -> RenderDefaults {
    RenderDefaults {
        width: 1080,
        height: 1920,
        fps: 30,
    }
}

fn request() -> RenderVideoRequest {
    RenderVideoRequest {
        video_url: "https://cdn.example.com/uploads/clip.mp4".to_string(),
        video_duration: 12.5,
        subtitles: vec![Subtitle::from_words(
            "0-0",
            vec![Word::new("Hi", 0.0, 0.5, 0.9)],
        )],
        style: None,
        width: None,
        height: None,
        fps: Some(60),
    }
}

#[tokio::test]
async fn render_fills_defaults_and_returns_output_url() {
    let renderer = Arc::new(RecordingRenderer::default());
    let usecase = RenderVideoUseCaseImpl::new(renderer.clone(), defaults());

    let response = usecase.render(request()).await.expect("render succeeds");
    assert_eq!(response.output_url, "https://cdn.example.com/renders/out.mp4");

    let requests = renderer.requests.lock().expect("lock");
    assert_eq!(requests.len(), 1);
    assert_eq!((requests[0].width, requests[0].height), (1080, 1920));
    assert_eq!(requests[0].fps, 60);
    assert_eq!(requests[0].subtitles[0].text, "Hi");
}

#[tokio::test]
async fn render_failure_is_not_retried() {
    let renderer = Arc::new(RecordingRenderer {
        fail_with: Some("browser crashed".to_string()),
        ..RecordingRenderer::default()
    });
    let usecase = RenderVideoUseCaseImpl::new(renderer.clone(), defaults());

    let error = usecase.render(request()).await.expect_err("render fails");
    assert!(matches!(error, ApplicationError::Domain(DomainError::ExternalService { .. })));
    assert_eq!(renderer.requests.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn render_rejects_invalid_dimensions() {
    let usecase = RenderVideoUseCaseImpl::new(Arc::new(RecordingRenderer::default()), defaults());
    let mut invalid = request();
    invalid.width = Some(0);

    let error = usecase.render(invalid).await.expect_err("width too small");
    assert!(matches!(error, ApplicationError::Validation(_)));
}
