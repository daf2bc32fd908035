use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use caption_configuration::AppConfig;
use caption_setup::Application;

async fn spawn_service(provider: &MockServer) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = AppConfig::default();
    config.service.transcription.base_url = provider.uri();
    config.service.transcription.api_key = "test-key".to_string();
    config.service.transcription.poll_interval_ms = 10;

    let app = Application::new(config)?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.router).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn transcribe_endpoint_polls_provider_and_returns_cues() -> Result<(), Box<dyn std::error::Error>>
{
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcript"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "job-9", "status": "queued" })),
        )
        .expect(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/transcript/job-9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "job-9", "status": "processing" })),
        )
        .up_to_n_times(1)
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/transcript/job-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-9",
            "status": "completed",
            "text": "Hi there. See you",
            "words": [
                { "text": "Hi", "start": 0, "end": 300, "confidence": 0.9 },
                { "text": "there.", "start": 300, "end": 700, "confidence": 0.9 },
                { "text": "See", "start": 900, "end": 1100, "confidence": 0.9 },
                { "text": "you", "start": 1100, "end": 1400, "confidence": 0.9 }
            ]
        })))
        .mount(&provider)
        .await;

    let base_url = spawn_service(&provider).await?;
    let response = reqwest::Client::new()
        .post(format!("{base_url}/api/captions/transcribe"))
        .json(&json!({ "media_url": "https://cdn.example.com/clip.mp4" }))
        .send()
        .await?;

    assert!(response.status().is_success());
    let body: Value = response.json().await?;
    assert_eq!(body["job_id"], "job-9");
    assert_eq!(body["text"], "Hi there. See you");
    assert_eq!(body["subtitles"][0]["text"], "Hi there.");
    assert_eq!(body["subtitles"][1]["text"], "See you");
    assert_eq!(body["words"][1]["end"], 0.7);

    Ok(())
}

#[tokio::test]
async fn provider_error_status_surfaces_as_bad_gateway() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcript"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "job-3", "status": "queued" })),
        )
        .mount(&provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/transcript/job-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-3",
            "status": "error",
            "error": "Audio file is too short"
        })))
        .mount(&provider)
        .await;

    let base_url = spawn_service(&provider).await?;
    let response = reqwest::Client::new()
        .post(format!("{base_url}/api/captions/transcribe"))
        .json(&json!({ "media_url": "https://cdn.example.com/clip.mp4" }))
        .send()
        .await?;

    assert_eq!(response.status().as_u16(), 502);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Audio file is too short");

    Ok(())
}
