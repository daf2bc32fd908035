use std::time::Duration;

use async_trait::async_trait;
use caption_domain::{DomainError, ProviderTranscript, TranscriptionJob, TranscriptionPort};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "transcription";

#[derive(Debug, Clone)]
pub struct HttpTranscriptionConfig {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

/// `TranscriptionPort` over an AssemblyAI-style REST API.
pub struct HttpTranscriptionAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    audio_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpTranscriptionAdapter {
    pub fn new(config: HttpTranscriptionConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| {
                DomainError::internal_error(&format!("failed to build http client: {err}"))
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl TranscriptionPort for HttpTranscriptionAdapter {
    async fn submit(&self, job: TranscriptionJob) -> Result<String, DomainError> {
        let body = SubmitBody {
            audio_url: &job.media_url,
            language_code: job.language_code.as_deref(),
        };
        let response = self
            .client
            .post(self.url("transcript"))
            .header("authorization", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let submitted: SubmitResponse = read_json(response).await?;
        tracing::info!(job_id = %submitted.id, "transcription job submitted");
        Ok(submitted.id)
    }

    async fn fetch(&self, job_id: &str) -> Result<ProviderTranscript, DomainError> {
        let response = self
            .client
            .get(self.url(&format!("transcript/{job_id}")))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(map_transport_error)?;

        let transcript: ProviderTranscript = read_json(response).await?;
        tracing::debug!(
            job_id,
            status = ?transcript.status,
            word_count = transcript.words.len(),
            "fetched transcript"
        );
        Ok(transcript)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, DomainError> {
    let status = response.status();
    let body = response.text().await.map_err(map_transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or(body);
        return Err(DomainError::external_service_error(
            SERVICE,
            &format!("HTTP {}: {message}", status.as_u16()),
        ));
    }

    serde_json::from_str(&body).map_err(|err| {
        DomainError::external_service_error(SERVICE, &format!("malformed response: {err}"))
    })
}

fn map_transport_error(err: reqwest::Error) -> DomainError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        format!("request failed: {err}")
    };
    DomainError::external_service_error(SERVICE, &message)
}
