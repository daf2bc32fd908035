use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use validator::Validate;

use caption_domain::{
    join_word_text, normalize_words, CueSegmenter, ProviderTranscript, TranscriptionJob,
    TranscriptionPort,
};

use crate::{ApplicationError, TranscribeMediaRequest, TranscribeMediaResponse};

#[async_trait]
pub trait TranscribeMediaUseCase: Send + Sync {
    async fn transcribe(
        &self,
        request: TranscribeMediaRequest,
    ) -> Result<TranscribeMediaResponse, ApplicationError>;
}

#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub poll_interval: Duration,
    pub default_max_words_per_cue: usize,
    pub pause_threshold_secs: Option<f64>,
    pub default_language_code: Option<String>,
}

pub struct TranscribeMediaUseCaseImpl {
    transcription: Arc<dyn TranscriptionPort>,
    settings: TranscriptionSettings,
}

impl TranscribeMediaUseCaseImpl {
    pub fn new(transcription: Arc<dyn TranscriptionPort>, settings: TranscriptionSettings) -> Self {
        Self {
            transcription,
            settings,
        }
    }

    /// Polls at a fixed interval until the provider reports `completed` or
    /// `error`. There is no attempt limit; dropping the future cancels it.
    async fn wait_for_terminal(&self, job_id: &str) -> Result<ProviderTranscript, ApplicationError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let transcript = self.transcription.fetch(job_id).await?;
            if transcript.status.is_terminal() {
                return Ok(transcript);
            }

            tracing::debug!(
                job_id,
                attempt,
                status = ?transcript.status,
                "transcript not ready, polling again"
            );
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }
}

#[async_trait]
impl TranscribeMediaUseCase for TranscribeMediaUseCaseImpl {
    async fn transcribe(
        &self,
        request: TranscribeMediaRequest,
    ) -> Result<TranscribeMediaResponse, ApplicationError> {
        request.validate()?;
        let TranscribeMediaRequest {
            media_url,
            language_code,
            max_words_per_cue,
        } = request;

        let segmenter = CueSegmenter::new(
            max_words_per_cue.unwrap_or(self.settings.default_max_words_per_cue),
        )?;
        let language_code = language_code.or_else(|| self.settings.default_language_code.clone());

        tracing::debug!(
            media_url = %media_url,
            language_code = language_code.as_deref().unwrap_or("auto"),
            max_words_per_cue = segmenter.max_words_per_cue(),
            "submitting transcription job"
        );

        let job_id = self
            .transcription
            .submit(TranscriptionJob {
                media_url,
                language_code,
            })
            .await?;
        let transcript = self.wait_for_terminal(&job_id).await?;

        let words = normalize_words(&transcript).inspect_err(|error| {
            tracing::warn!(job_id = %job_id, error = %error, "transcription failed");
        })?;
        let subtitles = match self.settings.pause_threshold_secs {
            Some(max_gap_secs) => segmenter.segment_with_pauses(&words, max_gap_secs),
            None => segmenter.segment(&words),
        };
        let text = transcript
            .text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| join_word_text(&words));

        tracing::debug!(
            job_id = %job_id,
            word_count = words.len(),
            cue_count = subtitles.len(),
            "transcription completed"
        );

        Ok(TranscribeMediaResponse {
            job_id,
            text,
            words,
            subtitles,
        })
    }
}
