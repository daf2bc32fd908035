use crate::{DomainError, ProviderTranscript, TranscriptStatus, Word};

const MS_PER_SECOND: f64 = 1000.0;

/// Converts a finished provider transcript into words timed in seconds.
///
/// Only `completed` transcripts are accepted; polling until a terminal status
/// is the caller's job. A provider `error` is surfaced with its message as-is.
pub fn normalize_words(transcript: &ProviderTranscript) -> Result<Vec<Word>, DomainError> {
    match transcript.status {
        TranscriptStatus::Completed => Ok(transcript
            .words
            .iter()
            .map(|word| Word {
                text: word.text.clone(),
                start: word.start as f64 / MS_PER_SECOND,
                end: word.end as f64 / MS_PER_SECOND,
                confidence: word.confidence,
            })
            .collect()),
        TranscriptStatus::Error => Err(DomainError::external_service_error(
            "transcription",
            transcript
                .error
                .as_deref()
                .unwrap_or("transcription failed"),
        )),
        TranscriptStatus::Queued | TranscriptStatus::Processing => Err(
            DomainError::invalid_state("transcript is not finished yet"),
        ),
    }
}
