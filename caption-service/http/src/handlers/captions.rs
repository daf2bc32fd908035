use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use caption_application::{
    ResegmentRequest, ResegmentResponse, TranscribeMediaRequest, TranscribeMediaResponse,
};

use crate::error::{error_mapper, HttpError};
use crate::extract::ValidatedJson;
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn transcribe_captions(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TranscribeMediaRequest>,
) -> Result<(StatusCode, Json<TranscribeMediaResponse>), HttpError> {
    tracing::info!(
        media_url = %request.media_url,
        language_code = request.language_code.as_deref().unwrap_or("auto"),
        max_words_per_cue = ?request.max_words_per_cue,
        "received transcribe request"
    );

    match state.transcribe.transcribe(request).await {
        Ok(response) => {
            tracing::info!(
                job_id = %response.job_id,
                word_count = response.words.len(),
                cue_count = response.subtitles.len(),
                "transcribe request completed"
            );
            Ok((StatusCode::OK, Json(response)))
        }
        Err(error) => {
            tracing::error!(error = %error, "transcribe request failed");
            Err(error_mapper(error))
        }
    }
}

pub async fn segment_captions(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResegmentRequest>,
) -> Result<Json<ResegmentResponse>, HttpError> {
    tracing::debug!(
        input_cues = request.subtitles.len(),
        max_words_per_cue = request.max_words_per_cue,
        "received segment request"
    );

    let response = state.segment.resegment(request).await?;
    Ok(Json(response))
}
