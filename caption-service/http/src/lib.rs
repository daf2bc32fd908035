use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use caption_application::{SegmentSubtitlesUseCase, TranscribeMediaUseCase};

pub mod error;
pub mod extract;
pub mod handlers;

pub use error::{error_mapper, HttpError};
pub use extract::ValidatedJson;

#[derive(Clone)]
pub struct AppState {
    pub transcribe: Arc<dyn TranscribeMediaUseCase>,
    pub segment: Arc<dyn SegmentSubtitlesUseCase>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/captions/transcribe", post(handlers::transcribe_captions))
        .route("/api/captions/segment", post(handlers::segment_captions))
        .with_state(state)
}
