use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Error};
use axum::Router;
use tokio::net::TcpListener;

use caption_application::{
    EditorSession, RenderDefaults, RenderVideoUseCase, RenderVideoUseCaseImpl,
    SegmentSubtitlesUseCase, SegmentSubtitlesUseCaseImpl, TranscribeMediaUseCase,
    TranscribeMediaUseCaseImpl, TranscriptionSettings,
};
use caption_configuration::{AppConfig, ServerConfig};
use caption_domain::{HistoryConfig, HistoryManager, RenderPort, SubtitleStyle, TranscriptionPort, Word};
use caption_http_server::{create_router, AppState};
use caption_infra_transcription::{HttpTranscriptionAdapter, HttpTranscriptionConfig};

pub async fn build_and_run(config: AppConfig) -> Result<(), Error> {
    let app = Application::new(config)?;
    app.run().await
}

pub struct Application {
    pub config: AppConfig,
    pub router: Router,
}

impl Application {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let transcription_config = &config.service.transcription;
        tracing::info!(
            base_url = %transcription_config.base_url,
            poll_interval_ms = transcription_config.poll_interval_ms,
            max_words_per_cue = config.service.segmentation.max_words_per_cue,
            "initializing caption application"
        );
        if transcription_config.api_key.is_empty() {
            tracing::warn!("transcription api key is empty; provider calls will be rejected");
        }

        let transcription: Arc<dyn TranscriptionPort> =
            Arc::new(HttpTranscriptionAdapter::new(HttpTranscriptionConfig {
                base_url: transcription_config.base_url.clone(),
                api_key: transcription_config.api_key.clone(),
                request_timeout: Duration::from_millis(transcription_config.request_timeout_ms),
            })?);
        let transcribe: Arc<dyn TranscribeMediaUseCase> = Arc::new(
            TranscribeMediaUseCaseImpl::new(transcription, transcription_settings(&config)),
        );
        let segment: Arc<dyn SegmentSubtitlesUseCase> =
            Arc::new(SegmentSubtitlesUseCaseImpl::new());

        let router = create_router(AppState {
            transcribe,
            segment,
        });

        Ok(Self { config, router })
    }

    pub async fn run(self) -> Result<(), Error> {
        let ServerConfig { host, port } = &self.config.server;
        let bind_addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind {bind_addr}"))?;
        tracing::info!(addr = %bind_addr, "starting caption HTTP server");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")
    }
}

pub fn transcription_settings(config: &AppConfig) -> TranscriptionSettings {
    TranscriptionSettings {
        poll_interval: Duration::from_millis(config.service.transcription.poll_interval_ms),
        default_max_words_per_cue: config.service.segmentation.max_words_per_cue,
        pause_threshold_secs: config.service.segmentation.pause_threshold_secs,
        default_language_code: config.service.transcription.language_code.clone(),
    }
}

pub fn history_config(config: &AppConfig) -> HistoryConfig {
    let settings = &config.service.history;
    HistoryConfig {
        max_history_size: settings.max_history_size,
        grouping_delay_ms: settings.grouping_delay_ms,
        enable_grouping: settings.enable_grouping,
        groupable_actions: settings.groupable_actions.clone(),
    }
}

pub fn render_defaults(config: &AppConfig) -> RenderDefaults {
    let render = &config.service.render;
    RenderDefaults {
        width: render.width,
        height: render.height,
        fps: render.fps,
    }
}

/// Render use case over an embedder-supplied renderer, with configured
/// output defaults.
pub fn render_usecase(config: &AppConfig, renderer: Arc<dyn RenderPort>) -> Arc<dyn RenderVideoUseCase> {
    Arc::new(RenderVideoUseCaseImpl::new(renderer, render_defaults(config)))
}

/// Opens an editing session over transcribed words using the configured
/// segmentation and history settings.
pub fn editor_session(
    config: &AppConfig,
    words: Vec<Word>,
    style: SubtitleStyle,
) -> Result<EditorSession, Error> {
    let history = HistoryManager::new(history_config(config));
    let session = EditorSession::from_words(
        words,
        style,
        config.service.segmentation.max_words_per_cue,
        history,
    )?;
    Ok(session)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
