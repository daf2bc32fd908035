use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;

pub use logging::setup_logging;

pub type AppConfig = CaptionConfig;

const CONFIG_PREFIX: &str = "CAPTION_SERVICE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptionConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default = "default_transcription_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    #[serde(default = "default_max_words_per_cue")]
    pub max_words_per_cue: usize,
    #[serde(default)]
    pub pause_threshold_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,
    #[serde(default = "default_grouping_delay_ms")]
    pub grouping_delay_ms: u64,
    #[serde(default = "default_enable_grouping")]
    pub enable_grouping: bool,
    #[serde(default = "default_groupable_actions")]
    pub groupable_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_render_width")]
    pub width: u32,
    #[serde(default = "default_render_height")]
    pub height: u32,
    #[serde(default = "default_render_fps")]
    pub fps: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: default_transcription_base_url(),
            api_key: String::new(),
            language_code: None,
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_words_per_cue: default_max_words_per_cue(),
            pause_threshold_secs: None,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_history_size: default_max_history_size(),
            grouping_delay_ms: default_grouping_delay_ms(),
            enable_grouping: default_enable_grouping(),
            groupable_actions: default_groupable_actions(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: default_render_width(),
            height: default_render_height(),
            fps: default_render_fps(),
        }
    }
}

/// Loads `config/{RUN_ENV}.toml` (or `CAPTION_SERVICE_CONFIG`) and applies
/// `CAPTION_SERVICE_*` overrides from the process environment.
pub fn load_config() -> Result<CaptionConfig, ConfigError> {
    let lookup = |key: &str| std::env::var(key).ok();
    let path = lookup(&format!("{CONFIG_PREFIX}_CONFIG"))
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let run_env = lookup("RUN_ENV").unwrap_or_else(|| "development".to_string());
            PathBuf::from("config").join(format!("{run_env}.toml"))
        });
    load_config_from(&path, lookup)
}

pub fn load_config_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<CaptionConfig, ConfigError> {
    let mut config = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        CaptionConfig::default()
    };

    apply_env_overrides(&mut config, lookup)?;
    Ok(config)
}

pub fn parse_config(raw: &str) -> Result<CaptionConfig, toml::de::Error> {
    toml::from_str(raw)
}

fn apply_env_overrides(
    config: &mut CaptionConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let var = |suffix: &str| {
        let key = format!("{CONFIG_PREFIX}_{suffix}");
        lookup(&key).map(|value| (key, value))
    };

    if let Some((_, host)) = var("HOST") {
        config.server.host = host;
    }
    if let Some((key, port)) = var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: port })?;
    }
    if let Some((_, level)) = var("LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some((_, base_url)) = var("TRANSCRIPTION_BASE_URL") {
        config.service.transcription.base_url = base_url;
    }
    if let Some((_, api_key)) = var("TRANSCRIPTION_API_KEY") {
        config.service.transcription.api_key = api_key;
    }
    Ok(())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_transcription_base_url() -> String {
    "https://api.assemblyai.com/v2".to_string()
}

fn default_poll_interval_ms() -> u64 {
    3_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_words_per_cue() -> usize {
    3
}

fn default_max_history_size() -> usize {
    50
}

fn default_grouping_delay_ms() -> u64 {
    1_000
}

fn default_enable_grouping() -> bool {
    true
}

fn default_groupable_actions() -> Vec<String> {
    [
        "text-edit",
        "style-change",
        "position-drag",
        "slider-change",
        "color-pick",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_render_width() -> u32 {
    1080
}

fn default_render_height() -> u32 {
    1920
}

fn default_render_fps() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn config_defaults_are_deterministic() {
        let cfg = CaptionConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.service.segmentation.max_words_per_cue, 3);
        assert_eq!(cfg.service.history.max_history_size, 50);
        assert_eq!(cfg.service.history.grouping_delay_ms, 1_000);
        assert_eq!(cfg.service.transcription.poll_interval_ms, 3_000);
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let cfg = parse_config(
            r#"
            [logging]
            format = "json"

            [service.segmentation]
            max_words_per_cue = 5
            pause_threshold_secs = 0.8

            [service.render]
            fps = 60
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.service.segmentation.max_words_per_cue, 5);
        assert_eq!(cfg.service.segmentation.pause_threshold_secs, Some(0.8));
        assert_eq!(cfg.service.render.fps, 60);
        assert_eq!(cfg.service.render.width, 1080);
    }

    #[test]
    fn missing_file_falls_back_to_defaults_with_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CAPTION_SERVICE_PORT", "9090"),
            ("CAPTION_SERVICE_TRANSCRIPTION_API_KEY", "secret"),
        ]);
        let cfg = load_config_from(Path::new("does/not/exist.toml"), |key| {
            env.get(key).map(|value| value.to_string())
        })
        .expect("defaults load");

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.service.transcription.api_key, "secret");
    }

    #[test]
    fn invalid_port_override_is_rejected() {
        let error = load_config_from(Path::new("does/not/exist.toml"), |key| {
            (key == "CAPTION_SERVICE_PORT").then(|| "not-a-port".to_string())
        })
        .expect_err("port must be numeric");

        assert!(matches!(error, ConfigError::InvalidValue { .. }));
    }
}
