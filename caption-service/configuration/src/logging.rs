use tracing_subscriber::EnvFilter;

use crate::{CaptionConfig, LogFormat};

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level; a second call is a no-op.
pub fn setup_logging(config: &CaptionConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match config.logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    if result.is_ok() {
        tracing::debug!(
            level = %config.logging.level,
            format = ?config.logging.format,
            "logging initialized"
        );
    }
}
