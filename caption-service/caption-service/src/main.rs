use anyhow::Result;
use caption_configuration::{load_config, setup_logging};
use caption_setup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    setup_logging(&config);
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "caption service starting"
    );
    let app = Application::new(config)?;
    app.run().await?;
    Ok(())
}
