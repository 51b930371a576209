//! Emoji Rain server entry point.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from environment variables
//! 3. Build the annotation client
//! 4. Spawn the animation task that owns the particle field
//! 5. Serve HTTP until `Ctrl-C`

use std::sync::Arc;

use emoji_rain_annotator::Annotator;
use emoji_rain_core::field_channel;
use emoji_rain_server::{AppState, ServerConfig, spawn_animation, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server fails to
/// bind or serve.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("emoji-rain starting");

    // 2. Load configuration.
    let config = ServerConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        frame_interval_ms = config.frame_interval.as_millis(),
        api_url = config.annotator.api_url,
        model = config.annotator.model,
        annotation_timeout_ms = config.annotator.timeout.as_millis(),
        "Configuration loaded"
    );

    // 3. Build the annotation client.
    let annotator = Annotator::new(&config.annotator)?;
    info!(backend = annotator.name(), "Annotation backend configured");

    // 4. Spawn the animation task.
    let (field, commands) = field_channel();
    let state = Arc::new(AppState::new(annotator, field));
    let animation = spawn_animation(&config, commands, &state);

    // 5. Serve.
    start_server(&config, state).await?;

    animation.abort();
    info!("emoji-rain stopped");
    Ok(())
}
