//! Server and animation task lifecycle.
//!
//! [`spawn_animation`] starts the particle field's frame loop on a
//! background Tokio task. [`start_server`] binds the HTTP listener and
//! serves until `Ctrl-C`.

use std::net::SocketAddr;
use std::sync::Arc;

use emoji_rain_core::{AnimationDriver, FieldCommand, ParticleField, Viewport};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::router::build_router;
use crate::state::AppState;

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Spawn the animation driver on a background task.
///
/// The driver owns a fresh [`ParticleField`], reads commands from
/// `commands`, and presents frames onto the state's broadcast surface.
/// It runs until the runtime shuts down or the handle is aborted.
pub fn spawn_animation(
    config: &ServerConfig,
    commands: mpsc::UnboundedReceiver<FieldCommand>,
    state: &AppState,
) -> JoinHandle<()> {
    let field = ParticleField::new(Viewport::default(), config.particles.clone());
    let driver = AnimationDriver::new(
        field,
        commands,
        SmallRng::from_os_rng(),
        config.frame_interval,
    );
    tokio::spawn(driver.run(state.surface()))
}

/// Start the HTTP server.
///
/// Binds to the configured address, builds the router, and serves
/// requests until `Ctrl-C`. Returns `Ok(())` on clean shutdown.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "Server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
