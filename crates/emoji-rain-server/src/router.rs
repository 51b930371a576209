//! Axum router construction.
//!
//! Assembles all routes (page, API, `WebSocket`) into a single
//! [`Router`] with CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- canvas page
/// - `POST /api/add-emoji` -- annotate text and spawn emojis
/// - `GET /ws/frames` -- `WebSocket` frame stream
///
/// CORS allows any origin, matching the page being served from
/// anywhere during development.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/add-emoji", post(handlers::add_emoji))
        .route("/ws/frames", get(ws::ws_frames))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
