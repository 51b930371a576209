//! HTTP endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Canvas page with the input form |
//! | `POST` | `/api/add-emoji` | Annotate text and spawn its emojis |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Html;
use emoji_rain_core::emoji;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

/// Message returned when the request carries no text.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text";

/// The browser page: canvas painter, input form, and copy button.
const INDEX_HTML: &str = include_str!("../assets/index.html");

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/add-emoji`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddEmojiRequest {
    /// Text to annotate. A missing field is treated as empty.
    #[serde(default)]
    #[validate(length(min = 1))]
    pub input: String,
}

/// Response body for a successful `POST /api/add-emoji`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddEmojiResponse {
    /// The input text with emojis inserted.
    pub result: String,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Serve the page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ---------------------------------------------------------------------------
// POST /api/add-emoji
// ---------------------------------------------------------------------------

/// Annotate the submitted text and rain its emojis into the field.
///
/// Empty or unparseable bodies fail with 400 before any upstream call.
/// An upstream failure returns 500 and spawns nothing.
pub async fn add_emoji(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddEmojiRequest>, JsonRejection>,
) -> Result<Json<AddEmojiResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "rejected add-emoji body");
        ApiError::InvalidInput(EMPTY_INPUT_MESSAGE.to_owned())
    })?;
    if request.validate().is_err() {
        return Err(ApiError::InvalidInput(EMPTY_INPUT_MESSAGE.to_owned()));
    }

    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        input_chars = request.input.chars().count(),
        backend = state.annotator.name(),
        "annotation requested"
    );

    let result = state
        .annotator
        .annotate(&request.input)
        .await
        .map_err(|e| {
            error!(%request_id, error = %e, "annotation failed");
            ApiError::Upstream(e)
        })?;

    let glyphs = {
        let mut rng = rand::rng();
        emoji::select(&emoji::extract(&result), &mut rng)
    };
    let spawned = glyphs.len();
    if let Err(e) = state.field.spawn(glyphs) {
        warn!(%request_id, error = %e, "particles dropped");
    }

    info!(%request_id, spawned, "annotation complete");
    Ok(Json(AddEmojiResponse { result }))
}
