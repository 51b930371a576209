//! `WebSocket` handler for real-time frame streaming.
//!
//! Clients connect to `GET /ws/frames` and receive a JSON-encoded
//! [`Frame`](emoji_rain_core::Frame) each time the animation task
//! presents one. All clients share one broadcast stream.
//!
//! Clients report their canvas size with
//! `{"type": "resize", "width": 1280, "height": 720}`; the next frame is
//! simulated inside that viewport. Lagged frames are skipped.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use emoji_rain_core::Viewport;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// A message sent by the browser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The canvas changed size.
    Resize {
        /// New width in pixels.
        width: f64,
        /// New height in pixels.
        height: f64,
    },
}

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming frames.
///
/// # Route
///
/// `GET /ws/frames`
pub async fn ws_frames(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Forward frames to the client and apply its resize messages until
/// either side goes away.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(frame) => {
                        let json = match serde_json::to_string(&frame) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize frame: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Frame channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => apply_client_message(&state, text.as_str()),
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Parse and apply one text message from the browser.
///
/// Unknown or invalid messages are logged and ignored.
pub fn apply_client_message(state: &AppState, text: &str) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "ignoring unrecognized client message");
            return;
        }
    };

    match message {
        ClientMessage::Resize { width, height } => {
            let Some(viewport) = Viewport::new(width, height) else {
                debug!(width, height, "ignoring degenerate viewport");
                return;
            };
            if let Err(e) = state.field.resize(viewport) {
                warn!(error = %e, "resize dropped");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_resize() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"resize","width":800,"height":600}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Resize {
                width: 800.0,
                height: 600.0
            }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"explode"}"#).is_err());
    }
}
