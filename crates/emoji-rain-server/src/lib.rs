//! HTTP server for Emoji Rain.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Annotation endpoint** (`POST /api/add-emoji`) which sends the
//!   user's text to the language model, returns the annotated text, and
//!   spawns the selected emojis into the particle field
//! - **`WebSocket` endpoint** (`/ws/frames`) streaming every rendered
//!   frame via [`tokio::sync::broadcast`] and accepting viewport resizes
//! - **Page** (`GET /`) with the canvas painter and input form
//!
//! # Architecture
//!
//! The particle field lives inside a single animation task. Handlers
//! never touch it directly: they send spawn and resize commands through
//! a [`FieldHandle`], and the animation task publishes each finished
//! frame on a broadcast channel that `WebSocket` clients subscribe to.
//!
//! [`FieldHandle`]: emoji_rain_core::FieldHandle

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, spawn_animation, start_server};
pub use state::{AppState, BroadcastSurface};
