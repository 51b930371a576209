//! Emoji annotation client for Emoji Rain.
//!
//! Sends user text to a language-model completion API with a fixed
//! system prompt asking it to insert emojis and nothing else, and returns
//! the annotated text.
//!
//! ```text
//! text --> Annotator --> (OpenAI-compatible | Anthropic) HTTP API --> annotated text
//! ```
//!
//! Every call is bounded by the configured timeout. There are no retries:
//! a failed call is reported once and the caller decides what to show.

pub mod backend;
pub mod config;
pub mod error;

pub use backend::{Annotator, SYSTEM_PROMPT};
pub use config::{AnnotatorConfig, BackendType};
pub use error::AnnotatorError;
