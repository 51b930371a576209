//! Particle simulation core for Emoji Rain.
//!
//! Annotated text comes in, emoji particles fall out. This crate owns
//! everything between those two points and nothing about HTTP.
//!
//! # Modules
//!
//! - [`config`] -- [`ParticleConfig`] physics and lifecycle constants.
//! - [`emoji`] -- Emoji extraction from text and the spawn selection policy.
//! - [`particle`] -- A single falling emoji with physics and fade-out.
//! - [`field`] -- The ordered collection of live particles.
//! - [`surface`] -- The drawing-surface contract and a frame recorder.
//! - [`driver`] -- The per-frame animation loop and its command channel.
//!
//! [`ParticleConfig`]: config::ParticleConfig

pub mod config;
pub mod driver;
pub mod emoji;
pub mod field;
pub mod particle;
pub mod surface;

pub use config::{ParticleConfig, ParticleConfigError};
pub use driver::{AnimationDriver, FieldCommand, FieldHandle, field_channel};
pub use emoji::{Glyph, GlyphError, extract, select};
pub use field::ParticleField;
pub use particle::Particle;
pub use surface::{DrawCommand, Frame, FrameRecorder, Surface, Viewport};
