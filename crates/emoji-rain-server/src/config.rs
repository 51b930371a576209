//! Server configuration loaded from the environment.
//!
//! Network settings and the animation frame rate live here; the
//! annotation client reads its own variables through
//! [`AnnotatorConfig::from_lookup`].

use std::time::Duration;

use emoji_rain_annotator::{AnnotatorConfig, AnnotatorError};
use emoji_rain_core::{ParticleConfig, ParticleConfigError};

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// The offending environment variable.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The annotation client configuration was rejected.
    #[error("annotator config: {0}")]
    Annotator(#[from] AnnotatorError),

    /// The particle constants are inconsistent.
    #[error("particle config: {0}")]
    Particles(#[from] ParticleConfigError),
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
    /// Time between animation frames.
    pub frame_interval: Duration,
    /// Physics and lifecycle constants for spawned particles.
    pub particles: ParticleConfig,
    /// Language-model client settings.
    pub annotator: AnnotatorConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `HOST` -- bind address (default `0.0.0.0`)
    /// - `PORT` -- TCP port (default 3000)
    /// - `FRAME_INTERVAL_MS` -- animation frame interval (default 16)
    ///
    /// See [`AnnotatorConfig::from_env`] for the annotation variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| String::from("0.0.0.0"));

        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let frame_interval_ms: u64 = parse_or(&lookup, "FRAME_INTERVAL_MS", 16)?;
        if frame_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "FRAME_INTERVAL_MS",
                reason: "must be at least 1".to_owned(),
            });
        }

        let particles = ParticleConfig::default();
        particles.validate()?;

        let annotator = AnnotatorConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            frame_interval: Duration::from_millis(frame_interval_ms),
            particles,
            annotator,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        })
    })
}
