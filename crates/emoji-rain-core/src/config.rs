//! Physics and lifecycle constants for emoji particles.
//!
//! [`ParticleConfig`] mirrors the tuning knobs of the animation. All
//! fields have defaults matching the look the page was tuned for, so
//! `ParticleConfig::default()` is what the server runs with.

use std::time::Duration;

/// Errors produced when a [`ParticleConfig`] is internally inconsistent.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParticleConfigError {
    /// The particle size must be a positive, finite number.
    #[error("size must be positive and finite, got {0}")]
    InvalidSize(f64),

    /// The restitution coefficient must lie in `[0, 1]`.
    #[error("bounce must be within [0, 1], got {0}")]
    InvalidBounce(f64),

    /// The fade window cannot be longer than the whole lifespan.
    #[error("fade_ms ({fade_ms}) exceeds lifespan_ms ({lifespan_ms})")]
    FadeExceedsLifespan {
        /// Configured fade duration in milliseconds.
        fade_ms: u64,
        /// Configured lifespan in milliseconds.
        lifespan_ms: u64,
    },
}

/// Tuning constants applied to every spawned particle.
///
/// Velocities and accelerations are in pixels per frame; the animation
/// deliberately has no delta-time scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleConfig {
    /// Edge length of the glyph's bounding square, in pixels.
    pub size: f64,
    /// Vertical spawn position. Negative values start above the viewport.
    pub spawn_y: f64,
    /// Horizontal spawn speed is drawn from `[-max_spawn_vx, max_spawn_vx)`.
    pub max_spawn_vx: f64,
    /// Vertical spawn speed is drawn from `[-max_spawn_lift, 0)`.
    pub max_spawn_lift: f64,
    /// Downward acceleration added to `vy` every frame.
    pub gravity: f64,
    /// Fraction of vertical speed kept after hitting the floor.
    pub bounce: f64,
    /// Below this vertical speed a floor bounce comes to rest.
    pub rest_threshold: f64,
    /// Total time a particle stays alive, in milliseconds.
    pub lifespan_ms: u64,
    /// Length of the final fade-out window, in milliseconds.
    pub fade_ms: u64,
}

impl ParticleConfig {
    /// Lifespan as a [`Duration`].
    pub const fn lifespan(&self) -> Duration {
        Duration::from_millis(self.lifespan_ms)
    }

    /// Fade window as a [`Duration`].
    pub const fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    /// Check that the constants describe a usable animation.
    pub fn validate(&self) -> Result<(), ParticleConfigError> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ParticleConfigError::InvalidSize(self.size));
        }
        if !(0.0..=1.0).contains(&self.bounce) {
            return Err(ParticleConfigError::InvalidBounce(self.bounce));
        }
        if self.fade_ms > self.lifespan_ms {
            return Err(ParticleConfigError::FadeExceedsLifespan {
                fade_ms: self.fade_ms,
                lifespan_ms: self.lifespan_ms,
            });
        }
        Ok(())
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            size: 32.0,
            spawn_y: -30.0,
            max_spawn_vx: 1.0,
            max_spawn_lift: 5.0,
            gravity: 0.2,
            bounce: 0.5,
            rest_threshold: 0.5,
            lifespan_ms: 30_000,
            fade_ms: 2_000,
        }
    }
}
