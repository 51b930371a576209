//! A single falling emoji.
//!
//! Physics runs in pixels per frame: gravity is added to the vertical
//! speed, then the position moves by the speed. The floor reflects the
//! particle with energy loss until it comes to rest; the side walls
//! reflect it without loss. Lifetime is wall-clock based and the last
//! stretch of it is a linear fade to transparent.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::ParticleConfig;
use crate::emoji::Glyph;
use crate::surface::{Surface, Viewport};

/// One emoji particle with position, velocity, and lifecycle.
#[derive(Debug, Clone)]
pub struct Particle {
    glyph: Glyph,
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    size: f64,
    gravity: f64,
    bounce: f64,
    rest_threshold: f64,
    born_at: Instant,
    lifespan: Duration,
    fade: Duration,
}

impl Particle {
    /// Spawn a particle above the viewport at a random horizontal position.
    ///
    /// `x` is uniform in `[0, width)`, `vx` uniform in
    /// `[-max_spawn_vx, max_spawn_vx)` and `vy` uniform in
    /// `[-max_spawn_lift, 0)`, so a fresh particle never starts out
    /// moving down.
    pub fn spawn<R: Rng + ?Sized>(
        glyph: Glyph,
        viewport: Viewport,
        config: &ParticleConfig,
        now: Instant,
        rng: &mut R,
    ) -> Self {
        let x = sample(rng, 0.0, viewport.width);
        let vx = sample(rng, -config.max_spawn_vx, config.max_spawn_vx);
        let vy = sample(rng, -config.max_spawn_lift, 0.0);

        Self {
            glyph,
            x,
            y: config.spawn_y,
            vx,
            vy,
            size: config.size,
            gravity: config.gravity,
            bounce: config.bounce,
            rest_threshold: config.rest_threshold,
            born_at: now,
            lifespan: config.lifespan(),
            fade: config.fade(),
        }
    }

    /// Advance one frame of physics inside `viewport`.
    ///
    /// Must be called exactly once per frame; calling it twice moves the
    /// particle twice.
    pub fn step(&mut self, viewport: Viewport) {
        self.vy += self.gravity;
        self.x += self.vx;
        self.y += self.vy;

        let floor = viewport.height - self.size;
        if self.y > floor {
            self.y = floor;
            self.vy = -self.vy * self.bounce;
            if self.vy.abs() < self.rest_threshold {
                self.vy = 0.0;
            }
        }

        let right_wall = viewport.width - self.size;
        if self.x < 0.0 || self.x > right_wall {
            self.vx = -self.vx;
            self.x = self.x.min(right_wall).max(0.0);
        }
    }

    /// Opacity at `now`: 1 until the fade window, then linear down to 0.
    pub fn opacity(&self, now: Instant) -> f64 {
        let age = self.age(now);
        let fade_start = self.lifespan.saturating_sub(self.fade);
        if age <= fade_start {
            return 1.0;
        }
        if self.fade.is_zero() {
            return 0.0;
        }

        let remaining = self.lifespan.as_secs_f64() - age.as_secs_f64();
        (remaining / self.fade.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Draw the glyph at its current position with its current opacity.
    pub fn render(&self, surface: &mut dyn Surface, now: Instant) {
        surface.draw_glyph(
            self.glyph.as_str(),
            self.x,
            self.y,
            self.size,
            self.opacity(now),
        );
    }

    /// Whether more than the lifespan has passed since spawning.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.age(now) > self.lifespan
    }

    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.born_at)
    }

    /// The emoji this particle draws.
    pub const fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    /// Current top-left position.
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Current velocity in pixels per frame.
    pub const fn velocity(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }

    /// Edge length of the glyph square.
    pub const fn size(&self) -> f64 {
        self.size
    }

    /// When the particle was spawned.
    pub const fn born_at(&self) -> Instant {
        self.born_at
    }
}

/// Uniform sample from `[low, high)`, or `low` when the range is empty.
fn sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if low < high {
        rng.random_range(low..high)
    } else {
        low
    }
}
