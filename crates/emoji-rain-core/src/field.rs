//! The live particle collection and its per-frame cycle.

use std::time::Instant;

use rand::Rng;
use tracing::trace;

use crate::config::ParticleConfig;
use crate::emoji::Glyph;
use crate::particle::Particle;
use crate::surface::{Surface, Viewport};

/// Ordered collection of live particles plus the viewport they fall in.
///
/// Order only affects draw stacking: later particles are drawn on top.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    viewport: Viewport,
    config: ParticleConfig,
}

impl ParticleField {
    /// Create an empty field.
    pub const fn new(viewport: Viewport, config: ParticleConfig) -> Self {
        Self {
            particles: Vec::new(),
            viewport,
            config,
        }
    }

    /// Append a freshly spawned particle for `glyph`.
    pub fn spawn<R: Rng + ?Sized>(&mut self, glyph: Glyph, now: Instant, rng: &mut R) {
        let particle = Particle::spawn(glyph, self.viewport, &self.config, now, rng);
        self.particles.push(particle);
    }

    /// Run one frame: prune expired particles, then step and draw the rest.
    ///
    /// Pruning happens first so nothing is integrated right before being
    /// discarded. Survivors keep their relative order.
    pub fn tick(&mut self, now: Instant, surface: &mut dyn Surface) {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_expired(now));
        let pruned = before.saturating_sub(self.particles.len());
        if pruned > 0 {
            trace!(pruned, live = self.particles.len(), "expired particles removed");
        }

        let viewport = self.viewport;
        for particle in &mut self.particles {
            particle.step(viewport);
            particle.render(surface, now);
        }
    }

    /// Replace the viewport used by subsequent steps.
    pub const fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The current viewport.
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the field holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::surface::FrameRecorder;

    fn glyph(s: &str) -> Glyph {
        Glyph::parse(s).unwrap()
    }

    fn field() -> ParticleField {
        ParticleField::new(
            Viewport {
                width: 640.0,
                height: 480.0,
            },
            ParticleConfig::default(),
        )
    }

    fn glyph_order(field: &ParticleField) -> Vec<String> {
        field.iter().map(|p| p.glyph().to_string()).collect()
    }

    #[test]
    fn spawn_appends_in_order() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut field = field();
        let now = Instant::now();
        assert!(field.is_empty());

        field.spawn(glyph("🍎"), now, &mut rng);
        field.spawn(glyph("🍌"), now, &mut rng);

        assert_eq!(field.len(), 2);
        assert_eq!(glyph_order(&field), vec!["🍎", "🍌"]);
    }

    #[test]
    fn tick_prunes_only_expired_and_keeps_order() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut field = field();
        let t0 = Instant::now();

        field.spawn(glyph("🍎"), t0, &mut rng);
        field.spawn(glyph("🍌"), t0 + Duration::from_secs(10), &mut rng);
        field.spawn(glyph("🍒"), t0, &mut rng);
        field.spawn(glyph("🍇"), t0 + Duration::from_secs(20), &mut rng);

        let mut recorder = FrameRecorder::new();
        field.tick(t0 + Duration::from_secs(35), &mut recorder);

        assert_eq!(glyph_order(&field), vec!["🍌", "🍇"]);
        let drawn: Vec<&str> = recorder
            .frame()
            .particles
            .iter()
            .map(|d| d.glyph.as_str())
            .collect();
        assert_eq!(drawn, vec!["🍌", "🍇"]);
    }

    #[test]
    fn tick_keeps_particle_exactly_at_lifespan() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut field = field();
        let t0 = Instant::now();
        field.spawn(glyph("⭐"), t0, &mut rng);

        let mut recorder = FrameRecorder::new();
        field.tick(t0 + Duration::from_secs(30), &mut recorder);
        assert_eq!(field.len(), 1);

        field.tick(t0 + Duration::from_millis(30_001), &mut recorder);
        assert!(field.is_empty());
    }

    #[test]
    fn tick_steps_each_survivor_once() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut field = field();
        let t0 = Instant::now();
        field.spawn(glyph("🎈"), t0, &mut rng);

        let before = field.iter().next().unwrap().velocity().1;
        let mut recorder = FrameRecorder::new();
        field.tick(t0, &mut recorder);
        let after = field.iter().next().unwrap().velocity().1;

        assert!((after - before - 0.2).abs() < 1e-9);
        assert_eq!(recorder.frame().particles.len(), 1);
    }

    #[test]
    fn resize_changes_floor_for_next_tick() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut field = field();
        let t0 = Instant::now();
        for _ in 0..10 {
            field.spawn(glyph("🎈"), t0, &mut rng);
        }

        let mut recorder = FrameRecorder::new();
        for _ in 0..300 {
            field.tick(t0, &mut recorder);
        }

        let small = Viewport {
            width: 200.0,
            height: 120.0,
        };
        field.resize(small);
        field.tick(t0, &mut recorder);

        assert_eq!(field.viewport(), small);
        for p in field.iter() {
            let (x, y) = p.position();
            assert!(y + p.size() <= small.height + 1e-9);
            assert!(x + p.size() <= small.width + 1e-9);
        }
    }
}
