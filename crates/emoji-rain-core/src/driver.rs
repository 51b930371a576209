//! Per-frame animation loop.
//!
//! The [`AnimationDriver`] is the single owner of the [`ParticleField`].
//! Everything else talks to it through a [`FieldHandle`], which queues
//! [`FieldCommand`]s on an unbounded channel. At the start of every frame
//! the driver drains the queue in one synchronous step, so a spawn batch
//! from one annotation request lands entirely within a single frame and
//! the field never needs a lock.
//!
//! # Frame cycle
//!
//! ```text
//! interval tick --> apply commands --> clear --> field.tick --> present
//! ```
//!
//! There is no delta-time scaling: physics advances one step per frame
//! regardless of how long the frame took. Missed ticks are skipped rather
//! than replayed in a burst.

use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::emoji::Glyph;
use crate::field::ParticleField;
use crate::surface::{Surface, Viewport};

/// A mutation requested of the particle field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCommand {
    /// Spawn one particle per glyph, in order.
    Spawn(Vec<Glyph>),
    /// Change the viewport for subsequent frames.
    Resize(Viewport),
}

/// The animation driver has stopped and no longer accepts commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("animation driver is no longer running")]
pub struct FieldClosed;

/// Cloneable sender side of the field command channel.
#[derive(Debug, Clone)]
pub struct FieldHandle {
    tx: mpsc::UnboundedSender<FieldCommand>,
}

impl FieldHandle {
    /// Queue a batch of glyphs to spawn on the next frame.
    ///
    /// An empty batch is accepted and dropped without touching the channel.
    pub fn spawn(&self, glyphs: Vec<Glyph>) -> Result<(), FieldClosed> {
        if glyphs.is_empty() {
            return Ok(());
        }
        self.send(FieldCommand::Spawn(glyphs))
    }

    /// Queue a viewport change for the next frame.
    pub fn resize(&self, viewport: Viewport) -> Result<(), FieldClosed> {
        self.send(FieldCommand::Resize(viewport))
    }

    fn send(&self, command: FieldCommand) -> Result<(), FieldClosed> {
        self.tx.send(command).map_err(|_closed| FieldClosed)
    }
}

/// Create a connected command handle and receiver.
pub fn field_channel() -> (FieldHandle, mpsc::UnboundedReceiver<FieldCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FieldHandle { tx }, rx)
}

/// Owns the particle field and runs its frame loop.
pub struct AnimationDriver<R> {
    field: ParticleField,
    commands: mpsc::UnboundedReceiver<FieldCommand>,
    rng: R,
    frame_interval: Duration,
}

impl<R: Rng> AnimationDriver<R> {
    /// Create a driver around `field`, reading commands from `commands`.
    pub const fn new(
        field: ParticleField,
        commands: mpsc::UnboundedReceiver<FieldCommand>,
        rng: R,
        frame_interval: Duration,
    ) -> Self {
        Self {
            field,
            commands,
            rng,
            frame_interval,
        }
    }

    /// Render one frame at `now` onto `surface`.
    pub fn frame(&mut self, now: Instant, surface: &mut dyn Surface) {
        self.apply_pending(now);
        surface.clear(self.field.viewport());
        self.field.tick(now, surface);
        surface.present();
    }

    /// Drain every queued command without waiting.
    ///
    /// A closed channel is not an error: particles already in the field
    /// keep animating until they expire.
    fn apply_pending(&mut self, now: Instant) {
        loop {
            match self.commands.try_recv() {
                Ok(FieldCommand::Spawn(glyphs)) => {
                    debug!(count = glyphs.len(), "spawning particles");
                    for glyph in glyphs {
                        self.field.spawn(glyph, now, &mut self.rng);
                    }
                }
                Ok(FieldCommand::Resize(viewport)) => {
                    debug!(
                        width = viewport.width,
                        height = viewport.height,
                        "viewport resized"
                    );
                    self.field.resize(viewport);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return,
            }
        }
    }

    /// The field as of the last frame.
    pub const fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Run the frame loop for the rest of the process lifetime.
    pub async fn run<S: Surface>(mut self, mut surface: S) {
        let mut interval = tokio::time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            frame_interval_ms = self.frame_interval.as_millis(),
            width = self.field.viewport().width,
            height = self.field.viewport().height,
            "animation driver started"
        );

        loop {
            let now = interval.tick().await.into_std();
            self.frame(now, &mut surface);
        }
    }
}
