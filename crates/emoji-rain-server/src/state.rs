//! Shared application state for the HTTP server.
//!
//! [`AppState`] holds the annotation client, the command handle into the
//! particle field, and the broadcast channel that carries rendered
//! frames to `WebSocket` clients. [`BroadcastSurface`] is the drawing
//! surface the animation task renders onto; presenting it publishes the
//! frame on that channel.

use emoji_rain_annotator::Annotator;
use emoji_rain_core::{FieldHandle, Frame, FrameRecorder, Surface, Viewport};
use tokio::sync::broadcast;

/// Capacity of the broadcast channel for frames.
///
/// A subscriber that falls more than this many frames behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest frame.
const BROADCAST_CAPACITY: usize = 64;

/// Shared state for the Axum application.
///
/// Wrapped in [`std::sync::Arc`] and injected via Axum's `State` extractor.
pub struct AppState {
    /// Client for the language-model annotation service.
    pub annotator: Annotator,
    /// Command handle into the particle field.
    pub field: FieldHandle,
    /// Broadcast sender for rendered frames.
    pub tx: broadcast::Sender<Frame>,
}

impl AppState {
    /// Create application state with a fresh frame channel.
    pub fn new(annotator: Annotator, field: FieldHandle) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            annotator,
            field,
            tx,
        }
    }

    /// Subscribe to the frame broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.tx.subscribe()
    }

    /// A surface that publishes onto this state's frame channel.
    pub fn surface(&self) -> BroadcastSurface {
        BroadcastSurface::new(self.tx.clone())
    }
}

/// Drawing surface that broadcasts each presented frame.
///
/// Consecutive empty frames are published once, so idle clients get a
/// single clear instead of a steady stream of nothing.
pub struct BroadcastSurface {
    recorder: FrameRecorder,
    tx: broadcast::Sender<Frame>,
    idle: bool,
}

impl BroadcastSurface {
    /// Create a surface publishing on `tx`.
    pub fn new(tx: broadcast::Sender<Frame>) -> Self {
        Self {
            recorder: FrameRecorder::new(),
            tx,
            idle: false,
        }
    }
}

impl Surface for BroadcastSurface {
    fn clear(&mut self, viewport: Viewport) {
        self.recorder.clear(viewport);
    }

    fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64, size: f64, opacity: f64) {
        self.recorder.draw_glyph(glyph, x, y, size, opacity);
    }

    fn present(&mut self) {
        let frame = self.recorder.frame();
        if frame.is_empty() && self.idle {
            return;
        }
        self.idle = frame.is_empty();
        // send fails only when no WebSocket client is connected.
        let _ = self.tx.send(frame.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;

    #[test]
    fn presents_frames_with_glyphs() {
        let (tx, mut rx) = broadcast::channel(8);
        let mut surface = BroadcastSurface::new(tx);

        surface.clear(Viewport::default());
        surface.draw_glyph("🎉", 1.0, 2.0, 32.0, 1.0);
        surface.present();

        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.particles.len(), 1);
        assert_eq!(frame.particles[0].glyph, "🎉");
    }

    #[test]
    fn repeated_empty_frames_are_sent_once() {
        let (tx, mut rx) = broadcast::channel(8);
        let mut surface = BroadcastSurface::new(tx);

        surface.clear(Viewport::default());
        surface.draw_glyph("🎉", 1.0, 2.0, 32.0, 1.0);
        surface.present();
        for _ in 0..3 {
            surface.clear(Viewport::default());
            surface.present();
        }

        assert_eq!(rx.try_recv().unwrap().particles.len(), 1);
        assert!(rx.try_recv().unwrap().is_empty());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn present_without_subscribers_is_harmless() {
        let (tx, rx) = broadcast::channel(8);
        drop(rx);
        let mut surface = BroadcastSurface::new(tx);
        surface.clear(Viewport::default());
        surface.draw_glyph("🎉", 0.0, 0.0, 32.0, 1.0);
        surface.present();
    }
}
