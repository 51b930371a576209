//! The drawing-surface contract used by the particle field.
//!
//! The simulation only needs three primitives from whatever it draws on:
//! clear the whole viewport, draw a glyph with alpha, and present the
//! finished frame. [`FrameRecorder`] implements the contract by recording
//! draw calls into a serializable [`Frame`], which is what the server
//! streams to browsers.

use serde::{Deserialize, Serialize};

/// Size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport, rejecting non-finite or non-positive sizes.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// A 2D drawing surface sized to the viewport.
pub trait Surface {
    /// Erase everything inside `viewport`.
    fn clear(&mut self, viewport: Viewport);

    /// Draw `glyph` with its top-left corner at `(x, y)`.
    ///
    /// `opacity` is in `[0, 1]`.
    fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64, size: f64, opacity: f64);

    /// Called once after all draws of a frame.
    fn present(&mut self) {}
}

/// One recorded glyph draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    /// The emoji to draw.
    pub glyph: String,
    /// Left edge in pixels.
    pub x: f64,
    /// Top edge in pixels.
    pub y: f64,
    /// Glyph size in pixels.
    pub size: f64,
    /// Alpha in `[0, 1]`.
    pub opacity: f64,
}

/// A complete rendered frame, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Viewport width the frame was drawn for.
    pub width: f64,
    /// Viewport height the frame was drawn for.
    pub height: f64,
    /// Draw calls in stacking order (later draws on top).
    pub particles: Vec<DrawCommand>,
}

impl Frame {
    /// Whether the frame contains no glyphs.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// A [`Surface`] that records the current frame in memory.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frame: Frame,
}

impl FrameRecorder {
    /// Create a recorder holding an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame recorded since the last [`Surface::clear`].
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl Surface for FrameRecorder {
    fn clear(&mut self, viewport: Viewport) {
        self.frame.width = viewport.width;
        self.frame.height = viewport.height;
        self.frame.particles.clear();
    }

    fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64, size: f64, opacity: f64) {
        self.frame.particles.push(DrawCommand {
            glyph: glyph.to_owned(),
            x,
            y,
            size,
            opacity,
        });
    }
}
