#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use crate::geom::{Point, Rect};

/// Pan/zoom transform for the infinite canvas.
///
/// `offset` is the screen position (CSS pixels) of the canvas origin.
/// `scale` is the zoom factor, always within `[MIN_SCALE, MAX_SCALE]`.
/// Zoom is anchored at the transform origin, not at the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub offset: Point,
    scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { offset: Point::new(0.0, 0.0), scale: 1.0 }
    }
}

impl Viewport {
    /// Build a viewport, clamping `scale` into bounds.
    #[must_use]
    pub fn new(offset: Point, scale: f64) -> Self {
        Self { offset, scale: clamp_scale(scale) }
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the zoom factor, clamped into bounds.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    /// Multiply the zoom factor, clamped into bounds.
    pub fn zoom_by(&mut self, factor: f64) {
        self.set_scale(self.scale * factor);
    }

    /// Apply one wheel tick. Positive `dy` (scroll down) zooms out; anything
    /// else, a horizontal-only tick included, zooms in.
    /// Returns `false` if the scale was already at the bound.
    pub fn apply_wheel(&mut self, dy: f64) -> bool {
        let before = self.scale;
        self.zoom_by(if dy > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN });
        (self.scale - before).abs() > f64::EPSILON
    }

    /// Back to the identity transform.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Convert a screen-space point (CSS pixels) to canvas coordinates.
    #[must_use]
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset.x) / self.scale,
            y: (screen.y - self.offset.y) / self.scale,
        }
    }

    /// Convert a canvas-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.scale + self.offset.x,
            y: canvas.y * self.scale + self.offset.y,
        }
    }

    /// Convert a canvas-space rectangle to screen space.
    #[must_use]
    pub fn rect_to_screen(&self, rect: Rect) -> Rect {
        let origin = self.to_screen(Point::new(rect.x, rect.y));
        Rect::new(origin.x, origin.y, rect.width * self.scale, rect.height * self.scale)
    }

    /// Convert a screen-space rectangle to canvas space.
    #[must_use]
    pub fn rect_to_canvas(&self, rect: Rect) -> Rect {
        let origin = self.to_canvas(Point::new(rect.x, rect.y));
        Rect::new(origin.x, origin.y, rect.width / self.scale, rect.height / self.scale)
    }
}

/// Clamp a zoom factor into `[MIN_SCALE, MAX_SCALE]`. Non-finite input falls back to 1.0.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() { scale.clamp(MIN_SCALE, MAX_SCALE) } else { 1.0 }
}
