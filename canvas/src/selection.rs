//! Marquee selection and fit-to-content.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::camera::{Viewport, clamp_scale};
use crate::consts::{AUTO_FIT_MAX_SCALE, FIT_PADDING, MANUAL_FIT_MAX_SCALE};
use crate::doc::{Note, NoteId};
use crate::geom::{Point, Rect};

/// Canvas-space rectangle of a marquee dragged between two screen points.
#[must_use]
pub fn marquee_rect(start: Point, current: Point, viewport: &Viewport) -> Rect {
    viewport.rect_to_canvas(Rect::from_corners(start, current))
}

/// Notes whose card overlaps `rect` (strict AABB overlap), in list order.
#[must_use]
pub fn notes_in_rect(notes: &[Note], rect: &Rect) -> Vec<NoteId> {
    notes.iter().filter(|n| n.rect().intersects(rect)).map(|n| n.id).collect()
}

/// Union of every card rectangle.
#[must_use]
pub fn content_bounds(notes: &[Note]) -> Option<Rect> {
    notes.iter().map(Note::rect).reduce(|acc, r| acc.union(&r))
}

/// Which fit is running. Each has its own zoom cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitCap {
    /// One-shot fit after the first content arrives.
    Auto,
    /// The fit-to-screen control.
    Manual,
}

impl FitCap {
    #[must_use]
    pub fn max_scale(self) -> f64 {
        match self {
            Self::Auto => AUTO_FIT_MAX_SCALE,
            Self::Manual => MANUAL_FIT_MAX_SCALE,
        }
    }
}

/// Viewport that shows every note, centered, in a `width` x `height` screen area.
///
/// Returns `None` for an empty board or a degenerate screen area.
#[must_use]
pub fn fit_to_content(notes: &[Note], width: f64, height: f64, cap: FitCap) -> Option<Viewport> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let content = content_bounds(notes)?;
    let padded_w = content.width + FIT_PADDING;
    let padded_h = content.height + FIT_PADDING;
    let scale = clamp_scale((width / padded_w).min(height / padded_h).min(cap.max_scale()));
    let center = content.center();
    let offset = Point::new(width / 2.0 - center.x * scale, height / 2.0 - center.y * scale);
    Some(Viewport::new(offset, scale))
}

/// Detects the board going from empty to non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstContentWatch {
    previous: usize,
}

impl FirstContentWatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current note count. Returns `true` only on a 0 -> n transition.
    pub fn observe(&mut self, count: usize) -> bool {
        let fire = self.previous == 0 && count > 0;
        self.previous = count;
        fire
    }

    /// Forget the last count so the next non-empty observation fires again.
    pub fn reset(&mut self) {
        self.previous = 0;
    }
}
