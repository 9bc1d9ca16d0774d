//! Input model: modifier keys, mouse buttons, keys, and the gesture tagged union.
//!
//! This module defines the types consumed by the interaction controller.
//! `Modifiers`, `Button` and `Focus` capture the user's intent at the time of
//! an event. `Gesture` is the single active gesture tracked between
//! pointer-down and pointer-up, carrying the context needed to compute
//! deltas and commit the final mutations on release. Only one gesture can
//! exist at a time, so combined states (panning while resizing, etc.) are
//! unrepresentable.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Serialize;

use crate::doc::{ClusterId, NoteId};
use crate::geom::{Point, Rect};
use crate::hit::ResizeHandle;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Shift only.
    #[must_use]
    pub fn shift() -> Self {
        Self { shift: true, ..Default::default() }
    }

    /// Whether a click should add to the selection instead of replacing it.
    #[must_use]
    pub fn extends_selection(self) -> bool {
        self.shift || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Delete or Backspace.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Where keyboard focus was when a key event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The canvas or some non-editable element.
    #[default]
    Canvas,
    /// A text input or textarea; destructive shortcuts are suppressed.
    TextInput,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Source label to spotlight; notes from other sources are dimmed.
    pub file_filter: Option<String>,
}

/// The active gesture.
///
/// Each active variant carries gesture context needed to compute deltas and
/// emit final actions on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the empty canvas.
    Panning {
        /// Pointer position minus viewport offset at press time.
        anchor: Point,
    },
    /// Shift-dragging a rubber-band box. Both corners are in screen space.
    Marquee { start: Point, current: Point },
    /// Moving one note. The store is written once, on release.
    DraggingNote {
        id: NoteId,
        /// Screen-space offset from the card's top-left to the pointer.
        grab: Point,
        /// Screen-space press position, for click detection.
        press: Point,
        /// Latest screen-space pointer position.
        pointer: Point,
        /// Whether the pointer travelled beyond the click slop.
        moved: bool,
    },
    /// Moving every selected note together. Written once, on release.
    DraggingSelected {
        /// Note under the pointer at press time.
        pressed: NoteId,
        /// Per-note screen-space grab offsets captured at press time.
        grabs: Vec<(NoteId, Point)>,
        press: Point,
        pointer: Point,
        moved: bool,
    },
    /// Moving a cluster's frame. Notes are only shifted on release.
    DraggingCluster {
        id: ClusterId,
        /// Canvas-space press position.
        start: Point,
        /// Canvas-space offset from `start`.
        delta: Point,
    },
    /// Dragging a corner handle. `preview` is committed as manual bounds on release.
    ResizingCluster {
        id: ClusterId,
        handle: ResizeHandle,
        /// Canvas-space press position.
        start: Point,
        initial: Rect,
        preview: Rect,
    },
}

/// Which gesture is active, without its payload. Exposed for cursor feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Idle,
    Panning,
    MarqueeSelecting,
    DraggingSingleNote,
    DraggingSelectedNotes,
    DraggingCluster,
    ResizingCluster,
}

impl Gesture {
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Idle => GestureKind::Idle,
            Self::Panning { .. } => GestureKind::Panning,
            Self::Marquee { .. } => GestureKind::MarqueeSelecting,
            Self::DraggingNote { .. } => GestureKind::DraggingSingleNote,
            Self::DraggingSelected { .. } => GestureKind::DraggingSelectedNotes,
            Self::DraggingCluster { .. } => GestureKind::DraggingCluster,
            Self::ResizingCluster { .. } => GestureKind::ResizingCluster,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
    Resize(ResizeHandle),
}

impl Cursor {
    /// CSS cursor name.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Resize(ResizeHandle::Nw) => "nw-resize",
            Self::Resize(ResizeHandle::Ne) => "ne-resize",
            Self::Resize(ResizeHandle::Sw) => "sw-resize",
            Self::Resize(ResizeHandle::Se) => "se-resize",
        }
    }
}
