//! Cluster boundary geometry.
//!
//! Two boundaries exist per cluster and they are intentionally different:
//! the display boundary is what gets drawn, the hit boundary is the more
//! generous box used to decide where a dropped note belongs. Empty clusters
//! have no members to measure, so they get a fixed-size placeholder laid out
//! by a running tracker. [`display_bounds`] is the only place that tracker
//! runs; rendering and drop resolution both read its output.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::Serialize;

use crate::consts::{
    HIT_PAD_BOTTOM, HIT_PAD_LEFT, HIT_PAD_RIGHT, HIT_PAD_TOP, LABEL_CHAR_WIDTH, LABEL_HEIGHT, LABEL_OFFSET_X,
    LABEL_OFFSET_Y, LABEL_PADDING, MIN_CLUSTER_SIZE, PLACEHOLDER_ADVANCE, PLACEHOLDER_CLEARANCE, PLACEHOLDER_HEIGHT,
    PLACEHOLDER_ORIGIN_X, PLACEHOLDER_ORIGIN_Y, PLACEHOLDER_WIDTH, RENDER_PAD_BOTTOM, RENDER_PAD_LEFT,
    RENDER_PAD_RIGHT, RENDER_PAD_TOP,
};
use crate::doc::{Cluster, ClusterId, Note, NoteId};
use crate::geom::{Point, Rect};
use crate::hit::ResizeHandle;
use crate::palette::cluster_color;

/// Display geometry for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterBounds {
    pub cluster_id: ClusterId,
    /// Position in the cluster list.
    pub index: usize,
    /// Display rectangle in canvas space.
    pub rect: Rect,
    /// Palette color for the cluster's position.
    pub color: &'static str,
    pub member_count: usize,
    /// Whether `rect` comes from user-set bounds.
    pub manual: bool,
}

impl ClusterBounds {
    /// An empty cluster, drawn as a placeholder drop zone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.member_count == 0
    }
}

/// Union of the card rectangles of a cluster's members, optionally skipping one note.
#[must_use]
pub fn member_extent(notes: &[Note], cluster_id: &ClusterId, exclude: Option<&NoteId>) -> Option<Rect> {
    notes
        .iter()
        .filter(|n| n.cluster_id.as_ref() == Some(cluster_id) && exclude != Some(&n.id))
        .map(Note::rect)
        .reduce(|acc, r| acc.union(&r))
}

/// Drawn boundary computed from members: -20/-40 top-left, +20/+120 bottom-right.
#[must_use]
pub fn render_boundary(notes: &[Note], cluster_id: &ClusterId) -> Option<Rect> {
    member_extent(notes, cluster_id, None)
        .map(|r| pad(r, RENDER_PAD_LEFT, RENDER_PAD_TOP, RENDER_PAD_RIGHT, RENDER_PAD_BOTTOM))
}

/// Drop-target boundary computed from members: -40/-50 top-left, +40/+140 bottom-right.
///
/// Manual bounds are ignored. Passing the dragged note as `exclude` keeps it
/// from hit-testing against itself; a sole member then has no boundary.
#[must_use]
pub fn hit_boundary(notes: &[Note], cluster_id: &ClusterId, exclude: Option<&NoteId>) -> Option<Rect> {
    member_extent(notes, cluster_id, exclude).map(|r| pad(r, HIT_PAD_LEFT, HIT_PAD_TOP, HIT_PAD_RIGHT, HIT_PAD_BOTTOM))
}

/// Display rectangles for every cluster, in cluster order.
///
/// Non-empty clusters use their manual bounds when set, otherwise the render
/// boundary. Empty clusters get a placeholder at the tracker, which starts
/// at (60, 60), advances by one placeholder width per empty cluster, and is
/// pushed past each non-empty cluster's right edge plus clearance.
#[must_use]
pub fn display_bounds(notes: &[Note], clusters: &[Cluster]) -> Vec<ClusterBounds> {
    let mut tracker = PLACEHOLDER_ORIGIN_X;
    clusters
        .iter()
        .enumerate()
        .map(|(index, cluster)| {
            let member_count = notes.iter().filter(|n| n.cluster_id == Some(cluster.id)).count();
            let computed = if member_count == 0 { None } else { render_boundary(notes, &cluster.id) };
            let (rect, manual) = match (computed, cluster.bounds) {
                (Some(_), Some(manual)) => (manual, true),
                (Some(auto), None) => (auto, false),
                (None, _) => {
                    let placeholder = Rect::new(tracker, PLACEHOLDER_ORIGIN_Y, PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
                    tracker += PLACEHOLDER_ADVANCE;
                    (placeholder, false)
                }
            };
            if member_count > 0 {
                tracker = tracker.max(rect.right() + PLACEHOLDER_CLEARANCE);
            }
            ClusterBounds { cluster_id: cluster.id, index, rect, color: cluster_color(index), member_count, manual }
        })
        .collect()
}

/// Rectangle produced by dragging `handle` of `initial` by `delta` (canvas units).
///
/// The corner opposite the handle stays fixed. Either axis shrinking below
/// the minimum is clamped to it, pinning the opposite edge, so the result
/// is never inverted.
#[must_use]
pub fn resize_rect(initial: Rect, handle: ResizeHandle, delta: Point) -> Rect {
    let (west, north) = match handle {
        ResizeHandle::Nw => (true, true),
        ResizeHandle::Ne => (false, true),
        ResizeHandle::Sw => (true, false),
        ResizeHandle::Se => (false, false),
    };

    let mut x = initial.x;
    let mut y = initial.y;
    let mut width = initial.width;
    let mut height = initial.height;

    if west {
        width -= delta.x;
        x += delta.x;
    } else {
        width += delta.x;
    }
    if north {
        height -= delta.y;
        y += delta.y;
    } else {
        height += delta.y;
    }

    if width < MIN_CLUSTER_SIZE {
        if west {
            x = initial.right() - MIN_CLUSTER_SIZE;
        }
        width = MIN_CLUSTER_SIZE;
    }
    if height < MIN_CLUSTER_SIZE {
        if north {
            y = initial.bottom() - MIN_CLUSTER_SIZE;
        }
        height = MIN_CLUSTER_SIZE;
    }

    Rect::new(x, y, width, height)
}

/// The name pill drawn above a cluster's top-left corner.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn label_rect(rect: Rect, name: &str) -> Rect {
    let width = name.chars().count() as f64 * LABEL_CHAR_WIDTH + LABEL_PADDING;
    Rect::new(rect.x + LABEL_OFFSET_X, rect.y + LABEL_OFFSET_Y, width, LABEL_HEIGHT)
}

fn pad(r: Rect, left: f64, top: f64, right: f64, bottom: f64) -> Rect {
    Rect::from_edges(r.left() - left, r.top() - top, r.right() + right, r.bottom() + bottom)
}
