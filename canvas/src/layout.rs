//! Deterministic auto-layout: assigns non-overlapping positions to notes.
//!
//! Both layouts are pure functions over the full note list. They never read
//! current positions, so applying one twice to the same list yields the same
//! output. Results come back as [`Placement`]s in input order; callers turn
//! them into a single [`NoteUpdate`] batch.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::Serialize;

use crate::consts::{
    CARD_GAP, CARD_HEIGHT, CARD_WIDTH, CLUSTER_ORIGIN_X, CLUSTER_ROW_HEIGHT, CLUSTER_SPACING, CLUSTER_TOP, GRID_COLS,
    GRID_MARGIN, IMPORT_ROW_EXTRA, IMPORT_SPACING, MIN_CLUSTER_COLS, UNCLUSTERED_COLS,
};
use crate::doc::{ClusterId, Note, NoteId, NotePatch, NoteUpdate};
use crate::geom::Point;

/// Horizontal cell pitch shared by every layout.
const COL_PITCH: f64 = CARD_WIDTH + CARD_GAP;

/// Vertical cell pitch of the ungrouped grid.
const GRID_ROW_PITCH: f64 = CARD_HEIGHT + CARD_GAP;

/// A computed position for one note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub id: NoteId,
    pub x: f64,
    pub y: f64,
}

impl Placement {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn to_update(&self) -> NoteUpdate {
        NoteUpdate::new(self.id, NotePatch::position(self.x, self.y))
    }
}

/// Turn placements into one update batch.
#[must_use]
pub fn to_updates(placements: &[Placement]) -> Vec<NoteUpdate> {
    placements.iter().map(Placement::to_update).collect()
}

/// Position of the `index`-th cell in the ungrouped grid.
#[must_use]
pub fn grid_position(index: usize) -> Point {
    cell(Point::new(GRID_MARGIN, GRID_MARGIN), index, GRID_COLS, GRID_ROW_PITCH)
}

/// Ungrouped grid: five columns from the canvas margin, in list order.
#[must_use]
pub fn arrange_in_grid(notes: &[Note]) -> Vec<Placement> {
    notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            let pos = grid_position(i);
            Placement { id: note.id, x: pos.x, y: pos.y }
        })
        .collect()
}

/// Cluster layout: one near-square block per cluster, left to right in
/// `cluster_order`, then a three-column block of every remaining note.
///
/// Notes whose cluster is not in `cluster_order` are treated as unclustered.
#[must_use]
pub fn arrange_in_clusters(notes: &[Note], cluster_order: &[ClusterId]) -> Vec<Placement> {
    let mut positions: Vec<Option<Point>> = vec![None; notes.len()];
    let mut cursor_x = CLUSTER_ORIGIN_X;

    for cluster_id in cluster_order {
        let members: Vec<usize> = notes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.cluster_id.as_ref() == Some(cluster_id))
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }
        let cols = cluster_cols(members.len());
        let origin = Point::new(cursor_x, CLUSTER_TOP);
        for (slot, &note_index) in members.iter().enumerate() {
            positions[note_index] = Some(cell(origin, slot, cols, CLUSTER_ROW_HEIGHT));
        }
        cursor_x += block_width(cols) + CLUSTER_SPACING;
    }

    let origin = Point::new(cursor_x, CLUSTER_TOP);
    let mut slot = 0;
    for pos in &mut positions {
        if pos.is_none() {
            *pos = Some(cell(origin, slot, UNCLUSTERED_COLS, CLUSTER_ROW_HEIGHT));
            slot += 1;
        }
    }

    notes
        .iter()
        .zip(positions)
        .map(|(note, pos)| {
            let pos = pos.unwrap_or(origin);
            Placement { id: note.id, x: pos.x, y: pos.y }
        })
        .collect()
}

/// Positions for `count` notes imported into a board that already has clusters.
///
/// New notes go in a three-column block to the right of everything already
/// on the board, so existing arrangements are left untouched.
#[must_use]
pub fn import_positions(existing: &[Note], count: usize) -> Vec<Point> {
    let start_x = existing
        .iter()
        .map(|n| n.x + CARD_WIDTH)
        .reduce(f64::max)
        .map_or(GRID_MARGIN, |right| right + IMPORT_SPACING);
    let origin = Point::new(start_x, CLUSTER_TOP);
    let row_pitch = CARD_HEIGHT + CARD_GAP + IMPORT_ROW_EXTRA;
    (0..count).map(|i| cell(origin, i, UNCLUSTERED_COLS, row_pitch)).collect()
}

/// Column count of a cluster block: `max(ceil(sqrt(n)), 2)`.
#[must_use]
pub fn cluster_cols(member_count: usize) -> usize {
    let root = member_count.isqrt();
    let ceil = if root * root < member_count { root + 1 } else { root };
    ceil.max(MIN_CLUSTER_COLS)
}

#[allow(clippy::cast_precision_loss)]
fn block_width(cols: usize) -> f64 {
    cols as f64 * COL_PITCH
}

#[allow(clippy::cast_precision_loss)]
fn cell(origin: Point, index: usize, cols: usize, row_pitch: f64) -> Point {
    let col = (index % cols) as f64;
    let row = (index / cols) as f64;
    Point::new(origin.x + col * COL_PITCH, origin.y + row * row_pitch)
}
