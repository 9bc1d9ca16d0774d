//! Pointer hit-testing and drop resolution.
//!
//! Everything here works in canvas space. [`hit_test`] classifies a
//! pointer-down into the target that decides which gesture starts.
//! [`resolve_drop`] decides what happens to a note's cluster membership when
//! a single-note drag ends.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::Serialize;

use crate::bounds::{ClusterBounds, display_bounds, hit_boundary, label_rect};
use crate::consts::{HANDLE_RADIUS, UNCLUSTER_MARGIN};
use crate::doc::{Cluster, ClusterId, Note, NoteId, NotePatch};
use crate::geom::{Point, Rect};
use crate::palette::note_color;

/// Corner resize handle of a cluster frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    /// Center of this handle on `rect`.
    #[must_use]
    pub fn anchor(self, rect: Rect) -> Point {
        match self {
            Self::Nw => Point::new(rect.left(), rect.top()),
            Self::Ne => Point::new(rect.right(), rect.top()),
            Self::Sw => Point::new(rect.left(), rect.bottom()),
            Self::Se => Point::new(rect.right(), rect.bottom()),
        }
    }
}

/// What the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Note(NoteId),
    Handle { cluster_id: ClusterId, handle: ResizeHandle },
    /// The cluster's name pill. Rename target; starts no gesture.
    Label(ClusterId),
    /// Frame of a non-empty cluster.
    ClusterBody(ClusterId),
    /// Empty-cluster drop zone. Starts no gesture.
    Placeholder(ClusterId),
    Background,
}

/// Stacking layer of a note: selected above highlighted above the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Base,
    Highlighted,
    Selected,
}

/// Inputs that decide which notes are dimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spotlight<'a> {
    /// Some note on the board is highlighted.
    pub any_highlighted: bool,
    /// Active source filter.
    pub file_filter: Option<&'a str>,
}

impl<'a> Spotlight<'a> {
    #[must_use]
    pub fn new(notes: &[Note], file_filter: Option<&'a str>) -> Self {
        Self { any_highlighted: notes.iter().any(|n| n.highlighted), file_filter }
    }

    /// Dimmed notes are drawn faded and ignore the pointer. Selection always wins.
    #[must_use]
    pub fn is_dimmed(&self, note: &Note) -> bool {
        if note.selected {
            return false;
        }
        let outside_highlight = self.any_highlighted && !note.highlighted;
        let outside_filter = self.file_filter.is_some_and(|f| f != note.source);
        outside_highlight || outside_filter
    }
}

#[must_use]
pub fn layer(note: &Note) -> Layer {
    if note.selected {
        Layer::Selected
    } else if note.highlighted {
        Layer::Highlighted
    } else {
        Layer::Base
    }
}

/// Note indices from bottom to top of the stack: by layer, then list order.
#[must_use]
pub fn paint_order(notes: &[Note]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..notes.len()).collect();
    order.sort_by_key(|&i| layer(&notes[i]));
    order
}

/// Classify a canvas-space point.
///
/// Priority: topmost non-dimmed note, resize handle, label, cluster body,
/// placeholder, background. Among overlapping clusters the later one wins.
#[must_use]
pub fn hit_test(
    pt: Point,
    notes: &[Note],
    clusters: &[Cluster],
    bounds: &[ClusterBounds],
    spotlight: &Spotlight<'_>,
) -> HitTarget {
    let top_note = paint_order(notes)
        .into_iter()
        .rev()
        .map(|i| &notes[i])
        .find(|n| !spotlight.is_dimmed(n) && n.rect().contains(pt));
    if let Some(note) = top_note {
        return HitTarget::Note(note.id);
    }

    let framed = || bounds.iter().rev().filter(|b| !b.is_empty());

    for b in framed() {
        for handle in ResizeHandle::ALL {
            if handle.anchor(b.rect).distance(pt) <= HANDLE_RADIUS {
                return HitTarget::Handle { cluster_id: b.cluster_id, handle };
            }
        }
    }

    for b in framed() {
        let Some(cluster) = clusters.get(b.index) else {
            continue;
        };
        if label_rect(b.rect, &cluster.name).contains(pt) {
            return HitTarget::Label(b.cluster_id);
        }
    }

    if let Some(b) = framed().find(|b| b.rect.contains(pt)) {
        return HitTarget::ClusterBody(b.cluster_id);
    }

    if let Some(b) = bounds.iter().rev().find(|b| b.is_empty() && b.rect.contains(pt)) {
        return HitTarget::Placeholder(b.cluster_id);
    }

    HitTarget::Background
}

/// Effect of releasing a dragged note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Landed in a different cluster.
    MovedTo { cluster_id: ClusterId, index: usize, name: String },
    /// Dragged well clear of its own cluster.
    Unclustered,
    Unchanged,
}

impl DropOutcome {
    /// Membership fields to write alongside the note's final position.
    #[must_use]
    pub fn patch(&self) -> NotePatch {
        match self {
            Self::MovedTo { cluster_id, index, name } => NotePatch {
                cluster_id: Some(Some(*cluster_id)),
                color: Some(note_color(*index).to_owned()),
                reasoning: Some(Some(manual_move_reasoning(name))),
                ..Default::default()
            },
            Self::Unclustered => NotePatch { cluster_id: Some(None), reasoning: Some(None), ..Default::default() },
            Self::Unchanged => NotePatch::default(),
        }
    }
}

/// Reasoning recorded on a note the user dragged into a cluster.
#[must_use]
pub fn manual_move_reasoning(cluster_name: &str) -> String {
    format!("Manually moved to \"{cluster_name}\" by researcher")
}

/// Decide cluster membership for note `id` after a drag.
///
/// `notes` must already hold the note at its dropped position. Other clusters
/// are tested in list order against their hit boundary, or their placeholder
/// when empty; the first match wins. Failing that, a clustered note leaves
/// its cluster only when its center is more than the unclustering margin
/// outside its own hit boundary computed without it.
#[must_use]
pub fn resolve_drop(notes: &[Note], clusters: &[Cluster], id: &NoteId) -> DropOutcome {
    let Some(note) = notes.iter().find(|n| n.id == *id) else {
        return DropOutcome::Unchanged;
    };
    if clusters.is_empty() {
        return DropOutcome::Unchanged;
    }
    let center = note.center();
    let current = note.cluster_id;

    let targets = display_bounds(notes, clusters);
    for (b, cluster) in targets.iter().zip(clusters) {
        if current == Some(cluster.id) {
            continue;
        }
        let zone = if b.is_empty() { Some(b.rect) } else { hit_boundary(notes, &cluster.id, None) };
        if zone.is_some_and(|z| z.contains(center)) {
            return DropOutcome::MovedTo { cluster_id: cluster.id, index: b.index, name: cluster.name.clone() };
        }
    }

    let Some(own) = current else {
        return DropOutcome::Unchanged;
    };
    match hit_boundary(notes, &own, Some(id)) {
        Some(zone) if !zone.inflate(UNCLUSTER_MARGIN).contains(center) => DropOutcome::Unclustered,
        _ => DropOutcome::Unchanged,
    }
}
