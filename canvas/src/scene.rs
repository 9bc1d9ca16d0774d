//! Read-only geometry handed to the renderer.
//!
//! A [`Scene`] is a snapshot of everything a painter needs for one frame:
//! cluster frames, note cards in paint order, the marquee box, and cursor
//! feedback. In-progress gestures are already applied, so the painter never
//! has to know about them.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Serialize;

use crate::bounds::{display_bounds, label_rect};
use crate::camera::Viewport;
use crate::doc::{BoardStore, ClusterId, NoteId};
use crate::engine::EngineCore;
use crate::geom::{Point, Rect};
use crate::hit::{Layer, Spotlight, layer, paint_order};
use crate::input::{Gesture, GestureKind};

#[derive(Debug, Clone, Serialize)]
pub struct ClusterFrame {
    pub id: ClusterId,
    pub name: String,
    pub color: &'static str,
    /// Frame in canvas space.
    pub rect: Rect,
    /// Frame in screen space.
    pub screen: Rect,
    /// Name pill in screen space.
    pub label: Rect,
    pub member_count: usize,
    /// Drawn as a dashed drop zone without handles.
    pub placeholder: bool,
    pub manual: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteFrame {
    pub id: NoteId,
    pub screen: Rect,
    pub color: String,
    pub layer: Layer,
    pub dimmed: bool,
    /// Part of the active drag.
    pub dragging: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub clusters: Vec<ClusterFrame>,
    /// Bottom to top.
    pub notes: Vec<NoteFrame>,
    /// Marquee box in screen space.
    pub marquee: Option<Rect>,
    pub gesture: GestureKind,
    pub cursor: &'static str,
    pub zoom_percent: u32,
}

impl Scene {
    #[must_use]
    pub fn build<S: BoardStore>(core: &EngineCore<S>) -> Self {
        let viewport = core.viewport;
        let clusters = core.store.clusters();
        let mut notes = core.preview_notes().into_owned();

        let mut moving: Option<(ClusterId, Point)> = None;
        if let Gesture::DraggingCluster { id, delta, .. } = &core.gesture {
            moving = Some((*id, *delta));
            for note in notes.iter_mut().filter(|n| n.cluster_id == Some(*id)) {
                note.x += delta.x;
                note.y += delta.y;
            }
        }
        let dragging: Vec<NoteId> = core.dragged_positions().into_iter().map(|(id, _)| id).collect();

        let cluster_frames = display_bounds(&notes, clusters)
            .into_iter()
            .filter_map(|b| {
                let cluster = clusters.get(b.index)?;
                let rect = match (&core.gesture, moving) {
                    (Gesture::ResizingCluster { id, preview, .. }, _) if *id == b.cluster_id => *preview,
                    (_, Some((id, delta))) if id == b.cluster_id && b.manual => b.rect.translate(delta.x, delta.y),
                    _ => b.rect,
                };
                Some(ClusterFrame {
                    id: b.cluster_id,
                    name: cluster.name.clone(),
                    color: b.color,
                    rect,
                    screen: viewport.rect_to_screen(rect),
                    label: viewport.rect_to_screen(label_rect(rect, &cluster.name)),
                    member_count: b.member_count,
                    placeholder: b.is_empty(),
                    manual: b.manual,
                })
            })
            .collect();

        let spotlight = Spotlight::new(&notes, core.ui.file_filter.as_deref());
        let note_frames = paint_order(&notes)
            .into_iter()
            .map(|i| {
                let note = &notes[i];
                NoteFrame {
                    id: note.id,
                    screen: viewport.rect_to_screen(note.rect()),
                    color: note.color.clone(),
                    layer: layer(note),
                    dimmed: spotlight.is_dimmed(note),
                    dragging: dragging.contains(&note.id),
                }
            })
            .collect();

        let marquee = match &core.gesture {
            Gesture::Marquee { start, current } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        };

        Self {
            viewport,
            clusters: cluster_frames,
            notes: note_frames,
            marquee,
            gesture: core.gesture_kind(),
            cursor: core.cursor().css(),
            zoom_percent: zoom_percent(viewport.scale()),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn zoom_percent(scale: f64) -> u32 {
    (scale * 100.0).round() as u32
}
