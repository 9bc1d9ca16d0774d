//! Interaction controller.
//!
//! `EngineCore` turns host input events into store mutations and returns
//! [`Action`]s describing what changed, so the host can persist, re-render
//! or update the cursor. It owns the viewport and the single active
//! [`Gesture`]; the notes and clusters live behind the [`BoardStore`] port.
//!
//! Every gesture commits on pointer-up. Moves in between only update the
//! gesture's preview, so the store never holds half of a gesture.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::borrow::Cow;

use tracing::{debug, info};

use crate::bounds::{display_bounds, resize_rect};
use crate::camera::Viewport;
use crate::consts::{AUTO_FIT_DELAY_MS, BUTTON_ZOOM_IN, BUTTON_ZOOM_OUT, CLICK_SLOP_PX, NEW_NOTE_SCREEN_OFFSET};
use crate::doc::{BoardStore, Cluster, ClusterId, DocStore, Note, NoteId, NotePatch, NoteUpdate};
use crate::geom::{Point, Rect};
use crate::hit::{HitTarget, Spotlight, hit_test, resolve_drop};
use crate::input::{Button, Cursor, Focus, Gesture, GestureKind, Key, Modifiers, UiState, WheelDelta};
use crate::layout::{arrange_in_clusters, arrange_in_grid, to_updates};
use crate::palette::{cluster_color, note_color};
use crate::selection::{FirstContentWatch, FitCap, fit_to_content, marquee_rect, notes_in_rect};

/// Source label given to notes added by hand.
pub const MANUAL_SOURCE: &str = "Manual";

/// Reasoning given to clusters created by hand.
pub const MANUAL_CLUSTER_REASONING: &str = "Created manually by researcher";

/// Actions returned from input handlers and commands for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// One batch of note patches, already applied to the store.
    NotesUpdated(Vec<NoteUpdate>),
    NotesDeleted(Vec<NoteId>),
    NoteAdded(NoteId),
    ClusterAdded(ClusterId),
    ClusterBoundsChanged { id: ClusterId, bounds: Option<Rect> },
    ClusterRenamed { id: ClusterId, name: String },
    ClusterRemoved(ClusterId),
    /// The user pressed a cluster's label; the host should open a rename editor.
    RenameRequested { id: ClusterId, name: String },
    ViewportChanged(Viewport),
    SetCursor(Cursor),
    /// The host should call `run_auto_fit` after `delay_ms`.
    AutoFitScheduled { delay_ms: u64 },
    RenderNeeded,
}

/// Core engine state: all interaction logic, independent of any host UI.
pub struct EngineCore<S = DocStore> {
    pub store: S,
    pub viewport: Viewport,
    pub ui: UiState,
    pub gesture: Gesture,
    pub viewport_width: f64,
    pub viewport_height: f64,
    auto_fit_delay_ms: u64,
    watch: FirstContentWatch,
}

impl Default for EngineCore<DocStore> {
    fn default() -> Self {
        Self::with_store(DocStore::new())
    }
}

impl EngineCore<DocStore> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: BoardStore> EngineCore<S> {
    /// Engine over an existing store.
    #[must_use]
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            viewport: Viewport::default(),
            ui: UiState::default(),
            gesture: Gesture::Idle,
            viewport_width: 0.0,
            viewport_height: 0.0,
            auto_fit_delay_ms: AUTO_FIT_DELAY_MS,
            watch: FirstContentWatch::new(),
        }
    }

    /// Override the deferred auto-fit delay.
    pub fn set_auto_fit_delay(&mut self, delay_ms: u64) {
        self.auto_fit_delay_ms = delay_ms;
    }

    /// Update the screen area the canvas occupies (CSS pixels).
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    // --- Queries ---

    #[must_use]
    pub fn gesture_kind(&self) -> GestureKind {
        self.gesture.kind()
    }

    /// Cursor for the active gesture.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        match &self.gesture {
            Gesture::Idle | Gesture::Marquee { .. } => Cursor::Default,
            Gesture::ResizingCluster { handle, .. } => Cursor::Resize(*handle),
            _ => Cursor::Grabbing,
        }
    }

    #[must_use]
    pub fn spotlight(&self) -> Spotlight<'_> {
        Spotlight::new(self.store.notes(), self.ui.file_filter.as_deref())
    }

    /// Canvas-space positions of the notes being dragged, at the current pointer.
    #[must_use]
    pub fn dragged_positions(&self) -> Vec<(NoteId, Point)> {
        match &self.gesture {
            Gesture::DraggingNote { id, grab, pointer, .. } => {
                vec![(*id, self.viewport.to_canvas(*pointer - *grab))]
            }
            Gesture::DraggingSelected { grabs, pointer, .. } => grabs
                .iter()
                .map(|(id, grab)| (*id, self.viewport.to_canvas(*pointer - *grab)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Notes as they currently appear, with any in-progress drag applied.
    #[must_use]
    pub fn preview_notes(&self) -> Cow<'_, [Note]> {
        let dragged = self.dragged_positions();
        if dragged.is_empty() {
            return Cow::Borrowed(self.store.notes());
        }
        let mut notes = self.store.notes().to_vec();
        for note in &mut notes {
            if let Some((_, pos)) = dragged.iter().find(|(id, _)| *id == note.id) {
                note.x = pos.x;
                note.y = pos.y;
            }
        }
        Cow::Owned(notes)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        match button {
            Button::Secondary => Vec::new(),
            Button::Middle => self.begin_pan(screen_pt, false),
            Button::Primary => self.primary_down(screen_pt, modifiers),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let viewport = self.viewport;
        match &mut self.gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Panning { anchor } => {
                self.viewport.offset = screen_pt - *anchor;
                vec![Action::ViewportChanged(self.viewport), Action::RenderNeeded]
            }
            Gesture::Marquee { start, current } => {
                *current = screen_pt;
                let rect = marquee_rect(*start, *current, &viewport);
                self.select_additive(&rect)
            }
            Gesture::DraggingNote { press, pointer, moved, .. }
            | Gesture::DraggingSelected { press, pointer, moved, .. } => {
                *pointer = screen_pt;
                *moved |= press.distance(screen_pt) >= CLICK_SLOP_PX;
                vec![Action::RenderNeeded]
            }
            Gesture::DraggingCluster { start, delta, .. } => {
                *delta = viewport.to_canvas(screen_pt) - *start;
                vec![Action::RenderNeeded]
            }
            Gesture::ResizingCluster { handle, start, initial, preview, .. } => {
                *preview = resize_rect(*initial, *handle, viewport.to_canvas(screen_pt) - *start);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, modifiers: Modifiers) -> Vec<Action> {
        if self.gesture.is_idle() {
            return Vec::new();
        }
        let mut actions = self.on_pointer_move(screen_pt, modifiers);
        actions.retain(|a| !matches!(a, Action::RenderNeeded));

        let commit = match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Panning { .. } | Gesture::Marquee { .. } => Vec::new(),
            Gesture::DraggingNote { id, grab, moved, .. } => {
                if moved {
                    self.commit_note_drop(id, self.viewport.to_canvas(screen_pt - grab))
                } else {
                    self.select_note(&id, modifiers.extends_selection())
                }
            }
            Gesture::DraggingSelected { pressed, grabs, moved, .. } => {
                if moved {
                    self.commit_group_move(&grabs, screen_pt)
                } else {
                    self.select_note(&pressed, modifiers.extends_selection())
                }
            }
            Gesture::DraggingCluster { id, delta, .. } => self.commit_cluster_move(&id, delta),
            Gesture::ResizingCluster { id, preview, .. } => self.commit_cluster_resize(&id, preview),
        };
        actions.extend(commit);
        actions.push(Action::SetCursor(Cursor::Default));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Wheel zooms around the transform origin. Nothing is emitted once the scale is pinned at a bound.
    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if !self.viewport.apply_wheel(delta.dy) {
            return Vec::new();
        }
        vec![Action::ViewportChanged(self.viewport), Action::RenderNeeded]
    }

    /// Delete/Backspace delete the selection, Escape clears it. Suppressed while typing.
    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers, focus: Focus) -> Vec<Action> {
        if focus == Focus::TextInput {
            return Vec::new();
        }
        if key.is_delete() {
            self.delete_selected()
        } else if key.is_escape() {
            self.deselect_all()
        } else {
            Vec::new()
        }
    }

    /// End any gesture without committing it.
    pub fn cancel_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    // --- Selection commands ---

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let ids = self.store.selected_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        let removed = self.store.remove_notes(&ids);
        info!(removed, "deleted selected notes");
        vec![Action::NotesDeleted(ids), Action::RenderNeeded]
    }

    pub fn deselect_all(&mut self) -> Vec<Action> {
        let updates: Vec<NoteUpdate> = self
            .store
            .selected_ids()
            .into_iter()
            .map(|id| NoteUpdate::new(id, NotePatch::selected(false)))
            .collect();
        self.apply(updates)
    }

    /// Toggle `id`. Unless `multi`, every other note is deselected in the same batch.
    pub fn select_note(&mut self, id: &NoteId, multi: bool) -> Vec<Action> {
        let Some(target) = self.store.note(id) else {
            return Vec::new();
        };
        let mut updates = vec![NoteUpdate::new(*id, NotePatch::selected(!target.selected))];
        if !multi {
            updates.extend(
                self.store
                    .notes()
                    .iter()
                    .filter(|n| n.selected && n.id != *id)
                    .map(|n| NoteUpdate::new(n.id, NotePatch::selected(false))),
            );
        }
        self.apply(updates)
    }

    pub fn clear_highlights(&mut self) -> Vec<Action> {
        let updates: Vec<NoteUpdate> = self
            .store
            .notes()
            .iter()
            .filter(|n| n.highlighted)
            .map(|n| NoteUpdate::new(n.id, NotePatch { highlighted: Some(false), ..Default::default() }))
            .collect();
        self.apply(updates)
    }

    /// Spotlight one source; `None` shows everything.
    pub fn set_file_filter(&mut self, source: Option<String>) -> Vec<Action> {
        self.ui.file_filter = source;
        vec![Action::RenderNeeded]
    }

    // --- Viewport commands ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.viewport.zoom_by(BUTTON_ZOOM_IN);
        self.viewport_changed()
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.viewport.zoom_by(BUTTON_ZOOM_OUT);
        self.viewport_changed()
    }

    pub fn reset_viewport(&mut self) -> Vec<Action> {
        self.viewport.reset();
        self.viewport_changed()
    }

    /// Fit every note on screen. An empty board resets the viewport.
    pub fn fit_to_screen(&mut self) -> Vec<Action> {
        match fit_to_content(self.store.notes(), self.viewport_width, self.viewport_height, FitCap::Manual) {
            Some(fitted) => self.viewport = fitted,
            None => self.viewport.reset(),
        }
        self.viewport_changed()
    }

    /// Record the note count. Schedules an auto-fit when the board first gains content.
    pub fn observe_content(&mut self) -> Vec<Action> {
        if self.watch.observe(self.store.notes().len()) {
            debug!(delay_ms = self.auto_fit_delay_ms, "board gained content; scheduling fit");
            return vec![Action::AutoFitScheduled { delay_ms: self.auto_fit_delay_ms }];
        }
        Vec::new()
    }

    /// The deferred half of auto-fit. Does nothing if the board emptied meanwhile.
    pub fn run_auto_fit(&mut self) -> Vec<Action> {
        let Some(fitted) = fit_to_content(self.store.notes(), self.viewport_width, self.viewport_height, FitCap::Auto)
        else {
            return Vec::new();
        };
        self.viewport = fitted;
        self.viewport_changed()
    }

    /// Forget the content watch, e.g. after switching boards.
    pub fn reset_content_watch(&mut self) {
        self.watch.reset();
    }

    // --- Board commands ---

    /// Add a hand-written note near the top-left of the current view.
    pub fn add_note_at_view(&mut self, content: &str) -> Vec<Action> {
        let scale = self.viewport.scale();
        let x = (-self.viewport.offset.x + NEW_NOTE_SCREEN_OFFSET) / scale;
        let y = (-self.viewport.offset.y + NEW_NOTE_SCREEN_OFFSET) / scale;
        let note = Note::new(content, MANUAL_SOURCE, x, y, note_color(self.store.notes().len()));
        let id = note.id;
        self.store.add_note(note);
        let mut actions = vec![Action::NoteAdded(id)];
        actions.extend(self.observe_content());
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn create_cluster(&mut self, name: &str) -> Vec<Action> {
        let cluster = Cluster::new(name, cluster_color(self.store.clusters().len()), MANUAL_CLUSTER_REASONING);
        let id = cluster.id;
        self.store.add_cluster(cluster);
        info!(%id, name, "created cluster");
        vec![Action::ClusterAdded(id), Action::RenderNeeded]
    }

    /// Rename a cluster. Blank names are ignored.
    pub fn rename_cluster(&mut self, id: &ClusterId, name: &str) -> Vec<Action> {
        let name = name.trim();
        if name.is_empty() || !self.store.rename_cluster(id, name) {
            return Vec::new();
        }
        vec![Action::ClusterRenamed { id: *id, name: name.to_owned() }, Action::RenderNeeded]
    }

    /// Remove a cluster; its members stay on the board, unassigned.
    pub fn remove_cluster(&mut self, id: &ClusterId) -> Vec<Action> {
        if !self.store.remove_cluster(id) {
            return Vec::new();
        }
        info!(%id, "removed cluster");
        vec![Action::ClusterRemoved(*id), Action::RenderNeeded]
    }

    pub fn arrange_grid(&mut self) -> Vec<Action> {
        let updates = to_updates(&arrange_in_grid(self.store.notes()));
        debug!(count = updates.len(), "grid layout");
        self.apply(updates)
    }

    pub fn arrange_clusters(&mut self) -> Vec<Action> {
        let order: Vec<ClusterId> = self.store.clusters().iter().map(|c| c.id).collect();
        let updates = to_updates(&arrange_in_clusters(self.store.notes(), &order));
        debug!(count = updates.len(), clusters = order.len(), "cluster layout");
        self.apply(updates)
    }

    // --- Private ---

    fn primary_down(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let canvas_pt = self.viewport.to_canvas(screen_pt);
        let notes = self.store.notes();
        let clusters = self.store.clusters();
        let bounds = display_bounds(notes, clusters);
        let target = hit_test(canvas_pt, notes, clusters, &bounds, &self.spotlight());

        match target {
            HitTarget::Note(id) => self.begin_note_drag(id, screen_pt),
            HitTarget::Handle { cluster_id, handle } => {
                let Some(initial) = bounds.iter().find(|b| b.cluster_id == cluster_id).map(|b| b.rect) else {
                    return Vec::new();
                };
                debug!(%cluster_id, ?handle, "resize start");
                self.gesture =
                    Gesture::ResizingCluster { id: cluster_id, handle, start: canvas_pt, initial, preview: initial };
                vec![Action::SetCursor(Cursor::Resize(handle))]
            }
            HitTarget::Label(id) => {
                let name = self.store.cluster(&id).map(|c| c.name.clone()).unwrap_or_default();
                vec![Action::RenameRequested { id, name }]
            }
            HitTarget::ClusterBody(id) => {
                debug!(%id, "cluster drag start");
                self.gesture = Gesture::DraggingCluster { id, start: canvas_pt, delta: Point::default() };
                vec![Action::SetCursor(Cursor::Grabbing)]
            }
            HitTarget::Placeholder(_) => Vec::new(),
            HitTarget::Background if modifiers.shift => {
                self.gesture = Gesture::Marquee { start: screen_pt, current: screen_pt };
                vec![Action::RenderNeeded]
            }
            HitTarget::Background => self.begin_pan(screen_pt, true),
        }
    }

    fn begin_pan(&mut self, screen_pt: Point, deselect: bool) -> Vec<Action> {
        self.gesture = Gesture::Panning { anchor: screen_pt - self.viewport.offset };
        let mut actions = if deselect { self.deselect_all() } else { Vec::new() };
        actions.push(Action::SetCursor(Cursor::Grabbing));
        actions
    }

    fn begin_note_drag(&mut self, id: NoteId, screen_pt: Point) -> Vec<Action> {
        let Some(note) = self.store.note(&id) else {
            return Vec::new();
        };
        let grab_of = |n: &Note| screen_pt - self.viewport.to_screen(Point::new(n.x, n.y));
        let selected: Vec<&Note> = self.store.notes().iter().filter(|n| n.selected).collect();

        self.gesture = if note.selected && selected.len() > 1 {
            debug!(%id, count = selected.len(), "group drag start");
            Gesture::DraggingSelected {
                pressed: id,
                grabs: selected.iter().map(|n| (n.id, grab_of(n))).collect(),
                press: screen_pt,
                pointer: screen_pt,
                moved: false,
            }
        } else {
            debug!(%id, "note drag start");
            Gesture::DraggingNote { id, grab: grab_of(note), press: screen_pt, pointer: screen_pt, moved: false }
        };
        vec![Action::SetCursor(Cursor::Grabbing)]
    }

    fn select_additive(&mut self, rect: &Rect) -> Vec<Action> {
        let updates: Vec<NoteUpdate> = notes_in_rect(self.store.notes(), rect)
            .into_iter()
            .filter(|id| self.store.note(id).is_some_and(|n| !n.selected))
            .map(|id| NoteUpdate::new(id, NotePatch::selected(true)))
            .collect();
        let mut actions = self.apply(updates);
        if actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn commit_note_drop(&mut self, id: NoteId, pos: Point) -> Vec<Action> {
        let Some(index) = self.store.notes().iter().position(|n| n.id == id) else {
            return Vec::new();
        };
        let mut notes = self.store.notes().to_vec();
        notes[index].x = pos.x;
        notes[index].y = pos.y;
        let outcome = resolve_drop(&notes, self.store.clusters(), &id);
        info!(%id, x = pos.x, y = pos.y, ?outcome, "note dropped");

        let mut patch = outcome.patch();
        patch.x = Some(pos.x);
        patch.y = Some(pos.y);
        self.apply(vec![NoteUpdate::new(id, patch)])
    }

    fn commit_group_move(&mut self, grabs: &[(NoteId, Point)], screen_pt: Point) -> Vec<Action> {
        let updates: Vec<NoteUpdate> = grabs
            .iter()
            .filter(|(id, _)| self.store.note(id).is_some())
            .map(|(id, grab)| {
                let pos = self.viewport.to_canvas(screen_pt - *grab);
                NoteUpdate::new(*id, NotePatch::position(pos.x, pos.y))
            })
            .collect();
        info!(count = updates.len(), "group moved");
        self.apply(updates)
    }

    fn commit_cluster_move(&mut self, id: &ClusterId, delta: Point) -> Vec<Action> {
        if delta == Point::default() {
            return Vec::new();
        }
        let updates: Vec<NoteUpdate> = self
            .store
            .members(id)
            .map(|n| NoteUpdate::new(n.id, NotePatch::position(n.x + delta.x, n.y + delta.y)))
            .collect();
        if self.store.move_cluster(id, delta).is_none() {
            return Vec::new();
        }
        info!(%id, dx = delta.x, dy = delta.y, members = updates.len(), "cluster moved");
        let mut actions = Vec::with_capacity(3);
        if !updates.is_empty() {
            actions.push(Action::NotesUpdated(updates));
        }
        actions.push(Action::ClusterBoundsChanged { id: *id, bounds: None });
        actions.push(Action::RenderNeeded);
        actions
    }

    fn commit_cluster_resize(&mut self, id: &ClusterId, bounds: Rect) -> Vec<Action> {
        if !self.store.set_cluster_bounds(id, Some(bounds)) {
            return Vec::new();
        }
        info!(%id, width = bounds.width, height = bounds.height, "cluster resized");
        vec![Action::ClusterBoundsChanged { id: *id, bounds: Some(bounds) }]
    }

    /// Apply one batch and report it. Empty batches produce no actions.
    fn apply(&mut self, updates: Vec<NoteUpdate>) -> Vec<Action> {
        if updates.is_empty() {
            return Vec::new();
        }
        self.store.update_notes(&updates);
        vec![Action::NotesUpdated(updates), Action::RenderNeeded]
    }

    fn viewport_changed(&self) -> Vec<Action> {
        vec![Action::ViewportChanged(self.viewport), Action::RenderNeeded]
    }
}
