//! Document model: notes, clusters, sparse note updates, and the board store port.
//!
//! This module defines the data the canvas works on (`Note`, `Cluster`), a
//! sparse-update type for batched edits (`NotePatch` / `NoteUpdate`), the
//! `BoardStore` trait the engine reads and writes through, and `DocStore`,
//! the in-memory implementation.
//!
//! Lists are ordered. Note order drives the layouts and stacking; cluster
//! order drives palette colors, placeholder placement and drop-target
//! priority.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{CARD_HEIGHT, CARD_WIDTH};
use crate::geom::{Point, Rect};

/// Unique identifier for a note.
pub type NoteId = Uuid;

/// Unique identifier for a cluster.
pub type ClusterId = Uuid;

/// A single research data unit placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for this note.
    pub id: NoteId,
    /// Text content of the note.
    pub content: String,
    /// Where the note came from (file name, query, "Manual").
    pub source: String,
    /// Participant the note is attributed to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    /// Card background color.
    pub color: String,
    /// Cluster this note belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<ClusterId>,
    /// Free-form labels.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Why the note is where it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub highlighted: bool,
    /// Embedding vector, owned by the vector-search collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Note {
    /// Create an unclustered note at `(x, y)`.
    #[must_use]
    pub fn new(content: impl Into<String>, source: impl Into<String>, x: f64, y: f64, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source: source.into(),
            participant_id: None,
            x,
            y,
            color: color.into(),
            cluster_id: None,
            tags: BTreeSet::new(),
            reasoning: None,
            selected: false,
            highlighted: false,
            embedding: None,
        }
    }

    /// The card's bounding box in canvas space.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, CARD_WIDTH, CARD_HEIGHT)
    }

    /// The card's center in canvas space.
    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

/// A named, colored grouping of notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique identifier for this cluster.
    pub id: ClusterId,
    /// Display name.
    pub name: String,
    /// Color assigned at creation.
    pub color: String,
    /// Description of what the cluster groups.
    #[serde(default)]
    pub reasoning: String,
    /// User-set position and size. When absent the boundary follows the members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
}

impl Cluster {
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            reasoning: reasoning.into(),
            bounds: None,
        }
    }
}

/// Sparse update for a note. Only present fields are applied.
///
/// The nested options on `cluster_id` and `reasoning` distinguish "leave
/// alone" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<Option<ClusterId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<bool>,
    /// Tags to add (set semantics).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_tags: Vec<String>,
}

impl NotePatch {
    /// Patch that moves a note to `(x, y)`.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Default::default() }
    }

    /// Patch that sets the selection flag.
    #[must_use]
    pub fn selected(selected: bool) -> Self {
        Self { selected: Some(selected), ..Default::default() }
    }

    /// Apply this patch to `note`.
    pub fn apply(&self, note: &mut Note) {
        if let Some(x) = self.x {
            note.x = x;
        }
        if let Some(y) = self.y {
            note.y = y;
        }
        if let Some(cluster_id) = self.cluster_id {
            note.cluster_id = cluster_id;
        }
        if let Some(ref color) = self.color {
            note.color.clone_from(color);
        }
        if let Some(ref reasoning) = self.reasoning {
            note.reasoning.clone_from(reasoning);
        }
        if let Some(selected) = self.selected {
            note.selected = selected;
        }
        if let Some(highlighted) = self.highlighted {
            note.highlighted = highlighted;
        }
        for tag in &self.add_tags {
            note.tags.insert(tag.clone());
        }
    }
}

/// A patch addressed to one note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteUpdate {
    pub id: NoteId,
    pub patch: NotePatch,
}

impl NoteUpdate {
    #[must_use]
    pub fn new(id: NoteId, patch: NotePatch) -> Self {
        Self { id, patch }
    }
}

/// Read/write port onto the note-and-cluster state the engine operates on.
///
/// Each write call is one state update: a batch passed to `update_notes` is
/// applied as a whole, so observers never see half of a reassignment.
/// Writes that reference missing ids skip them and report what they did.
pub trait BoardStore {
    /// Notes in board order.
    fn notes(&self) -> &[Note];

    /// Clusters in board order.
    fn clusters(&self) -> &[Cluster];

    /// Apply a batch of note patches. Returns how many notes were found and patched.
    fn update_notes(&mut self, updates: &[NoteUpdate]) -> usize;

    /// Set or clear a cluster's manual bounds. Returns false if the cluster doesn't exist.
    fn set_cluster_bounds(&mut self, id: &ClusterId, bounds: Option<Rect>) -> bool;

    /// Shift every member of a cluster by `delta` and clear its manual bounds,
    /// as one update. Returns how many members moved, or `None` if the
    /// cluster doesn't exist.
    fn move_cluster(&mut self, id: &ClusterId, delta: Point) -> Option<usize>;

    /// Append a note.
    fn add_note(&mut self, note: Note);

    /// Remove notes by id. Returns how many were removed.
    fn remove_notes(&mut self, ids: &[NoteId]) -> usize;

    /// Append a cluster.
    fn add_cluster(&mut self, cluster: Cluster);

    /// Rename a cluster. Returns false if the cluster doesn't exist.
    fn rename_cluster(&mut self, id: &ClusterId, name: &str) -> bool;

    /// Remove a cluster, unassigning (not deleting) its members.
    fn remove_cluster(&mut self, id: &ClusterId) -> bool;

    /// Look up a note by id.
    fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes().iter().find(|n| n.id == *id)
    }

    /// Look up a cluster by id.
    fn cluster(&self, id: &ClusterId) -> Option<&Cluster> {
        self.clusters().iter().find(|c| c.id == *id)
    }

    /// Position of a cluster in board order.
    fn cluster_index(&self, id: &ClusterId) -> Option<usize> {
        self.clusters().iter().position(|c| c.id == *id)
    }

    /// Notes assigned to a cluster, in board order.
    fn members<'a>(&'a self, id: &'a ClusterId) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes().iter().filter(move |n| n.cluster_id.as_ref() == Some(id))
    }

    /// Ids of selected notes, in board order.
    fn selected_ids(&self) -> Vec<NoteId> {
        self.notes().iter().filter(|n| n.selected).map(|n| n.id).collect()
    }
}

/// In-memory board state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocStore {
    #[serde(default)]
    notes: Vec<Note>,
    #[serde(default)]
    clusters: Vec<Cluster>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing lists.
    #[must_use]
    pub fn from_parts(notes: Vec<Note>, clusters: Vec<Cluster>) -> Self {
        Self { notes, clusters }
    }

    /// Replace all notes and clusters with a snapshot.
    pub fn load_snapshot(&mut self, notes: Vec<Note>, clusters: Vec<Cluster>) {
        self.notes = notes;
        self.clusters = clusters;
    }

    /// Number of notes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns `true` if the store contains no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl BoardStore for DocStore {
    fn notes(&self) -> &[Note] {
        &self.notes
    }

    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    fn update_notes(&mut self, updates: &[NoteUpdate]) -> usize {
        let mut applied = 0;
        for update in updates {
            if let Some(note) = self.notes.iter_mut().find(|n| n.id == update.id) {
                update.patch.apply(note);
                applied += 1;
            }
        }
        applied
    }

    fn set_cluster_bounds(&mut self, id: &ClusterId, bounds: Option<Rect>) -> bool {
        let Some(cluster) = self.clusters.iter_mut().find(|c| c.id == *id) else {
            return false;
        };
        cluster.bounds = bounds;
        true
    }

    fn move_cluster(&mut self, id: &ClusterId, delta: Point) -> Option<usize> {
        let cluster = self.clusters.iter_mut().find(|c| c.id == *id)?;
        cluster.bounds = None;
        let mut moved = 0;
        for note in self.notes.iter_mut().filter(|n| n.cluster_id.as_ref() == Some(id)) {
            note.x += delta.x;
            note.y += delta.y;
            moved += 1;
        }
        Some(moved)
    }

    fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    fn remove_notes(&mut self, ids: &[NoteId]) -> usize {
        let before = self.notes.len();
        self.notes.retain(|n| !ids.contains(&n.id));
        before - self.notes.len()
    }

    fn add_cluster(&mut self, cluster: Cluster) {
        self.clusters.push(cluster);
    }

    fn rename_cluster(&mut self, id: &ClusterId, name: &str) -> bool {
        let Some(cluster) = self.clusters.iter_mut().find(|c| c.id == *id) else {
            return false;
        };
        name.clone_into(&mut cluster.name);
        true
    }

    fn remove_cluster(&mut self, id: &ClusterId) -> bool {
        let before = self.clusters.len();
        self.clusters.retain(|c| c.id != *id);
        if self.clusters.len() == before {
            return false;
        }
        for note in &mut self.notes {
            if note.cluster_id.as_ref() == Some(id) {
                note.cluster_id = None;
                note.reasoning = None;
            }
        }
        true
    }
}
