//! Workspace tabs.
//!
//! DESIGN
//! ======
//! A workspace is an ordered list of tabs, each with its own board, and
//! exactly one active tab. The workspace implements [`BoardStore`] by
//! delegating to the active tab, so an `EngineCore<Workspace>` always edits
//! whatever the user is looking at. Tab switches go through [`switch_tab`],
//! which also resets the engine's viewport and gesture.

use canvas::doc::{BoardStore, Cluster, ClusterId, DocStore, Note, NoteId, NoteUpdate};
use canvas::engine::{Action, EngineCore};
use canvas::geom::{Point, Rect};
use canvas::layout::{arrange_in_grid, import_positions};
use canvas::palette::note_color;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::WorkspaceError;

pub type TabId = Uuid;

/// Name of the tab every workspace starts with.
pub const DEFAULT_TAB_NAME: &str = "All Notes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    /// The question an analysis tab was created for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub board: DocStore,
}

impl Tab {
    #[must_use]
    pub fn new(name: impl Into<String>, query: Option<String>) -> Self {
        Self { id: Uuid::new_v4(), name: name.into(), query, board: DocStore::new() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WorkspaceSnapshot")]
pub struct Workspace {
    tabs: Vec<Tab>,
    /// Index into `tabs`. Always valid: the last tab can't be removed.
    active: usize,
}

/// Unchecked wire form of a [`Workspace`].
#[derive(Deserialize)]
struct WorkspaceSnapshot {
    tabs: Vec<Tab>,
    #[serde(default)]
    active: usize,
}

impl TryFrom<WorkspaceSnapshot> for Workspace {
    type Error = WorkspaceError;

    fn try_from(raw: WorkspaceSnapshot) -> Result<Self, Self::Error> {
        if raw.active >= raw.tabs.len() {
            return Err(WorkspaceError::InvalidActive { active: raw.active, tabs: raw.tabs.len() });
        }
        Ok(Self { tabs: raw.tabs, active: raw.active })
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self { tabs: vec![Tab::new(DEFAULT_TAB_NAME, None)], active: 0 }
    }
}

impl Workspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    #[must_use]
    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn active_tab_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.active]
    }

    #[must_use]
    pub fn active_id(&self) -> TabId {
        self.active_tab().id
    }

    #[must_use]
    pub fn tab(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == *id)
    }

    fn position(&self, id: &TabId) -> Result<usize, WorkspaceError> {
        self.tabs
            .iter()
            .position(|t| t.id == *id)
            .ok_or(WorkspaceError::TabNotFound(*id))
    }

    /// Append an empty tab and make it active.
    pub fn add_tab(&mut self, name: impl Into<String>, query: Option<String>) -> TabId {
        self.push_active(Tab::new(name, query))
    }

    /// Append a tab holding an analysis result and make it active.
    pub fn create_analysis_tab(
        &mut self,
        name: impl Into<String>,
        query: impl Into<String>,
        notes: Vec<Note>,
        clusters: Vec<Cluster>,
    ) -> TabId {
        let mut tab = Tab::new(name, Some(query.into()));
        tab.board = DocStore::from_parts(notes, clusters);
        self.push_active(tab)
    }

    fn push_active(&mut self, tab: Tab) -> TabId {
        let id = tab.id;
        info!(%id, name = %tab.name, "tab added");
        self.tabs.push(tab);
        self.active = self.tabs.len() - 1;
        id
    }

    /// Remove a tab. Removing the active tab activates the first remaining one.
    ///
    /// # Errors
    ///
    /// [`WorkspaceError::LastTab`] if this is the only tab,
    /// [`WorkspaceError::TabNotFound`] if `id` is unknown.
    pub fn remove_tab(&mut self, id: &TabId) -> Result<(), WorkspaceError> {
        let index = self.position(id)?;
        if self.tabs.len() <= 1 {
            return Err(WorkspaceError::LastTab);
        }
        let active_id = self.active_id();
        self.tabs.remove(index);
        self.active = if active_id == *id { 0 } else { self.position(&active_id)? };
        info!(%id, "tab removed");
        Ok(())
    }

    /// Make `id` the active tab. Prefer [`switch_tab`] when an engine is attached.
    ///
    /// # Errors
    ///
    /// [`WorkspaceError::TabNotFound`] if `id` is unknown.
    pub fn set_active(&mut self, id: &TabId) -> Result<(), WorkspaceError> {
        self.active = self.position(id)?;
        Ok(())
    }

    /// # Errors
    ///
    /// [`WorkspaceError::TabNotFound`] if `id` is unknown.
    pub fn rename_tab(&mut self, id: &TabId, name: impl Into<String>) -> Result<(), WorkspaceError> {
        let index = self.position(id)?;
        self.tabs[index].name = name.into();
        Ok(())
    }

    /// Add imported notes to a tab.
    ///
    /// A tab without clusters is re-laid out as one grid. A clustered tab
    /// keeps its arrangement and the new notes land to the right of it.
    /// New notes are colored by their index in the combined list.
    ///
    /// # Errors
    ///
    /// [`WorkspaceError::TabNotFound`] if `id` is unknown.
    pub fn import_notes(&mut self, id: &TabId, mut notes: Vec<Note>) -> Result<usize, WorkspaceError> {
        let index = self.position(id)?;
        let board = &mut self.tabs[index].board;
        let count = notes.len();
        let offset = board.len();
        for (i, note) in notes.iter_mut().enumerate() {
            note.color = note_color(offset + i).to_owned();
        }

        if board.clusters().is_empty() {
            let (mut all, clusters) = (board.notes().to_vec(), board.clusters().to_vec());
            all.extend(notes);
            let placements = arrange_in_grid(&all);
            for (note, placement) in all.iter_mut().zip(placements) {
                note.x = placement.x;
                note.y = placement.y;
            }
            board.load_snapshot(all, clusters);
        } else {
            let positions = import_positions(board.notes(), count);
            for (note, pos) in notes.into_iter().zip(positions) {
                board.add_note(Note { x: pos.x, y: pos.y, ..note });
            }
        }
        info!(tab = %id, count, "notes imported");
        Ok(count)
    }
}

impl BoardStore for Workspace {
    fn notes(&self) -> &[Note] {
        self.active_tab().board.notes()
    }

    fn clusters(&self) -> &[Cluster] {
        self.active_tab().board.clusters()
    }

    fn update_notes(&mut self, updates: &[NoteUpdate]) -> usize {
        self.active_tab_mut().board.update_notes(updates)
    }

    fn set_cluster_bounds(&mut self, id: &ClusterId, bounds: Option<Rect>) -> bool {
        self.active_tab_mut().board.set_cluster_bounds(id, bounds)
    }

    fn move_cluster(&mut self, id: &ClusterId, delta: Point) -> Option<usize> {
        self.active_tab_mut().board.move_cluster(id, delta)
    }

    fn add_note(&mut self, note: Note) {
        self.active_tab_mut().board.add_note(note);
    }

    fn remove_notes(&mut self, ids: &[NoteId]) -> usize {
        self.active_tab_mut().board.remove_notes(ids)
    }

    fn add_cluster(&mut self, cluster: Cluster) {
        self.active_tab_mut().board.add_cluster(cluster);
    }

    fn rename_cluster(&mut self, id: &ClusterId, name: &str) -> bool {
        self.active_tab_mut().board.rename_cluster(id, name)
    }

    fn remove_cluster(&mut self, id: &ClusterId) -> bool {
        self.active_tab_mut().board.remove_cluster(id)
    }
}

/// Activate a tab on an engine-attached workspace.
///
/// The viewport resets to the origin at 100%, any gesture in progress is
/// dropped and the first-content watch restarts for the new board.
///
/// # Errors
///
/// [`WorkspaceError::TabNotFound`] if `id` is unknown.
pub fn switch_tab(core: &mut EngineCore<Workspace>, id: &TabId) -> Result<Vec<Action>, WorkspaceError> {
    core.store.set_active(id)?;
    core.cancel_gesture();
    core.reset_content_watch();
    info!(tab = %id, "tab switched");
    let mut actions = core.reset_viewport();
    actions.extend(core.observe_content());
    Ok(actions)
}

#[cfg(test)]
#[path = "workspace_test.rs"]
mod tests;
