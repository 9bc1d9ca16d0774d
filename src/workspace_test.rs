#![allow(clippy::float_cmp)]

use canvas::camera::Viewport;
use canvas::geom::Point;
use canvas::input::{Button, Modifiers};

use super::*;

fn note(content: &str) -> Note {
    Note::new(content, "P1.txt", 0.0, 0.0, "#FFFFFF")
}

// =============================================================================
// Tabs
// =============================================================================

#[test]
fn starts_with_one_default_tab() {
    let ws = Workspace::new();
    assert_eq!(ws.tabs().len(), 1);
    assert_eq!(ws.active_tab().name, DEFAULT_TAB_NAME);
    assert!(ws.notes().is_empty());
}

#[test]
fn adding_a_tab_activates_it() {
    let mut ws = Workspace::new();
    let id = ws.add_tab("Pricing", Some("pricing".into()));
    assert_eq!(ws.active_id(), id);
    assert_eq!(ws.active_tab().query.as_deref(), Some("pricing"));
}

#[test]
fn removing_last_tab_is_refused() {
    let mut ws = Workspace::new();
    let id = ws.active_id();
    assert!(matches!(ws.remove_tab(&id), Err(WorkspaceError::LastTab)));
    assert_eq!(ws.tabs().len(), 1);
}

#[test]
fn removing_active_tab_activates_first() {
    let mut ws = Workspace::new();
    let first = ws.active_id();
    ws.add_tab("B", None);
    let c = ws.add_tab("C", None);
    ws.remove_tab(&c).unwrap();
    assert_eq!(ws.active_id(), first);
}

#[test]
fn removing_inactive_tab_keeps_active() {
    let mut ws = Workspace::new();
    let first = ws.active_id();
    let b = ws.add_tab("B", None);
    ws.remove_tab(&first).unwrap();
    assert_eq!(ws.active_id(), b);
    assert_eq!(ws.tabs().len(), 1);
}

#[test]
fn unknown_tab_is_an_error() {
    let mut ws = Workspace::new();
    let missing = Uuid::new_v4();
    assert!(matches!(ws.set_active(&missing), Err(WorkspaceError::TabNotFound(_))));
    assert!(matches!(ws.rename_tab(&missing, "x"), Err(WorkspaceError::TabNotFound(_))));
    assert!(matches!(ws.import_notes(&missing, vec![]), Err(WorkspaceError::TabNotFound(_))));
}

#[test]
fn rename_tab_changes_name() {
    let mut ws = Workspace::new();
    let id = ws.active_id();
    ws.rename_tab(&id, "Interviews").unwrap();
    assert_eq!(ws.active_tab().name, "Interviews");
}

#[test]
fn analysis_tab_holds_given_board() {
    let mut ws = Workspace::new();
    let c = Cluster::new("Theme", "#C4A24E", "why");
    let id = ws.create_analysis_tab("pricing...", "pricing", vec![note("a")], vec![c]);
    assert_eq!(ws.active_id(), id);
    assert_eq!(ws.notes().len(), 1);
    assert_eq!(ws.clusters().len(), 1);
    assert_eq!(ws.active_tab().query.as_deref(), Some("pricing"));
}

#[test]
fn store_writes_go_to_active_tab_only() {
    let mut ws = Workspace::new();
    let first = ws.active_id();
    ws.add_note(note("a"));
    ws.add_tab("B", None);
    ws.add_note(note("b"));
    ws.add_note(note("c"));
    assert_eq!(ws.notes().len(), 2);
    assert_eq!(ws.tab(&first).map(|t| t.board.len()), Some(1));
}

// =============================================================================
// Import placement
// =============================================================================

#[test]
fn import_into_unclustered_tab_regrids_everything() {
    let mut ws = Workspace::new();
    let id = ws.active_id();
    let mut existing = note("old");
    existing.x = 900.0;
    existing.y = 900.0;
    ws.add_note(existing);

    let added = ws.import_notes(&id, vec![note("a"), note("b")]).unwrap();
    assert_eq!(added, 2);
    let positions: Vec<(f64, f64)> = ws.notes().iter().map(|n| (n.x, n.y)).collect();
    assert_eq!(positions, vec![(60.0, 60.0), (304.0, 60.0), (548.0, 60.0)]);
}

#[test]
fn import_into_clustered_tab_goes_right_of_content() {
    let mut ws = Workspace::new();
    let id = ws.active_id();
    let c = Cluster::new("A", "#C4A24E", "");
    let mut member = note("m");
    member.x = 100.0;
    member.y = 100.0;
    member.cluster_id = Some(c.id);
    ws.add_cluster(c);
    ws.add_note(member);

    let new: Vec<Note> = (0..4).map(|i| note(&format!("n{i}"))).collect();
    ws.import_notes(&id, new).unwrap();

    let notes = ws.notes();
    assert_eq!((notes[0].x, notes[0].y), (100.0, 100.0));
    // Right edge 320 + 80.
    assert_eq!((notes[1].x, notes[1].y), (400.0, 100.0));
    assert_eq!((notes[3].x, notes[3].y), (888.0, 100.0));
    assert_eq!((notes[4].x, notes[4].y), (400.0, 344.0));
}

#[test]
fn imported_notes_get_palette_colors_by_index() {
    let mut ws = Workspace::new();
    let id = ws.active_id();
    ws.add_note(note("old"));
    ws.import_notes(&id, vec![note("a")]).unwrap();
    assert_eq!(ws.notes()[1].color, note_color(1));
}

#[test]
fn import_into_background_tab_leaves_active_alone() {
    let mut ws = Workspace::new();
    let first = ws.active_id();
    ws.add_tab("B", None);
    ws.import_notes(&first, vec![note("a")]).unwrap();
    assert!(ws.notes().is_empty());
    assert_eq!(ws.tab(&first).map(|t| t.board.len()), Some(1));
}

// =============================================================================
// Engine integration
// =============================================================================

#[test]
fn switching_tabs_resets_viewport_and_gesture() {
    let mut core = EngineCore::with_store(Workspace::new());
    let first = core.store.active_id();
    core.store.add_tab("B", None);
    core.viewport = Viewport::new(Point::new(300.0, -40.0), 2.0);
    core.on_pointer_down(Point::new(10.0, 10.0), Button::Middle, Modifiers::default());
    assert!(!core.gesture.is_idle());

    let actions = switch_tab(&mut core, &first).unwrap();
    assert_eq!(core.store.active_id(), first);
    assert!(core.gesture.is_idle());
    assert_eq!(core.viewport.offset, Point::new(0.0, 0.0));
    assert_eq!(core.viewport.scale(), 1.0);
    assert!(actions.iter().any(|a| matches!(a, Action::ViewportChanged(_))));
}

#[test]
fn switching_to_a_populated_tab_schedules_auto_fit() {
    let mut core = EngineCore::with_store(Workspace::new());
    let first = core.store.active_id();
    core.store.add_note(note("a"));
    core.observe_content();
    core.store.add_tab("Empty", None);

    let actions = switch_tab(&mut core, &first).unwrap();
    assert!(actions.iter().any(|a| matches!(a, Action::AutoFitScheduled { .. })));
}

#[test]
fn engine_edits_land_in_active_tab() {
    let mut core = EngineCore::with_store(Workspace::new());
    core.store.add_tab("B", None);
    core.add_note_at_view("hello");
    core.create_cluster("Theme");
    assert_eq!(core.store.active_tab().board.len(), 1);
    assert_eq!(core.store.tabs()[0].board.len(), 0);
    assert_eq!(core.store.clusters().len(), 1);
}

#[test]
fn cluster_move_lands_in_active_tab() {
    let mut ws = Workspace::new();
    let cluster = Cluster::new("Theme", "#FFB3BA", "");
    let cluster_id = cluster.id;
    ws.add_cluster(cluster);
    let mut member = note("a");
    member.cluster_id = Some(cluster_id);
    ws.add_note(member);
    ws.set_cluster_bounds(&cluster_id, Some(Rect::new(0.0, 0.0, 500.0, 500.0)));

    assert_eq!(ws.move_cluster(&cluster_id, Point::new(10.0, 20.0)), Some(1));
    assert_eq!((ws.notes()[0].x, ws.notes()[0].y), (10.0, 20.0));
    assert!(ws.clusters()[0].bounds.is_none());
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn workspace_survives_a_json_round_trip() {
    let mut ws = Workspace::new();
    let id = ws.add_tab("Second", Some("why".into()));
    ws.add_note(note("kept"));

    let json = serde_json::to_string(&ws).unwrap();
    let back: Workspace = serde_json::from_str(&json).unwrap();
    assert_eq!(back.active_id(), id);
    assert_eq!(back.notes()[0].content, "kept");
}

#[test]
fn workspace_without_tabs_is_rejected() {
    let err = serde_json::from_str::<Workspace>(r#"{"tabs":[],"active":0}"#).unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn workspace_with_dangling_active_index_is_rejected() {
    let mut ws = Workspace::new();
    ws.add_tab("Second", None);
    let mut value = serde_json::to_value(&ws).unwrap();
    value["active"] = serde_json::json!(2);
    assert!(serde_json::from_value::<Workspace>(value).is_err());
}
