use uuid::Uuid;

use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn shift_or_meta_extends_selection() {
    assert!(Modifiers::shift().extends_selection());
    assert!(Modifiers { meta: true, ..Default::default() }.extends_selection());
    assert!(!Modifiers { ctrl: true, ..Default::default() }.extends_selection());
}

// =============================================================
// Button
// =============================================================

#[test]
fn button_all_variants_distinct() {
    let variants = [Button::Primary, Button::Middle, Button::Secondary];
    for (i, a) in variants.iter().enumerate() {
        for (j, b) in variants.iter().enumerate() {
            if i == j {
                assert_eq!(a, b);
            } else {
                assert_ne!(a, b);
            }
        }
    }
}

// =============================================================
// Key / Focus
// =============================================================

#[test]
fn delete_and_backspace_are_delete_keys() {
    assert!(Key("Delete".into()).is_delete());
    assert!(Key("Backspace".into()).is_delete());
    assert!(!Key("d".into()).is_delete());
}

#[test]
fn escape_key() {
    assert!(Key("Escape".into()).is_escape());
    assert!(!Key("Esc".into()).is_escape());
}

#[test]
fn focus_defaults_to_canvas() {
    assert_eq!(Focus::default(), Focus::Canvas);
}

// =============================================================
// Gesture
// =============================================================

#[test]
fn gesture_default_is_idle() {
    let g = Gesture::default();
    assert!(g.is_idle());
    assert_eq!(g.kind(), GestureKind::Idle);
}

#[test]
fn gesture_kind_matches_variant() {
    let id = Uuid::new_v4();
    let p = Point::new(0.0, 0.0);
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    let cases = [
        (Gesture::Panning { anchor: p }, GestureKind::Panning),
        (Gesture::Marquee { start: p, current: p }, GestureKind::MarqueeSelecting),
        (Gesture::DraggingNote { id, grab: p, press: p, pointer: p, moved: false }, GestureKind::DraggingSingleNote),
        (
            Gesture::DraggingSelected { pressed: id, grabs: vec![], press: p, pointer: p, moved: false },
            GestureKind::DraggingSelectedNotes,
        ),
        (Gesture::DraggingCluster { id, start: p, delta: p }, GestureKind::DraggingCluster),
        (
            Gesture::ResizingCluster { id, handle: ResizeHandle::Se, start: p, initial: r, preview: r },
            GestureKind::ResizingCluster,
        ),
    ];
    for (gesture, kind) in cases {
        assert_eq!(gesture.kind(), kind);
        assert!(!gesture.is_idle());
    }
}

#[test]
fn gesture_kind_serializes_snake_case() {
    let json = serde_json::to_string(&GestureKind::DraggingSelectedNotes).unwrap();
    assert_eq!(json, "\"dragging_selected_notes\"");
}

// =============================================================
// Cursor
// =============================================================

#[test]
fn cursor_css_names() {
    assert_eq!(Cursor::Default.css(), "default");
    assert_eq!(Cursor::Grabbing.css(), "grabbing");
    assert_eq!(Cursor::Resize(ResizeHandle::Nw).css(), "nw-resize");
    assert_eq!(Cursor::Resize(ResizeHandle::Se).css(), "se-resize");
}
