//! Integration tests: canvas controller, drag-reorder, and loading.
//!
//! Drives a `Canvas` through host input events the way a browser would,
//! checking the tree, selection, panel, and indicator after each step.

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use trellis_core::{Bounds, HtmlOptions, NodeId, ValidationError, emit_html, serialize_children};
use trellis_editor::*;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn canvas_with(markup: &str) -> Canvas {
    init_logging();
    let mut canvas = Canvas::new(CanvasConfig::default());
    canvas.import_html(markup).unwrap();
    canvas
}

fn id(s: &str) -> NodeId {
    NodeId::intern(s)
}

/// Element children of `parent` (or the root), as id strings.
fn children_of(canvas: &Canvas, parent: Option<&str>) -> Vec<String> {
    let doc = canvas.document();
    let idx = match parent {
        Some(p) => doc.index_of(id(p)).unwrap(),
        None => doc.root,
    };
    doc.element_children(idx)
        .into_iter()
        .map(|c| doc.node(c).id.as_str().to_string())
        .collect()
}

fn clean(canvas: &Canvas) -> String {
    emit_html(canvas.document(), &HtmlOptions::default())
}

fn drag(canvas: &mut Canvas, dragged: &str, over: &str, y: f32) -> Outcome {
    let bounds = Some(Bounds::new(0.0, 100.0, 300.0, 40.0));
    canvas.handle(InputEvent::click(id(dragged))).unwrap();
    assert_eq!(
        canvas.handle(InputEvent::DragStart { target: id(dragged) }).unwrap(),
        Outcome::DragStarted(id(dragged))
    );
    canvas
        .handle(InputEvent::DragOver {
            target: id(over),
            y,
            bounds,
        })
        .unwrap()
}

const SIBLINGS: &str = r#"<p id="a">A</p><p id="b">B</p><p id="c">C</p>"#;

// ─── Scenarios ───────────────────────────────────────────────────────────

#[test]
fn created_button_has_label_and_bindings() {
    init_logging();
    let mut canvas = Canvas::new(CanvasConfig::default());
    let outcome = canvas.apply(Command::Create { kind: "button".into() }).unwrap();
    let Outcome::Created(button) = outcome else {
        panic!("expected a created node, got {outcome:?}");
    };

    let node = canvas.document().get(button).unwrap();
    assert_eq!(node.tag, "button");
    assert_eq!(node.text, "Click me");
    assert!(node.bindings.select);
    assert!(node.bindings.drag);
    assert_eq!(canvas.selected(), Some(button));
}

#[test]
fn legacy_project_mounts_markup_verbatim() {
    init_logging();
    let mut canvas = Canvas::new(CanvasConfig::default());
    assert!(canvas.load_project_to_canvas(r#"{"version": "1.0", "html": "<div>Hi</div>"}"#));
    assert_eq!(clean(&canvas), "<div>Hi</div>");

    let doc = canvas.document();
    let div = doc.element_children(doc.root)[0];
    assert!(doc.node(div).bindings.select && doc.node(div).bindings.drag);
    assert!(doc.delete_control_of(div).is_some());
}

#[test]
fn legacy_mixed_content_keeps_text_in_place() {
    init_logging();
    let mut canvas = Canvas::new(CanvasConfig::default());
    assert!(canvas.load_project_to_canvas(r#"{"version": "1.0", "html": "<p>Hello <b>world</b>!</p>"}"#));
    assert_eq!(clean(&canvas), "<p>Hello <b>world</b>!</p>");
    assert!(canvas.export_static_html().contains("<p>Hello <b>world</b>!</p>"));

    let json = canvas.serialize_project().to_json().unwrap();
    let mut copy = Canvas::new(CanvasConfig::default());
    assert!(copy.load_project_to_canvas(&json));
    assert_eq!(clean(&copy), "<p>Hello <b>world</b>!</p>");
}

#[test]
fn top_level_text_survives_load_save_and_undo() {
    init_logging();
    let mut canvas = Canvas::new(CanvasConfig::default());
    assert!(canvas.load_project_to_canvas(r#"{"version": "1.0", "html": "Intro <p>Body</p> outro"}"#));
    assert_eq!(clean(&canvas), "Intro <p>Body</p> outro");

    let json = canvas.serialize_project().to_json().unwrap();
    let mut copy = Canvas::new(CanvasConfig::default());
    assert!(copy.load_project_to_canvas(&json));
    assert_eq!(clean(&copy), "Intro <p>Body</p> outro");

    copy.create_component("button").unwrap();
    assert_eq!(copy.undo().unwrap().as_deref(), Some("create button"));
    assert_eq!(clean(&copy), "Intro <p>Body</p> outro");
}

#[test]
fn drop_on_lower_half_places_after_target() {
    let mut canvas = canvas_with(SIBLINGS);
    let indicator = drag(&mut canvas, "a", "b", 130.0);
    assert_eq!(
        indicator,
        Outcome::Indicator(Some(DropIndicator {
            target: id("b"),
            position: DropPosition::After,
        }))
    );

    let dropped = canvas.handle(InputEvent::Drop { target: id("b") }).unwrap();
    assert_eq!(dropped, Outcome::Moved(id("a")));
    assert_eq!(children_of(&canvas, None), vec!["b", "a", "c"]);
    assert_eq!(canvas.selected(), Some(id("a")));
    assert_eq!(canvas.drag().state(), DragState::Idle);
    assert_eq!(canvas.indicator(), None);
    assert!(!canvas.document().get(id("a")).unwrap().has_class("canvas-dragging"));
}

#[test]
fn drop_into_own_child_is_rejected() {
    let mut canvas = canvas_with(r#"<div id="a"><p id="child">x</p></div><p id="b">B</p>"#);
    let before = serialize_children(canvas.document(), canvas.document().root);
    drag(&mut canvas, "a", "child", 110.0);
    let indicator = canvas.indicator();
    assert!(indicator.is_some());

    let err = canvas.handle(InputEvent::Drop { target: id("child") }).unwrap_err();
    assert!(matches!(
        err,
        EditorError::Validation(ValidationError::WouldCreateCycle { .. })
    ));

    let after = serialize_children(canvas.document(), canvas.document().root);
    assert!(before.iter().zip(&after).all(|(x, y)| x.same_structure(y)));
    assert_eq!(canvas.indicator(), indicator);
    let notices = canvas.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);

    canvas.handle(InputEvent::DragEnd).unwrap();
    assert_eq!(canvas.indicator(), None);
}

#[test]
fn deleting_selected_subtree_empties_panel() {
    let mut canvas = canvas_with(r#"<section id="outer"><div id="mid"><p id="leaf">x</p></div></section><p id="keep">k</p>"#);
    canvas.apply(Command::Select(id("outer"))).unwrap();
    assert!(!canvas.panel().is_empty());

    let outcome = canvas.handle(InputEvent::DeleteControl { owner: id("outer") }).unwrap();
    assert_eq!(outcome, Outcome::Deleted { id: id("outer"), removed: 3 });
    for gone in ["outer", "mid", "leaf"] {
        assert!(canvas.document().get(id(gone)).is_none());
    }
    assert_eq!(canvas.selected(), None);
    assert_eq!(
        canvas.panel(),
        &PanelState::empty(&CanvasConfig::default().empty_panel_message)
    );
    assert_eq!(children_of(&canvas, None), vec!["keep"]);
}

// ─── Properties ──────────────────────────────────────────────────────────

#[test]
fn moving_before_target_across_parents() {
    let mut canvas = canvas_with(r#"<div id="box"><p id="y1">1</p><p id="y2">2</p></div><p id="x">X</p>"#);
    drag(&mut canvas, "x", "y2", 101.0);
    canvas.handle(InputEvent::Drop { target: id("y2") }).unwrap();

    assert_eq!(children_of(&canvas, Some("box")), vec!["y1", "x", "y2"]);
    assert_eq!(children_of(&canvas, None), vec!["box"]);
}

#[test]
fn drop_on_root_appends() {
    let mut canvas = canvas_with(r#"<div id="box"><p id="inner">1</p></div><p id="tail">T</p>"#);
    canvas.handle(InputEvent::click(id("inner"))).unwrap();
    canvas.handle(InputEvent::DragStart { target: id("inner") }).unwrap();
    assert_eq!(canvas.handle(InputEvent::DropOnRoot).unwrap(), Outcome::Moved(id("inner")));
    assert_eq!(children_of(&canvas, None), vec!["box", "tail", "inner"]);
}

#[test]
fn only_the_selected_node_can_be_dragged() {
    let mut canvas = canvas_with(SIBLINGS);
    canvas.handle(InputEvent::click(id("a"))).unwrap();
    assert_eq!(
        canvas.handle(InputEvent::DragStart { target: id("b") }).unwrap(),
        Outcome::Unchanged
    );
    assert_eq!(canvas.drag().state(), DragState::Idle);
}

#[test]
fn ids_stay_unique_across_edits() {
    let mut canvas = canvas_with(r#"<p id="el_1">authored</p>"#);
    let mut created = Vec::new();
    for kind in ["card", "tabs", "paragraph", "grid-3"] {
        created.push(canvas.create_component(kind).unwrap());
    }
    canvas.delete_element(created[2]).unwrap();
    canvas
        .move_element(created[0], created[1], DropPosition::Before)
        .unwrap();
    canvas.undo().unwrap();
    canvas.create_component("accordion").unwrap();

    let ids = canvas.document().element_ids();
    let unique: HashSet<NodeId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(canvas.document().get(id("el_1")).is_some());
}

#[test]
fn undo_reverts_a_move() {
    let mut canvas = canvas_with(SIBLINGS);
    drag(&mut canvas, "c", "a", 105.0);
    canvas.handle(InputEvent::Drop { target: id("a") }).unwrap();
    assert_eq!(children_of(&canvas, None), vec!["c", "a", "b"]);

    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    canvas.handle(InputEvent::key_with("z", ctrl)).unwrap();
    assert_eq!(children_of(&canvas, None), vec!["a", "b", "c"]);
    assert_eq!(canvas.selected(), Some(id("c")));
}

#[test]
fn saved_project_reloads_into_fresh_canvas() {
    let mut canvas = canvas_with(SIBLINGS);
    canvas.create_component("accordion").unwrap();
    canvas.apply(Command::UpdateStyle {
        property: "color".into(),
        value: "teal".into(),
    })
    .unwrap();
    let json = canvas.serialize_project().to_json().unwrap();
    assert!(!json.contains("selected"));

    let mut copy = Canvas::new(CanvasConfig::default());
    assert!(copy.load_project_to_canvas(&json));
    let a = serialize_children(canvas.document(), canvas.document().root);
    let b = serialize_children(copy.document(), copy.document().root);
    assert_eq!(a.len(), b.len());
    assert!(a.iter().zip(&b).all(|(x, y)| x.same_structure(y)));
    assert_eq!(canvas.document().element_ids(), copy.document().element_ids());
    assert_eq!(clean(&canvas), clean(&copy));
}

#[test]
fn exports_carry_no_decoration() {
    let mut canvas = canvas_with(SIBLINGS);
    canvas.handle(InputEvent::click(id("b"))).unwrap();
    let page = canvas.export_static_html();
    for leaked in ["selected", "delete-btn", "draggable", "canvas-element"] {
        assert!(!page.contains(leaked), "{leaked} leaked into export");
    }
    let bundle = canvas.export_bundle();
    assert!(bundle.html.contains("styles.css"));
    assert!(!bundle.css.is_empty());
}
