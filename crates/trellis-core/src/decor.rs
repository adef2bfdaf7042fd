//! Editor decoration vocabulary.
//!
//! Every class, attribute, and child element the editor adds to live
//! content is named here, so the codec and the exporter strip exactly the
//! same set. Editor classes and attributes carry a `canvas-` prefix, so
//! authored names like `selected` or `draggable` are never touched.
//! Interaction attributes the browser needs (`draggable`,
//! `contenteditable`) are not stored on nodes; the live emitter derives
//! them from bindings and edit state.

use crate::id::NodeId;
use crate::model::{Document, LiveNode, NodeRole};
use petgraph::graph::NodeIndex;

pub const SELECTED_CLASS: &str = "canvas-selected";
pub const DRAGGING_CLASS: &str = "canvas-dragging";
pub const EDITING_CLASS: &str = "canvas-editing";
pub const RESIZABLE_CLASS: &str = "canvas-resizable";
pub const MANAGED_CLASS: &str = "canvas-element";
pub const DELETE_CONTROL_CLASS: &str = "canvas-delete-btn";

pub const EDITOR_CLASSES: &[&str] = &[
    SELECTED_CLASS,
    DRAGGING_CLASS,
    EDITING_CLASS,
    RESIZABLE_CLASS,
    MANAGED_CLASS,
    DELETE_CONTROL_CLASS,
];

/// Any attribute with this prefix belongs to the editor.
pub const EDITOR_ATTRIBUTE_PREFIX: &str = "data-canvas-";

/// Browser interaction attributes the live emitter writes on managed
/// elements. Stripped from markup only where [`MANAGED_CLASS`] marks the
/// element as the editor's.
pub const LIVE_ATTRIBUTES: &[&str] = &["draggable", "contenteditable", "spellcheck"];

/// Tags whose content can be edited in place on double-click.
pub const TEXT_EDITABLE_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "button", "a", "li", "label",
];

pub fn is_editor_class(class: &str) -> bool {
    EDITOR_CLASSES.contains(&class)
}

pub fn is_editor_attribute(name: &str) -> bool {
    name.starts_with(EDITOR_ATTRIBUTE_PREFIX)
}

pub fn is_text_editable(tag: &str) -> bool {
    TEXT_EDITABLE_TAGS.contains(&tag)
}

/// Authored classes of `classes`, in order.
pub fn authored_classes<'a>(classes: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    classes
        .into_iter()
        .filter(|c| !is_editor_class(c))
        .cloned()
        .collect()
}

/// A fresh delete control element.
pub fn delete_control() -> LiveNode {
    let mut node = LiveNode::element(NodeId::unassigned(), "button");
    node.role = NodeRole::DeleteControl;
    node.classes.push(DELETE_CONTROL_CLASS.to_string());
    node.attributes.set("type", "button");
    node.attributes.set("title", "Delete element");
    node.text = "×".to_string();
    node
}

/// Attach select/edit/drag affordances and a delete control to `idx`.
///
/// Root, delete controls, and unmanaged nodes are left untouched. Returns
/// whether anything was attached. Calling it twice is a no-op the second
/// time.
pub fn attach_affordances(doc: &mut Document, idx: NodeIndex) -> bool {
    let node = doc.node(idx);
    if node.role != NodeRole::Element || !node.meta.is_canvas_managed {
        return false;
    }
    let had_control = doc.delete_control_of(idx).is_some();
    let node = doc.node_mut(idx);
    let already = node.bindings.select && node.bindings.drag && had_control;
    node.bindings.select = true;
    node.bindings.drag = true;
    node.bindings.edit = is_text_editable(&node.tag);
    node.add_class(MANAGED_CLASS);
    if !had_control {
        doc.add_child(idx, delete_control());
    }
    !already
}

/// Inverse of [`attach_affordances`] for one node.
pub fn detach_affordances(doc: &mut Document, idx: NodeIndex) {
    if let Some(control) = doc.delete_control_of(idx) {
        doc.remove_subtree(control);
    }
    let node = doc.node_mut(idx);
    node.bindings = Default::default();
    node.classes.retain(|c| !is_editor_class(c));
    node.attributes.retain(|k, _| !is_editor_attribute(k));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_vocabulary() {
        assert!(is_editor_class("canvas-selected"));
        assert!(!is_editor_class("selected"));
        assert!(!is_editor_class("card"));
        assert!(!is_editor_attribute("draggable"));
        assert!(!is_editor_attribute("contenteditable"));
        assert!(is_editor_attribute("data-canvas-kind"));
        assert!(!is_editor_attribute("data-component"));
        assert!(is_text_editable("li"));
        assert!(!is_text_editable("div"));
    }

    #[test]
    fn attach_is_idempotent() {
        let mut doc = Document::new();
        let p = doc.add_child(doc.root, LiveNode::element(NodeId::intern("dec_p"), "p"));
        assert!(attach_affordances(&mut doc, p));
        assert!(!attach_affordances(&mut doc, p));
        assert_eq!(doc.children(p).len(), 1);
        let node = doc.node(p);
        assert!(node.bindings.select && node.bindings.drag && node.bindings.edit);
        assert!(node.has_class(MANAGED_CLASS));
        assert!(node.attributes.is_empty());
    }

    #[test]
    fn unmanaged_nodes_get_nothing() {
        let mut doc = Document::new();
        let mut wrapper = LiveNode::element(NodeId::intern("dec_wrap"), "div");
        wrapper.meta.is_canvas_managed = false;
        let w = doc.add_child(doc.root, wrapper);
        assert!(!attach_affordances(&mut doc, w));
        assert!(doc.delete_control_of(w).is_none());
        assert!(!doc.node(w).bindings.any());
    }

    #[test]
    fn detach_strips_decoration() {
        let mut doc = Document::new();
        let p = doc.add_child(doc.root, LiveNode::element(NodeId::intern("dec_strip"), "p"));
        doc.node_mut(p).add_class("lead");
        doc.node_mut(p).add_class("selected");
        doc.node_mut(p).attributes.set("draggable", "false");
        attach_affordances(&mut doc, p);
        doc.node_mut(p).add_class(SELECTED_CLASS);
        detach_affordances(&mut doc, p);
        let node = doc.node(p);
        assert_eq!(node.classes.as_slice(), &["lead".to_string(), "selected".to_string()]);
        assert_eq!(node.attributes.get("draggable"), Some("false"));
        assert!(doc.children(p).is_empty());
    }
}
