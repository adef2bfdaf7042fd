//! Composite component behavior (tabs, accordion, modal, carousel).
//!
//! A behavior lives on the composite root and only ever touches nodes
//! inside that root's subtree. State is expressed with authored classes
//! (`active`, `open`) so exported pages pick up where the editor left off.

use petgraph::graph::NodeIndex;
use trellis_core::Document;

pub const ACTIVE_CLASS: &str = "active";
pub const OPEN_CLASS: &str = "open";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Tabs,
    Accordion,
    Modal,
    Carousel,
}

impl Behavior {
    pub fn for_kind(kind: &str) -> Option<Self> {
        match kind {
            "tabs" => Some(Self::Tabs),
            "accordion" => Some(Self::Accordion),
            "modal" => Some(Self::Modal),
            "carousel" => Some(Self::Carousel),
            _ => None,
        }
    }

    /// The behavior wired on `idx`: its component kind, or failing that its
    /// `data-component` attribute.
    pub fn of(doc: &Document, idx: NodeIndex) -> Option<Self> {
        let node = doc.node(idx);
        node.meta
            .component_kind
            .as_deref()
            .and_then(Self::for_kind)
            .or_else(|| node.attributes.get("data-component").and_then(Self::for_kind))
    }

    /// React to a click on `target` inside the composite at `root`.
    /// Returns whether anything changed.
    pub fn activate(self, doc: &mut Document, root: NodeIndex, target: NodeIndex) -> bool {
        match self {
            Self::Tabs => {
                let Some(button) = closest_with_class(doc, root, target, "tab-button") else {
                    return false;
                };
                let buttons = with_class(doc, root, "tab-button");
                let panels = with_class(doc, root, "tab-panel");
                let Some(index) = buttons.iter().position(|&b| b == button) else {
                    return false;
                };
                show_only(doc, &buttons, index);
                show_only(doc, &panels, index);
                true
            }
            Self::Accordion => {
                let Some(header) = closest_with_class(doc, root, target, "accordion-header") else {
                    return false;
                };
                let Some(item) = doc.parent(header).filter(|&p| p == root || doc.is_ancestor_of(root, p)) else {
                    return false;
                };
                let node = doc.node_mut(item);
                if !node.remove_class(OPEN_CLASS) {
                    node.add_class(OPEN_CLASS);
                }
                true
            }
            Self::Modal => {
                let opening = closest_with_class(doc, root, target, "modal-trigger").is_some();
                let closing = closest_with_class(doc, root, target, "modal-close").is_some();
                if !opening && !closing {
                    return false;
                }
                let Some(&dialog) = with_class(doc, root, "modal").first() else {
                    return false;
                };
                let node = doc.node_mut(dialog);
                if opening {
                    node.add_class(OPEN_CLASS);
                } else {
                    node.remove_class(OPEN_CLASS);
                }
                true
            }
            Self::Carousel => {
                let step: isize = if closest_with_class(doc, root, target, "carousel-next").is_some() {
                    1
                } else if closest_with_class(doc, root, target, "carousel-prev").is_some() {
                    -1
                } else {
                    return false;
                };
                let slides = with_class(doc, root, "carousel-slide");
                if slides.is_empty() {
                    return false;
                }
                let current = slides
                    .iter()
                    .position(|&s| doc.node(s).has_class(ACTIVE_CLASS))
                    .unwrap_or(0);
                let len = slides.len() as isize;
                let next = (current as isize + step).rem_euclid(len) as usize;
                show_only(doc, &slides, next);
                true
            }
        }
    }
}

/// Mark every composite root at or below `idx` as interactive. Returns how
/// many were wired.
pub fn wire(doc: &mut Document, idx: NodeIndex) -> usize {
    let mut targets = vec![idx];
    targets.extend(doc.descendants(idx));
    let mut wired = 0;
    for n in targets {
        if doc.node(n).is_element() && Behavior::of(doc, n).is_some() {
            doc.node_mut(n).bindings.interact = true;
            wired += 1;
        }
    }
    wired
}

/// The interactive composite containing `idx`, if any.
pub fn composite_of(doc: &Document, idx: NodeIndex) -> Option<NodeIndex> {
    std::iter::once(idx)
        .chain(doc.ancestors(idx))
        .find(|&n| doc.node(n).bindings.interact)
}

/// `target` or its nearest ancestor carrying `class`, without leaving `root`.
fn closest_with_class(doc: &Document, root: NodeIndex, target: NodeIndex, class: &str) -> Option<NodeIndex> {
    let mut current = target;
    loop {
        if doc.node(current).has_class(class) {
            return Some(current);
        }
        if current == root {
            return None;
        }
        current = doc.parent(current)?;
    }
}

/// Elements under `root` carrying `class`, in document order.
fn with_class(doc: &Document, root: NodeIndex, class: &str) -> Vec<NodeIndex> {
    doc.descendants(root)
        .into_iter()
        .filter(|&i| doc.node(i).is_element() && doc.node(i).has_class(class))
        .collect()
}

fn show_only(doc: &mut Document, nodes: &[NodeIndex], index: usize) {
    for (i, &n) in nodes.iter().enumerate() {
        let node = doc.node_mut(n);
        if i == index {
            node.add_class(ACTIVE_CLASS);
        } else {
            node.remove_class(ACTIVE_CLASS);
        }
    }
}
