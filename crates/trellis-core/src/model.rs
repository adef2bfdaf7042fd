//! Element tree data model.
//!
//! Two shapes of the same content live here:
//!
//! - [`ElementNode`] is the canonical, serializable form. It owns its
//!   children and never carries editor decoration.
//! - [`Document`] is the live, editable tree. Nodes sit in a
//!   `StableDiGraph` with parent→child edges, and each parent keeps an
//!   explicit child order that is the single source of document order.
//!   Live nodes carry editor decoration (selection class, drag flag,
//!   delete control) next to authored content.

use crate::decl::DeclMap;
use crate::id::NodeId;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// The id of the canvas root element.
pub const ROOT_ID: &str = "canvas";

// ─── Canonical nodes ─────────────────────────────────────────────────────

/// Editor bookkeeping persisted alongside each element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    /// Authored classes, excluding editor classes.
    #[serde(default)]
    pub original_classes: Vec<String>,
    /// Palette kind this element was created from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_kind: Option<String>,
    /// Unmanaged nodes never receive delete or drag affordances.
    #[serde(default = "managed_by_default")]
    pub is_canvas_managed: bool,
}

fn managed_by_default() -> bool {
    true
}

impl Default for NodeMeta {
    fn default() -> Self {
        Self {
            original_classes: Vec::new(),
            component_kind: None,
            is_canvas_managed: true,
        }
    }
}

/// A run of text that sits between element children of mixed content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// Number of element children that precede the run.
    pub after: usize,
    pub text: String,
}

/// Canonical representation of one markup element and its subtree.
///
/// Identity is by `id`; use [`ElementNode::same_structure`] to compare
/// content while ignoring ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub id: NodeId,
    pub tag_name: String,
    /// Own text only; descendant text lives in the children.
    #[serde(default)]
    pub text_content: String,
    #[serde(default)]
    pub attributes: DeclMap,
    /// Authoritative inline style.
    #[serde(default)]
    pub inline_style: DeclMap,
    /// Informational snapshot of an allow-list of properties. Lossy.
    #[serde(default, rename = "computedStyle")]
    pub computed: DeclMap,
    #[serde(default)]
    pub children: Vec<ElementNode>,
    /// Placement of own text among the children, for mixed content. When
    /// present, the runs concatenate to `textContent`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text_runs: Vec<TextRun>,
    #[serde(default)]
    pub metadata: NodeMeta,
}

impl ElementNode {
    /// A template node with an unassigned id.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: NodeId::unassigned(),
            tag_name: tag.into(),
            text_content: String::new(),
            attributes: DeclMap::new(),
            inline_style: DeclMap::new(),
            computed: DeclMap::new(),
            children: Vec::new(),
            text_runs: Vec::new(),
            metadata: NodeMeta::default(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = NodeId::intern(id);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = text.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inline_style.set(name, value);
        self
    }

    /// Add an authored class, keeping `class` and `originalClasses` in step.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.metadata.original_classes.contains(&class) {
            self.metadata.original_classes.push(class);
        }
        let joined = self.metadata.original_classes.join(" ");
        self.attributes.set("class", joined);
        self
    }

    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ElementNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.metadata.component_kind = Some(kind.into());
        self
    }

    pub fn unmanaged(mut self) -> Self {
        self.metadata.is_canvas_managed = false;
        self
    }

    /// Number of elements in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ElementNode::count).sum::<usize>()
    }

    /// Structural equality over tag, attributes, inline style, own text,
    /// and child order. Ids and the computed snapshot are ignored, and so
    /// is an authored `id` attribute.
    pub fn same_structure(&self, other: &ElementNode) -> bool {
        let attrs = |n: &ElementNode| {
            n.attributes
                .iter()
                .filter(|(k, _)| *k != "id")
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>()
        };
        self.tag_name == other.tag_name
            && self.text_content == other.text_content
            && self.text_runs == other.text_runs
            && attrs(self) == attrs(other)
            && self.inline_style == other.inline_style
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_structure(b))
    }
}

// ─── Live nodes ──────────────────────────────────────────────────────────

/// What a live node is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// The canvas root. Never serialized, moved, or deleted.
    Root,
    /// Authored content.
    Element,
    /// The delete control affordance appended to managed elements.
    DeleteControl,
    /// A run of text between element children. Not indexed by id.
    Text,
}

/// Interaction handlers attached to a live element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bindings {
    pub select: bool,
    pub edit: bool,
    pub drag: bool,
    /// Composite behavior (tabs, accordion, modal, carousel) is wired.
    pub interact: bool,
}

impl Bindings {
    pub fn any(&self) -> bool {
        self.select || self.edit || self.drag || self.interact
    }
}

/// Rendered bounding box as measured by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Zero rendered area, as for an invisible wrapper.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `py` falls in the upper half of the box.
    pub fn in_upper_half(&self, py: f32) -> bool {
        py < self.y + self.height / 2.0
    }
}

/// A node of the live document.
#[derive(Debug, Clone)]
pub struct LiveNode {
    pub id: NodeId,
    pub role: NodeRole,
    pub tag: String,
    /// Attributes as present on the element, editor attributes included.
    /// `id`, `class`, and `style` are kept in dedicated fields instead.
    pub attributes: DeclMap,
    /// Classes as present on the element, editor classes included.
    pub classes: SmallVec<[String; 4]>,
    pub style: DeclMap,
    /// Own text.
    pub text: String,
    pub meta: NodeMeta,
    pub bindings: Bindings,
    /// The id was authored (came from an `id` attribute) rather than generated.
    pub explicit_id: bool,
    pub bounds: Option<Bounds>,
}

impl LiveNode {
    pub fn element(id: NodeId, tag: impl Into<String>) -> Self {
        Self {
            id,
            role: NodeRole::Element,
            tag: tag.into(),
            attributes: DeclMap::new(),
            classes: SmallVec::new(),
            style: DeclMap::new(),
            text: String::new(),
            meta: NodeMeta::default(),
            bindings: Bindings::default(),
            explicit_id: false,
            bounds: None,
        }
    }

    /// A text run holding `text`.
    pub fn text_run(text: impl Into<String>) -> Self {
        let mut node = Self::element(NodeId::unassigned(), "#text");
        node.role = NodeRole::Text;
        node.text = text.into();
        node.meta.is_canvas_managed = false;
        node
    }

    pub fn is_element(&self) -> bool {
        self.role == NodeRole::Element
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        before != self.classes.len()
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// The live document: one root, acyclic, ids unique.
#[derive(Debug, Clone)]
pub struct Document {
    pub graph: StableDiGraph<LiveNode, ()>,
    pub root: NodeIndex,
    /// Index from element id → NodeIndex. Delete controls and text runs
    /// are not indexed.
    id_index: HashMap<NodeId, NodeIndex>,
    /// Ordered children per parent.
    child_order: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let mut root_node = LiveNode::element(NodeId::intern(ROOT_ID), "div");
        root_node.role = NodeRole::Root;
        root_node.explicit_id = true;
        root_node.meta.is_canvas_managed = false;
        let root = graph.add_node(root_node);

        let mut id_index = HashMap::new();
        id_index.insert(NodeId::intern(ROOT_ID), root);

        Self {
            graph,
            root,
            id_index,
            child_order: HashMap::new(),
        }
    }

    /// Append `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeIndex, node: LiveNode) -> NodeIndex {
        self.insert_child(parent, usize::MAX, node)
    }

    /// Insert `node` among `parent`'s children at `index` (clamped).
    pub fn insert_child(&mut self, parent: NodeIndex, index: usize, node: LiveNode) -> NodeIndex {
        let id = node.id;
        let indexed = matches!(node.role, NodeRole::Element | NodeRole::Root);
        debug_assert!(
            !indexed || !self.id_index.contains_key(&id),
            "duplicate node id {id}"
        );
        let idx = self.graph.add_node(node);
        self.attach(idx, parent, index);
        if indexed {
            self.id_index.insert(id, idx);
        }
        idx
    }

    fn attach(&mut self, child: NodeIndex, parent: NodeIndex, index: usize) {
        self.graph.add_edge(parent, child, ());
        let order = self.child_order.entry(parent).or_default();
        let at = index.min(order.len());
        order.insert(at, child);
    }

    /// Unlink `child` from its parent. Returns the former parent.
    pub fn detach(&mut self, child: NodeIndex) -> Option<NodeIndex> {
        let parent = self.parent(child)?;
        if let Some(edge) = self.graph.find_edge(parent, child) {
            self.graph.remove_edge(edge);
        }
        if let Some(order) = self.child_order.get_mut(&parent) {
            order.retain(|&c| c != child);
        }
        Some(parent)
    }

    /// Move `child` under `new_parent` at `index`. No cycle check; callers
    /// validate with [`Document::is_ancestor_of`] first.
    pub fn move_node(&mut self, child: NodeIndex, new_parent: NodeIndex, index: usize) {
        self.detach(child);
        self.attach(child, new_parent, index);
    }

    /// Remove `idx` and every descendant. Returns the number of element
    /// nodes removed.
    pub fn remove_subtree(&mut self, idx: NodeIndex) -> usize {
        if idx == self.root {
            return 0;
        }
        let mut doomed = self.descendants(idx);
        doomed.push(idx);
        self.detach(idx);

        let mut removed = 0;
        for n in doomed {
            self.child_order.remove(&n);
            if let Some(node) = self.graph.remove_node(n)
                && node.role == NodeRole::Element
            {
                self.id_index.remove(&node.id);
                removed += 1;
            }
        }
        removed
    }

    /// Remove all content below the root.
    pub fn clear(&mut self) {
        for child in self.children(self.root).to_vec() {
            self.remove_subtree(child);
        }
    }

    /// All children of `idx` in document order, affordances included.
    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.child_order
            .get(&idx)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Element children of `idx` in document order.
    pub fn element_children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.children(idx)
            .iter()
            .copied()
            .filter(|&c| self.graph[c].is_element())
            .collect()
    }

    /// The delete control attached to `idx`, if any.
    pub fn delete_control_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.children(idx)
            .iter()
            .copied()
            .find(|&c| self.graph[c].role == NodeRole::DeleteControl)
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
    }

    /// Position of `idx` among its parent's element children.
    pub fn element_position(&self, idx: NodeIndex) -> Option<usize> {
        let parent = self.parent(idx)?;
        self.element_children(parent).iter().position(|&c| c == idx)
    }

    /// Position of `idx` among all of its parent's children.
    pub fn position(&self, idx: NodeIndex) -> Option<usize> {
        let parent = self.parent(idx)?;
        self.children(parent).iter().position(|&c| c == idx)
    }

    pub fn node(&self, idx: NodeIndex) -> &LiveNode {
        &self.graph[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut LiveNode {
        &mut self.graph[idx]
    }

    pub fn get(&self, id: NodeId) -> Option<&LiveNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut LiveNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn contains_id(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Ids of every element except the root.
    pub fn element_ids(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&i| self.graph[i].is_element())
            .map(|i| self.graph[i].id)
            .collect()
    }

    /// Number of elements below the root.
    pub fn element_count(&self) -> usize {
        self.id_index.len() - 1
    }

    /// Whether `ancestor` sits on `descendant`'s parent chain.
    /// A node is not its own ancestor.
    pub fn is_ancestor_of(&self, ancestor: NodeIndex, descendant: NodeIndex) -> bool {
        let mut current = descendant;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Parent chain of `idx`, nearest first, ending at the root.
    pub fn ancestors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut chain = Vec::new();
        let mut current = idx;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Every node below `idx` in pre-order, affordances included.
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIndex> = self.children(idx).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Give `idx` a new authored id. Fails when the id is empty, already
    /// taken, or `idx` is not an element.
    pub fn set_id(&mut self, idx: NodeIndex, id: NodeId) -> bool {
        if id.is_unassigned() || self.id_index.contains_key(&id) || !self.graph[idx].is_element() {
            return false;
        }
        let old = self.graph[idx].id;
        self.id_index.remove(&old);
        self.id_index.insert(id, idx);
        let node = &mut self.graph[idx];
        node.id = id;
        node.explicit_id = true;
        true
    }

    /// Whether `idx` holds mixed content as separate text runs.
    pub fn has_text_runs(&self, idx: NodeIndex) -> bool {
        self.children(idx).iter().any(|&c| self.graph[c].role == NodeRole::Text)
    }

    /// The text runs below `idx`, each placed after the element children
    /// that precede it.
    pub fn text_runs(&self, idx: NodeIndex) -> Vec<TextRun> {
        let mut runs = Vec::new();
        let mut after = 0;
        for &c in self.children(idx) {
            let node = &self.graph[c];
            match node.role {
                NodeRole::Element => after += 1,
                NodeRole::Text => runs.push(TextRun {
                    after,
                    text: node.text.clone(),
                }),
                _ => {}
            }
        }
        runs
    }

    /// Insert text runs among the element children of `parent`. Runs past
    /// the last element go before any delete control.
    pub fn place_text_runs(&mut self, parent: NodeIndex, runs: &[TextRun]) {
        for run in runs {
            let elements = self.element_children(parent);
            let at = match elements.get(run.after) {
                Some(&next) => self.position(next),
                None => self.delete_control_of(parent).and_then(|d| self.position(d)),
            };
            self.insert_child(parent, at.unwrap_or(usize::MAX), LiveNode::text_run(run.text.clone()));
        }
    }

    /// Replace the own text of `idx`. Text runs are merged into a single
    /// leading text when the text actually changes.
    pub fn set_text(&mut self, idx: NodeIndex, text: &str) -> bool {
        if self.graph[idx].text == text {
            return false;
        }
        let runs: Vec<NodeIndex> = self
            .children(idx)
            .iter()
            .copied()
            .filter(|&c| self.graph[c].role == NodeRole::Text)
            .collect();
        for run in runs {
            self.remove_subtree(run);
        }
        self.graph[idx].text = text.to_string();
        true
    }

    /// Rewrite the tag of `idx` in place. Children, id, and attributes stay.
    pub fn replace_tag(&mut self, idx: NodeIndex, tag: &str) {
        let node = &mut self.graph[idx];
        log::debug!("replace_tag {} <{}> → <{tag}>", node.id, node.tag);
        node.tag = tag.to_string();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn el(id: &str, tag: &str) -> LiveNode {
        LiveNode::element(NodeId::intern(id), tag)
    }

    #[test]
    fn document_basics() {
        let mut doc = Document::new();
        let idx = doc.add_child(doc.root, el("box1", "div"));

        assert!(doc.get(NodeId::intern("box1")).is_some());
        assert_eq!(doc.children(doc.root), &[idx]);
        assert_eq!(doc.parent(idx), Some(doc.root));
        assert_eq!(doc.element_count(), 1);
    }

    #[test]
    fn insert_child_respects_index() {
        let mut doc = Document::new();
        let a = doc.add_child(doc.root, el("ins_a", "p"));
        let c = doc.add_child(doc.root, el("ins_c", "p"));
        let b = doc.insert_child(doc.root, 1, el("ins_b", "p"));
        assert_eq!(doc.children(doc.root), &[a, b, c]);
        assert_eq!(doc.element_position(b), Some(1));
    }

    #[test]
    fn move_node_reorders() {
        let mut doc = Document::new();
        let a = doc.add_child(doc.root, el("mv_a", "p"));
        let b = doc.add_child(doc.root, el("mv_b", "p"));
        let inner = doc.add_child(b, el("mv_inner", "span"));

        doc.move_node(a, b, 0);
        assert_eq!(doc.children(doc.root), &[b]);
        assert_eq!(doc.children(b), &[a, inner]);
        assert_eq!(doc.parent(a), Some(b));
    }

    #[test]
    fn remove_subtree_cascades() {
        let mut doc = Document::new();
        let outer = doc.add_child(doc.root, el("rm_outer", "section"));
        let mid = doc.add_child(outer, el("rm_mid", "div"));
        doc.add_child(mid, el("rm_leaf", "p"));

        let removed = doc.remove_subtree(outer);
        assert_eq!(removed, 3);
        assert!(doc.get(NodeId::intern("rm_leaf")).is_none());
        assert!(doc.children(doc.root).is_empty());
        assert_eq!(doc.element_count(), 0);
    }

    #[test]
    fn root_is_not_removable() {
        let mut doc = Document::new();
        let root = doc.root;
        assert_eq!(doc.remove_subtree(root), 0);
        assert!(doc.get(NodeId::intern(ROOT_ID)).is_some());
    }

    #[test]
    fn is_ancestor_of_walks_chain() {
        let mut doc = Document::new();
        let group = doc.add_child(doc.root, el("anc_grp", "div"));
        let leaf = doc.add_child(group, el("anc_leaf", "p"));
        let other = doc.add_child(doc.root, el("anc_other", "p"));

        assert!(doc.is_ancestor_of(group, leaf));
        assert!(doc.is_ancestor_of(doc.root, leaf));
        assert!(!doc.is_ancestor_of(leaf, group));
        assert!(!doc.is_ancestor_of(group, group));
        assert!(!doc.is_ancestor_of(other, leaf));
        assert_eq!(doc.ancestors(leaf), vec![group, doc.root]);
    }

    #[test]
    fn descendants_are_preorder() {
        let mut doc = Document::new();
        let a = doc.add_child(doc.root, el("pre_a", "div"));
        let a1 = doc.add_child(a, el("pre_a1", "p"));
        let a2 = doc.add_child(a, el("pre_a2", "p"));
        let b = doc.add_child(doc.root, el("pre_b", "div"));
        assert_eq!(doc.descendants(doc.root), vec![a, a1, a2, b]);
    }

    #[test]
    fn replace_tag_keeps_children() {
        let mut doc = Document::new();
        let h = doc.add_child(doc.root, el("rt_h", "h4"));
        let span = doc.add_child(h, el("rt_span", "span"));
        doc.replace_tag(h, "h2");
        assert_eq!(doc.node(h).tag, "h2");
        assert_eq!(doc.children(h), &[span]);
        assert_eq!(doc.index_of(NodeId::intern("rt_h")), Some(h));
    }

    #[test]
    fn set_id_reindexes() {
        let mut doc = Document::new();
        let a = doc.add_child(doc.root, el("sid_a", "p"));
        doc.add_child(doc.root, el("sid_b", "p"));
        assert!(!doc.set_id(a, NodeId::intern("sid_b")));
        assert!(doc.set_id(a, NodeId::intern("sid_new")));
        assert!(doc.get(NodeId::intern("sid_a")).is_none());
        assert_eq!(doc.index_of(NodeId::intern("sid_new")), Some(a));
        assert!(doc.node(a).explicit_id);
    }

    #[test]
    fn same_structure_ignores_ids() {
        let a = ElementNode::new("ul")
            .with_id("x1")
            .with_child(ElementNode::new("li").with_text("one"));
        let b = ElementNode::new("ul")
            .with_id("y9")
            .with_child(ElementNode::new("li").with_text("one"));
        let c = ElementNode::new("ul").with_child(ElementNode::new("li").with_text("two"));
        assert!(a.same_structure(&b));
        assert!(!a.same_structure(&c));
    }

    #[test]
    fn bounds_halves() {
        let b = Bounds::new(0.0, 100.0, 50.0, 40.0);
        assert!(b.in_upper_half(110.0));
        assert!(!b.in_upper_half(125.0));
        assert!(Bounds::new(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn text_runs_keep_their_place() {
        let mut doc = Document::new();
        let p = doc.add_child(doc.root, el("tr_p", "p"));
        let b = doc.add_child(p, el("tr_b", "b"));
        doc.node_mut(p).text = "Hello !".into();
        let runs = vec![
            TextRun {
                after: 0,
                text: "Hello ".into(),
            },
            TextRun {
                after: 1,
                text: "!".into(),
            },
        ];
        doc.place_text_runs(p, &runs);

        assert_eq!(doc.children(p).len(), 3);
        assert_eq!(doc.children(p)[1], b);
        assert_eq!(doc.element_children(p), vec![b]);
        assert_eq!(doc.text_runs(p), runs);
        assert_eq!(doc.element_count(), 2);

        assert!(!doc.set_text(p, "Hello !"));
        assert!(doc.has_text_runs(p));
        assert!(doc.set_text(p, "Bye"));
        assert!(!doc.has_text_runs(p));
        assert_eq!(doc.children(p), &[b]);
    }
}
