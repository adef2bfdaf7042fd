//! Tree codec: live document ⇄ canonical [`ElementNode`] trees.
//!
//! Serialization walks the live tree depth-first, skipping delete controls
//! and filtering editor classes and attributes. Deserialization rebuilds
//! structure first and only then attaches affordances, so decoding what
//! was just encoded and encoding it again yields the same tree.

use crate::decl::DeclMap;
use crate::decor;
use crate::error::CodecError;
use crate::id::{IdGen, NodeId};
use crate::model::{Document, ElementNode, LiveNode, NodeMeta, NodeRole};
use crate::style::{computed_snapshot, parse_style, validate_declaration};
use petgraph::graph::NodeIndex;

/// Tag used in place of one that fails validation.
pub const FALLBACK_TAG: &str = "div";

// ─── Serialize ───────────────────────────────────────────────────────────

/// Encode the element at `idx` and its element descendants.
#[must_use]
pub fn serialize(doc: &Document, idx: NodeIndex) -> ElementNode {
    let node = doc.node(idx);
    let original_classes = decor::authored_classes(&node.classes);

    let mut attributes = DeclMap::new();
    if node.explicit_id {
        attributes.set("id", node.id.as_str());
    }
    if !original_classes.is_empty() {
        attributes.set("class", original_classes.join(" "));
    }
    for (name, value) in node.attributes.iter() {
        if !decor::is_editor_attribute(name) {
            attributes.set(name, value);
        }
    }

    ElementNode {
        id: node.id,
        tag_name: node.tag.clone(),
        text_content: node.text.clone(),
        attributes,
        inline_style: node.style.clone(),
        computed: computed_snapshot(&node.tag, &node.style),
        children: serialize_children(doc, idx),
        text_runs: doc.text_runs(idx),
        metadata: NodeMeta {
            original_classes,
            component_kind: node.meta.component_kind.clone(),
            is_canvas_managed: node.meta.is_canvas_managed,
        },
    }
}

/// Encode the element children of `parent`, in document order.
#[must_use]
pub fn serialize_children(doc: &Document, parent: NodeIndex) -> Vec<ElementNode> {
    doc.children(parent)
        .iter()
        .filter(|&&c| doc.node(c).role == NodeRole::Element)
        .map(|&c| serialize(doc, c))
        .collect()
}

// ─── Deserialize ─────────────────────────────────────────────────────────

/// How ids recorded in canonical nodes are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Keep recorded ids when they are free in the target document.
    Preserve,
    /// Always generate fresh ids. An authored `id` attribute is still
    /// honored when free.
    Fresh,
}

/// Rebuilds live nodes from canonical ones, collecting recoverable errors.
pub struct Decoder<'a> {
    ids: &'a mut IdGen,
    policy: IdPolicy,
    affordances: bool,
    errors: Vec<CodecError>,
}

impl<'a> Decoder<'a> {
    pub fn new(ids: &'a mut IdGen, policy: IdPolicy) -> Self {
        Self {
            ids,
            policy,
            affordances: true,
            errors: Vec::new(),
        }
    }

    /// Skip affordance attachment. Used for snapshot restores that
    /// retrofit in one pass afterwards.
    pub fn without_affordances(mut self) -> Self {
        self.affordances = false;
        self
    }

    /// Decode `node` as the last child of `parent`.
    ///
    /// A malformed tag on `node` itself fails with
    /// [`CodecError::Structural`] and leaves the document unchanged. Below
    /// it, malformed tags are replaced by [`FALLBACK_TAG`] and recorded.
    pub fn decode(
        &mut self,
        doc: &mut Document,
        parent: NodeIndex,
        node: &ElementNode,
    ) -> Result<NodeIndex, CodecError> {
        let Some(tag) = normalize_tag(&node.tag_name) else {
            return Err(CodecError::Structural {
                tag: node.tag_name.clone(),
            });
        };
        let idx = self.build(doc, parent, node, tag);
        if self.affordances {
            attach_subtree(doc, idx);
        }
        Ok(idx)
    }

    /// Decode a list of top-level nodes, substituting [`FALLBACK_TAG`] for
    /// any that fail structurally.
    pub fn decode_all(
        &mut self,
        doc: &mut Document,
        parent: NodeIndex,
        nodes: &[ElementNode],
    ) -> Vec<NodeIndex> {
        let mut mounted = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.decode(doc, parent, node) {
                Ok(idx) => mounted.push(idx),
                Err(e) => {
                    log::warn!("substituting <{FALLBACK_TAG}>: {e}");
                    self.errors.push(e);
                    let idx = self.build(doc, parent, node, FALLBACK_TAG.to_string());
                    if self.affordances {
                        attach_subtree(doc, idx);
                    }
                    mounted.push(idx);
                }
            }
        }
        mounted
    }

    /// Recoverable errors seen so far.
    pub fn errors(&self) -> &[CodecError] {
        &self.errors
    }

    pub fn finish(self) -> Vec<CodecError> {
        self.errors
    }

    fn build(
        &mut self,
        doc: &mut Document,
        parent: NodeIndex,
        node: &ElementNode,
        tag: String,
    ) -> NodeIndex {
        let (id, explicit) = self.pick_id(doc, node);
        let mut live = LiveNode::element(id, tag);
        live.explicit_id = explicit;

        for (name, value) in node.attributes.iter() {
            match name {
                "id" => {}
                "class" => {
                    for class in value.split_whitespace() {
                        if !decor::is_editor_class(class) {
                            live.add_class(class);
                        }
                    }
                }
                // A stray style attribute is folded in; inlineStyle wins.
                "style" => {
                    let (decls, errs) = parse_style(value);
                    for (k, v) in decls.iter() {
                        live.style.set(k, v);
                    }
                    self.errors.extend(errs.into_iter().map(CodecError::from));
                }
                _ if decor::is_editor_attribute(name) => {}
                _ => {
                    live.attributes.set(name, value);
                }
            }
        }
        if !node.attributes.contains("class") {
            for class in &node.metadata.original_classes {
                if !decor::is_editor_class(class) {
                    live.add_class(class);
                }
            }
        }

        for (name, value) in node.inline_style.iter() {
            match validate_declaration(name, value) {
                Ok(()) => {
                    live.style.set(name.to_ascii_lowercase(), value.trim());
                }
                Err(e) => {
                    log::debug!("{id}: {e}");
                    self.errors.push(CodecError::from(e));
                }
            }
        }

        live.text = node.text_content.clone();
        live.meta = NodeMeta {
            original_classes: decor::authored_classes(&live.classes),
            component_kind: node.metadata.component_kind.clone(),
            is_canvas_managed: node.metadata.is_canvas_managed,
        };

        let idx = doc.add_child(parent, live);
        for child in &node.children {
            let tag = match normalize_tag(&child.tag_name) {
                Some(tag) => tag,
                None => {
                    log::warn!("{id}: child <{}> replaced by <{FALLBACK_TAG}>", child.tag_name);
                    self.errors.push(CodecError::Structural {
                        tag: child.tag_name.clone(),
                    });
                    FALLBACK_TAG.to_string()
                }
            };
            self.build(doc, idx, child, tag);
        }
        doc.place_text_runs(idx, &node.text_runs);
        idx
    }

    fn pick_id(&mut self, doc: &Document, node: &ElementNode) -> (NodeId, bool) {
        let free = |id: NodeId| !id.is_unassigned() && !doc.contains_id(id);
        if let Some(authored) = node.attributes.get("id").map(NodeId::intern)
            && free(authored)
        {
            return (authored, true);
        }
        if self.policy == IdPolicy::Preserve && free(node.id) {
            return (node.id, false);
        }
        (self.ids.next_id(|c| doc.contains_id(c)), false)
    }
}

/// Decode one node under `parent`, preserving recorded ids.
pub fn deserialize(
    doc: &mut Document,
    parent: NodeIndex,
    node: &ElementNode,
    ids: &mut IdGen,
) -> Result<(NodeIndex, Vec<CodecError>), CodecError> {
    let mut decoder = Decoder::new(ids, IdPolicy::Preserve);
    let idx = decoder.decode(doc, parent, node)?;
    Ok((idx, decoder.finish()))
}

/// Attach affordances to `idx` and every element below it.
pub fn attach_subtree(doc: &mut Document, idx: NodeIndex) -> usize {
    let mut targets = vec![idx];
    targets.extend(doc.descendants(idx));
    targets
        .into_iter()
        .filter(|&n| decor::attach_affordances(doc, n))
        .count()
}

/// A lowercase tag name, or `None` when it is not a valid element name.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    let mut chars = tag.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    Some(tag.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{MarkupParser, mount_markup};
    use crate::parser::HtmlParser;
    use pretty_assertions::assert_eq;

    fn card() -> ElementNode {
        ElementNode::new("div")
            .with_id("cd_card")
            .with_class("card")
            .with_style("padding", "16px")
            .with_child(ElementNode::new("h3").with_id("cd_title").with_text("Title"))
            .with_child(
                ElementNode::new("p")
                    .with_id("cd_body")
                    .with_text("Body")
                    .with_attr("title", "tip"),
            )
    }

    #[test]
    fn decode_attaches_affordances_after_structure() {
        let mut doc = Document::new();
        let mut ids = IdGen::new("cd");
        let root = doc.root;
        let (idx, errors) = deserialize(&mut doc, root, &card(), &mut ids).unwrap();
        assert!(errors.is_empty());

        assert_eq!(doc.node(idx).id.as_str(), "cd_card");
        assert_eq!(doc.element_children(idx).len(), 2);
        assert!(doc.delete_control_of(idx).is_some());
        let title = doc.element_children(idx)[0];
        assert!(doc.node(title).bindings.edit);
        assert!(!doc.node(idx).bindings.edit);
    }

    #[test]
    fn serialize_skips_decoration() {
        let mut doc = Document::new();
        let mut ids = IdGen::new("sd");
        let root = doc.root;
        let (idx, _) = deserialize(&mut doc, root, &card().with_id("sd_card"), &mut ids).unwrap();
        doc.node_mut(idx).add_class(decor::SELECTED_CLASS);

        let out = serialize(&doc, idx);
        assert_eq!(out.attributes.get("class"), Some("card"));
        assert!(out.attributes.get("draggable").is_none());
        assert_eq!(out.children.len(), 2);
        assert_eq!(out.metadata.original_classes, vec!["card"]);
        assert_eq!(out.computed.get("display"), Some("block"));
        assert!(out.same_structure(&card()));
    }

    #[test]
    fn round_trip_is_stable() {
        let mut doc = Document::new();
        let mut ids = IdGen::new("rt");
        let root = doc.root;
        let (first, _) = deserialize(&mut doc, root, &card().with_id("rt_card"), &mut ids).unwrap();
        let once = serialize(&doc, first);

        let mut other = Document::new();
        let mut fresh = Decoder::new(&mut ids, IdPolicy::Fresh);
        let root = other.root;
        let second = fresh.decode(&mut other, root, &once).unwrap();
        let twice = serialize(&other, second);

        assert!(once.same_structure(&twice));
        assert_ne!(once.children[0].id, twice.children[0].id);
    }

    #[test]
    fn bad_top_level_tag_is_structural() {
        let mut doc = Document::new();
        let mut ids = IdGen::new("bt");
        let root = doc.root;
        let err = deserialize(&mut doc, root, &ElementNode::new("9oops"), &mut ids).unwrap_err();
        assert_eq!(err, CodecError::Structural { tag: "9oops".into() });
        assert_eq!(doc.element_count(), 0);
    }

    #[test]
    fn bad_child_tag_is_substituted() {
        let node = ElementNode::new("section")
            .with_child(ElementNode::new("<bad>"))
            .with_child(ElementNode::new("p").with_text("kept"));
        let mut doc = Document::new();
        let mut ids = IdGen::new("bc");
        let root = doc.root;
        let (idx, errors) = deserialize(&mut doc, root, &node, &mut ids).unwrap();

        assert_eq!(errors, vec![CodecError::Structural { tag: "<bad>".into() }]);
        let kids = doc.element_children(idx);
        assert_eq!(doc.node(kids[0]).tag, "div");
        assert_eq!(doc.node(kids[1]).text, "kept");
    }

    #[test]
    fn decode_all_recovers_top_level() {
        let nodes = vec![ElementNode::new(""), ElementNode::new("p")];
        let mut doc = Document::new();
        let mut ids = IdGen::new("da");
        let mut decoder = Decoder::new(&mut ids, IdPolicy::Preserve);
        let root = doc.root;
        let mounted = decoder.decode_all(&mut doc, root, &nodes);
        assert_eq!(mounted.len(), 2);
        assert_eq!(decoder.errors().len(), 1);
        assert_eq!(doc.node(mounted[0]).tag, "div");
    }

    #[test]
    fn malformed_style_declaration_is_skipped() {
        let node = ElementNode::new("p")
            .with_style("color", "red")
            .with_style("bad name", "x")
            .with_style("margin", "");
        let mut doc = Document::new();
        let mut ids = IdGen::new("ms");
        let root = doc.root;
        let (idx, errors) = deserialize(&mut doc, root, &node, &mut ids).unwrap();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], CodecError::StyleParse(_)));
        assert_eq!(doc.node(idx).style.iter().collect::<Vec<_>>(), vec![("color", "red")]);
    }

    #[test]
    fn ids_stay_unique_on_collision() {
        let mut doc = Document::new();
        let mut ids = IdGen::new("col");
        let node = ElementNode::new("p").with_id("col_taken");
        let root = doc.root;
        let (a, _) = deserialize(&mut doc, root, &node, &mut ids).unwrap();
        let root = doc.root;
        let (b, _) = deserialize(&mut doc, root, &node, &mut ids).unwrap();
        assert_eq!(doc.node(a).id.as_str(), "col_taken");
        assert_ne!(doc.node(a).id, doc.node(b).id);
    }

    #[test]
    fn unmanaged_survives_and_gets_no_affordances() {
        let node = ElementNode::new("div").unmanaged().with_child(ElementNode::new("p"));
        let mut doc = Document::new();
        let mut ids = IdGen::new("um");
        let root = doc.root;
        let (idx, _) = deserialize(&mut doc, root, &node, &mut ids).unwrap();
        assert!(doc.delete_control_of(idx).is_none());
        let p = doc.element_children(idx)[0];
        assert!(doc.delete_control_of(p).is_some());
        assert!(!serialize(&doc, idx).metadata.is_canvas_managed);
    }

    #[test]
    fn mounted_markup_serializes_authored_content_only() {
        let nodes = HtmlParser
            .parse(r#"<nav class="navbar"><a href="/">Home</a></nav>"#)
            .unwrap();
        let mut doc = Document::new();
        let mut ids = IdGen::new("mm");
        let root = doc.root;
        mount_markup(&mut doc, root, &nodes, &mut ids);
        let nav = doc.element_children(doc.root)[0];
        attach_subtree(&mut doc, nav);

        let out = serialize(&doc, nav);
        assert_eq!(out.attributes.iter().collect::<Vec<_>>(), vec![("class", "navbar")]);
        assert_eq!(out.children[0].attributes.get("href"), Some("/"));
        assert_eq!(out.children[0].text_content, "Home");
    }

    #[test]
    fn text_runs_survive_the_codec() {
        let nodes = HtmlParser.parse("<p>Hello <b>world</b>!</p>").unwrap();
        let mut doc = Document::new();
        let mut ids = IdGen::new("tr");
        let root = doc.root;
        mount_markup(&mut doc, root, &nodes, &mut ids);
        let p = doc.element_children(doc.root)[0];
        attach_subtree(&mut doc, p);

        let out = serialize(&doc, p);
        assert_eq!(out.children.len(), 1);
        assert_eq!(out.text_runs.len(), 2);

        let mut copy = Document::new();
        let root = copy.root;
        deserialize(&mut copy, root, &out, &mut IdGen::new("tr2")).unwrap();
        let options = crate::emitter::HtmlOptions::default();
        assert_eq!(crate::emitter::emit_html(&copy, &options), "<p>Hello <b>world</b>!</p>");
    }
}
