//! Raw markup trees and mounting them into a live document.
//!
//! Markup import bypasses the canonical node format entirely: a
//! [`MarkupParser`] yields [`MarkupNode`]s, and [`mount_markup`] turns
//! them into live nodes. Affordances are retrofitted afterwards by the
//! loader.

use crate::decl::DeclMap;
use crate::decor;
use crate::error::{ImportResult, StyleParseError};
use crate::id::{IdGen, NodeId};
use crate::model::{Document, LiveNode};
use crate::parser::is_text_body;
use crate::style::parse_style;
use petgraph::graph::NodeIndex;

/// A parsed markup node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element {
        tag: String,
        attributes: DeclMap,
        children: Vec<MarkupNode>,
    },
    Text(String),
}

impl MarkupNode {
    pub fn element(tag: impl Into<String>) -> Self {
        MarkupNode::Element {
            tag: tag.into(),
            attributes: DeclMap::new(),
            children: Vec::new(),
        }
    }

    fn is_element(&self) -> bool {
        matches!(self, MarkupNode::Element { .. })
    }

    /// Concatenated own text.
    fn own_text(children: &[MarkupNode]) -> String {
        let mut text = String::new();
        for child in children {
            if let MarkupNode::Text(t) = child {
                text.push_str(t);
            }
        }
        text
    }

    /// Text that is not just inter-element whitespace.
    fn meaningful_text(&self) -> Option<&str> {
        match self {
            MarkupNode::Text(t) if !t.trim().is_empty() => Some(t),
            _ => None,
        }
    }
}

/// Turns a markup string into a tree. The bundled implementation is
/// [`crate::parser::HtmlParser`]; hosts may plug in a full HTML parser.
pub trait MarkupParser {
    fn parse(&self, markup: &str) -> ImportResult<Vec<MarkupNode>>;
}

/// Mount parsed markup as the last children of `parent`.
///
/// An `id` attribute becomes the element id when it is free in the
/// document; otherwise a fresh id is generated. Malformed `style`
/// declarations are skipped and returned.
///
/// Text next to elements (mixed content, or bare text at the top level)
/// is kept in place as text runs. Whitespace-only text between elements
/// is dropped.
pub fn mount_markup(
    doc: &mut Document,
    parent: NodeIndex,
    nodes: &[MarkupNode],
    ids: &mut IdGen,
) -> Vec<StyleParseError> {
    let mut errors = Vec::new();
    for node in nodes {
        match node.meaningful_text() {
            Some(text) => {
                doc.add_child(parent, LiveNode::text_run(text));
            }
            None => mount_one(doc, parent, node, ids, &mut errors),
        }
    }
    errors
}

fn mount_one(
    doc: &mut Document,
    parent: NodeIndex,
    node: &MarkupNode,
    ids: &mut IdGen,
    errors: &mut Vec<StyleParseError>,
) {
    let MarkupNode::Element {
        tag,
        attributes,
        children,
    } = node
    else {
        return;
    };

    let authored = attributes
        .get("id")
        .map(NodeId::intern)
        .filter(|id| !id.is_unassigned() && !doc.contains_id(*id));
    let id = authored.unwrap_or_else(|| ids.next_id(|c| doc.contains_id(c)));

    let mut live = LiveNode::element(id, tag.to_ascii_lowercase());
    live.explicit_id = authored.is_some();
    for (name, value) in attributes.iter() {
        match name {
            "id" => {}
            "class" => {
                for class in value.split_whitespace() {
                    live.add_class(class);
                }
            }
            "style" => {
                let (decls, errs) = parse_style(value);
                live.style = decls;
                errors.extend(errs);
            }
            _ => {
                live.attributes.set(name, value);
            }
        }
    }
    live.meta.original_classes = decor::authored_classes(&live.classes);
    let raw = is_text_body(&live.tag);
    let own = MarkupNode::own_text(children);
    live.text = if raw { own } else { own.trim().to_string() };
    let mixed = !raw
        && children.iter().any(MarkupNode::is_element)
        && children.iter().any(|c| c.meaningful_text().is_some());

    let idx = doc.add_child(parent, live);
    for child in children {
        match child.meaningful_text() {
            Some(text) if mixed => {
                doc.add_child(idx, LiveNode::text_run(text));
            }
            _ => mount_one(doc, idx, child, ids, errors),
        }
    }
}
