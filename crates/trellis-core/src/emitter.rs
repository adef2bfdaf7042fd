//! Emitter: live document → markup.
//!
//! `Live` mode reproduces what the editor shows, decoration included, and
//! tags every element with `data-canvas-id` so a host can map its DOM back
//! to nodes. `Clean` mode drops every editor class, attribute, and
//! affordance and only writes authored ids.

use crate::decor;
use crate::markup::MarkupNode;
use crate::model::{Document, NodeRole};
use crate::parser::{RAW_TEXT_TAGS, VOID_TAGS};
use crate::style::render_style;
use petgraph::graph::NodeIndex;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitMode {
    Live,
    #[default]
    Clean,
}

/// Markup output options, in the manner of a formatter config.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub mode: EmitMode,
    pub pretty: bool,
    pub indent: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            mode: EmitMode::Clean,
            pretty: false,
            indent: "  ".to_string(),
        }
    }
}

impl HtmlOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    pub fn live() -> Self {
        Self {
            mode: EmitMode::Live,
            ..Self::default()
        }
    }
}

/// Emit the canvas content (the root's children).
#[must_use]
pub fn emit_html(doc: &Document, options: &HtmlOptions) -> String {
    let mut out = String::with_capacity(1024);
    for &child in doc.children(doc.root) {
        emit_node(&mut out, doc, child, 0, options);
    }
    out
}

fn indent(out: &mut String, depth: usize, options: &HtmlOptions) {
    if options.pretty {
        for _ in 0..depth {
            out.push_str(&options.indent);
        }
    }
}

fn newline(out: &mut String, options: &HtmlOptions) {
    if options.pretty {
        out.push('\n');
    }
}

fn emit_node(out: &mut String, doc: &Document, idx: NodeIndex, depth: usize, options: &HtmlOptions) {
    let node = doc.node(idx);
    let clean = options.mode == EmitMode::Clean;
    match node.role {
        NodeRole::DeleteControl if clean => return,
        NodeRole::Text => {
            indent(out, depth, options);
            out.push_str(&escape_text(&node.text));
            newline(out, options);
            return;
        }
        _ => {}
    }

    indent(out, depth, options);
    let _ = write!(out, "<{}", node.tag);
    if node.explicit_id && node.role != NodeRole::DeleteControl {
        let _ = write!(out, " id=\"{}\"", escape_attr(node.id.as_str()));
    }
    if !clean && node.role == NodeRole::Element {
        let _ = write!(out, " data-canvas-id=\"{}\"", escape_attr(node.id.as_str()));
    }
    let classes: Vec<&str> = node
        .classes
        .iter()
        .map(String::as_str)
        .filter(|c| !clean || !decor::is_editor_class(c))
        .collect();
    if !classes.is_empty() {
        let _ = write!(out, " class=\"{}\"", escape_attr(&classes.join(" ")));
    }

    // Live interaction attributes override authored ones of the same name.
    let mut live: Vec<(&str, &str)> = Vec::new();
    if !clean {
        if node.role == NodeRole::DeleteControl {
            live.push(("contenteditable", "false"));
        } else if node.has_class(decor::EDITING_CLASS) {
            live.push(("contenteditable", "true"));
        }
        if node.bindings.drag {
            live.push(("draggable", "true"));
        }
    }
    for (name, value) in node.attributes.iter() {
        if clean && decor::is_editor_attribute(name) {
            continue;
        }
        if live.iter().any(|(n, _)| *n == name) {
            continue;
        }
        write_attr(out, name, value);
    }
    for (name, value) in live {
        write_attr(out, name, value);
    }
    if !node.style.is_empty() {
        let _ = write!(out, " style=\"{}\"", escape_attr(&render_style(&node.style)));
    }
    out.push('>');

    if VOID_TAGS.contains(&node.tag.as_str()) {
        newline(out, options);
        return;
    }

    if RAW_TEXT_TAGS.contains(&node.tag.as_str()) {
        out.push_str(&node.text);
    } else if !doc.has_text_runs(idx) {
        out.push_str(&escape_text(&node.text));
    }
    let children: Vec<NodeIndex> = doc
        .children(idx)
        .iter()
        .copied()
        .filter(|&c| !clean || doc.node(c).role != NodeRole::DeleteControl)
        .collect();
    if !children.is_empty() {
        newline(out, options);
        for child in children {
            emit_node(out, doc, child, depth + 1, options);
        }
        indent(out, depth, options);
    }
    let _ = write!(out, "</{}>", node.tag);
    newline(out, options);
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    if value.is_empty() {
        let _ = write!(out, " {name}");
    } else {
        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
    }
}

/// Emit raw markup nodes. Used when markup is rewritten without mounting.
#[must_use]
pub fn emit_markup(nodes: &[MarkupNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        emit_markup_node(&mut out, node);
    }
    out
}

fn emit_markup_node(out: &mut String, node: &MarkupNode) {
    match node {
        MarkupNode::Text(t) => out.push_str(&escape_text(t)),
        MarkupNode::Element {
            tag,
            attributes,
            children,
        } => {
            let _ = write!(out, "<{tag}");
            for (name, value) in attributes.iter() {
                write_attr(out, name, value);
            }
            out.push('>');
            if VOID_TAGS.contains(&tag.as_str()) {
                return;
            }
            if RAW_TEXT_TAGS.contains(&tag.as_str()) {
                for child in children {
                    if let MarkupNode::Text(t) = child {
                        out.push_str(t);
                    }
                }
            } else {
                for child in children {
                    emit_markup_node(out, child);
                }
            }
            let _ = write!(out, "</{tag}>");
        }
    }
}

pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
