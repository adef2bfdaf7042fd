//! Property panel state.
//!
//! The panel shows the selected element's authored attributes, inline
//! style, and computed snapshot. Edits come back through
//! [`crate::Command::UpdateStyle`] and [`crate::Command::UpdateAttribute`].

use petgraph::graph::NodeIndex;
use serde::Serialize;
use trellis_core::style::computed_snapshot;
use trellis_core::{DeclMap, Document, NodeId, decor};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub id: NodeId,
    pub tag_name: String,
    pub text_content: String,
    /// Authored attributes, `class` included, editor attributes excluded.
    pub attributes: DeclMap,
    pub inline_style: DeclMap,
    pub computed_style: DeclMap,
    pub component_kind: Option<String>,
}

impl PanelSnapshot {
    pub fn capture(doc: &Document, idx: NodeIndex) -> Self {
        let node = doc.node(idx);
        let mut attributes = DeclMap::new();
        let classes = decor::authored_classes(&node.classes);
        if !classes.is_empty() {
            attributes.set("class", classes.join(" "));
        }
        for (name, value) in node.attributes.iter() {
            if !decor::is_editor_attribute(name) {
                attributes.set(name, value);
            }
        }
        Self {
            id: node.id,
            tag_name: node.tag.clone(),
            text_content: node.text.clone(),
            attributes,
            inline_style: node.style.clone(),
            computed_style: computed_snapshot(&node.tag, &node.style),
            component_kind: node.meta.component_kind.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PanelState {
    Empty { message: String },
    Inspecting(PanelSnapshot),
}

impl PanelState {
    pub fn empty(message: &str) -> Self {
        Self::Empty {
            message: message.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub fn inspected(&self) -> Option<&PanelSnapshot> {
        match self {
            Self::Inspecting(snapshot) => Some(snapshot),
            Self::Empty { .. } => None,
        }
    }
}
