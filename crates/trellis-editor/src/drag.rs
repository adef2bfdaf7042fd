//! Drag-reorder engine.
//!
//! ```text
//!   Idle ──DragStart(selected)──▶ Dragging ──Drop / DropOnRoot / DragEnd──▶ Idle
//! ```
//!
//! While dragging, one shared indicator marks where the node would land:
//! above the target when the pointer is in the target's upper half, below
//! it otherwise. A rejected drop leaves both the tree and the indicator
//! untouched; the following `DragEnd` resets them.

use petgraph::graph::NodeIndex;
use serde::Serialize;
use trellis_core::{Bounds, Document, NodeId, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
}

impl DropPosition {
    /// Upper half → before, lower half → after.
    pub fn from_pointer(bounds: &Bounds, y: f32) -> Self {
        if bounds.in_upper_half(y) {
            Self::Before
        } else {
            Self::After
        }
    }
}

/// Where the shared insertion indicator is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropIndicator {
    pub target: NodeId,
    pub position: DropPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { node: NodeId },
}

#[derive(Debug, Clone, Default)]
pub struct DragEngine {
    state: DragState,
    indicator: Option<DropIndicator>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn dragged(&self) -> Option<NodeId> {
        match self.state {
            DragState::Dragging { node } => Some(node),
            DragState::Idle => None,
        }
    }

    pub fn indicator(&self) -> Option<DropIndicator> {
        self.indicator
    }

    /// Begin dragging `node`. Only the currently selected node may be
    /// dragged.
    pub fn start(&mut self, node: NodeId, selected: Option<NodeId>) -> bool {
        if selected != Some(node) || self.state != DragState::Idle {
            return false;
        }
        log::trace!("drag start {node}");
        self.state = DragState::Dragging { node };
        self.indicator = None;
        true
    }

    /// Track the pointer over `target`. Returns the indicator, or `None`
    /// when no drag is active or `target` is the dragged node.
    pub fn over(&mut self, target: NodeId, y: f32, bounds: Option<Bounds>) -> Option<DropIndicator> {
        let dragged = self.dragged()?;
        if dragged == target {
            return self.indicator;
        }
        let position = bounds.map_or(DropPosition::After, |b| DropPosition::from_pointer(&b, y));
        let indicator = DropIndicator { target, position };
        self.indicator = Some(indicator);
        Some(indicator)
    }

    /// The position to use for a drop on `target`: the indicator's, when it
    /// points at `target`.
    pub fn position_for(&self, target: NodeId) -> DropPosition {
        match self.indicator {
            Some(i) if i.target == target => i.position,
            _ => DropPosition::After,
        }
    }

    /// Back to idle, indicator hidden.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.indicator = None;
    }
}

// ─── Tree operations ─────────────────────────────────────────────────────

/// Check that `dragged` may become a sibling of `target`.
pub fn validate_move(doc: &Document, dragged: NodeIndex, target: NodeIndex) -> Result<(), ValidationError> {
    if dragged == doc.root || target == doc.root {
        return Err(ValidationError::RootImmutable);
    }
    let node = doc.node(dragged);
    if !node.meta.is_canvas_managed {
        return Err(ValidationError::Unmanaged(node.id));
    }
    if doc.is_ancestor_of(dragged, target) {
        return Err(ValidationError::WouldCreateCycle {
            dragged: node.id,
            target: doc.node(target).id,
        });
    }
    Ok(())
}

/// Unlink `dragged` and reinsert it right before or after `target`.
/// Callers validate with [`validate_move`] first.
pub fn relocate(doc: &mut Document, dragged: NodeIndex, target: NodeIndex, position: DropPosition) {
    let Some(parent) = doc.parent(target) else {
        return;
    };
    doc.detach(dragged);
    let Some(at) = doc.children(parent).iter().position(|&c| c == target) else {
        return;
    };
    let index = match position {
        DropPosition::Before => at,
        DropPosition::After => at + 1,
    };
    doc.move_node(dragged, parent, index);
    log::debug!(
        "moved {} {:?} {}",
        doc.node(dragged).id,
        position,
        doc.node(target).id
    );
}

/// Move `dragged` to the end of the root.
pub fn append_to_root(doc: &mut Document, dragged: NodeIndex) -> Result<(), ValidationError> {
    if dragged == doc.root {
        return Err(ValidationError::RootImmutable);
    }
    let node = doc.node(dragged);
    if !node.meta.is_canvas_managed {
        return Err(ValidationError::Unmanaged(node.id));
    }
    let root = doc.root;
    doc.move_node(dragged, root, usize::MAX);
    Ok(())
}
