//! Host layout measurement.
//!
//! The editor never lays content out itself. Drag-over halves and the
//! zero-size wrapper check ask a [`LayoutProbe`] for rendered bounds.

use std::collections::HashMap;
use trellis_core::{Bounds, NodeId};

pub trait LayoutProbe {
    /// Rendered bounds of `id`, or `None` when unknown.
    fn bounds(&self, id: NodeId) -> Option<Bounds>;
}

/// Map-backed probe for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticLayout {
    bounds: HashMap<NodeId, Bounds>,
}

impl StaticLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: NodeId, bounds: Bounds) {
        self.bounds.insert(id, bounds);
    }

    pub fn with(mut self, id: &str, bounds: Bounds) -> Self {
        self.set(NodeId::intern(id), bounds);
        self
    }
}

impl LayoutProbe for StaticLayout {
    fn bounds(&self, id: NodeId) -> Option<Bounds> {
        self.bounds.get(&id).copied()
    }
}
