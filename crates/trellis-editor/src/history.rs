//! Undo/redo snapshot stack.
//!
//! Each entry is the canvas content before an action, encoded with
//! `rmp-serde`. Restoring decodes it with ids preserved. The stack is
//! bounded; pushing a new action clears redo.

use crate::error::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use trellis_core::{ElementNode, TextRun};

/// Canvas content as recorded: the top-level trees and the bare text
/// between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    pub elements: Vec<ElementNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text_runs: Vec<TextRun>,
}

/// One recorded canvas state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub label: String,
    bytes: Vec<u8>,
}

impl Snapshot {
    pub fn encode(label: &str, content: &Content) -> EditorResult<Self> {
        let bytes = rmp_serde::to_vec_named(content).map_err(|e| EditorError::History(e.to_string()))?;
        Ok(Self {
            label: label.to_string(),
            bytes,
        })
    }

    pub fn decode(&self) -> EditorResult<Content> {
        rmp_serde::from_slice(&self.bytes).map_err(|e| EditorError::History(e.to_string()))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Record the state before a new action.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.max_depth == 0 {
            return;
        }
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // Clear redo stack on new action
        self.redo_stack.clear();
    }

    /// Pop the state to restore, stashing `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Pop the state to restore, stashing `current` for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|s| s.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|s| s.label.as_str())
    }
}
