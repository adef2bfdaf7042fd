//! Input abstraction layer.
//!
//! Host DOM events normalized into an `InputEvent` enum. Targets are
//! element ids as the host reads them from `data-canvas-id`.

use trellis_core::{Bounds, NodeId};

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Click on an element, or on the bare canvas when `target` is `None`.
    Click { target: Option<NodeId> },

    DoubleClick { target: NodeId },

    /// Click on the delete control attached to `owner`.
    DeleteControl { owner: NodeId },

    Key { key: String, modifiers: Modifiers },

    /// The content of the element being edited in place changed.
    EditInput { text: String },

    /// The element being edited in place lost focus.
    Blur,

    DragStart { target: NodeId },

    /// Pointer over `target` during a drag. `bounds` is the host's
    /// measurement of the target, when it has one at hand.
    DragOver {
        target: NodeId,
        y: f32,
        bounds: Option<Bounds>,
    },

    Drop { target: NodeId },

    /// Drop on the bare canvas.
    DropOnRoot,

    DragEnd,
}

impl InputEvent {
    pub fn key(key: &str) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key_with(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    pub fn click(target: NodeId) -> Self {
        Self::Click {
            target: Some(target),
        }
    }
}
