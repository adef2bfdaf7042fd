//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Only consulted
//! while no inline edit is active; inline editing handles its own keys.

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Delete,
    Deselect,
    Undo,
    Redo,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a `KeyboardEvent.key` value to an action.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();
        match key {
            "Delete" | "Backspace" if !cmd => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "z" | "Z" if cmd && modifiers.shift => Some(ShortcutAction::Redo),
            "z" | "Z" if cmd => Some(ShortcutAction::Undo),
            "y" | "Y" if cmd => Some(ShortcutAction::Redo),
            _ => None,
        }
    }
}
