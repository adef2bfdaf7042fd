//! Explicit canvas commands.
//!
//! Every state change the canvas supports is a [`Command`] applied by
//! [`Canvas::apply`]. Input events are translated into commands by
//! [`Canvas::handle`], and hosts or tests may also apply commands
//! directly. A failed command leaves the canvas as it was and queues a
//! user-visible notice.

use crate::canvas::Canvas;
use crate::drag::{DropIndicator, DropPosition};
use crate::error::{EditorError, EditorResult};
use crate::notice::Notice;
use serde::Serialize;
use trellis_core::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(NodeId),
    Deselect,
    /// Delete an element and its whole subtree.
    Delete(NodeId),
    /// Make `id` the sibling right before or after `target`.
    Move {
        id: NodeId,
        target: NodeId,
        position: DropPosition,
    },
    /// Move `id` to the end of the canvas root.
    AppendToRoot(NodeId),
    /// Instantiate a palette component at the end of the canvas.
    Create { kind: String },
    /// Set a style property on the selected element. An empty value
    /// removes the property.
    UpdateStyle { property: String, value: String },
    /// Set or, with `None`, remove an attribute on the selected element.
    UpdateAttribute { name: String, value: Option<String> },
    BeginEdit(NodeId),
    /// End the inline edit. `text` overrides the tracked draft.
    CommitEdit { text: Option<String> },
    CancelEdit,
    /// Forward a click on `NodeId` to the composite that contains it.
    Activate(NodeId),
    Undo,
    Redo,
}

/// What applying a command or handling an event did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Outcome {
    Unchanged,
    Selected(Option<NodeId>),
    Created(NodeId),
    Deleted { id: NodeId, removed: usize },
    Moved(NodeId),
    Updated(NodeId),
    EditStarted { id: NodeId, text: String },
    EditCommitted { id: NodeId, changed: bool },
    EditCancelled(NodeId),
    Activated(NodeId),
    Indicator(Option<DropIndicator>),
    DragStarted(NodeId),
    DragEnded,
    /// A history snapshot labelled with the action it reverts or replays.
    Restored(String),
}

impl Canvas {
    /// Apply `command`. On failure nothing changes and a notice is queued.
    pub fn apply(&mut self, command: Command) -> EditorResult<Outcome> {
        log::trace!("apply {command:?}");
        let result = self.dispatch(command);
        if let Err(e) = &result {
            log::warn!("command rejected: {e}");
            self.report(e);
        }
        result
    }

    /// Queue the notice a failed operation shows the user. Rejected user
    /// actions are warnings; everything else is an error.
    pub fn report(&mut self, error: &EditorError) {
        let notice = match error {
            EditorError::Validation(_) | EditorError::NotEditable(_) => Notice::warning(error.to_string()),
            _ => Notice::error(error.to_string()),
        };
        self.push_notice(notice);
    }

    fn dispatch(&mut self, command: Command) -> EditorResult<Outcome> {
        match command {
            Command::Select(id) => {
                self.select(id)?;
                Ok(Outcome::Selected(Some(id)))
            }
            Command::Deselect => {
                let had = self.selected().is_some();
                self.deselect();
                Ok(if had { Outcome::Selected(None) } else { Outcome::Unchanged })
            }
            Command::Delete(id) => {
                let removed = self.delete_element(id)?;
                Ok(Outcome::Deleted { id, removed })
            }
            Command::Move { id, target, position } => {
                if self.move_element(id, target, position)? {
                    Ok(Outcome::Moved(id))
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            Command::AppendToRoot(id) => {
                self.append_to_root(id)?;
                Ok(Outcome::Moved(id))
            }
            Command::Create { kind } => self.create_component(&kind).map(Outcome::Created),
            Command::UpdateStyle { property, value } => self.update_style(&property, &value).map(Outcome::Updated),
            Command::UpdateAttribute { name, value } => {
                self.update_attribute(&name, value.as_deref()).map(Outcome::Updated)
            }
            Command::BeginEdit(id) => {
                let text = self.begin_edit(id)?;
                Ok(Outcome::EditStarted { id, text })
            }
            Command::CommitEdit { text } => {
                let (id, changed) = self.commit_edit(text)?;
                Ok(Outcome::EditCommitted { id, changed })
            }
            Command::CancelEdit => self.cancel_edit().map(Outcome::EditCancelled),
            Command::Activate(id) => {
                if self.activate(id)? {
                    Ok(Outcome::Activated(id))
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            Command::Undo => Ok(self.undo()?.map_or(Outcome::Unchanged, Outcome::Restored)),
            Command::Redo => Ok(self.redo()?.map_or(Outcome::Unchanged, Outcome::Restored)),
        }
    }
}
