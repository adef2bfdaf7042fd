//! The canvas session.
//!
//! A [`Canvas`] owns everything one editor instance mutates: the live
//! document and its id generator, the selection, the inline edit, the drag
//! engine, the property panel, and the undo history. There is no
//! module-level state, so any number of canvases can coexist.

use crate::behavior::{self, Behavior};
use crate::commands::{Command, Outcome};
use crate::components::ComponentRegistry;
use crate::config::CanvasConfig;
use crate::drag::{self, DragEngine, DropIndicator, DropPosition};
use crate::error::{EditorError, EditorResult};
use crate::history::{Content, History, Snapshot};
use crate::input::InputEvent;
use crate::layout::{LayoutProbe, StaticLayout};
use crate::notice::Notice;
use crate::panel::{PanelSnapshot, PanelState};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use petgraph::graph::NodeIndex;
use trellis_core::style::{parse_style, validate_declaration};
use trellis_core::{
    Bundle, Decoder, Document, IdGen, IdPolicy, LintDiagnostic, NodeId, ProjectDocument, ProjectMetadata, StyleSheet,
    ValidationError, decor, export_bundle, export_static_html, fix_heading_levels, lint_document, lint_unused_styles,
    serialize_children,
};

/// An in-place text edit in progress.
#[derive(Debug, Clone)]
struct EditSession {
    id: NodeId,
    original: String,
    draft: String,
}

type Confirm = Box<dyn FnMut(&str) -> bool>;

pub struct Canvas {
    pub(crate) doc: Document,
    pub(crate) ids: IdGen,
    pub(crate) config: CanvasConfig,
    selected: Option<NodeId>,
    edit: Option<EditSession>,
    drag: DragEngine,
    panel: PanelState,
    notices: Vec<Notice>,
    registry: ComponentRegistry,
    pub(crate) layout: Box<dyn LayoutProbe>,
    history: History,
    pub(crate) styles: StyleSheet,
    pub(crate) metadata: ProjectMetadata,
    /// Asked before a load replaces existing content.
    pub(crate) confirm: Confirm,
}

impl Canvas {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            doc: Document::new(),
            ids: IdGen::new(config.id_prefix.clone()),
            selected: None,
            edit: None,
            drag: DragEngine::new(),
            panel: PanelState::empty(&config.empty_panel_message),
            notices: Vec::new(),
            registry: ComponentRegistry::with_defaults(),
            layout: Box::new(StaticLayout::new()),
            history: History::new(config.history_depth),
            styles: StyleSheet::new(),
            metadata: ProjectMetadata::default(),
            confirm: Box::new(|_| true),
            config,
        }
    }

    pub fn with_registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_layout(mut self, layout: impl LayoutProbe + 'static) -> Self {
        self.layout = Box::new(layout);
        self
    }

    /// Install the destructive-change prompt. It receives the question and
    /// returns whether to proceed.
    pub fn with_confirm(mut self, confirm: impl FnMut(&str) -> bool + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    pub fn set_layout(&mut self, layout: impl LayoutProbe + 'static) {
        self.layout = Box::new(layout);
    }

    pub fn set_confirm(&mut self, confirm: impl FnMut(&str) -> bool + 'static) {
        self.confirm = Box::new(confirm);
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Direct access for collaborators (lint fixes, host measurement).
    /// Edits made here bypass history.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The element being edited in place, if any.
    pub fn editing(&self) -> Option<NodeId> {
        self.edit.as_ref().map(|e| e.id)
    }

    pub fn drag(&self) -> &DragEngine {
        &self.drag
    }

    pub fn indicator(&self) -> Option<DropIndicator> {
        self.drag.indicator()
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleSheet {
        &mut self.styles
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut ProjectMetadata {
        &mut self.metadata
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn index(&self, id: NodeId) -> EditorResult<NodeIndex> {
        self.doc
            .index_of(id)
            .ok_or(EditorError::Validation(ValidationError::NodeNotFound(id)))
    }

    fn selected_index(&self) -> EditorResult<NodeIndex> {
        let id = self.selected.ok_or(EditorError::NothingSelected)?;
        self.index(id)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Make `id` the single selected element and inspect it in the panel.
    pub fn select(&mut self, id: NodeId) -> EditorResult<()> {
        let idx = self.index(id)?;
        if !self.doc.node(idx).bindings.select {
            return Err(ValidationError::Unmanaged(id).into());
        }
        if self.editing().is_some_and(|e| e != id) {
            self.commit_edit(None)?;
        }
        if self.selected != Some(id) {
            self.clear_selection_marks();
            let node = self.doc.node_mut(idx);
            node.add_class(decor::SELECTED_CLASS);
            node.add_class(decor::RESIZABLE_CLASS);
            self.selected = Some(id);
            log::debug!("selected {id}");
        }
        self.refresh_panel();
        Ok(())
    }

    /// Clear the selection. An inline edit in progress is committed first.
    pub fn deselect(&mut self) {
        if self.edit.is_some()
            && let Err(e) = self.commit_edit(None)
        {
            log::warn!("edit dropped on deselect: {e}");
        }
        self.clear_selection_marks();
        self.selected = None;
        self.refresh_panel();
    }

    /// Drop the selection, the inline edit, and any drag without touching
    /// content. Used before the whole canvas is replaced.
    pub(crate) fn reset_interaction(&mut self) {
        self.clear_selection_marks();
        self.selected = None;
        self.edit = None;
        self.drag.reset();
        self.refresh_panel();
    }

    fn clear_selection_marks(&mut self) {
        if let Some(idx) = self.selected.and_then(|id| self.doc.index_of(id)) {
            let node = self.doc.node_mut(idx);
            node.remove_class(decor::SELECTED_CLASS);
            node.remove_class(decor::RESIZABLE_CLASS);
        }
    }

    fn refresh_panel(&mut self) {
        self.panel = match self.selected.and_then(|id| self.doc.index_of(id)) {
            Some(idx) => PanelState::Inspecting(PanelSnapshot::capture(&self.doc, idx)),
            None => PanelState::empty(&self.config.empty_panel_message),
        };
    }

    // ─── Creation and deletion ───────────────────────────────────────────

    /// Instantiate `kind` from the registry at the end of the canvas and
    /// select it. Unknown kinds produce a plain container.
    pub fn create_component(&mut self, kind: &str) -> EditorResult<NodeId> {
        let template = self.registry.create(kind);
        self.record(&format!("create {kind}"))?;
        let root = self.doc.root;
        let mut decoder = Decoder::new(&mut self.ids, IdPolicy::Fresh);
        let idx = decoder.decode(&mut self.doc, root, &template)?;
        for e in decoder.finish() {
            log::warn!("component {kind}: {e}");
        }
        behavior::wire(&mut self.doc, idx);
        let id = self.doc.node(idx).id;
        log::debug!("created {kind} as {id}");
        self.select(id)?;
        Ok(id)
    }

    /// Delete `id` and its subtree. Returns the number of elements removed.
    pub fn delete_element(&mut self, id: NodeId) -> EditorResult<usize> {
        let idx = self.index(id)?;
        if idx == self.doc.root {
            return Err(ValidationError::RootImmutable.into());
        }
        if !self.doc.node(idx).meta.is_canvas_managed {
            return Err(ValidationError::Unmanaged(id).into());
        }
        self.record(&format!("delete {id}"))?;

        let doomed = |canvas: &Self, other: Option<NodeId>| {
            other
                .and_then(|o| canvas.doc.index_of(o))
                .is_some_and(|o| o == idx || canvas.doc.is_ancestor_of(idx, o))
        };
        if doomed(self, self.editing()) {
            self.edit = None;
        }
        if doomed(self, self.drag.dragged()) {
            self.drag.reset();
        }
        if doomed(self, self.selected) {
            self.selected = None;
        }

        let removed = self.doc.remove_subtree(idx);
        log::debug!("deleted {id} ({removed} elements)");
        self.refresh_panel();
        Ok(removed)
    }

    // ─── Property panel edits ────────────────────────────────────────────

    /// Write one inline style property on the selected element. An empty
    /// value removes it.
    pub fn update_style(&mut self, property: &str, value: &str) -> EditorResult<NodeId> {
        let idx = self.selected_index()?;
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        if !value.is_empty() {
            validate_declaration(&property, value)?;
        }
        self.record(&format!("style {property}"))?;
        let node = self.doc.node_mut(idx);
        if value.is_empty() {
            node.style.remove(&property);
        } else {
            node.style.set(property, value);
        }
        let id = node.id;
        self.refresh_panel();
        Ok(id)
    }

    /// Write or remove one attribute on the selected element.
    ///
    /// `class` replaces the authored classes and keeps editor classes in
    /// place. `style` replaces the inline style, skipping malformed
    /// declarations. `id` renames the element when the new id is free.
    /// Editor attributes are rejected.
    pub fn update_attribute(&mut self, name: &str, value: Option<&str>) -> EditorResult<NodeId> {
        let idx = self.selected_index()?;
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() || decor::is_editor_attribute(&name) {
            return Err(EditorError::ReservedAttribute(name));
        }

        let mut id = self.doc.node(idx).id;
        match name.as_str() {
            "id" => {
                let wanted = value.map(str::trim).filter(|v| !v.is_empty());
                match wanted {
                    Some(v) if v == id.as_str() => {}
                    Some(v) => {
                        let new_id = NodeId::intern(v);
                        if self.doc.contains_id(new_id) {
                            return Err(EditorError::DuplicateId(v.to_string()));
                        }
                        self.record("rename")?;
                        if !self.doc.set_id(idx, new_id) {
                            return Err(EditorError::DuplicateId(v.to_string()));
                        }
                        self.rename_references(id, new_id);
                        id = new_id;
                    }
                    None => {
                        self.record("remove id")?;
                        self.doc.node_mut(idx).explicit_id = false;
                    }
                }
            }
            "class" => {
                self.record("class")?;
                let node = self.doc.node_mut(idx);
                node.classes.retain(|c| decor::is_editor_class(c));
                for class in value.unwrap_or("").split_whitespace() {
                    if !decor::is_editor_class(class) {
                        node.add_class(class);
                    }
                }
                node.meta.original_classes = decor::authored_classes(&node.classes);
            }
            "style" => {
                let (decls, errors) = parse_style(value.unwrap_or(""));
                self.record("style")?;
                self.doc.node_mut(idx).style = decls;
                for e in errors {
                    self.push_notice(Notice::warning(e.to_string()));
                }
            }
            _ => {
                self.record(&format!("attribute {name}"))?;
                let node = self.doc.node_mut(idx);
                match value {
                    Some(v) => {
                        node.attributes.set(name.as_str(), v);
                    }
                    None => {
                        node.attributes.remove(&name);
                    }
                }
            }
        }
        self.refresh_panel();
        Ok(id)
    }

    fn rename_references(&mut self, old: NodeId, new: NodeId) {
        if self.selected == Some(old) {
            self.selected = Some(new);
        }
        if let Some(edit) = self.edit.as_mut().filter(|e| e.id == old) {
            edit.id = new;
        }
        if self.drag.dragged() == Some(old) {
            self.drag.reset();
        }
    }

    // ─── Inline editing ──────────────────────────────────────────────────

    /// Start editing the text of `id` in place. Returns the current text,
    /// which the host pre-selects in full.
    pub fn begin_edit(&mut self, id: NodeId) -> EditorResult<String> {
        let idx = self.index(id)?;
        if !self.doc.node(idx).bindings.edit {
            return Err(EditorError::NotEditable(id));
        }
        if let Some(current) = self.editing() {
            if current == id {
                return Ok(self.doc.node(idx).text.clone());
            }
            self.commit_edit(None)?;
        }
        self.select(id)?;
        let node = self.doc.node_mut(idx);
        node.add_class(decor::EDITING_CLASS);
        let text = node.text.clone();
        self.edit = Some(EditSession {
            id,
            original: text.clone(),
            draft: text.clone(),
        });
        log::debug!("editing {id}");
        Ok(text)
    }

    /// Track the text typed so far.
    pub fn edit_input(&mut self, text: &str) -> EditorResult<()> {
        let edit = self.edit.as_mut().ok_or(EditorError::NoActiveEdit)?;
        edit.draft = text.to_string();
        let id = edit.id;
        if let Some(node) = self.doc.get_mut(id) {
            node.text = text.to_string();
        }
        Ok(())
    }

    /// Finish the inline edit, keeping the new text. Returns the edited id
    /// and whether the text changed.
    pub fn commit_edit(&mut self, text: Option<String>) -> EditorResult<(NodeId, bool)> {
        let session = self.edit.take().ok_or(EditorError::NoActiveEdit)?;
        let text = text.unwrap_or(session.draft);
        let Some(idx) = self.doc.index_of(session.id) else {
            return Ok((session.id, false));
        };
        let changed = text != session.original;
        // History holds the text from before the edit.
        self.doc.node_mut(idx).text = session.original.clone();
        if changed {
            self.record("edit text")?;
        }
        self.doc.set_text(idx, &text);
        end_edit_marks(self.doc.node_mut(idx));
        log::debug!("committed edit of {} (changed: {changed})", session.id);
        self.refresh_panel();
        Ok((session.id, changed))
    }

    /// Abandon the inline edit and restore the previous text.
    pub fn cancel_edit(&mut self) -> EditorResult<NodeId> {
        let session = self.edit.take().ok_or(EditorError::NoActiveEdit)?;
        if let Some(node) = self.doc.get_mut(session.id) {
            node.text = session.original;
            end_edit_marks(node);
        }
        self.refresh_panel();
        Ok(session.id)
    }

    // ─── Composites ──────────────────────────────────────────────────────

    /// Forward a click on `id` to its enclosing composite, if any.
    pub fn activate(&mut self, id: NodeId) -> EditorResult<bool> {
        let idx = self.index(id)?;
        let Some(root) = behavior::composite_of(&self.doc, idx) else {
            return Ok(false);
        };
        let Some(kind) = Behavior::of(&self.doc, root) else {
            return Ok(false);
        };
        let changed = kind.activate(&mut self.doc, root, idx);
        if changed {
            log::trace!("{kind:?} activated by {id}");
            self.refresh_panel();
        }
        Ok(changed)
    }

    // ─── Structural moves ────────────────────────────────────────────────

    /// Move `id` next to `target` and reselect it. Dropping a node on
    /// itself does nothing and returns `false`.
    pub fn move_element(&mut self, id: NodeId, target: NodeId, position: DropPosition) -> EditorResult<bool> {
        let dragged = self.index(id)?;
        let target_idx = self.index(target)?;
        if dragged == target_idx {
            return Ok(false);
        }
        drag::validate_move(&self.doc, dragged, target_idx)?;
        self.record(&format!("move {id}"))?;
        drag::relocate(&mut self.doc, dragged, target_idx, position);
        self.reselect(id)?;
        Ok(true)
    }

    /// Move `id` to the end of the canvas root and reselect it.
    pub fn append_to_root(&mut self, id: NodeId) -> EditorResult<()> {
        let idx = self.index(id)?;
        if idx == self.doc.root {
            return Err(ValidationError::RootImmutable.into());
        }
        self.record(&format!("move {id}"))?;
        drag::append_to_root(&mut self.doc, idx)?;
        log::debug!("appended {id} to root");
        self.reselect(id)
    }

    fn reselect(&mut self, id: NodeId) -> EditorResult<()> {
        let selectable = self.doc.get(id).is_some_and(|n| n.bindings.select);
        if selectable {
            self.select(id)
        } else {
            self.refresh_panel();
            Ok(())
        }
    }

    fn end_drag(&mut self) {
        if let Some(node) = self.drag.dragged().and_then(|id| self.doc.get_mut(id)) {
            node.remove_class(decor::DRAGGING_CLASS);
        }
        self.drag.reset();
    }

    // ─── History ─────────────────────────────────────────────────────────

    fn snapshot(&self, label: &str) -> EditorResult<Snapshot> {
        let content = Content {
            elements: serialize_children(&self.doc, self.doc.root),
            text_runs: self.doc.text_runs(self.doc.root),
        };
        Snapshot::encode(label, &content)
    }

    /// Record the current content before a mutation labelled `label`.
    pub(crate) fn record(&mut self, label: &str) -> EditorResult<()> {
        let snapshot = self.snapshot(label)?;
        log::trace!("history: {label} ({} bytes)", snapshot.size());
        self.history.push(snapshot);
        Ok(())
    }

    /// Revert the last recorded action. Returns its label.
    pub fn undo(&mut self) -> EditorResult<Option<String>> {
        let Some(label) = self.history.undo_label().map(str::to_string) else {
            return Ok(None);
        };
        let current = self.snapshot(&label)?;
        let Some(snapshot) = self.history.undo(current) else {
            return Ok(None);
        };
        self.restore(&snapshot)?;
        Ok(Some(label))
    }

    /// Replay the last undone action. Returns its label.
    pub fn redo(&mut self) -> EditorResult<Option<String>> {
        let Some(label) = self.history.redo_label().map(str::to_string) else {
            return Ok(None);
        };
        let current = self.snapshot(&label)?;
        let Some(snapshot) = self.history.redo(current) else {
            return Ok(None);
        };
        self.restore(&snapshot)?;
        Ok(Some(label))
    }

    fn restore(&mut self, snapshot: &Snapshot) -> EditorResult<()> {
        let content = snapshot.decode()?;
        let selected = self.selected.take();
        self.edit = None;
        self.drag.reset();

        self.doc.clear();
        let root = self.doc.root;
        let mut decoder = Decoder::new(&mut self.ids, IdPolicy::Preserve);
        decoder.decode_all(&mut self.doc, root, &content.elements);
        for e in decoder.finish() {
            log::warn!("restoring {}: {e}", snapshot.label);
        }
        self.doc.place_text_runs(root, &content.text_runs);
        behavior::wire(&mut self.doc, root);
        log::debug!("restored {} ({} elements)", snapshot.label, self.doc.element_count());

        if let Some(id) = selected.filter(|&id| self.doc.get(id).is_some_and(|n| n.bindings.select)) {
            self.select(id)?;
        } else {
            self.refresh_panel();
        }
        Ok(())
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Capture the canvas as a project document.
    pub fn serialize_project(&self) -> ProjectDocument {
        ProjectDocument::from_document(&self.doc, self.styles.clone(), self.metadata.clone())
    }

    pub fn export_static_html(&self) -> String {
        export_static_html(&self.doc, &self.metadata.title)
    }

    pub fn export_bundle(&self) -> Bundle {
        export_bundle(&self.doc, &self.metadata.title, &self.styles)
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        let mut diags = lint_document(&self.doc);
        diags.extend(lint_unused_styles(&self.doc, &self.styles));
        diags
    }

    /// Rewrite headings that skip levels. Recorded as one undo step.
    pub fn fix_headings(&mut self) -> EditorResult<usize> {
        if !self.lint().iter().any(|d| d.rule == "heading-order") {
            return Ok(0);
        }
        self.record("fix headings")?;
        let fixed = fix_heading_levels(&mut self.doc);
        self.refresh_panel();
        Ok(fixed)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Translate a host event into commands and apply them.
    pub fn handle(&mut self, event: InputEvent) -> EditorResult<Outcome> {
        match event {
            InputEvent::Click { target: None } => self.apply(Command::Deselect),
            InputEvent::Click { target: Some(id) } => self.handle_click(id),
            InputEvent::DoubleClick { target } => {
                let editable = self.doc.get(target).is_some_and(|n| n.bindings.edit);
                if editable {
                    self.apply(Command::BeginEdit(target))
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            InputEvent::DeleteControl { owner } => self.apply(Command::Delete(owner)),
            InputEvent::Key { key, modifiers } => {
                if self.edit.is_some() {
                    let plain = !(modifiers.ctrl || modifiers.alt || modifiers.meta);
                    match key.as_str() {
                        // Shift+Enter commits like Enter.
                        "Enter" if plain => self.apply(Command::CommitEdit { text: None }),
                        "Escape" => self.apply(Command::CancelEdit),
                        _ => Ok(Outcome::Unchanged),
                    }
                } else {
                    match ShortcutMap::resolve(&key, modifiers) {
                        Some(ShortcutAction::Delete) => match self.selected {
                            Some(id) => self.apply(Command::Delete(id)),
                            None => Ok(Outcome::Unchanged),
                        },
                        Some(ShortcutAction::Deselect) => self.apply(Command::Deselect),
                        Some(ShortcutAction::Undo) => self.apply(Command::Undo),
                        Some(ShortcutAction::Redo) => self.apply(Command::Redo),
                        None => Ok(Outcome::Unchanged),
                    }
                }
            }
            InputEvent::EditInput { text } => {
                if self.edit.is_some() {
                    self.edit_input(&text)?;
                }
                Ok(Outcome::Unchanged)
            }
            InputEvent::Blur => {
                if self.edit.is_some() {
                    self.apply(Command::CommitEdit { text: None })
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            InputEvent::DragStart { target } => {
                let draggable = self.edit.is_none() && self.doc.get(target).is_some_and(|n| n.bindings.drag);
                if draggable && self.drag.start(target, self.selected) {
                    if let Some(node) = self.doc.get_mut(target) {
                        node.add_class(decor::DRAGGING_CLASS);
                    }
                    Ok(Outcome::DragStarted(target))
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            InputEvent::DragOver { target, y, bounds } => {
                let Some(node) = self.doc.get(target).filter(|n| n.is_element()) else {
                    return Ok(Outcome::Unchanged);
                };
                let bounds = bounds.or(node.bounds).or_else(|| self.layout.bounds(target));
                Ok(Outcome::Indicator(self.drag.over(target, y, bounds)))
            }
            InputEvent::Drop { target } => {
                let Some(id) = self.drag.dragged() else {
                    return Ok(Outcome::Unchanged);
                };
                let position = self.drag.position_for(target);
                // A rejected drop keeps the drag alive until DragEnd.
                let outcome = self.apply(Command::Move { id, target, position })?;
                self.end_drag();
                Ok(outcome)
            }
            InputEvent::DropOnRoot => {
                let Some(id) = self.drag.dragged() else {
                    return Ok(Outcome::Unchanged);
                };
                let outcome = self.apply(Command::AppendToRoot(id))?;
                self.end_drag();
                Ok(outcome)
            }
            InputEvent::DragEnd => {
                self.end_drag();
                Ok(Outcome::DragEnded)
            }
        }
    }

    fn handle_click(&mut self, id: NodeId) -> EditorResult<Outcome> {
        if self.editing() == Some(id) {
            return Ok(Outcome::Unchanged);
        }
        let Some(idx) = self.doc.index_of(id) else {
            return self.apply(Command::Deselect);
        };
        if behavior::composite_of(&self.doc, idx).is_some() {
            self.apply(Command::Activate(id))?;
        }
        let selectable = std::iter::once(idx)
            .chain(self.doc.ancestors(idx))
            .find(|&n| self.doc.node(n).bindings.select)
            .map(|n| self.doc.node(n).id);
        match selectable {
            Some(target) => self.apply(Command::Select(target)),
            None => self.apply(Command::Deselect),
        }
    }
}

fn end_edit_marks(node: &mut trellis_core::LiveNode) {
    node.remove_class(decor::EDITING_CLASS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use pretty_assertions::assert_eq;
    use trellis_core::{HtmlOptions, emit_html};

    fn canvas() -> Canvas {
        Canvas::new(CanvasConfig::default())
    }

    fn created(canvas: &mut Canvas, kind: &str) -> NodeId {
        canvas.create_component(kind).unwrap()
    }

    #[test]
    fn selecting_moves_the_marker() {
        let mut canvas = canvas();
        let a = created(&mut canvas, "paragraph");
        let b = created(&mut canvas, "paragraph");
        assert_eq!(canvas.selected(), Some(b));

        canvas.select(a).unwrap();
        let doc = canvas.document();
        assert!(doc.get(a).unwrap().has_class(decor::SELECTED_CLASS));
        assert!(doc.get(a).unwrap().has_class(decor::RESIZABLE_CLASS));
        assert!(!doc.get(b).unwrap().has_class(decor::SELECTED_CLASS));
        assert_eq!(canvas.panel().inspected().map(|p| p.id), Some(a));
    }

    #[test]
    fn style_update_and_removal() {
        let mut canvas = canvas();
        let p = created(&mut canvas, "paragraph");
        canvas.update_style("Color", "red").unwrap();
        assert_eq!(canvas.document().get(p).unwrap().style.get("color"), Some("red"));
        assert_eq!(
            canvas.panel().inspected().unwrap().inline_style.get("color"),
            Some("red")
        );
        canvas.update_style("color", "").unwrap();
        assert!(canvas.document().get(p).unwrap().style.get("color").is_none());
        assert!(matches!(
            canvas.update_style("bad name", "x"),
            Err(EditorError::Style(_))
        ));
    }

    #[test]
    fn class_update_keeps_editor_classes() {
        let mut canvas = canvas();
        let p = created(&mut canvas, "paragraph");
        canvas.update_attribute("class", Some("lead selected muted")).unwrap();
        let node = canvas.document().get(p).unwrap();
        assert!(node.has_class(decor::SELECTED_CLASS));
        assert!(node.has_class(decor::MANAGED_CLASS));
        assert_eq!(node.meta.original_classes, vec!["lead".to_string(), "muted".to_string()]);
        assert_eq!(
            canvas.panel().inspected().unwrap().attributes.get("class"),
            Some("lead muted")
        );
    }

    #[test]
    fn editor_attributes_are_reserved() {
        let mut canvas = canvas();
        created(&mut canvas, "paragraph");
        assert_eq!(
            canvas.update_attribute("data-canvas-kind", Some("x")),
            Err(EditorError::ReservedAttribute("data-canvas-kind".to_string()))
        );
        canvas.update_attribute("draggable", Some("false")).unwrap();
        canvas.update_attribute("title", Some("Hello")).unwrap();
        canvas.update_attribute("title", None).unwrap();
        let id = canvas.selected().unwrap();
        assert!(canvas.document().get(id).unwrap().attributes.get("title").is_none());
    }

    #[test]
    fn renaming_keeps_selection_and_rejects_duplicates() {
        let mut canvas = canvas();
        let a = created(&mut canvas, "paragraph");
        created(&mut canvas, "paragraph");
        assert_eq!(
            canvas.update_attribute("id", Some(a.as_str())),
            Err(EditorError::DuplicateId(a.as_str().to_string()))
        );
        let renamed = canvas.update_attribute("id", Some("intro")).unwrap();
        assert_eq!(renamed, NodeId::intern("intro"));
        assert_eq!(canvas.selected(), Some(renamed));
        assert!(canvas.document().get(renamed).unwrap().explicit_id);
    }

    #[test]
    fn inline_edit_commits_on_enter() {
        let mut canvas = canvas();
        let h = created(&mut canvas, "heading2");
        let started = canvas.handle(InputEvent::DoubleClick { target: h }).unwrap();
        let Outcome::EditStarted { text, .. } = started else {
            panic!("expected edit to start, got {started:?}");
        };
        assert!(canvas.document().get(h).unwrap().has_class(decor::EDITING_CLASS));
        assert!(emit_html(canvas.document(), &HtmlOptions::live()).contains("contenteditable=\"true\""));

        canvas.handle(InputEvent::EditInput { text: format!("{text}!") }).unwrap();
        let done = canvas.handle(InputEvent::key_with("Enter", Modifiers::SHIFT)).unwrap();
        assert_eq!(done, Outcome::EditCommitted { id: h, changed: true });
        let node = canvas.document().get(h).unwrap();
        assert_eq!(node.text, format!("{text}!"));
        assert!(!node.has_class(decor::EDITING_CLASS));
        assert!(!emit_html(canvas.document(), &HtmlOptions::live()).contains("contenteditable=\"true\""));
    }

    #[test]
    fn modified_enter_does_not_commit() {
        let mut canvas = canvas();
        let p = created(&mut canvas, "paragraph");
        canvas.handle(InputEvent::DoubleClick { target: p }).unwrap();
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert_eq!(canvas.handle(InputEvent::key_with("Enter", ctrl)).unwrap(), Outcome::Unchanged);
        assert_eq!(canvas.editing(), Some(p));
    }

    #[test]
    fn escape_cancels_edit() {
        let mut canvas = canvas();
        let p = created(&mut canvas, "paragraph");
        let before = canvas.document().get(p).unwrap().text.clone();
        canvas.handle(InputEvent::DoubleClick { target: p }).unwrap();
        canvas.handle(InputEvent::EditInput { text: "scratch".into() }).unwrap();
        assert_eq!(canvas.handle(InputEvent::key("Escape")).unwrap(), Outcome::EditCancelled(p));
        assert_eq!(canvas.document().get(p).unwrap().text, before);
        assert_eq!(canvas.selected(), Some(p));
    }

    #[test]
    fn double_click_on_block_is_ignored() {
        let mut canvas = canvas();
        let c = created(&mut canvas, "container");
        assert_eq!(canvas.handle(InputEvent::DoubleClick { target: c }).unwrap(), Outcome::Unchanged);
        assert_eq!(canvas.editing(), None);
    }

    #[test]
    fn click_selects_nearest_managed_element() {
        let mut canvas = canvas();
        let card = created(&mut canvas, "card");
        let inner = canvas.document().descendants(canvas.document().index_of(card).unwrap())[0];
        let inner_id = canvas.document().node(inner).id;
        canvas.handle(InputEvent::click(inner_id)).unwrap();
        assert_eq!(canvas.selected(), Some(inner_id));

        canvas.handle(InputEvent::Click { target: None }).unwrap();
        assert_eq!(canvas.selected(), None);
        assert!(canvas.panel().is_empty());
    }

    #[test]
    fn clicking_a_tab_switches_panels() {
        let mut canvas = canvas();
        let tabs = created(&mut canvas, "tabs");
        let doc = canvas.document();
        let root = doc.index_of(tabs).unwrap();
        let buttons: Vec<NodeId> = doc
            .descendants(root)
            .into_iter()
            .filter(|&i| doc.node(i).has_class("tab-button"))
            .map(|i| doc.node(i).id)
            .collect();
        canvas.handle(InputEvent::click(buttons[1])).unwrap();
        let node = canvas.document().get(buttons[1]).unwrap();
        assert!(node.has_class(behavior::ACTIVE_CLASS));
        assert_eq!(canvas.selected(), Some(buttons[1]));
    }

    #[test]
    fn delete_shortcut_removes_selection() {
        let mut canvas = canvas();
        let p = created(&mut canvas, "paragraph");
        let outcome = canvas.handle(InputEvent::key("Delete")).unwrap();
        assert_eq!(outcome, Outcome::Deleted { id: p, removed: 1 });
        assert_eq!(canvas.document().element_count(), 0);
        assert_eq!(canvas.handle(InputEvent::key("Delete")).unwrap(), Outcome::Unchanged);
    }

    #[test]
    fn undo_and_redo_restore_content() {
        let mut canvas = canvas();
        let a = created(&mut canvas, "paragraph");
        created(&mut canvas, "button");
        assert_eq!(canvas.document().element_count(), 2);

        assert_eq!(canvas.undo().unwrap().as_deref(), Some("create button"));
        assert_eq!(canvas.document().element_count(), 1);
        assert!(canvas.document().get(a).is_some());

        assert_eq!(canvas.redo().unwrap().as_deref(), Some("create button"));
        assert_eq!(canvas.document().element_count(), 2);
        let restored = canvas.document().get(a).unwrap();
        assert!(restored.bindings.select && restored.bindings.drag);
    }

    #[test]
    fn fresh_ids_skip_restored_ones() {
        let mut canvas = canvas();
        created(&mut canvas, "paragraph");
        created(&mut canvas, "paragraph");
        canvas.undo().unwrap();
        let c = created(&mut canvas, "paragraph");
        let ids = canvas.document().element_ids();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.contains(&c));
    }

    #[test]
    fn redo_keeps_the_action_label() {
        let mut canvas = canvas();
        created(&mut canvas, "paragraph");
        canvas.undo().unwrap();
        assert_eq!(canvas.history().redo_label(), Some("create paragraph"));
        assert_eq!(canvas.redo().unwrap().as_deref(), Some("create paragraph"));
        assert_eq!(canvas.history().undo_label(), Some("create paragraph"));
        assert_eq!(canvas.undo().unwrap().as_deref(), Some("create paragraph"));
    }

    #[test]
    fn lint_reports_unused_project_styles() {
        let mut canvas = canvas();
        created(&mut canvas, "paragraph");
        canvas.styles.push(trellis_core::CssRule::new(".ghost").with("opacity", "0.5"));
        let unused: Vec<_> = canvas.lint().into_iter().filter(|d| d.rule == "unused-style").collect();
        assert_eq!(unused.len(), 1);
        assert!(unused[0].message.contains(".ghost"));
    }
}
