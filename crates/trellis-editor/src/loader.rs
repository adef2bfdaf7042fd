//! Template and project loading.
//!
//! A load parses its input completely before touching the canvas, so a
//! file that fails to parse leaves the current content in place. Only then
//! is the user asked to confirm the replacement, the old content recorded
//! for undo, and the new content mounted.
//!
//! Current projects go through the tree codec. Legacy projects
//! (`version < 2.0`), starter templates, and raw HTML are mounted from
//! markup and then retrofitted with affordances.

use crate::behavior;
use crate::canvas::Canvas;
use crate::error::{EditorError, EditorResult};
use crate::notice::Notice;
use crate::templates::template;
use trellis_core::{
    Decoder, HtmlParser, IdPolicy, MarkupNode, MarkupParser, ProjectFile, ProjectMetadata, StyleSheet, decor,
    mount_markup,
};

impl Canvas {
    /// Replace the canvas with the starter template `name`.
    pub fn load_template(&mut self, name: &str) -> EditorResult<bool> {
        let markup = template(name).ok_or_else(|| EditorError::UnknownTemplate(name.to_string()))?;
        let nodes = HtmlParser.parse(markup)?;
        if !self.confirm_replace("Loading a template") {
            return Ok(false);
        }
        self.replace_with_markup(&nodes, &format!("load template {name}"))?;
        self.styles = StyleSheet::new();
        self.metadata = ProjectMetadata::default();
        log::info!("loaded template {name}");
        Ok(true)
    }

    /// Replace the canvas with raw HTML.
    pub fn import_html(&mut self, markup: &str) -> EditorResult<bool> {
        let nodes = HtmlParser.parse(markup)?;
        if !self.confirm_replace("Importing HTML") {
            return Ok(false);
        }
        self.replace_with_markup(&nodes, "import html")?;
        self.styles = StyleSheet::new();
        Ok(true)
    }

    /// Replace the canvas with a saved project. Returns `Ok(false)` when
    /// the user declines the replacement.
    pub fn load_project(&mut self, json: &str) -> EditorResult<bool> {
        let file = ProjectFile::from_json(json)?;
        match file {
            ProjectFile::Legacy(legacy) => {
                log::info!("loading legacy project (version {})", legacy.version);
                let nodes = HtmlParser.parse(&legacy.html)?;
                if !self.confirm_replace("Opening this project") {
                    return Ok(false);
                }
                self.replace_with_markup(&nodes, "open project")?;
                self.styles = StyleSheet::new();
                self.metadata = ProjectMetadata::default();
            }
            ProjectFile::Current(project) => {
                if !self.confirm_replace("Opening this project") {
                    return Ok(false);
                }
                self.prepare_replace("open project")?;
                let root = self.doc.root;
                let mut decoder = Decoder::new(&mut self.ids, IdPolicy::Preserve);
                decoder.decode_all(&mut self.doc, root, &project.elements);
                let errors = decoder.finish();
                self.doc.place_text_runs(root, &project.text_runs);
                behavior::wire(&mut self.doc, root);
                if !errors.is_empty() {
                    log::warn!("project loaded with {} recovered errors", errors.len());
                }
                for e in errors {
                    self.push_notice(Notice::warning(e.to_string()));
                }
                self.styles = project.styles;
                self.metadata = project.metadata;
                log::info!("loaded project with {} elements", self.doc.element_count());
            }
        }
        Ok(true)
    }

    /// [`Canvas::load_project`] for hosts that only need success or
    /// failure. Errors are queued as notices.
    pub fn load_project_to_canvas(&mut self, json: &str) -> bool {
        match self.load_project(json) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::warn!("project load failed: {e}");
                self.report(&e);
                false
            }
        }
    }

    /// Attach affordances to every element lacking them and wire composite
    /// behavior. Elements the layout reports as zero-sized are marked
    /// unmanaged instead. Returns the number of elements retrofitted.
    pub fn retrofit_affordances(&mut self) -> usize {
        let root = self.doc.root;
        let mut attached = 0;
        for idx in self.doc.descendants(root) {
            let node = self.doc.node(idx);
            if !node.is_element() || !node.meta.is_canvas_managed {
                continue;
            }
            let bounds = node.bounds.or_else(|| self.layout.bounds(node.id));
            if bounds.is_some_and(|b| b.is_empty()) {
                log::debug!("skipping zero-size wrapper {}", node.id);
                decor::detach_affordances(&mut self.doc, idx);
                self.doc.node_mut(idx).meta.is_canvas_managed = false;
                continue;
            }
            if decor::attach_affordances(&mut self.doc, idx) {
                attached += 1;
            }
        }
        behavior::wire(&mut self.doc, root);
        attached
    }

    fn confirm_replace(&mut self, action: &str) -> bool {
        if !self.config.confirm_replace || self.doc.element_count() == 0 {
            return true;
        }
        let question = format!("{action} will replace the current canvas content. Continue?");
        let accepted = (self.confirm)(&question);
        if !accepted {
            log::debug!("replacement declined");
        }
        accepted
    }

    /// Record the current content, then clear the canvas and its
    /// interaction state.
    fn prepare_replace(&mut self, label: &str) -> EditorResult<()> {
        self.record(label)?;
        self.reset_interaction();
        self.doc.clear();
        Ok(())
    }

    fn replace_with_markup(&mut self, nodes: &[MarkupNode], label: &str) -> EditorResult<()> {
        self.prepare_replace(label)?;
        let root = self.doc.root;
        let errors = mount_markup(&mut self.doc, root, nodes, &mut self.ids);
        for e in errors {
            self.push_notice(Notice::warning(e.to_string()));
        }
        let attached = self.retrofit_affordances();
        log::debug!("{label}: {attached} elements retrofitted");
        Ok(())
    }
}
