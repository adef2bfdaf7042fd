//! WASM bridge for Trellis: exposes the canvas controller to the browser.
//!
//! Compiled via `wasm-pack build --target web`. The host renders the live
//! markup from [`TrellisCanvas::live_html`], forwards DOM events to the
//! `handle_*` methods, and reads JSON results back.

use serde::Serialize;
use trellis_core::{Bounds, HtmlOptions, NodeId, emit_html, strip_markup};
use trellis_editor::{
    Canvas, CanvasConfig, Command, ComponentRegistry, EditorResult, InputEvent, Modifiers, Outcome, TEMPLATE_NAMES,
};
use wasm_bindgen::prelude::*;

/// The WASM-facing canvas. All host interaction goes through this struct.
#[wasm_bindgen]
pub struct TrellisCanvas {
    canvas: Canvas,
}

#[wasm_bindgen]
impl TrellisCanvas {
    /// Create a canvas. `config_json` is a partial `CanvasConfig`; an
    /// empty or invalid string falls back to the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        console_error_panic_hook_setup();
        let config = if config_json.trim().is_empty() {
            CanvasConfig::default()
        } else {
            serde_json::from_str(config_json).unwrap_or_else(|e| {
                log::warn!("invalid canvas config, using defaults: {e}");
                CanvasConfig::default()
            })
        };
        Self {
            canvas: Canvas::new(config),
        }
    }

    /// Route destructive-change confirmations to a JS callback taking the
    /// question and returning a boolean.
    pub fn set_confirm(&mut self, callback: js_sys::Function) {
        self.canvas.set_confirm(move |question| {
            callback
                .call1(&JsValue::NULL, &JsValue::from_str(question))
                .map(|answer| answer.as_bool().unwrap_or(false))
                .unwrap_or(false)
        });
    }

    /// Record the rendered bounds of an element, as measured by the host.
    pub fn set_bounds(&mut self, id: &str, x: f32, y: f32, width: f32, height: f32) -> bool {
        match self.canvas.document_mut().get_mut(NodeId::intern(id)) {
            Some(node) => {
                node.bounds = Some(Bounds::new(x, y, width, height));
                true
            }
            None => false,
        }
    }

    /// Canvas markup with editor decoration, for the host to render.
    pub fn live_html(&self) -> String {
        emit_html(self.canvas.document(), &HtmlOptions::live())
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn create_component(&mut self, kind: &str) -> String {
        respond(self.canvas.apply(Command::Create { kind: kind.to_string() }))
    }

    pub fn select(&mut self, id: &str) -> String {
        respond(self.canvas.apply(Command::Select(NodeId::intern(id))))
    }

    pub fn deselect(&mut self) -> String {
        respond(self.canvas.apply(Command::Deselect))
    }

    pub fn delete_element(&mut self, id: &str) -> String {
        respond(self.canvas.apply(Command::Delete(NodeId::intern(id))))
    }

    pub fn update_style(&mut self, property: &str, value: &str) -> String {
        respond(self.canvas.apply(Command::UpdateStyle {
            property: property.to_string(),
            value: value.to_string(),
        }))
    }

    /// `value` of `undefined` removes the attribute.
    pub fn update_attribute(&mut self, name: &str, value: Option<String>) -> String {
        respond(self.canvas.apply(Command::UpdateAttribute {
            name: name.to_string(),
            value,
        }))
    }

    pub fn undo(&mut self) -> String {
        respond(self.canvas.apply(Command::Undo))
    }

    pub fn redo(&mut self) -> String {
        respond(self.canvas.apply(Command::Redo))
    }

    // ─── Input events ────────────────────────────────────────────────────

    /// `target` of `undefined` is a click on the bare canvas.
    pub fn handle_click(&mut self, target: Option<String>) -> String {
        let target = target.as_deref().map(NodeId::intern);
        respond(self.canvas.handle(InputEvent::Click { target }))
    }

    pub fn handle_double_click(&mut self, target: &str) -> String {
        respond(self.canvas.handle(InputEvent::DoubleClick {
            target: NodeId::intern(target),
        }))
    }

    pub fn handle_delete_control(&mut self, owner: &str) -> String {
        respond(self.canvas.handle(InputEvent::DeleteControl {
            owner: NodeId::intern(owner),
        }))
    }

    pub fn handle_key(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers { shift, ctrl, alt, meta };
        respond(self.canvas.handle(InputEvent::key_with(key, modifiers)))
    }

    pub fn handle_edit_input(&mut self, text: &str) -> String {
        respond(self.canvas.handle(InputEvent::EditInput { text: text.to_string() }))
    }

    pub fn handle_blur(&mut self) -> String {
        respond(self.canvas.handle(InputEvent::Blur))
    }

    pub fn handle_drag_start(&mut self, target: &str) -> String {
        respond(self.canvas.handle(InputEvent::DragStart {
            target: NodeId::intern(target),
        }))
    }

    /// Pointer at `y` over `target`, whose box the host measured. An empty
    /// box means "not measured" and falls back to the recorded bounds.
    pub fn handle_drag_over(&mut self, target: &str, y: f32, x: f32, top: f32, width: f32, height: f32) -> String {
        let measured = Bounds::new(x, top, width, height);
        let bounds = (!measured.is_empty()).then_some(measured);
        respond(self.canvas.handle(InputEvent::DragOver {
            target: NodeId::intern(target),
            y,
            bounds,
        }))
    }

    pub fn handle_drop(&mut self, target: &str) -> String {
        respond(self.canvas.handle(InputEvent::Drop {
            target: NodeId::intern(target),
        }))
    }

    pub fn handle_drop_on_root(&mut self) -> String {
        respond(self.canvas.handle(InputEvent::DropOnRoot))
    }

    pub fn handle_drag_end(&mut self) -> String {
        respond(self.canvas.handle(InputEvent::DragEnd))
    }

    // ─── Loading ─────────────────────────────────────────────────────────

    pub fn load_template(&mut self, name: &str) -> bool {
        loaded(&mut self.canvas, |c| c.load_template(name))
    }

    pub fn import_html(&mut self, markup: &str) -> bool {
        loaded(&mut self.canvas, |c| c.import_html(markup))
    }

    pub fn load_project(&mut self, json: &str) -> bool {
        self.canvas.load_project_to_canvas(json)
    }

    /// Re-run affordance retrofitting, e.g. after `set_bounds` calls.
    pub fn retrofit(&mut self) -> usize {
        self.canvas.retrofit_affordances()
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// The project file as pretty JSON, or an empty string on failure.
    pub fn serialize_project(&self) -> String {
        self.canvas.serialize_project().to_json().unwrap_or_else(|e| {
            log::warn!("project serialization failed: {e}");
            String::new()
        })
    }

    pub fn export_static_html(&self) -> String {
        self.canvas.export_static_html()
    }

    /// `{"html": ..., "css": ..., "js": ...}`
    pub fn export_bundle(&self) -> String {
        let bundle = self.canvas.export_bundle();
        serde_json::json!({
            "html": bundle.html,
            "css": bundle.css,
            "js": bundle.js,
        })
        .to_string()
    }

    pub fn get_panel(&self) -> String {
        to_json(self.canvas.panel(), "{}")
    }

    pub fn get_selected_id(&self) -> String {
        self.canvas
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn get_indicator(&self) -> String {
        to_json(&self.canvas.indicator(), "null")
    }

    /// Drain queued notices as a JSON array.
    pub fn take_notices(&mut self) -> String {
        to_json(&self.canvas.take_notices(), "[]")
    }

    pub fn lint(&self) -> String {
        to_json(&self.canvas.lint(), "[]")
    }

    pub fn fix_headings(&mut self) -> usize {
        self.canvas.fix_headings().unwrap_or_else(|e| {
            log::warn!("heading fix failed: {e}");
            0
        })
    }
}

fn respond(result: EditorResult<Outcome>) -> String {
    match result {
        Ok(outcome) => serde_json::json!({ "ok": true, "outcome": outcome }).to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

fn loaded(canvas: &mut Canvas, load: impl FnOnce(&mut Canvas) -> EditorResult<bool>) -> bool {
    match load(canvas) {
        Ok(done) => done,
        Err(e) => {
            log::warn!("load failed: {e}");
            canvas.report(&e);
            false
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Trellis WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Palette kinds of the built-in registry, as a JSON array.
#[wasm_bindgen]
pub fn component_kinds() -> String {
    to_json(ComponentRegistry::with_defaults().kinds(), "[]")
}

#[wasm_bindgen]
pub fn template_names() -> String {
    to_json(TEMPLATE_NAMES, "[]")
}

/// Strip editor decoration from markup. Returns
/// `{"ok":true,"html":"..."}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn strip(markup: &str) -> String {
    match strip_markup(markup) {
        Ok(html) => serde_json::json!({ "ok": true, "html": html }).to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}
