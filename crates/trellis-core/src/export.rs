//! Static page and three-file bundle export.

use crate::decor;
use crate::emitter::{EmitMode, HtmlOptions, emit_html, emit_markup, escape_text};
use crate::error::ImportResult;
use crate::markup::{MarkupNode, MarkupParser};
use crate::model::Document;
use crate::parser::HtmlParser;
use crate::stylesheet::{StyleSheet, component_stylesheet};

pub const BUNDLE_CSS_FILE: &str = "styles.css";
pub const BUNDLE_JS_FILE: &str = "script.js";

/// The three files of a bundle export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub html: String,
    pub css: String,
    pub js: String,
}

/// A complete HTML page with the canvas content, free of editor decoration.
#[must_use]
pub fn export_static_html(doc: &Document, title: &str) -> String {
    page(doc, title, "", "")
}

/// HTML, CSS, and JS files. The CSS carries the component stylesheet plus
/// `styles`; the JS re-attaches composite behavior by `data-component`.
#[must_use]
pub fn export_bundle(doc: &Document, title: &str, styles: &StyleSheet) -> Bundle {
    let head = format!("    <link rel=\"stylesheet\" href=\"{BUNDLE_CSS_FILE}\">\n");
    let tail = format!("    <script src=\"{BUNDLE_JS_FILE}\"></script>\n");
    let mut sheet = component_stylesheet();
    sheet.extend(styles);
    log::debug!("bundle export: {} css rules", sheet.rules.len());
    Bundle {
        html: page(doc, title, &head, &tail),
        css: sheet.render(),
        js: BEHAVIOR_SCRIPT.to_string(),
    }
}

fn page(doc: &Document, title: &str, head: &str, tail: &str) -> String {
    let options = HtmlOptions {
        mode: EmitMode::Clean,
        pretty: true,
        indent: "  ".to_string(),
    };
    let body = emit_html(doc, &options);
    let mut out = String::with_capacity(body.len() + 512);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("    <meta charset=\"UTF-8\">\n");
    out.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str(&format!("    <title>{}</title>\n", escape_text(title)));
    out.push_str(head);
    out.push_str("</head>\n<body>\n");
    out.push_str(&body);
    out.push_str(tail);
    out.push_str("</body>\n</html>\n");
    out
}

/// Remove editor classes, attributes, and delete controls from `markup`.
/// Applying it to its own output changes nothing.
pub fn strip_markup(markup: &str) -> ImportResult<String> {
    let mut nodes = HtmlParser.parse(markup)?;
    strip_nodes(&mut nodes);
    Ok(emit_markup(&nodes))
}

fn strip_nodes(nodes: &mut Vec<MarkupNode>) {
    nodes.retain(|n| !is_delete_control(n));
    for node in nodes.iter_mut() {
        if let MarkupNode::Element {
            attributes,
            children,
            ..
        } = node
        {
            let managed = attributes
                .get("class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == decor::MANAGED_CLASS));
            attributes.retain(|name, _| {
                !decor::is_editor_attribute(name) && !(managed && decor::LIVE_ATTRIBUTES.contains(&name))
            });
            if let Some(class) = attributes.get("class") {
                let kept: Vec<&str> = class
                    .split_whitespace()
                    .filter(|c| !decor::is_editor_class(c))
                    .collect();
                if kept.is_empty() {
                    attributes.remove("class");
                } else {
                    let kept = kept.join(" ");
                    attributes.set("class", kept);
                }
            }
            strip_nodes(children);
        }
    }
}

fn is_delete_control(node: &MarkupNode) -> bool {
    match node {
        MarkupNode::Element { attributes, .. } => attributes
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == decor::DELETE_CONTROL_CLASS)),
        MarkupNode::Text(_) => false,
    }
}

/// Behavior for exported composite components.
pub const BEHAVIOR_SCRIPT: &str = r#"document.addEventListener('DOMContentLoaded', function () {
  document.querySelectorAll('[data-component="tabs"]').forEach(function (tabs) {
    var buttons = tabs.querySelectorAll('.tab-button');
    var panels = tabs.querySelectorAll('.tab-panel');
    buttons.forEach(function (button, i) {
      button.addEventListener('click', function () {
        buttons.forEach(function (b) { b.classList.remove('active'); });
        panels.forEach(function (p) { p.classList.remove('active'); });
        button.classList.add('active');
        if (panels[i]) { panels[i].classList.add('active'); }
      });
    });
  });

  document.querySelectorAll('[data-component="accordion"]').forEach(function (accordion) {
    accordion.querySelectorAll('.accordion-header').forEach(function (header) {
      header.addEventListener('click', function () {
        header.parentElement.classList.toggle('open');
      });
    });
  });

  document.querySelectorAll('[data-component="modal"]').forEach(function (modal) {
    var trigger = modal.querySelector('.modal-trigger');
    var dialog = modal.querySelector('.modal');
    var close = modal.querySelector('.modal-close');
    if (trigger && dialog) {
      trigger.addEventListener('click', function () { dialog.classList.add('open'); });
    }
    if (close && dialog) {
      close.addEventListener('click', function () { dialog.classList.remove('open'); });
    }
  });

  document.querySelectorAll('[data-component="carousel"]').forEach(function (carousel) {
    var slides = carousel.querySelectorAll('.carousel-slide');
    var current = 0;
    function show(n) {
      if (!slides.length) { return; }
      slides[current].classList.remove('active');
      current = (n + slides.length) % slides.length;
      slides[current].classList.add('active');
    }
    var prev = carousel.querySelector('.carousel-prev');
    var next = carousel.querySelector('.carousel-next');
    if (prev) { prev.addEventListener('click', function () { show(current - 1); }); }
    if (next) { next.addEventListener('click', function () { show(current + 1); }); }
  });
});
"#;
