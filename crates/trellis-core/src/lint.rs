//! Accessibility lint for canvas documents.
//!
//! Reports issues without modifying the document, except for
//! [`fix_heading_levels`], which rewrites headings in place.

use crate::id::NodeId;
use crate::model::Document;
use crate::stylesheet::StyleSheet;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Hurts accessibility; fix before publishing.
    Warning,
    Info,
}

/// A single lint diagnostic for a canvas element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintDiagnostic {
    pub node_id: NodeId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "img-alt", "heading-order").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all element rules over the document.
#[must_use]
pub fn lint_document(doc: &Document) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_heading_order(doc, &mut diags);
    lint_img_alt(doc, &mut diags);
    lint_empty_links(doc, &mut diags);
    diags
}

/// Info for every project class rule that no element uses.
#[must_use]
pub fn lint_unused_styles(doc: &Document, styles: &StyleSheet) -> Vec<LintDiagnostic> {
    let used: HashSet<&str> = elements(doc)
        .flat_map(|idx| doc.node(idx).classes.iter().map(String::as_str))
        .collect();
    styles
        .rules
        .iter()
        .filter_map(|rule| {
            let class = rule.selector.strip_prefix('.')?;
            let simple = class.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            (simple && !used.contains(class)).then(|| LintDiagnostic {
                node_id: doc.node(doc.root).id,
                message: format!("Style `{}` is defined but never used.", rule.selector),
                severity: LintSeverity::Info,
                rule: "unused-style",
            })
        })
        .collect()
}

/// Rewrite headings that skip a level so each is at most one deeper than
/// the previous heading. Children and ids are kept. Returns the number of
/// headings rewritten.
pub fn fix_heading_levels(doc: &mut Document) -> usize {
    let mut previous = 0u8;
    let mut fixed = 0;
    let order: Vec<NodeIndex> = elements(doc).collect();
    for idx in order {
        let Some(level) = heading_level(&doc.node(idx).tag) else {
            continue;
        };
        if level > previous + 1 {
            let target = previous + 1;
            doc.replace_tag(idx, &format!("h{target}"));
            previous = target;
            fixed += 1;
        } else {
            previous = level;
        }
    }
    if fixed > 0 {
        log::debug!("fixed {fixed} heading levels");
    }
    fixed
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn elements(doc: &Document) -> impl Iterator<Item = NodeIndex> + '_ {
    doc.descendants(doc.root)
        .into_iter()
        .filter(move |&idx| doc.node(idx).is_element())
}

fn heading_level(tag: &str) -> Option<u8> {
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<u8>() {
        Ok(n @ 1..=6) => Some(n),
        _ => None,
    }
}

/// Warn when a heading skips a level (e.g. `h2` followed by `h4`).
fn lint_heading_order(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    let mut previous = 0u8;
    for idx in elements(doc) {
        let node = doc.node(idx);
        let Some(level) = heading_level(&node.tag) else {
            continue;
        };
        if level > previous + 1 {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!(
                    "`<h{level}>` follows `<h{previous}>`; heading levels should not be skipped."
                ),
                severity: LintSeverity::Warning,
                rule: "heading-order",
            });
        }
        previous = level;
    }
}

/// Warn on images without an `alt` attribute.
fn lint_img_alt(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    for idx in elements(doc) {
        let node = doc.node(idx);
        if node.tag == "img" && !node.attributes.contains("alt") {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Image `{}` has no `alt` text.", node.id.as_str()),
                severity: LintSeverity::Warning,
                rule: "img-alt",
            });
        }
    }
}

/// Warn on links with neither text nor an accessible label.
fn lint_empty_links(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    for idx in elements(doc) {
        let node = doc.node(idx);
        if node.tag != "a" {
            continue;
        }
        let labelled = node.attributes.contains("aria-label") || node.attributes.contains("title");
        let has_text = !node.text.trim().is_empty()
            || doc
                .descendants(idx)
                .iter()
                .any(|&d| doc.node(d).is_element() && !doc.node(d).text.trim().is_empty());
        if !labelled && !has_text {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Link `{}` has no text or label.", node.id.as_str()),
                severity: LintSeverity::Warning,
                rule: "empty-link",
            });
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
