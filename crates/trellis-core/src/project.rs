//! Persisted project files.
//!
//! Current projects (`version >= 2.0`) carry canonical element trees.
//! Legacy projects carry the whole canvas as one markup string and are
//! loaded through markup mounting, never through the tree codec.

use crate::codec::serialize_children;
use crate::error::{ImportError, ImportResult};
use crate::model::{Document, ElementNode, TextRun};
use crate::stylesheet::StyleSheet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const PROJECT_VERSION: &str = "2.0";

/// The first version that stores element trees.
pub const TREE_FORMAT_VERSION: &str = "2.0";

pub const GENERATOR: &str = concat!("trellis/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub generator: String,
    /// Host-defined keys, kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            created_at: None,
            saved_at: None,
            generator: GENERATOR.to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A project in the tree format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub version: String,
    #[serde(default)]
    pub elements: Vec<ElementNode>,
    /// Bare text between the top-level elements.
    #[serde(default, rename = "textRuns", skip_serializing_if = "Vec::is_empty")]
    pub text_runs: Vec<TextRun>,
    #[serde(default)]
    pub styles: StyleSheet,
    #[serde(default)]
    pub metadata: ProjectMetadata,
}

impl ProjectDocument {
    /// Capture the canvas content of `doc`.
    pub fn from_document(doc: &Document, styles: StyleSheet, metadata: ProjectMetadata) -> Self {
        Self {
            version: PROJECT_VERSION.to_string(),
            elements: serialize_children(doc, doc.root),
            text_runs: doc.text_runs(doc.root),
            styles,
            metadata,
        }
    }

    pub fn to_json(&self) -> ImportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of elements across all top-level trees.
    pub fn element_count(&self) -> usize {
        self.elements.iter().map(ElementNode::count).sum()
    }
}

/// A project in the pre-tree format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyProject {
    #[serde(default)]
    pub version: String,
    pub html: String,
}

/// Either project format, detected from the `version` field.
#[derive(Debug, Clone)]
pub enum ProjectFile {
    Current(ProjectDocument),
    Legacy(LegacyProject),
}

impl ProjectFile {
    pub fn from_json(text: &str) -> ImportResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let Some(obj) = value.as_object() else {
            return Err(ImportError::Json("project must be a JSON object".into()));
        };
        let version = obj.get("version").and_then(serde_json::Value::as_str);
        let html = obj.get("html").and_then(serde_json::Value::as_str);

        match (version, html) {
            (Some(v), _) if !is_legacy_version(v) => {
                log::debug!("project format {v}");
                Ok(ProjectFile::Current(serde_json::from_value(value)?))
            }
            (v, Some(html)) => {
                log::debug!("legacy project format {}", v.unwrap_or("<none>"));
                Ok(ProjectFile::Legacy(LegacyProject {
                    version: v.unwrap_or_default().to_string(),
                    html: html.to_string(),
                }))
            }
            _ => Err(ImportError::UnknownFormat),
        }
    }

    pub fn version(&self) -> &str {
        match self {
            ProjectFile::Current(p) => &p.version,
            ProjectFile::Legacy(p) => &p.version,
        }
    }
}

/// `version < 2.0`.
pub fn is_legacy_version(version: &str) -> bool {
    compare_versions(version, TREE_FORMAT_VERSION) == Ordering::Less
}

/// Compare dotted versions segment by segment, numerically. Missing
/// segments count as zero; non-numeric segments count as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| -> Vec<u64> {
        s.trim()
            .split('.')
            .map(|seg| seg.trim().parse().unwrap_or(0))
            .collect()
    };
    let (a, b) = (parse(a), parse(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn version_ordering_is_numeric() {
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
        assert_eq!(compare_versions("2", "2.0"), Ordering::Equal);
        assert!(is_legacy_version("1.0"));
        assert!(is_legacy_version("1.9.9"));
        assert!(!is_legacy_version("2.0"));
        assert!(!is_legacy_version("10.0"));
    }

    #[test]
    fn detects_legacy_projects() {
        let file = ProjectFile::from_json(r#"{"version":"1.0","html":"<div>Hi</div>"}"#).unwrap();
        match file {
            ProjectFile::Legacy(p) => assert_eq!(p.html, "<div>Hi</div>"),
            other => panic!("expected legacy, got {other:?}"),
        }

        let unversioned = ProjectFile::from_json(r#"{"html":"<p>x</p>"}"#).unwrap();
        assert!(matches!(unversioned, ProjectFile::Legacy(_)));
    }

    #[test]
    fn parses_current_projects() {
        let json = r##"{
            "version": "2.0",
            "elements": [
                {"id": "pj_1", "tagName": "h1", "textContent": "Hello",
                 "inlineStyle": {"color": "#333"},
                 "metadata": {"originalClasses": [], "componentKind": "heading1"}}
            ],
            "styles": {".hero": {"padding": "80px"}},
            "metadata": {"title": "Site", "generator": "x", "theme": "dark"}
        }"##;
        let ProjectFile::Current(p) = ProjectFile::from_json(json).unwrap() else {
            panic!("expected current format");
        };
        assert_eq!(p.elements[0].tag_name, "h1");
        assert!(p.elements[0].metadata.is_canvas_managed);
        assert_eq!(p.styles.get(".hero").unwrap().properties.get("padding"), Some("80px"));
        assert_eq!(p.metadata.title, "Site");
        assert_eq!(p.metadata.extra.get("theme").and_then(|v| v.as_str()), Some("dark"));
    }

    #[test]
    fn rejects_unknown_and_malformed() {
        assert_eq!(
            ProjectFile::from_json(r#"{"elements": []}"#).unwrap_err(),
            ImportError::UnknownFormat
        );
        assert!(matches!(ProjectFile::from_json("not json"), Err(ImportError::Json(_))));
        assert!(matches!(ProjectFile::from_json("[1]"), Err(ImportError::Json(_))));
        assert!(matches!(
            ProjectFile::from_json(r#"{"version":"2.0","elements":"nope"}"#),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn project_json_uses_camel_case_fields() {
        let doc = Document::new();
        let project = ProjectDocument::from_document(&doc, StyleSheet::new(), ProjectMetadata::default());
        let json = project.to_json().unwrap();
        assert!(json.contains("\"version\": \"2.0\""));
        assert!(json.contains("\"generator\""));
        assert!(!json.contains("createdAt"));
    }
}
