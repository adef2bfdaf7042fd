//! Shared CSS rules: the project `styles` table and the component stylesheet
//! shipped with bundle exports.

use crate::decl::DeclMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::Write;

/// One selector with its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selector: String,
    pub properties: DeclMap,
}

impl CssRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            properties: DeclMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.properties.set(name, value);
        self
    }
}

/// Ordered rules. Serializes as a JSON object keyed by selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    pub rules: Vec<CssRule>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, selector: &str) -> Option<&CssRule> {
        self.rules.iter().find(|r| r.selector == selector)
    }

    /// Add a rule, merging into an existing rule with the same selector.
    pub fn push(&mut self, rule: CssRule) {
        match self.rules.iter_mut().find(|r| r.selector == rule.selector) {
            Some(existing) => {
                for (k, v) in rule.properties.iter() {
                    existing.properties.set(k, v);
                }
            }
            None => self.rules.push(rule),
        }
    }

    pub fn extend(&mut self, other: &StyleSheet) {
        for rule in &other.rules {
            self.push(rule.clone());
        }
    }

    /// Render as CSS text, one rule per block.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "{} {{", rule.selector);
            for (name, value) in rule.properties.iter() {
                let _ = writeln!(out, "  {name}: {value};");
            }
            out.push_str("}\n");
        }
        out
    }
}

impl Serialize for StyleSheet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(&rule.selector, &rule.properties)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StyleSheet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SheetVisitor;

        impl<'de> Visitor<'de> for SheetVisitor {
            type Value = StyleSheet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of selector to declarations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StyleSheet, A::Error> {
                let mut sheet = StyleSheet::new();
                while let Some((selector, properties)) = access.next_entry::<String, DeclMap>()? {
                    sheet.push(CssRule {
                        selector,
                        properties,
                    });
                }
                Ok(sheet)
            }
        }

        deserializer.deserialize_map(SheetVisitor)
    }
}

// ─── Component stylesheet ────────────────────────────────────────────────

/// Styling shared by palette components, carried into bundle exports.
pub fn component_stylesheet() -> StyleSheet {
    let rules = [
        CssRule::new("*, *::before, *::after").with("box-sizing", "border-box"),
        CssRule::new("body")
            .with("margin", "0")
            .with("font-family", "system-ui, -apple-system, sans-serif")
            .with("line-height", "1.5"),
        CssRule::new(".container")
            .with("max-width", "1200px")
            .with("margin", "0 auto")
            .with("padding", "20px"),
        CssRule::new(".flex-row").with("display", "flex").with("gap", "16px"),
        CssRule::new(".flex-column")
            .with("display", "flex")
            .with("flex-direction", "column")
            .with("gap", "16px"),
        CssRule::new(".grid-2")
            .with("display", "grid")
            .with("grid-template-columns", "repeat(2, 1fr)")
            .with("gap", "20px"),
        CssRule::new(".grid-3")
            .with("display", "grid")
            .with("grid-template-columns", "repeat(3, 1fr)")
            .with("gap", "20px"),
        CssRule::new(".btn")
            .with("display", "inline-block")
            .with("padding", "10px 20px")
            .with("border", "none")
            .with("border-radius", "6px")
            .with("cursor", "pointer")
            .with("font-size", "16px"),
        CssRule::new(".btn-primary")
            .with("background-color", "#3b82f6")
            .with("color", "#fff"),
        CssRule::new(".btn-secondary")
            .with("background-color", "#6b7280")
            .with("color", "#fff"),
        CssRule::new(".btn-outline")
            .with("background-color", "transparent")
            .with("border", "2px solid #3b82f6")
            .with("color", "#3b82f6"),
        CssRule::new(".card")
            .with("background-color", "#fff")
            .with("border-radius", "8px")
            .with("box-shadow", "0 2px 8px rgba(0, 0, 0, 0.1)")
            .with("padding", "20px"),
        CssRule::new(".navbar")
            .with("display", "flex")
            .with("justify-content", "space-between")
            .with("align-items", "center")
            .with("padding", "16px 24px")
            .with("background-color", "#1f2937")
            .with("color", "#fff"),
        CssRule::new(".navbar a")
            .with("color", "inherit")
            .with("margin-left", "16px")
            .with("text-decoration", "none"),
        CssRule::new(".hero")
            .with("padding", "80px 20px")
            .with("text-align", "center")
            .with("background-color", "#eef2ff"),
        CssRule::new(".footer")
            .with("padding", "24px")
            .with("text-align", "center")
            .with("background-color", "#111827")
            .with("color", "#9ca3af"),
        CssRule::new(".tab-buttons")
            .with("display", "flex")
            .with("border-bottom", "1px solid #e5e7eb"),
        CssRule::new(".tab-button")
            .with("padding", "10px 16px")
            .with("border", "none")
            .with("background", "none")
            .with("cursor", "pointer"),
        CssRule::new(".tab-button.active").with("border-bottom", "2px solid #3b82f6"),
        CssRule::new(".tab-panel").with("display", "none").with("padding", "16px"),
        CssRule::new(".tab-panel.active").with("display", "block"),
        CssRule::new(".accordion-header")
            .with("width", "100%")
            .with("padding", "12px 16px")
            .with("text-align", "left")
            .with("border", "none")
            .with("background-color", "#f3f4f6")
            .with("cursor", "pointer"),
        CssRule::new(".accordion-content")
            .with("display", "none")
            .with("padding", "12px 16px"),
        CssRule::new(".accordion-item.open .accordion-content").with("display", "block"),
        CssRule::new(".modal")
            .with("display", "none")
            .with("position", "fixed")
            .with("inset", "0")
            .with("background-color", "rgba(0, 0, 0, 0.5)")
            .with("align-items", "center")
            .with("justify-content", "center"),
        CssRule::new(".modal.open").with("display", "flex"),
        CssRule::new(".modal-content")
            .with("background-color", "#fff")
            .with("padding", "24px")
            .with("border-radius", "8px")
            .with("min-width", "320px"),
        CssRule::new(".carousel").with("position", "relative").with("overflow", "hidden"),
        CssRule::new(".carousel-slide").with("display", "none"),
        CssRule::new(".carousel-slide.active").with("display", "block"),
        CssRule::new(".alert")
            .with("padding", "12px 16px")
            .with("border-radius", "6px")
            .with("background-color", "#fef3c7")
            .with("color", "#92400e"),
        CssRule::new(".badge")
            .with("display", "inline-block")
            .with("padding", "2px 8px")
            .with("border-radius", "9999px")
            .with("font-size", "12px")
            .with("background-color", "#3b82f6")
            .with("color", "#fff"),
    ];
    let mut sheet = StyleSheet::new();
    for rule in rules {
        sheet.push(rule);
    }
    sheet
}
