//! Inline style declarations: parsing, rendering, and the computed snapshot.
//!
//! Parsing is forgiving. A malformed declaration is reported and skipped,
//! and the rest of the style attribute still applies.

use crate::decl::DeclMap;
use crate::error::StyleParseError;
use winnow::ascii::space0;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// Properties captured by the computed-style snapshot.
pub const COMPUTED_PROPERTIES: &[&str] = &[
    "display",
    "position",
    "width",
    "height",
    "margin",
    "padding",
    "color",
    "background-color",
    "font-size",
    "font-weight",
    "font-family",
    "text-align",
    "border",
    "border-radius",
    "flex-direction",
    "justify-content",
    "align-items",
    "gap",
    "grid-template-columns",
    "opacity",
];

const INLINE_TAGS: &[&str] = &[
    "a", "span", "strong", "em", "b", "i", "u", "small", "code", "label", "img", "abbr", "sub",
    "sup", "br", "iframe", "video",
];

const INLINE_BLOCK_TAGS: &[&str] = &["button", "input", "select", "textarea"];

/// Parse the text of a `style` attribute.
///
/// Returns the well-formed declarations in source order plus one error per
/// skipped declaration.
pub fn parse_style(text: &str) -> (DeclMap, Vec<StyleParseError>) {
    let mut decls = DeclMap::new();
    let mut errors = Vec::new();
    for raw in split_declarations(text) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_declaration(trimmed) {
            Ok((name, value)) => {
                decls.set(name, value);
            }
            Err(e) => {
                log::debug!("skipping style declaration: {e}");
                errors.push(e);
            }
        }
    }
    (decls, errors)
}

/// Check a single `name: value` pair coming from a canonical node.
pub fn validate_declaration(name: &str, value: &str) -> Result<(), StyleParseError> {
    let declaration = || format!("{name}: {value}");
    if !is_property_name(name) {
        return Err(StyleParseError {
            declaration: declaration(),
            reason: "invalid property name",
        });
    }
    if value.trim().is_empty() {
        return Err(StyleParseError {
            declaration: declaration(),
            reason: "empty value",
        });
    }
    if value.contains([';', '{', '}']) {
        return Err(StyleParseError {
            declaration: declaration(),
            reason: "value contains a declaration separator",
        });
    }
    Ok(())
}

/// Render declarations as `style` attribute text.
pub fn render_style(decls: &DeclMap) -> String {
    let mut out = String::new();
    for (name, value) in decls.iter() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

/// Informational snapshot of [`COMPUTED_PROPERTIES`] for an element.
///
/// Inline values are taken as-is. `display` falls back to the user-agent
/// default for the tag; every other missing property is left out.
pub fn computed_snapshot(tag: &str, inline: &DeclMap) -> DeclMap {
    let mut snapshot = DeclMap::new();
    for &prop in COMPUTED_PROPERTIES {
        if let Some(v) = inline.get(prop) {
            snapshot.set(prop, v);
        } else if prop == "display" {
            snapshot.set(prop, default_display(tag));
        }
    }
    snapshot
}

/// The user-agent `display` value for `tag`.
pub fn default_display(tag: &str) -> &'static str {
    if tag == "li" {
        "list-item"
    } else if INLINE_TAGS.contains(&tag) {
        "inline"
    } else if INLINE_BLOCK_TAGS.contains(&tag) {
        "inline-block"
    } else {
        "block"
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

/// Split on `;` outside quotes and parentheses (`url(a;b)`, `"a;b"`).
fn split_declarations(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn is_property_name(name: &str) -> bool {
    let body = name.strip_prefix("--").unwrap_or_else(|| name.strip_prefix('-').unwrap_or(name));
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || (name.starts_with("--") && c.is_ascii_alphanumeric()) => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}

fn parse_property_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_').parse_next(input)
}

fn parse_declaration_parts<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    let name = parse_property_name.parse_next(input)?;
    let _: &str = space0.parse_next(input)?;
    let _ = ':'.parse_next(input)?;
    let value = *input;
    *input = "";
    Ok((name, value))
}

fn parse_declaration(raw: &str) -> Result<(String, String), StyleParseError> {
    let mut rest = raw;
    let (name, value) = parse_declaration_parts
        .parse_next(&mut rest)
        .map_err(|_: winnow::error::ErrMode<ContextError>| StyleParseError {
            declaration: raw.to_string(),
            reason: if raw.contains(':') {
                "invalid property name"
            } else {
                "missing `:`"
            },
        })?;
    let name = name.to_ascii_lowercase();
    let value = value.trim();
    validate_declaration(&name, value)?;
    Ok((name, value.to_string()))
}
