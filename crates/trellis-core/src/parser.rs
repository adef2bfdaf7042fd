//! Markup parser for well-formed HTML fragments.
//!
//! Built on `winnow` 0.7 for the token level (tags, attributes, quoted
//! values); tree structure is tracked with an explicit stack so deeply
//! nested input cannot exhaust the call stack. Handles void elements,
//! self-closing syntax, comments, doctype, raw-text elements
//! (`script`, `style`, `textarea`, `title`), and common entities.
//!
//! This is not a browser-grade HTML parser: unclosed or mismatched tags
//! are errors rather than being repaired.

use crate::decl::DeclMap;
use crate::error::{ImportError, ImportResult};
use crate::markup::{MarkupNode, MarkupParser};
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Elements that never have content or a closing tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose body is kept verbatim, without entity handling.
pub const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Elements whose body is plain text: tags inside are not parsed, but
/// entities are decoded.
pub const RCDATA_TAGS: &[&str] = &["textarea", "title"];

/// Whether the body of `tag` is read as one text run.
#[must_use]
pub fn is_text_body(tag: &str) -> bool {
    RAW_TEXT_TAGS.contains(&tag) || RCDATA_TAGS.contains(&tag)
}

/// The bundled [`MarkupParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl MarkupParser for HtmlParser {
    fn parse(&self, markup: &str) -> ImportResult<Vec<MarkupNode>> {
        parse_markup(markup)
    }
}

struct Frame {
    tag: String,
    attributes: DeclMap,
    children: Vec<MarkupNode>,
    offset: usize,
}

/// Parse a markup fragment into a list of top-level nodes.
pub fn parse_markup(input: &str) -> ImportResult<Vec<MarkupNode>> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut top: Vec<MarkupNode> = Vec::new();
    let mut rest = input;
    let offset = |r: &str| input.len() - r.len();

    while !rest.is_empty() {
        let at = offset(rest);
        if rest.starts_with("<!--") {
            let end = rest
                .find("-->")
                .ok_or_else(|| markup_error(at, "unterminated comment"))?;
            rest = &rest[end + 3..];
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest
                .find('>')
                .ok_or_else(|| markup_error(at, "unterminated declaration"))?;
            rest = &rest[end + 1..];
        } else if rest.starts_with("</") {
            let name = parse_close_tag
                .parse_next(&mut rest)
                .map_err(|_| markup_error(at, "malformed closing tag"))?;
            let frame = stack
                .pop()
                .ok_or_else(|| markup_error(at, format!("unexpected </{name}>")))?;
            if !frame.tag.eq_ignore_ascii_case(name) {
                return Err(markup_error(
                    at,
                    format!("expected </{}>, found </{name}>", frame.tag),
                ));
            }
            let node = MarkupNode::Element {
                tag: frame.tag,
                attributes: frame.attributes,
                children: frame.children,
            };
            push_node(&mut stack, &mut top, node);
        } else if starts_open_tag(rest) {
            let (name, attributes, self_closing) = parse_open_tag
                .parse_next(&mut rest)
                .map_err(|_| markup_error(at, "malformed tag"))?;
            let tag = name.to_ascii_lowercase();
            if self_closing || VOID_TAGS.contains(&tag.as_str()) {
                let node = MarkupNode::Element {
                    tag,
                    attributes,
                    children: Vec::new(),
                };
                push_node(&mut stack, &mut top, node);
            } else if is_text_body(&tag) {
                let close = format!("</{tag}");
                let end = rest
                    .to_ascii_lowercase()
                    .find(&close)
                    .ok_or_else(|| markup_error(at, format!("unclosed <{tag}>")))?;
                let body = &rest[..end];
                rest = &rest[end..];
                let close_at = offset(rest);
                parse_close_tag
                    .parse_next(&mut rest)
                    .map_err(|_| markup_error(close_at, "malformed closing tag"))?;
                let mut children = Vec::new();
                if !body.trim().is_empty() {
                    let text = if RAW_TEXT_TAGS.contains(&tag.as_str()) {
                        body.to_string()
                    } else {
                        decode_entities(body)
                    };
                    children.push(MarkupNode::Text(text));
                }
                let node = MarkupNode::Element {
                    tag,
                    attributes,
                    children,
                };
                push_node(&mut stack, &mut top, node);
            } else {
                stack.push(Frame {
                    tag,
                    attributes,
                    children: Vec::new(),
                    offset: at,
                });
            }
        } else {
            // Text up to the next `<`; a stray `<` that opens no tag is text.
            let skip = usize::from(rest.starts_with('<'));
            let end = rest[skip..]
                .find('<')
                .map(|i| i + skip)
                .unwrap_or(rest.len());
            let raw = &rest[..end];
            rest = &rest[end..];
            if !raw.trim().is_empty() {
                push_node(&mut stack, &mut top, MarkupNode::Text(decode_entities(raw)));
            }
        }
    }

    if let Some(frame) = stack.last() {
        return Err(markup_error(frame.offset, format!("unclosed <{}>", frame.tag)));
    }
    Ok(top)
}

fn push_node(stack: &mut [Frame], top: &mut Vec<MarkupNode>, node: MarkupNode) {
    match stack.last_mut() {
        Some(frame) => frame.children.push(node),
        None => top.push(node),
    }
}

fn markup_error(offset: usize, message: impl Into<String>) -> ImportError {
    ImportError::Markup {
        offset,
        message: message.into(),
    }
}

fn starts_open_tag(s: &str) -> bool {
    s.starts_with('<') && s[1..].starts_with(|c: char| c.is_ascii_alphabetic())
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn parse_tag_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':'
    })
    .parse_next(input)
}

fn parse_attr_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
    })
    .parse_next(input)
}

fn parse_attr_value(input: &mut &str) -> ModalResult<String> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
        take_while(1.., |c: char| !c.is_whitespace() && c != '>'),
    ))
    .map(decode_entities)
    .parse_next(input)
}

fn parse_open_tag<'a>(input: &mut &'a str) -> ModalResult<(&'a str, DeclMap, bool)> {
    let _ = '<'.parse_next(input)?;
    let name = parse_tag_name.parse_next(input)?;
    let mut attributes = DeclMap::new();
    loop {
        let _: &str = multispace0.parse_next(input)?;
        if input.starts_with("/>") {
            *input = &input[2..];
            return Ok((name, attributes, true));
        }
        if input.starts_with('>') {
            *input = &input[1..];
            return Ok((name, attributes, false));
        }
        if input.starts_with('/') {
            *input = &input[1..];
            continue;
        }
        let attr = parse_attr_name.parse_next(input)?;
        let _: &str = multispace0.parse_next(input)?;
        let value = if input.starts_with('=') {
            *input = &input[1..];
            let _: &str = multispace0.parse_next(input)?;
            parse_attr_value.parse_next(input)?
        } else {
            String::new()
        };
        attributes.set(attr.to_ascii_lowercase(), value);
    }
}

fn parse_close_tag<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let _ = "</".parse_next(input)?;
    let name = parse_tag_name.parse_next(input)?;
    let _: &str = multispace0.parse_next(input)?;
    let _ = '>'.parse_next(input)?;
    Ok(name)
}

/// Decode named and numeric character references. Unknown references are
/// kept verbatim.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "times" => '×',
        "hellip" => '…',
        "mdash" => '—',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(nodes: &[MarkupNode], i: usize) -> (&str, &DeclMap, &[MarkupNode]) {
        match &nodes[i] {
            MarkupNode::Element {
                tag,
                attributes,
                children,
            } => (tag.as_str(), attributes, children.as_slice()),
            MarkupNode::Text(t) => panic!("expected element, got text {t:?}"),
        }
    }

    #[test]
    fn parses_nested_elements_and_text() {
        let nodes = parse_markup("<div><p>Hi</p><span>there</span></div>").unwrap();
        assert_eq!(nodes.len(), 1);
        let (tag, _, children) = element(&nodes, 0);
        assert_eq!(tag, "div");
        assert_eq!(children.len(), 2);
        let (p, _, p_children) = element(children, 0);
        assert_eq!(p, "p");
        assert_eq!(p_children, &[MarkupNode::Text("Hi".into())]);
    }

    #[test]
    fn attribute_forms() {
        let nodes =
            parse_markup(r#"<input type=checkbox checked data-x='a "b"' VALUE="1 &amp; 2">"#)
                .unwrap();
        let (tag, attrs, children) = element(&nodes, 0);
        assert_eq!(tag, "input");
        assert!(children.is_empty());
        assert_eq!(
            attrs.iter().collect::<Vec<_>>(),
            vec![
                ("type", "checkbox"),
                ("checked", ""),
                ("data-x", r#"a "b""#),
                ("value", "1 & 2"),
            ]
        );
    }

    #[test]
    fn void_and_self_closing() {
        let nodes = parse_markup("<p>a<br>b<img src=\"x.png\"/></p>").unwrap();
        let (_, _, children) = element(&nodes, 0);
        assert_eq!(children.len(), 4);
        assert_eq!(element(children, 1).0, "br");
        assert_eq!(element(children, 3).0, "img");
    }

    #[test]
    fn comments_doctype_and_whitespace_are_skipped() {
        let nodes = parse_markup("<!DOCTYPE html>\n<!-- hi -->\n<main>\n  <h1>T</h1>\n</main>\n")
            .unwrap();
        assert_eq!(nodes.len(), 1);
        let (_, _, children) = element(&nodes, 0);
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn raw_text_elements_keep_markup() {
        let nodes = parse_markup("<script>if (a < b) { x(\"</p>\"); }</script>").unwrap();
        let (tag, _, children) = element(&nodes, 0);
        assert_eq!(tag, "script");
        assert_eq!(
            children,
            &[MarkupNode::Text("if (a < b) { x(\"</p>\"); }".into())]
        );
    }

    #[test]
    fn mismatched_and_unclosed_tags_fail() {
        let err = parse_markup("<div><p>x</div>").unwrap_err();
        assert!(matches!(err, ImportError::Markup { offset: 9, .. }), "{err:?}");

        let err = parse_markup("<section><p>x</p>").unwrap_err();
        assert!(matches!(err, ImportError::Markup { offset: 0, .. }), "{err:?}");

        assert!(parse_markup("</div>").is_err());
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let nodes = parse_markup("<p>1 < 2</p>").unwrap();
        let (_, _, children) = element(&nodes, 0);
        let text: String = children
            .iter()
            .map(|c| match c {
                MarkupNode::Text(t) => t.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(text, "1 < 2");
    }

    #[test]
    fn entity_decoding() {
        assert_eq!(decode_entities("a &lt;b&gt; &#65;&#x42; &bogus; &"), "a <b> AB &bogus; &");
    }
}
