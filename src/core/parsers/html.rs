//! Tolerant HTML template reader.
//!
//! Builds a minimal element tree on top of `quick-xml`'s event reader. HTML is
//! not XML, so the reader runs with end-name checks disabled and the tree
//! builder repairs what the tokenizer lets through:
//!
//! - void elements (`<img>`, `<br>`, ...) never take children
//! - a closing tag closes the nearest open element of the same name, and any
//!   elements still open inside it
//! - a closing tag with no open counterpart is dropped
//! - elements still open at end of input are closed there
//!
//! Text and attribute values are decoded with the HTML5 entity table, so
//! `&nbsp;` and `&eacute;` read the same as in a browser.
//!
//! Each element keeps the byte range of its inner markup, so callers can read
//! it back verbatim from the source.

use std::ops::Range;

use quick_xml::{
    Reader,
    escape::resolve_html5_entity,
    events::{BytesStart, Event},
};
use thiserror::Error;

/// Elements that cannot have content.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("invalid markup at byte {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub name: String,
    /// Attributes in source order, names lowercased. Valueless attributes map to "".
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Byte offset of the opening `<`.
    pub start: usize,
    /// Byte range between the opening and closing tags.
    pub inner: Range<usize>,
}

impl Element {
    fn new(name: String, attributes: Vec<(String, String)>, start: usize, inner_start: usize) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
            start,
            inner: inner_start..inner_start,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Inner markup as written in `source`.
    pub fn inner_html<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.inner.clone()).unwrap_or_default()
    }

    pub fn has_element_children(&self) -> bool {
        self.children.iter().any(|c| matches!(c, Node::Element(_)))
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Visit this element's descendants in document order (pre-order).
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        for child in self.child_elements() {
            f(child);
            child.walk(f);
        }
    }
}

/// A parsed template. The root is a synthetic element spanning the whole input.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// All elements in document order, including those inside `<template>`.
    pub fn elements(&self) -> Vec<&Element> {
        let mut elements = Vec::new();
        self.root.walk(&mut |e| elements.push(e));
        elements
    }
}

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Parse an HTML template into a `Document`.
pub fn parse_html(content: &str) -> Result<Document, MarkupError> {
    let mut reader = Reader::from_str(content);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.check_comments = false;
    config.expand_empty_elements = false;
    config.trim_text(false);

    let root = Element::new("#document".to_string(), Vec::new(), 0, 0);
    let mut stack = vec![root];

    loop {
        let event_start = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|source| MarkupError::Syntax {
            position: reader.error_position(),
            source,
        })?;
        let event_end = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                let (name, attributes) = read_tag(&e);
                let element = Element::new(name, attributes, event_start, event_end);
                if is_void_element(&element.name) {
                    append(&mut stack, Node::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(e) => {
                let (name, attributes) = read_tag(&e);
                let element = Element::new(name, attributes, event_start, event_end);
                append(&mut stack, Node::Element(element));
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                let Some(depth) = stack.iter().skip(1).rposition(|el| el.name == name) else {
                    continue;
                };
                close_until(&mut stack, depth + 1, event_start);
            }
            Event::Text(e) => {
                let text = match e.unescape_with(resolve_html5_entity) {
                    Ok(text) => text.into_owned(),
                    Err(_) => String::from_utf8_lossy(&e).into_owned(),
                };
                append(&mut stack, Node::Text(text));
            }
            Event::CData(e) => {
                append(&mut stack, Node::Text(String::from_utf8_lossy(&e).into_owned()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    close_until(&mut stack, 1, content.len());
    let mut root = stack.pop().unwrap_or_else(|| Element::new(String::new(), Vec::new(), 0, 0));
    root.inner = 0..content.len();
    Ok(Document { root })
}

fn read_tag(e: &BytesStart) -> (String, Vec<(String, String)>) {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
    let mut attributes = Vec::new();
    for attr in e.html_attributes().with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = match attr.unescape_value_with(resolve_html5_entity) {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attributes.push((key, value));
    }
    (name, attributes)
}

fn append(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// Close every open element at `depth` and above; their inner markup ends at `end`.
fn close_until(stack: &mut Vec<Element>, depth: usize, end: usize) {
    while stack.len() > depth {
        let Some(mut element) = stack.pop() else {
            break;
        };
        element.inner.end = end.max(element.inner.start);
        append(stack, Node::Element(element));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(doc: &Document) -> Vec<&str> {
        doc.elements().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_nested_elements_in_document_order() {
        let doc = parse_html("<div><p>One</p><template><span>Two</span></template></div>").unwrap();
        assert_eq!(names(&doc), vec!["div", "p", "template", "span"]);
    }

    #[test]
    fn test_text_and_inner_html() {
        let src = r#"<p t="intro"> Hello <b>world</b> </p>"#;
        let doc = parse_html(src).unwrap();
        let p = doc.elements()[0];

        assert_eq!(p.text(), " Hello world ");
        assert_eq!(p.inner_html(src), " Hello <b>world</b> ");
        assert!(p.has_element_children());
        assert_eq!(p.attribute("t"), Some("intro"));
    }

    #[test]
    fn test_void_elements_take_no_children() {
        let doc = parse_html(r#"<div><img src="a.png" alt="Logo"><span>x</span></div>"#).unwrap();
        let div = doc.elements()[0];
        let children: Vec<&str> = div.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(children, vec!["img", "span"]);
        assert_eq!(doc.elements()[1].attribute("alt"), Some("Logo"));
    }

    #[test]
    fn test_valueless_attributes() {
        let doc = parse_html("<input disabled t=\"field[placeholder]\" placeholder=Name>").unwrap();
        let input = doc.elements()[0];
        assert_eq!(input.attribute("disabled"), Some(""));
        assert_eq!(input.attribute("placeholder"), Some("Name"));
    }

    #[test]
    fn test_unclosed_elements_are_closed_at_end() {
        let src = "<ul><li>One<li>Two</ul><p>Tail";
        let doc = parse_html(src).unwrap();
        assert_eq!(names(&doc), vec!["ul", "li", "li", "p"]);
        let p = doc.elements()[3];
        assert_eq!(p.text(), "Tail");
        assert_eq!(p.inner_html(src), "Tail");
    }

    #[test]
    fn test_stray_closing_tag_is_ignored() {
        let doc = parse_html("<div>a</span>b</div>").unwrap();
        assert_eq!(names(&doc), vec!["div"]);
        assert_eq!(doc.elements()[0].text(), "ab");
    }

    #[test]
    fn test_entities_are_decoded() {
        let doc = parse_html(r#"<span title="Tom &amp; Jerry">a &lt; b</span>"#).unwrap();
        let span = doc.elements()[0];
        assert_eq!(span.attribute("title"), Some("Tom & Jerry"));
        assert_eq!(span.text(), "a < b");
    }

    #[test]
    fn test_html_named_entities_are_decoded() {
        let doc = parse_html(
            r#"<img alt="Caf&eacute;&nbsp;Logo"><span>A&nbsp;B &amp; Caf&eacute;</span>"#,
        )
        .unwrap();
        let elements = doc.elements();
        assert_eq!(elements[0].attribute("alt"), Some("Caf\u{e9}\u{a0}Logo"));
        assert_eq!(elements[1].text(), "A\u{a0}B & Caf\u{e9}");
    }

    #[test]
    fn test_element_start_offset() {
        let doc = parse_html("<div>\n  <span>x</span>\n</div>").unwrap();
        assert_eq!(doc.elements()[1].start, 8);
    }
}
