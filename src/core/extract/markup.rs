//! Markup adapter.
//!
//! Every element carrying the marker attribute (default `t`) yields one
//! observation per `;`-separated key spec. A spec is `key` or `key[target]`:
//!
//! | target                      | value                                   |
//! |-----------------------------|-----------------------------------------|
//! | `text` (default)            | trimmed element text                    |
//! | `html`, `prepend`, `append` | trimmed inner markup                    |
//! | anything else               | the element attribute of that name      |
//!
//! `<img>` defaults to `src` instead of `text`.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    core::{
        LineIndex, SourceLocation, TranslationObservation,
        normalize::INTERPOLATION_MARKER,
        parsers::html::{Document, Element},
    },
    issues::{InterpolationIssue, InterpolationTarget, MarkupInTextIssue},
};

use super::Extraction;

static TARGET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[([a-z\-]*)\]").unwrap());

/// What a key spec reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Text,
    Html,
    Attribute(String),
}

impl Target {
    fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "text" => Target::Text,
            "html" | "prepend" | "append" => Target::Html,
            other => Target::Attribute(other.to_string()),
        }
    }

    fn default_for(element: &Element) -> Self {
        if element.name == "img" {
            Target::Attribute("src".to_string())
        } else {
            Target::Text
        }
    }
}

/// Split a key spec into its key and explicit target name.
///
/// The first `[target]` group is removed from the key wherever it appears.
pub fn parse_key_spec(spec: &str) -> (String, Option<String>) {
    match TARGET_REGEX.captures(spec) {
        Some(caps) => {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
            let mut key = spec.to_string();
            key.replace_range(whole, "");
            let target = caps.get(1).map(|m| m.as_str().to_string());
            (key.trim().to_string(), target.filter(|t| !t.is_empty()))
        }
        None => (spec.trim().to_string(), None),
    }
}

/// Extract observations from a parsed HTML template, in document order.
pub fn extract_markup(document: &str, source: &str, parsed: &Document, marker: &str) -> Extraction {
    let lines = LineIndex::new(source);
    let mut extraction = Extraction::default();

    for element in parsed.elements() {
        let Some(specs) = element.attribute(marker) else {
            continue;
        };
        let (line, col) = lines.line_col(element.start);
        let location = SourceLocation::new(document, line, col);

        for spec in specs.split(';') {
            let (key, target) = parse_key_spec(spec);
            if key.is_empty() {
                continue;
            }
            let target = match target {
                Some(name) => Target::parse(&name),
                None => Target::default_for(element),
            };

            let value = match &target {
                Target::Text => {
                    let text = element.text().trim().to_string();
                    if element.has_element_children() {
                        extraction.issues.push(
                            MarkupInTextIssue {
                                key: key.clone(),
                                text: text.clone(),
                                html: element.inner_html(source).trim().to_string(),
                                location: location.clone(),
                            }
                            .into(),
                        );
                    }
                    Some(text)
                }
                Target::Html => Some(element.inner_html(source).trim().to_string()),
                Target::Attribute(name) => element.attribute(name).map(String::from),
            };

            if let Some(value) = &value
                && value.contains(INTERPOLATION_MARKER)
            {
                extraction.issues.push(
                    InterpolationIssue {
                        key: key.clone(),
                        target: InterpolationTarget::Value,
                        value: Some(value.clone()),
                        location: location.clone(),
                    }
                    .into(),
                );
            }

            extraction
                .observations
                .push(TranslationObservation::new(key, value, location.clone()));
        }
    }

    extraction
}
