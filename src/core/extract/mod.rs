//! Source adapters: turn one document into an ordered observation batch.
//!
//! ## Module Structure
//!
//! - `markup`: `<el t="key">` marker attributes in HTML templates
//! - `script`: calls to the configured translation function in JS/TS
//!
//! Adapters never touch the catalog. They return observations in emission
//! order plus the issues found along the way, so documents can be extracted
//! in parallel and merged later in discovery order.

pub mod markup;
pub mod script;

use std::{fs, sync::Arc};

use swc_common::SourceMap;

use crate::{
    config::Config,
    core::{
        DocumentBatch, SourceKind, TranslationObservation,
        file_scanner::SourceFile,
        parsers::{html::parse_html, script::parse_script_source},
    },
    issues::{Issue, ParseErrorIssue},
};

pub use markup::extract_markup;
pub use script::{ScriptExtractor, extract_script};

/// Observations and issues produced for a single document.
#[derive(Debug, Default)]
pub struct Extraction {
    pub observations: Vec<TranslationObservation>,
    pub issues: Vec<Issue>,
}

impl Extraction {
    fn failed(document: &str, error: impl ToString) -> Self {
        Self {
            observations: Vec::new(),
            issues: vec![
                ParseErrorIssue {
                    file_path: document.to_string(),
                    error: error.to_string(),
                }
                .into(),
            ],
        }
    }

    pub fn into_batch(self, file: &SourceFile) -> (DocumentBatch, Vec<Issue>) {
        (
            DocumentBatch::new(file.document.clone(), file.kind, self.observations),
            self.issues,
        )
    }
}

/// Extract observations from in-memory document content.
///
/// A document that cannot be parsed yields a single `parse-error` issue.
pub fn extract_source(
    document: &str,
    kind: SourceKind,
    content: String,
    config: &Config,
    source_map: Arc<SourceMap>,
) -> Extraction {
    match kind {
        SourceKind::Markup => match parse_html(&content) {
            Ok(parsed) => extract_markup(document, &content, &parsed, &config.marker_attribute),
            Err(e) => Extraction::failed(document, e),
        },
        SourceKind::Script => match parse_script_source(content, document, source_map) {
            Ok(parsed) => {
                let extractor = ScriptExtractor::new(config);
                extract_script(document, &parsed, &extractor)
            }
            Err(e) => Extraction::failed(document, e),
        },
    }
}

/// Read and extract a discovered document.
pub fn extract_file(file: &SourceFile, config: &Config, source_map: Arc<SourceMap>) -> Extraction {
    match fs::read_to_string(&file.path) {
        Ok(content) => extract_source(&file.document, file.kind, content, config, source_map),
        Err(e) => Extraction::failed(&file.document, format!("Failed to read file: {}", e)),
    }
}
