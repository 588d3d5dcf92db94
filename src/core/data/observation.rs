use std::fmt;

use super::SourceLocation;

/// Which upstream adapter produced an observation batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// HTML templates (`<span t="key">`).
    Markup,
    /// JavaScript/TypeScript calls (`i18next.t("key", null, "Default")`).
    Script,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Markup => write!(f, "markup"),
            SourceKind::Script => write!(f, "script"),
        }
    }
}

/// One extracted `(key, value)` pair, before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationObservation {
    /// Dot-delimited catalog path (e.g., "home.title").
    pub key: String,
    /// Default text. `None` when the source gave no default.
    pub value: Option<String>,
    pub location: SourceLocation,
}

impl TranslationObservation {
    pub fn new(key: impl Into<String>, value: Option<String>, location: SourceLocation) -> Self {
        Self {
            key: key.into(),
            value,
            location,
        }
    }
}

/// All observations an adapter emitted for a single document, in emission order.
#[derive(Debug, Clone)]
pub struct DocumentBatch {
    /// Document identity: its path relative to the source root.
    pub document: String,
    pub kind: SourceKind,
    pub observations: Vec<TranslationObservation>,
}

impl DocumentBatch {
    pub fn new(
        document: impl Into<String>,
        kind: SourceKind,
        observations: Vec<TranslationObservation>,
    ) -> Self {
        Self {
            document: document.into(),
            kind,
            observations,
        }
    }
}
