//! Issue types for extraction and build results.
//!
//! Nothing in the engine aborts a build: every problem becomes an `Issue`
//! collected on the `BuildContext`. Each issue is self-contained with all
//! information the reporter needs to display it.

use enum_dispatch::enum_dispatch;

use crate::core::{CatalogConflict, SourceLocation};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    StructuralConflict,
    NonLiteralArgument,
    MissingDefault,
    MismatchedDefinition,
    Interpolation,
    MarkupInText,
    DuplicateValue,
    InvalidOutputFile,
    ParseError,
    WriteError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::StructuralConflict => write!(f, "structural-conflict"),
            Rule::NonLiteralArgument => write!(f, "non-literal-argument"),
            Rule::MissingDefault => write!(f, "missing-default"),
            Rule::MismatchedDefinition => write!(f, "mismatched-definition"),
            Rule::Interpolation => write!(f, "interpolation"),
            Rule::MarkupInText => write!(f, "markup-in-text"),
            Rule::DuplicateValue => write!(f, "duplicate-value"),
            Rule::InvalidOutputFile => write!(f, "invalid-output-file"),
            Rule::ParseError => write!(f, "parse-error"),
            Rule::WriteError => write!(f, "write-error"),
        }
    }
}

// ============================================================
// Issue Types - Catalog
// ============================================================

/// Key that cannot be stored because of a leaf/branch collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralConflictIssue {
    pub key: String,
    pub kind: CatalogConflict,
    /// Where the rejected observation came from. `None` for baseline overlay conflicts.
    pub location: Option<SourceLocation>,
}

impl StructuralConflictIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::StructuralConflict
    }
}

/// Same key defined twice with different default values. The later value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchedDefinitionIssue {
    pub key: String,
    pub previous: String,
    pub current: String,
    pub location: SourceLocation,
}

impl MismatchedDefinitionIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MismatchedDefinition
    }
}

/// Key without a default value; the key itself is used as the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDefaultIssue {
    pub key: String,
    pub location: SourceLocation,
}

impl MissingDefaultIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MissingDefault
    }
}

/// Several keys share the exact same default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateValueIssue {
    pub value: String,
    pub keys: Vec<String>,
}

impl DuplicateValueIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::DuplicateValue
    }
}

// ============================================================
// Issue Types - Source Documents
// ============================================================

/// Translation call whose key or default value is not a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonLiteralArgumentIssue {
    pub function: String,
    pub location: SourceLocation,
}

impl NonLiteralArgumentIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::NonLiteralArgument
    }
}

/// Where an unresolved `${...}` placeholder was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationTarget {
    Key,
    Value,
}

/// Key or value still containing a runtime placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationIssue {
    pub key: String,
    pub target: InterpolationTarget,
    /// The offending value, for `InterpolationTarget::Value`.
    pub value: Option<String>,
    pub location: SourceLocation,
}

impl InterpolationIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::Interpolation
    }
}

/// Element bound as `text` that contains nested elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupInTextIssue {
    pub key: String,
    pub text: String,
    pub html: String,
    pub location: SourceLocation,
}

impl MarkupInTextIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::MarkupInText
    }
}

// ============================================================
// Issue Types - Files
// ============================================================

/// Source document could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

/// Localized output file that is not valid JSON; left out of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOutputFileIssue {
    pub file_path: String,
    pub error: String,
}

impl InvalidOutputFileIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::InvalidOutputFile
    }
}

/// An output artifact could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl WriteErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::WriteError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found during a build.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    StructuralConflict(StructuralConflictIssue),
    MismatchedDefinition(MismatchedDefinitionIssue),
    MissingDefault(MissingDefaultIssue),
    DuplicateValue(DuplicateValueIssue),
    NonLiteralArgument(NonLiteralArgumentIssue),
    Interpolation(InterpolationIssue),
    MarkupInText(MarkupInTextIssue),
    ParseError(ParseErrorIssue),
    InvalidOutputFile(InvalidOutputFileIssue),
    WriteError(WriteErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::StructuralConflict(_) => StructuralConflictIssue::severity(),
            Issue::MismatchedDefinition(_) => MismatchedDefinitionIssue::severity(),
            Issue::MissingDefault(_) => MissingDefaultIssue::severity(),
            Issue::DuplicateValue(_) => DuplicateValueIssue::severity(),
            Issue::NonLiteralArgument(_) => NonLiteralArgumentIssue::severity(),
            Issue::Interpolation(_) => InterpolationIssue::severity(),
            Issue::MarkupInText(_) => MarkupInTextIssue::severity(),
            Issue::ParseError(_) => ParseErrorIssue::severity(),
            Issue::InvalidOutputFile(_) => InvalidOutputFileIssue::severity(),
            Issue::WriteError(_) => WriteErrorIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::StructuralConflict(_) => StructuralConflictIssue::rule(),
            Issue::MismatchedDefinition(_) => MismatchedDefinitionIssue::rule(),
            Issue::MissingDefault(_) => MissingDefaultIssue::rule(),
            Issue::DuplicateValue(_) => DuplicateValueIssue::rule(),
            Issue::NonLiteralArgument(_) => NonLiteralArgumentIssue::rule(),
            Issue::Interpolation(_) => InterpolationIssue::rule(),
            Issue::MarkupInText(_) => MarkupInTextIssue::rule(),
            Issue::ParseError(_) => ParseErrorIssue::rule(),
            Issue::InvalidOutputFile(_) => InvalidOutputFileIssue::rule(),
            Issue::WriteError(_) => WriteErrorIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Position inside a source document.
    Source(&'a SourceLocation),
    /// File-level only (parse errors, output files).
    File { path: &'a str },
    /// Catalog-wide issue with no single location.
    Catalog,
}

/// Trait for types that can be reported to CLI.
///
/// Implemented by all issue types; `enum_dispatch` forwards calls on `Issue`.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    /// Severity level.
    fn report_severity(&self) -> Severity;

    /// Rule identifier.
    fn report_rule(&self) -> Rule;

    /// Optional lines for "= note:" output.
    fn details(&self) -> Vec<String> {
        Vec::new()
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for StructuralConflictIssue {
    fn location(&self) -> ReportLocation<'_> {
        match &self.location {
            Some(location) => ReportLocation::Source(location),
            None => ReportLocation::Catalog,
        }
    }

    fn message(&self) -> String {
        match &self.kind {
            CatalogConflict::ParentInUse { parent } => format!(
                "Translation key \"{}\" cannot be used because the parent {} is already in use.",
                self.key, parent
            ),
            CatalogConflict::HasSubKeys { .. } => format!(
                "Translation key \"{}\" cannot be used because there are already sub-keys",
                self.key
            ),
        }
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Vec<String> {
        match &self.kind {
            CatalogConflict::ParentInUse { .. } => Vec::new(),
            CatalogConflict::HasSubKeys { sub_keys } => sub_keys.clone(),
        }
    }
}

impl Report for MismatchedDefinitionIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        format!("Translation key \"{}\" has mismatching definitions", self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Vec<String> {
        vec![
            format!("1. {}", self.previous),
            format!("2. {}", self.current),
        ]
    }
}

impl Report for MissingDefaultIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        format!("Translation key \"{}\" has no default value", self.key)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for DuplicateValueIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Catalog
    }

    fn message(&self) -> String {
        format!("There are multiple keys for translation \"{}\"", self.value)
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Vec<String> {
        self.keys.clone()
    }
}

impl Report for NonLiteralArgumentIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        format!(
            "Call to \"{}\" contains non-literal arguments",
            self.function
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for InterpolationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        match self.target {
            InterpolationTarget::Key => format!(
                "Translation key \"{}\" contains non-i18next interpolation",
                self.key
            ),
            InterpolationTarget::Value => format!(
                "Translation key \"{}\" contains template interpolation in its value",
                self.key
            ),
        }
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Vec<String> {
        self.value.iter().cloned().collect()
    }
}

impl Report for MarkupInTextIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.location)
    }

    fn message(&self) -> String {
        format!(
            "Translation key \"{}\" contains HTML elements but is bound as text",
            self.key
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Vec<String> {
        vec![
            format!("Text: {}", self.text),
            format!("Html: {}", self.html),
        ]
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for InvalidOutputFileIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        format!(
            "Translation file {} is not valid JSON: {}",
            self.file_path, self.error
        )
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

impl Report for WriteErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}
