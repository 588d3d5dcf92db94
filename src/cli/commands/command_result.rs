use std::path::PathBuf;

use crate::issues::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Build,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Build(BuildSummary),
    Init(InitSummary),
}

/// Counts of a written diff report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSummary {
    pub path: PathBuf,
    pub new_count: usize,
    pub changed_count: usize,
    pub removed_count: usize,
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Number of source documents extracted.
    pub document_count: usize,
    /// Number of keys in the merged catalog.
    pub key_count: usize,
    /// Catalog file written, relative to the output directory.
    pub catalog_file: Option<String>,
    pub diff: Option<DiffSummary>,
    pub index_file: Option<PathBuf>,
    /// Languages found in the index, sorted.
    pub languages: Vec<String>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running glean commands
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// All issues reported during the build, sorted for display.
    /// Empty for `init`.
    pub issues: Vec<Issue>,
}
