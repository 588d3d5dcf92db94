use std::{
    fs,
    path::{Path, PathBuf},
};

use colored::Colorize;
use indexmap::IndexMap;

use crate::{
    config::Config,
    core::{Catalog, DuplicateValueIndex, TranslationObservation},
    issues::{Issue, Severity},
};

/// Per-document observations, keyed by document path in discovery order.
pub type DocumentObservations = IndexMap<String, Vec<TranslationObservation>>;

/// State for a single build.
///
/// Created at build start and threaded through every engine step. Nothing
/// survives into the next build except what is explicitly reloaded (the
/// baseline), so a rebuild simply creates a fresh context.
///
/// # Lifecycle
///
/// 1. `BuildContext::new()` with the resolved configuration
/// 2. `load_baseline()` before any observation is merged
/// 3. `normalize` fills `documents` and returns the flat observation list
/// 4. `merge` fills `catalog` and `values`
/// 5. diff, write and index read the context; every step appends to `issues`
pub struct BuildContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory; every configured path is relative to it.
    pub root_dir: PathBuf,

    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,

    /// Previously published catalog. Empty until `load_baseline()`.
    pub baseline: Catalog,

    /// Catalog merged from this build's observations only.
    pub catalog: Catalog,

    /// Value → keys index for duplicate-value reporting.
    pub values: DuplicateValueIndex,

    /// Observations grouped by originating document.
    pub documents: DocumentObservations,

    issues: Vec<Issue>,
}

impl BuildContext {
    pub fn new(config: Config, root_dir: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            config,
            root_dir: root_dir.into(),
            verbose,
            baseline: Catalog::new(),
            catalog: Catalog::new(),
            values: DuplicateValueIndex::new(),
            documents: DocumentObservations::new(),
            issues: Vec::new(),
        }
    }

    /// Absolute path of the baseline catalog.
    pub fn baseline_path(&self) -> PathBuf {
        self.root_dir.join(&self.config.src)
    }

    /// Absolute path of the source root.
    pub fn source_root(&self) -> PathBuf {
        self.root_dir.join(&self.config.source_root)
    }

    /// Absolute path of the output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root_dir.join(&self.config.output_dir)
    }

    /// Load the baseline catalog, replacing any previous copy.
    ///
    /// A missing or unparsable file is an empty baseline, not an error.
    pub fn load_baseline(&mut self) {
        let path = self.baseline_path();
        self.baseline = match read_catalog(&path) {
            Ok(catalog) => catalog,
            Err(reason) => {
                if self.verbose {
                    eprintln!(
                        "{} using empty baseline, {}: {}",
                        "note:".bold().cyan(),
                        path.display(),
                        reason
                    );
                }
                Catalog::new()
            }
        };
    }

    pub fn report(&mut self, issue: impl Into<Issue>) {
        self.issues.push(issue.into());
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
            .count()
    }
}

fn read_catalog(path: &Path) -> Result<Catalog, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}
