//! Source document discovery.
//!
//! Walks the source root in a stable, name-sorted order and returns every
//! markup and script document. Discovery order is the order observations are
//! merged in, so it must not depend on the file system.

use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

use crate::{
    config::{MARKUP_EXTENSIONS, SCRIPT_EXTENSIONS},
    core::{SourceKind, normalize::is_excluded},
    utils::{is_glob_pattern, to_slash_path},
};

/// A discovered source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path on disk.
    pub path: PathBuf,
    /// Path relative to the source root, `/`-separated. This is the document identity.
    pub document: String,
    pub kind: SourceKind,
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Documents in discovery order.
    pub files: Vec<SourceFile>,
    pub skipped_count: usize,
}

/// Classify a file by extension.
pub fn source_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if MARKUP_EXTENSIONS.contains(&ext.as_str()) {
        Some(SourceKind::Markup)
    } else if SCRIPT_EXTENSIONS.contains(&ext.as_str()) {
        Some(SourceKind::Script)
    } else {
        None
    }
}

/// Scan `source_root` for documents.
///
/// Excluded path prefixes are not descended into. `ignores` holds glob
/// patterns matched against the relative path; entries without wildcards are
/// literal path prefixes.
pub fn scan_sources(
    source_root: &Path,
    exclude_paths: &[String],
    ignores: &[String],
    verbose: bool,
) -> ScanResult {
    let mut result = ScanResult::default();

    let mut literal_ignores: Vec<String> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => {
                    if verbose {
                        eprintln!(
                            "{} Invalid ignore pattern '{}': {}",
                            "warning:".bold().yellow(),
                            p,
                            e
                        );
                    }
                }
            }
        } else {
            literal_ignores.push(p.clone());
        }
    }

    let walker = WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let Ok(relative) = entry.path().strip_prefix(source_root) else {
                return true;
            };
            let document = to_slash_path(relative);
            document.is_empty()
                || !(is_excluded(&document, exclude_paths) || is_excluded(&document, &literal_ignores))
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                result.skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(kind) = source_kind(entry.path()) else {
            continue;
        };
        let Ok(relative) = entry.path().strip_prefix(source_root) else {
            continue;
        };

        let document = to_slash_path(relative);
        if glob_patterns.iter().any(|p| p.matches(&document)) {
            continue;
        }

        result.files.push(SourceFile {
            path: entry.path().to_path_buf(),
            document,
            kind,
        });
    }

    result
}
