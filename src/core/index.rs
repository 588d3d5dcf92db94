//! Output index builder.
//!
//! Matches output file names against the configured translation file pattern
//! and builds a `language → namespace → file` lookup table. The pattern's
//! named groups `lang` and `ns` are used when present, otherwise its first and
//! second capture groups.
//!
//! Catalogs left in the output directory by earlier builds are not indexed:
//! only the one written by the current build represents its namespace.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use regex::Regex;
use serde::de::IgnoredAny;
use walkdir::WalkDir;

use crate::{
    core::{
        BuildContext,
        writer::{RenderedCatalog, output_name_pattern},
    },
    issues::InvalidOutputFileIssue,
    utils::to_slash_path,
};

/// Language → namespace → output file path.
pub type OutputIndex = BTreeMap<String, BTreeMap<String, String>>;

/// A produced output file, named relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Path relative to the output directory, always `/`-separated.
    pub name: String,
    pub contents: Vec<u8>,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Extract `(language, namespace)` from a file name, if it matches.
pub fn match_output_file(name: &str, pattern: &Regex) -> Option<(String, String)> {
    let captures = pattern.captures(name)?;
    let lang = captures.name("lang").or_else(|| captures.get(1))?;
    let ns = captures.name("ns").or_else(|| captures.get(2))?;
    Some((lang.as_str().to_string(), ns.as_str().to_string()))
}

/// Build the index from a set of output files.
///
/// Files that do not match `pattern` are ignored. Matching files that are not
/// valid JSON are reported and left out of the index.
pub fn build_index(ctx: &mut BuildContext, files: &[OutputFile], pattern: &Regex) -> OutputIndex {
    let mut index = OutputIndex::new();

    for file in files {
        let Some((lang, ns)) = match_output_file(&file.name, pattern) else {
            continue;
        };

        if let Err(e) = serde_json::from_slice::<IgnoredAny>(&file.contents) {
            ctx.report(InvalidOutputFileIssue {
                file_path: file.name.clone(),
                error: e.to_string(),
            });
            continue;
        }

        index.entry(lang).or_default().insert(ns, file.name.clone());
    }

    index
}

/// Enumerate files under the output directory that match `pattern`, sorted by path.
///
/// A missing output directory yields no files.
pub fn collect_output_files(output_dir: &Path, pattern: &Regex) -> Result<Vec<OutputFile>> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(output_dir).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to read output directory: {}", output_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(output_dir) else {
            continue;
        };
        let name = to_slash_path(relative);
        if !pattern.is_match(&name) {
            continue;
        }

        let contents = fs::read(entry.path())
            .with_context(|| format!("Failed to read output file: {}", entry.path().display()))?;
        files.push(OutputFile { name, contents });
    }

    Ok(files)
}

/// Write the index to the configured file in the output directory.
///
/// Returns `None` when no index file is configured.
pub fn write_index(ctx: &BuildContext, index: &OutputIndex) -> Result<Option<PathBuf>> {
    let Some(index_name) = &ctx.config.index else {
        return Ok(None);
    };

    let path = ctx.output_dir().join(index_name);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let content = serde_json::to_string(index).context("Failed to serialize index")?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write index file: {}", path.display()))?;

    Ok(Some(path))
}

/// Drop catalogs written by earlier builds.
///
/// Any file the `dest` template could have produced is stale unless it is the
/// catalog this build wrote.
pub fn retain_current_catalog(
    files: Vec<OutputFile>,
    previous: &Regex,
    current: Option<&RenderedCatalog>,
) -> Vec<OutputFile> {
    let current = current.map(|c| c.name.trim_start_matches("./"));
    files
        .into_iter()
        .filter(|file| current == Some(file.name.as_str()) || !previous.is_match(&file.name))
        .collect()
}

/// Index step of a build: enumerate, validate, index and write.
///
/// `catalog` is the catalog this build wrote, if any.
pub fn run_index(
    ctx: &mut BuildContext,
    catalog: Option<&RenderedCatalog>,
) -> Result<(OutputIndex, Option<PathBuf>)> {
    let pattern = ctx.config.translation_file_regex()?;
    let previous = output_name_pattern(&ctx.config.dest, Path::new(&ctx.config.src))?;
    let files = collect_output_files(&ctx.output_dir(), &pattern)?;
    let files = retain_current_catalog(files, &previous, catalog);
    let index = build_index(ctx, &files, &pattern);
    let written = write_index(ctx, &index)?;
    Ok((index, written))
}
