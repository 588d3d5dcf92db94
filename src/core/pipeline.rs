//! One complete build.
//!
//! Runs every engine step against a fresh `BuildContext`, in order:
//! baseline, scan, extract (parallel), normalize, merge, duplicate report,
//! diff, write, index. Extraction results are collected in discovery order
//! before anything touches the catalog.
//!
//! Failures to write an artifact become `write-error` issues; only a missing
//! source root or an unreadable output directory abort the build.

use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::{Result, bail};
use colored::Colorize;
use rayon::prelude::*;
use swc_common::{FilePathMapping, SourceMap};

use crate::{
    core::{
        BuildContext, DiffReport, DocumentBatch, OutputIndex,
        diff::{diff_path, run_diff},
        extract::extract_file,
        file_scanner::{SourceFile, scan_sources},
        index::run_index,
        merge::{merge, report_duplicate_values},
        normalize::normalize,
        writer::{RenderedCatalog, run_write},
    },
    issues::{Issue, WriteErrorIssue},
    utils::to_slash_path,
};

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildOutput {
    /// Number of documents extracted.
    pub documents: usize,
    /// The catalog written to the output directory, if it was non-empty.
    pub catalog: Option<RenderedCatalog>,
    /// The diff and where it was written, when diffing is enabled.
    pub diff: Option<(DiffReport, PathBuf)>,
    pub index: OutputIndex,
    /// Where the index was written, when an index file is configured.
    pub index_path: Option<PathBuf>,
}

/// Extract every document in parallel, keeping discovery order.
pub fn extract_documents(
    ctx: &BuildContext,
    files: &[SourceFile],
) -> Vec<(DocumentBatch, Vec<Issue>)> {
    let source_map = Arc::new(SourceMap::new(FilePathMapping::empty()));
    files
        .par_iter()
        .map(|file| extract_file(file, &ctx.config, Arc::clone(&source_map)).into_batch(file))
        .collect()
}

/// The output directory as an exclude relative to the source root, when it
/// lies strictly inside it.
fn output_exclude(source_root: &Path, output_dir: &Path) -> Option<String> {
    let relative = output_dir.strip_prefix(source_root).ok()?;
    if relative.components().any(|c| matches!(c, Component::ParentDir)) {
        return None;
    }
    let relative = to_slash_path(relative);
    (!relative.is_empty()).then_some(relative)
}

/// Run a full build.
pub fn run_build(ctx: &mut BuildContext) -> Result<BuildOutput> {
    let source_root = ctx.source_root();
    if !source_root.is_dir() {
        bail!("Source root is not a directory: {}", source_root.display());
    }

    ctx.load_baseline();

    let mut exclude_paths = ctx.config.exclude_paths.clone();
    exclude_paths.extend(output_exclude(&source_root, &ctx.output_dir()));

    let scan = scan_sources(
        &source_root,
        &exclude_paths,
        &ctx.config.ignores,
        ctx.verbose,
    );
    if ctx.verbose {
        eprintln!(
            "{} found {} source document(s) in {}",
            "note:".bold().cyan(),
            scan.files.len(),
            source_root.display()
        );
        if scan.skipped_count > 0 {
            eprintln!(
                "{} skipped {} unreadable path(s)",
                "note:".bold().cyan(),
                scan.skipped_count
            );
        }
    }

    let mut batches = Vec::with_capacity(scan.files.len());
    for (batch, issues) in extract_documents(ctx, &scan.files) {
        for issue in issues {
            ctx.report(issue);
        }
        batches.push(batch);
    }

    let observations = normalize(ctx, batches);
    merge(ctx, observations);
    report_duplicate_values(ctx);

    let diff = match run_diff(ctx) {
        Ok(diff) => diff,
        Err(e) => {
            let path = diff_path(&ctx.baseline_path());
            ctx.report(WriteErrorIssue {
                file_path: path.display().to_string(),
                error: format!("{:#}", e),
            });
            None
        }
    };

    let catalog = match run_write(ctx) {
        Ok(catalog) => catalog,
        Err(e) => {
            ctx.report(WriteErrorIssue {
                file_path: ctx.config.dest.clone(),
                error: format!("{:#}", e),
            });
            None
        }
    };

    let (index, index_path) = run_index(ctx, catalog.as_ref())?;

    Ok(BuildOutput {
        documents: ctx.documents.len(),
        catalog,
        diff,
        index,
        index_path,
    })
}
