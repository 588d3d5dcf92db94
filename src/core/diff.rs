//! Baseline diff engine.
//!
//! Compares the catalog merged in this build with the baseline loaded at
//! build start and reports new, changed and removed keys as three sparse
//! catalogs. Keys matching the plural/ordinal variant pattern are never
//! reported as removed: they come and go with plural rules, not with source
//! text.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use crate::core::{BuildContext, Catalog};

/// File name suffix appended to the baseline's stem for the diff artifact.
pub const DIFF_SUFFIX: &str = ".diff.json";

/// New, changed and removed entries, each in catalog shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    /// Keys present in the merged catalog only.
    pub new: Catalog,
    /// Keys whose value differs; holds the merged (new) value.
    pub changed: Catalog,
    /// Non-variant keys present in the baseline only; holds the baseline value.
    pub removed: Catalog,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    /// Tab-indented JSON rendering.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Compute the diff between the baseline and the merged catalog.
pub fn compute_diff(baseline: &Catalog, merged: &Catalog, variant_pattern: &Regex) -> DiffReport {
    let flat_baseline = baseline.flatten();
    let flat_merged = merged.flatten();
    let mut report = DiffReport::default();

    for (key, old_value) in &flat_baseline {
        match flat_merged.get(key) {
            None => {
                if !variant_pattern.is_match(key) {
                    report.removed.set_path(key, old_value.clone());
                }
            }
            Some(new_value) if new_value != old_value => {
                report.changed.set_path(key, new_value.clone());
            }
            Some(_) => {}
        }
    }

    for (key, value) in &flat_merged {
        if !flat_baseline.contains_key(key) {
            report.new.set_path(key, value.clone());
        }
    }

    report
}

/// Path of the diff artifact: `<baseline dir>/<baseline stem>.diff.json`.
pub fn diff_path(baseline_path: &Path) -> PathBuf {
    let stem = baseline_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}{}", stem, DIFF_SUFFIX);
    match baseline_path.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Write a diff report next to the baseline, creating the directory if needed.
pub fn write_diff(report: &DiffReport, baseline_path: &Path) -> Result<PathBuf> {
    let path = diff_path(baseline_path);
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let content = report
        .to_pretty_json()
        .context("Failed to serialize diff report")?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write diff file: {}", path.display()))?;

    Ok(path)
}

/// Diff step of a build. Does nothing unless `createDiff` is enabled.
///
/// Returns the written diff file, if any.
pub fn run_diff(ctx: &BuildContext) -> Result<Option<(DiffReport, PathBuf)>> {
    if !ctx.config.create_diff {
        return Ok(None);
    }

    let variant_pattern = ctx.config.variant_regex()?;
    let report = compute_diff(&ctx.baseline, &ctx.catalog, &variant_pattern);
    let path = write_diff(&report, &ctx.baseline_path())?;
    Ok(Some((report, path)))
}
