//! Catalog writer and output naming.
//!
//! Serializes the merged catalog and derives its file name from the `dest`
//! template. Supported placeholders:
//!
//! - `[name]`: file stem of the baseline path (e.g. `translation`)
//! - `[ext]`: extension of the baseline path, without the dot
//! - `[path]`: directory of the baseline path, with a trailing `/`
//! - `[hash]` / `[contenthash]`: SHA-256 of the serialized catalog, hex
//! - `[hash:N]` / `[contenthash:N]`: the first `N` hex digits of that hash

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

use crate::{
    core::{BuildContext, Catalog},
    issues::StructuralConflictIssue,
};

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(name|ext|path|hash|contenthash)(?::(\d+))?\]").unwrap()
});

/// A serialized catalog and the name it is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCatalog {
    /// Path relative to the output directory.
    pub name: String,
    pub contents: String,
}

/// Expand the naming template for a source identity and serialized content.
pub fn interpolate_name(template: &str, resource_path: &Path, content: &str) -> String {
    let digest = hex::encode(Sha256::digest(content.as_bytes()));

    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "name" => resource_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            "ext" => resource_path
                .extension()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            "path" => resource_path
                .parent()
                .map(|dir| {
                    let dir = dir.to_string_lossy().replace('\\', "/");
                    let dir = dir.trim_start_matches("./");
                    if dir.is_empty() || dir == "." {
                        String::new()
                    } else {
                        format!("{}/", dir.trim_end_matches('/'))
                    }
                })
                .unwrap_or_default(),
            _ => {
                let len = caps
                    .get(2)
                    .and_then(|m| m.as_str().parse::<usize>().ok())
                    .unwrap_or(digest.len())
                    .min(digest.len());
                digest[..len].to_string()
            }
        })
        .into_owned()
}

/// A regex matching every name `template` can produce for `resource_path`,
/// whatever the catalog content. Used to recognise catalogs left by earlier
/// builds.
pub fn output_name_pattern(template: &str, resource_path: &Path) -> Result<Regex> {
    let template = template.trim_start_matches("./");
    let mut pattern = String::from("^");
    let mut last = 0;

    for caps in PLACEHOLDER_REGEX.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        pattern.push_str(&regex::escape(&template[last..whole.start()]));
        match &caps[1] {
            "hash" | "contenthash" => match caps.get(2) {
                Some(len) => pattern.push_str(&format!("[0-9a-f]{{{}}}", len.as_str())),
                None => pattern.push_str("[0-9a-f]+"),
            },
            _ => pattern.push_str(&regex::escape(&interpolate_name(
                whole.as_str(),
                resource_path,
                "",
            ))),
        }
        last = whole.end();
    }
    pattern.push_str(&regex::escape(&template[last..]));
    pattern.push('$');

    Regex::new(&pattern).with_context(|| format!("Invalid 'dest' template: \"{}\"", template))
}

/// The catalog to publish.
///
/// Normally the merged catalog. With `keepBaselineKeys`, the baseline with
/// every merged leaf applied on top; merged keys that collide with baseline
/// structure are reported and skipped.
pub fn compose_output(ctx: &mut BuildContext) -> Catalog {
    if !ctx.config.keep_baseline_keys {
        return ctx.catalog.clone();
    }

    let mut output = ctx.baseline.clone();
    let mut conflicts = Vec::new();
    for (key, value) in ctx.catalog.flatten() {
        if let Err(kind) = output.insert(&key, value) {
            conflicts.push(StructuralConflictIssue {
                key,
                kind,
                location: None,
            });
        }
    }

    for conflict in conflicts {
        ctx.report(conflict);
    }
    output
}

/// Serialize and name a catalog. Returns `None` for an empty catalog.
pub fn render_catalog(
    catalog: &Catalog,
    template: &str,
    resource_path: &Path,
) -> Result<Option<RenderedCatalog>> {
    if catalog.is_empty() {
        return Ok(None);
    }

    let contents = catalog
        .to_json_string()
        .context("Failed to serialize catalog")?;
    let name = interpolate_name(template, resource_path, &contents);
    Ok(Some(RenderedCatalog { name, contents }))
}

/// Write a rendered catalog below the output directory.
pub fn write_catalog(output_dir: &Path, rendered: &RenderedCatalog) -> Result<PathBuf> {
    let path = output_dir.join(&rendered.name);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    fs::write(&path, &rendered.contents)
        .with_context(|| format!("Failed to write catalog: {}", path.display()))?;
    Ok(path)
}

/// Write step of a build.
///
/// Returns the rendered catalog when one was written.
pub fn run_write(ctx: &mut BuildContext) -> Result<Option<RenderedCatalog>> {
    let output = compose_output(ctx);
    let resource_path = PathBuf::from(&ctx.config.src);
    let Some(rendered) = render_catalog(&output, &ctx.config.dest, &resource_path)? else {
        return Ok(None);
    };

    write_catalog(&ctx.output_dir(), &rendered)?;
    Ok(Some(rendered))
}
