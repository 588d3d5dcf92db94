use std::env;

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::args::{BuildArgs, BuildCommand};
use super::{BuildSummary, CommandKind, CommandResult, CommandSummary, DiffSummary, helper::finish};
use crate::{
    config::{Config, ConfigLoadResult, load_config},
    core::{BuildContext, pipeline::run_build},
};

pub fn build(cmd: BuildCommand) -> Result<CommandResult> {
    let mut ctx = prepare_context(&cmd.args)?;
    let output = run_build(&mut ctx)?;

    let summary = BuildSummary {
        document_count: output.documents,
        key_count: ctx.catalog.leaf_count(),
        catalog_file: output.catalog.map(|c| c.name),
        diff: output.diff.map(|(report, path)| DiffSummary {
            path,
            new_count: report.new.leaf_count(),
            changed_count: report.changed.leaf_count(),
            removed_count: report.removed.leaf_count(),
        }),
        index_file: output.index_path,
        languages: output.index.keys().cloned().collect(),
    };

    Ok(finish(
        CommandKind::Build,
        CommandSummary::Build(summary),
        ctx.into_issues(),
    ))
}

/// Load the config file and apply command-line overrides.
pub fn prepare_context(args: &BuildArgs) -> Result<BuildContext> {
    let start_dir = match &args.common.path {
        Some(path) => path.clone(),
        None => env::current_dir().context("Failed to read current directory")?,
    };

    let ConfigLoadResult {
        mut config,
        root_dir,
        from_file,
    } = load_config(&start_dir)?;

    if args.common.verbose && !from_file {
        eprintln!(
            "{} no config file found, using defaults",
            "note:".bold().cyan()
        );
    }

    apply_overrides(&mut config, args);
    config.validate()?;

    Ok(BuildContext::new(config, root_dir, args.common.verbose))
}

fn apply_overrides(config: &mut Config, args: &BuildArgs) {
    if let Some(source_root) = &args.common.source_root {
        config.source_root = source_root.to_string_lossy().into_owned();
    }
    if let Some(output_dir) = &args.common.output_dir {
        config.output_dir = output_dir.to_string_lossy().into_owned();
    }
    if args.diff {
        config.create_diff = true;
    }
    if args.duplicate_warnings {
        config.duplicate_warnings = true;
    }
}
