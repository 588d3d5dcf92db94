//! Report formatting and printing utilities.
//!
//! This module provides functions to display issues in cargo-style format.
//! Separate from core logic to allow glean to be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{BuildSummary, CommandResult, CommandSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format, in the order given.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    for issue in issues {
        print_issue(issue, writer);
    }

    print_summary(issues, writer);
}

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity_str = match issue.report_severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::Source(loc) => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), loc);
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
        ReportLocation::Catalog => {}
    }

    for detail in issue.details() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "note:".bold(), detail);
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            if total_problems == 1 {
                "problem"
            } else {
                "problems"
            },
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

/// Print what a build wrote.
pub fn print_build_to<W: Write>(summary: &BuildSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} from {}",
            plural(summary.key_count, "key", "keys"),
            plural(summary.document_count, "document", "documents")
        )
        .green()
    );

    match &summary.catalog_file {
        Some(name) => {
            let _ = writeln!(writer, "  {} {}", "catalog:".bold(), name);
        }
        None => {
            let _ = writeln!(
                writer,
                "  {} {}",
                "catalog:".bold(),
                "(empty, not written)".dimmed()
            );
        }
    }

    if let Some(diff) = &summary.diff {
        let _ = writeln!(
            writer,
            "  {} {} ({} new, {} changed, {} removed)",
            "diff:".bold(),
            diff.path.display(),
            diff.new_count,
            diff.changed_count,
            diff.removed_count
        );
    }

    if let Some(index) = &summary.index_file {
        let languages = if summary.languages.is_empty() {
            "no languages".to_string()
        } else {
            summary.languages.join(", ")
        };
        let _ = writeln!(
            writer,
            "  {} {} ({})",
            "index:".bold(),
            index.display(),
            languages
        );
    }
}

fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

/// Print a command result: issues and the summary on `out`, command errors on `err`.
pub fn print_to<W: Write, E: Write>(result: &CommandResult, out: &mut W, err: &mut E) {
    match &result.summary {
        CommandSummary::Build(summary) => {
            report_to(&result.issues, out);
            print_build_to(summary, out);
        }
        CommandSummary::Init(summary) => {
            if let Some(error) = &summary.error {
                let _ = writeln!(err, "{} {}", "error:".bold().red(), error);
            }
            print_init_to(summary, out);
        }
    }
}

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock(), &mut io::stderr().lock());
}
