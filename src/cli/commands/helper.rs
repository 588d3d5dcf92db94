use super::{CommandKind, CommandResult, CommandSummary};
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Display order: source locations by path, line and column, then
/// file-level issues, then catalog-wide issues. Ties keep build order.
fn sort_key(issue: &Issue) -> (u8, String, usize, usize) {
    match issue.location() {
        ReportLocation::Source(loc) => (0, loc.file_path.clone(), loc.line, loc.col),
        ReportLocation::File { path } => (1, path.to_string(), 0, 0),
        ReportLocation::Catalog => (2, String::new(), 0, 0),
    }
}

pub fn finish(kind: CommandKind, summary: CommandSummary, mut issues: Vec<Issue>) -> CommandResult {
    issues.sort_by_cached_key(sort_key);

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Warning)
        .count();

    if let CommandSummary::Init(ref summary) = summary
        && summary.error.is_some()
    {
        error_count += 1;
    }

    CommandResult {
        kind,
        summary,
        error_count,
        warning_count,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SourceLocation;
    use crate::issues::{DuplicateValueIssue, MissingDefaultIssue, ParseErrorIssue};
    use crate::cli::commands::{BuildSummary, InitSummary};

    #[test]
    fn test_finish_sorts_and_counts() {
        let issues: Vec<Issue> = vec![
            DuplicateValueIssue {
                value: "Save".to_string(),
                keys: vec!["a".to_string(), "b".to_string()],
            }
            .into(),
            MissingDefaultIssue {
                key: "z".to_string(),
                location: SourceLocation::new("src/b.js", 1, 1),
            }
            .into(),
            ParseErrorIssue {
                file_path: "src/c.js".to_string(),
                error: "unexpected token".to_string(),
            }
            .into(),
            MissingDefaultIssue {
                key: "y".to_string(),
                location: SourceLocation::new("src/a.js", 4, 2),
            }
            .into(),
        ];

        let result = finish(
            CommandKind::Build,
            CommandSummary::Build(BuildSummary::default()),
            issues,
        );

        let rules: Vec<String> = result.issues.iter().map(|i| i.rule().to_string()).collect();
        assert_eq!(
            rules,
            vec!["missing-default", "missing-default", "parse-error", "duplicate-value"]
        );
        assert!(matches!(&result.issues[0], Issue::MissingDefault(i) if i.key == "y"));
        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 3);
    }

    #[test]
    fn test_init_error_counts_as_error() {
        let result = finish(
            CommandKind::Init,
            CommandSummary::Init(InitSummary {
                created: false,
                error: Some("exists".to_string()),
            }),
            Vec::new(),
        );
        assert_eq!(result.error_count, 1);
    }
}
