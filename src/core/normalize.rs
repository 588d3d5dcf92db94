//! Source observation normalizer.
//!
//! Turns the per-document batches produced by the markup and script adapters
//! into one flat, order-preserving observation sequence. Batches must arrive
//! in document discovery order; within a batch the adapter's emission order is
//! kept. The same checks apply regardless of which adapter produced a batch.

use std::path::{Component, Path};

use crate::{
    core::{BuildContext, DocumentBatch, TranslationObservation},
    issues::{InterpolationIssue, InterpolationTarget},
};

/// Runtime placeholder syntax that cannot be resolved statically.
pub const INTERPOLATION_MARKER: &str = "${";

/// Check whether a document lies under one of the excluded path prefixes.
///
/// Matching is done per path component, so `node_modules` excludes
/// `node_modules/lib/index.js` but not `node_modules_backup/index.js`.
pub fn is_excluded(document: &str, exclude_paths: &[String]) -> bool {
    let document = strip_current_dir(Path::new(document));
    exclude_paths
        .iter()
        .any(|prefix| document.starts_with(strip_current_dir(Path::new(prefix))))
}

fn strip_current_dir(path: &Path) -> &Path {
    let mut components = path.components();
    while components.clone().next() == Some(Component::CurDir) {
        components.next();
    }
    components.as_path()
}

/// Flatten document batches into a single observation sequence.
///
/// - Batches from excluded documents are dropped silently.
/// - Keys still containing `${` are kept but reported.
/// - Every kept batch is recorded on `ctx.documents`.
pub fn normalize(ctx: &mut BuildContext, batches: Vec<DocumentBatch>) -> Vec<TranslationObservation> {
    let mut observations = Vec::new();

    for batch in batches {
        if is_excluded(&batch.document, &ctx.config.exclude_paths) {
            continue;
        }

        for observation in &batch.observations {
            if observation.key.contains(INTERPOLATION_MARKER) {
                ctx.report(InterpolationIssue {
                    key: observation.key.clone(),
                    target: InterpolationTarget::Key,
                    value: None,
                    location: observation.location.clone(),
                });
            }
        }

        observations.extend(batch.observations.iter().cloned());
        ctx.documents
            .entry(batch.document)
            .or_default()
            .extend(batch.observations);
    }

    observations
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::core::normalize::*;
    use crate::core::{SourceKind, SourceLocation};
    use crate::issues::{Issue, Rule};

    fn obs(key: &str, value: &str, file: &str) -> TranslationObservation {
        TranslationObservation::new(
            key,
            Some(value.to_string()),
            SourceLocation::new(file, 1, 1),
        )
    }

    fn keys(observations: &[TranslationObservation]) -> Vec<&str> {
        observations.iter().map(|o| o.key.as_str()).collect()
    }

    #[test]
    fn test_preserves_batch_and_emission_order() {
        let mut ctx = BuildContext::new(Config::default(), ".", false);
        let batches = vec![
            DocumentBatch::new(
                "src/b.html",
                SourceKind::Markup,
                vec![obs("b1", "B1", "src/b.html"), obs("b2", "B2", "src/b.html")],
            ),
            DocumentBatch::new(
                "src/a.js",
                SourceKind::Script,
                vec![obs("a1", "A1", "src/a.js")],
            ),
        ];

        let observations = normalize(&mut ctx, batches);
        assert_eq!(keys(&observations), vec!["b1", "b2", "a1"]);
        assert_eq!(
            ctx.documents.keys().collect::<Vec<_>>(),
            vec!["src/b.html", "src/a.js"]
        );
        assert!(ctx.issues().is_empty());
    }

    #[test]
    fn test_excluded_documents_are_dropped_silently() {
        let mut ctx = BuildContext::new(Config::default(), ".", false);
        let batches = vec![
            DocumentBatch::new(
                "node_modules/lib/index.js",
                SourceKind::Script,
                vec![obs("vendor", "Vendor", "node_modules/lib/index.js")],
            ),
            DocumentBatch::new(
                "src/app.js",
                SourceKind::Script,
                vec![obs("app", "App", "src/app.js")],
            ),
        ];

        let observations = normalize(&mut ctx, batches);
        assert_eq!(keys(&observations), vec!["app"]);
        assert!(!ctx.documents.contains_key("node_modules/lib/index.js"));
        assert!(ctx.issues().is_empty());
    }

    #[test]
    fn test_interpolated_key_is_kept_with_warning() {
        let mut ctx = BuildContext::new(Config::default(), ".", false);
        let batches = vec![DocumentBatch::new(
            "src/app.html",
            SourceKind::Markup,
            vec![obs("status.${code}", "Status", "src/app.html")],
        )];

        let observations = normalize(&mut ctx, batches);
        assert_eq!(observations.len(), 1);
        assert_eq!(ctx.issues().len(), 1);
        assert!(matches!(
            &ctx.issues()[0],
            Issue::Interpolation(issue) if issue.target == InterpolationTarget::Key
        ));
        assert_eq!(ctx.issues()[0].rule(), Rule::Interpolation);
    }

    #[test]
    fn test_is_excluded() {
        let excludes = vec!["node_modules".to_string(), "./vendor/lib".to_string()];
        assert!(is_excluded("node_modules/a/b.js", &excludes));
        assert!(is_excluded("./node_modules/a.js", &excludes));
        assert!(is_excluded("vendor/lib/x.js", &excludes));
        assert!(!is_excluded("vendor/other/x.js", &excludes));
        assert!(!is_excluded("node_modules_backup/a.js", &excludes));
        assert!(!is_excluded("src/node_modules.js", &excludes));
    }
}
