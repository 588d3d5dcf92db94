//! Catalog merge engine.
//!
//! Folds normalized observations into the build's catalog. This is where key
//! conflicts are detected:
//!
//! - A key whose parent path is already a leaf, or whose own path already has
//!   sub-keys, is a structural conflict: reported as an error and skipped.
//! - A key defined again with a different value is reported as a warning and
//!   the later value wins, so the result depends only on observation order.
//! - A key without a default value falls back to the key itself.
//!
//! Nothing here aborts the build; every problem goes to the context's issues.

use indexmap::{IndexMap, IndexSet};

use crate::{
    core::{BuildContext, TranslationObservation},
    issues::{
        DuplicateValueIssue, MismatchedDefinitionIssue, MissingDefaultIssue,
        StructuralConflictIssue,
    },
};

/// Maps each default value to the distinct keys that use it.
///
/// Advisory only: it never influences what ends up in the catalog.
#[derive(Debug, Clone, Default)]
pub struct DuplicateValueIndex {
    values: IndexMap<String, IndexSet<String>>,
}

impl DuplicateValueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, value: impl Into<String>, key: impl Into<String>) {
        self.values
            .entry(value.into())
            .or_default()
            .insert(key.into());
    }

    pub fn keys_for(&self, value: &str) -> Option<&IndexSet<String>> {
        self.values.get(value)
    }

    /// Values used by more than one key, in first-seen order.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.values
            .iter()
            .filter(|(_, keys)| keys.len() > 1)
            .map(|(value, keys)| (value.as_str(), keys))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Merge all observations, in order, into `ctx.catalog`.
pub fn merge(ctx: &mut BuildContext, observations: Vec<TranslationObservation>) {
    for observation in observations {
        merge_observation(ctx, observation);
    }
}

/// Merge a single observation into `ctx.catalog`.
pub fn merge_observation(ctx: &mut BuildContext, observation: TranslationObservation) {
    let TranslationObservation {
        key,
        value,
        location,
    } = observation;

    let value = match value.filter(|v| !v.is_empty()) {
        Some(value) => value,
        None => {
            ctx.report(MissingDefaultIssue {
                key: key.clone(),
                location: location.clone(),
            });
            key.clone()
        }
    };

    match ctx.catalog.insert(&key, value.clone()) {
        Ok(previous) => {
            ctx.values.record(value.clone(), key.clone());
            if let Some(previous) = previous
                && previous != value
            {
                ctx.report(MismatchedDefinitionIssue {
                    key,
                    previous,
                    current: value,
                    location,
                });
            }
        }
        Err(conflict) => {
            ctx.report(StructuralConflictIssue {
                key,
                kind: conflict,
                location: Some(location),
            });
        }
    }
}

/// Warn about every value shared by several keys, when enabled in the config.
pub fn report_duplicate_values(ctx: &mut BuildContext) {
    if !ctx.config.duplicate_warnings {
        return;
    }

    let issues: Vec<DuplicateValueIssue> = ctx
        .values
        .duplicates()
        .map(|(value, keys)| DuplicateValueIssue {
            value: value.to_string(),
            keys: keys.iter().cloned().collect(),
        })
        .collect();

    for issue in issues {
        ctx.report(issue);
    }
}
