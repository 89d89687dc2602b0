//! Diagnostic store keyed by source tag, then by normalized file path.
//!
//! A `(tag, file)` pair always holds the complete batch its producer last
//! reported. Replacing a batch discards the old one in full; batches from
//! other tags for the same file are never touched.

use std::collections::BTreeMap;

use compact_str::CompactString;
use rustc_hash::FxHashSet;
use tessera_relief::{normalize_path, Diagnostic, NormalizedPath, SourceTag};

/// The batch stored for one `(tag, file)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEntry {
    /// File or action whose processing produced this batch
    pub trigger_file: Option<CompactString>,
    /// Diagnostics in producer order
    pub diagnostics: Vec<Diagnostic>,
}

/// Which entries `clear_file_errors` removes.
///
/// The two selectors are independent: an entry is removed when either one
/// matches. A selector with neither set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearSelector {
    /// Remove every file below this path
    pub project_path: Option<String>,
    /// Remove entries produced by this trigger, or stored for this file
    pub trigger_file: Option<String>,
}

impl ClearSelector {
    /// Select every file below `path`.
    pub fn project(path: impl Into<String>) -> Self {
        Self {
            project_path: Some(path.into()),
            trigger_file: None,
        }
    }

    /// Select entries produced by, or stored for, `trigger`.
    pub fn trigger(trigger: impl Into<String>) -> Self {
        Self {
            project_path: None,
            trigger_file: Some(trigger.into()),
        }
    }

    /// Whether neither selector is set.
    pub fn is_empty(&self) -> bool {
        self.project_path.is_none() && self.trigger_file.is_none()
    }
}

/// Entry predicate for the project-scoped selector.
fn matches_project(path: &NormalizedPath, project: &NormalizedPath) -> bool {
    path.starts_with(project)
}

/// Entry predicate for the compile-run-scoped selector.
fn matches_trigger(
    path: &NormalizedPath,
    entry: &FileEntry,
    trigger: &str,
    trigger_path: &NormalizedPath,
) -> bool {
    entry.trigger_file.as_deref() == Some(trigger) || path == trigger_path
}

/// Two-level diagnostic store: tag, then normalized file path.
#[derive(Debug, Default)]
pub struct ErrorStore {
    errors: BTreeMap<SourceTag, BTreeMap<NormalizedPath, FileEntry>>,
}

impl ErrorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Replace the batch for `(tag, file)`.
    ///
    /// An empty batch is a valid replacement and keeps the trigger association.
    pub fn set_errors(
        &mut self,
        tag: SourceTag,
        file: &str,
        diagnostics: Vec<Diagnostic>,
        trigger_file: Option<&str>,
    ) -> &FileEntry {
        let path = normalize_path(file);

        let unlocated = diagnostics.iter().filter(|d| !d.is_located()).count();
        if unlocated > 0 {
            tracing::warn!(
                "{} [{}]: {} diagnostic(s) without a location, publishing at 1:1",
                path,
                tag,
                unlocated
            );
        }

        tracing::debug!(
            "set_errors: {} [{}] -> {} diagnostic(s)",
            path,
            tag,
            diagnostics.len()
        );

        let files = self.errors.entry(tag).or_default();
        let entry = files.entry(path).or_default();
        *entry = FileEntry {
            trigger_file: trigger_file.map(CompactString::from),
            diagnostics,
        };
        entry
    }

    /// Remove the entries chosen by `selector`, returning how many were removed.
    ///
    /// An empty selector is a no-op.
    pub fn clear_file_errors(&mut self, selector: &ClearSelector) -> usize {
        if selector.is_empty() {
            tracing::debug!("clear_file_errors: empty selector, nothing to do");
            return 0;
        }

        let project = selector.project_path.as_deref().map(normalize_path);
        let trigger = selector
            .trigger_file
            .as_deref()
            .map(|t| (t, normalize_path(t)));

        let mut removed = 0;
        for files in self.errors.values_mut() {
            let before = files.len();
            files.retain(|path, entry| {
                let by_project = project
                    .as_ref()
                    .is_some_and(|project| matches_project(path, project));
                let by_trigger = trigger.as_ref().is_some_and(|(raw, trigger_path)| {
                    matches_trigger(path, entry, raw, trigger_path)
                });
                !(by_project || by_trigger)
            });
            removed += before - files.len();
        }
        self.errors.retain(|_, files| !files.is_empty());

        tracing::debug!(
            "clear_file_errors: removed {} entr{} (project={:?}, trigger={:?})",
            removed,
            if removed == 1 { "y" } else { "ies" },
            selector.project_path,
            selector.trigger_file
        );

        removed
    }

    /// Files, across all tags, whose stored trigger equals `trigger`.
    ///
    /// Each file appears once, in store order.
    pub fn files_for_trigger(&self, trigger: &str) -> Vec<NormalizedPath> {
        let mut seen = FxHashSet::default();
        let mut files = Vec::new();

        for entries in self.errors.values() {
            for (path, entry) in entries {
                if entry.trigger_file.as_deref() == Some(trigger) && seen.insert(path) {
                    files.push(path.clone());
                }
            }
        }

        files
    }

    /// The entry stored for `(tag, file)`.
    pub fn entry(&self, tag: &SourceTag, file: &str) -> Option<&FileEntry> {
        self.errors.get(tag)?.get(&normalize_path(file))
    }

    /// Entries for `file` under every tag, in tag order.
    pub fn entries_for_file<'a>(
        &'a self,
        path: &'a NormalizedPath,
    ) -> impl Iterator<Item = &'a FileEntry> + 'a {
        self.errors.values().filter_map(move |files| files.get(path))
    }

    /// Every stored `(file, diagnostic)` pair: tags in order, then files,
    /// then diagnostics in producer order.
    pub fn entries(&self) -> impl Iterator<Item = (&NormalizedPath, &Diagnostic)> {
        self.errors.values().flat_map(|files| {
            files
                .iter()
                .flat_map(|(path, entry)| entry.diagnostics.iter().map(move |d| (path, d)))
        })
    }

    /// Tags that currently hold at least one entry.
    pub fn tags(&self) -> impl Iterator<Item = &SourceTag> {
        self.errors.keys()
    }

    /// Number of `(tag, file)` entries.
    pub fn file_count(&self) -> usize {
        self.errors.values().map(BTreeMap::len).sum()
    }

    /// Number of stored diagnostics.
    pub fn diagnostic_count(&self) -> usize {
        self.errors
            .values()
            .flat_map(BTreeMap::values)
            .map(|entry| entry.diagnostics.len())
            .sum()
    }

    /// Whether no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
