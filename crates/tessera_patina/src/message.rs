//! Normalized output messages and the flattening pass that produces them.

use serde::Serialize;
use tessera_relief::{locations_to_range, Diagnostic, NormalizedPath, Range};

use crate::config::DiagnosticsConfig;
use crate::filter::{FilterOutcome, FilterPipeline};
use crate::severity::{Severity, SeverityRules};

/// Where a published message points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageLocation {
    /// Normalized file path
    pub file: String,
    /// 0-based half-open range
    pub position: Range,
}

/// A message handed to the downstream sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub excerpt: String,
    pub location: MessageLocation,
}

impl Message {
    /// Build the message for a diagnostic that survived filtering.
    pub fn from_diagnostic(file: &NormalizedPath, diagnostic: &Diagnostic, severity: Severity) -> Self {
        let (start, end) = diagnostic.locations();
        Self {
            severity,
            excerpt: diagnostic.text.clone(),
            location: MessageLocation {
                file: file.as_str().to_string(),
                position: locations_to_range(start, end),
            },
        }
    }
}

/// Run `(file, diagnostic)` pairs through the filter pipeline and severity
/// table of `config`, preserving input order.
pub fn flatten<'a, I>(entries: I, config: &DiagnosticsConfig) -> Vec<Message>
where
    I: IntoIterator<Item = (&'a NormalizedPath, &'a Diagnostic)>,
{
    let pipeline = FilterPipeline::with_defaults(config);
    if pipeline.suppresses_all() {
        tracing::debug!("all diagnostics suppressed by configuration");
        return Vec::new();
    }

    let rules = SeverityRules::from_config(config);
    let mut messages = Vec::new();
    let mut dropped = 0usize;

    for (file, diagnostic) in entries {
        match pipeline.evaluate(file, diagnostic) {
            FilterOutcome::Keep => {
                messages.push(Message::from_diagnostic(
                    file,
                    diagnostic,
                    rules.resolve(diagnostic),
                ));
            }
            FilterOutcome::Drop(filter) => {
                tracing::trace!(
                    "{}: dropped {} ({}) by {}",
                    file,
                    diagnostic.code,
                    diagnostic.category,
                    filter
                );
                dropped += 1;
            }
        }
    }

    tracing::debug!(
        "flattened {} message(s), {} dropped by filters",
        messages.len(),
        dropped
    );

    messages
}
