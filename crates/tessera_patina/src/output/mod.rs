//! Output formatters for published messages.

mod text;

pub use text::*;

use crate::message::Message;

/// Output format for published message sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output grouped by file
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Format a published message set according to the specified format
pub fn format_messages(messages: &[Message], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_text(messages),
        OutputFormat::Json => format_json(messages),
    }
}

/// Format messages as a JSON array
fn format_json(messages: &[Message]) -> String {
    serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string())
}

/// Count messages per severity: `(errors, warnings, infos)`
pub fn count_by_severity(messages: &[Message]) -> (usize, usize, usize) {
    use crate::severity::Severity;

    messages
        .iter()
        .fold((0, 0, 0), |(e, w, i), m| match m.severity {
            Severity::Error => (e + 1, w, i),
            Severity::Warning => (e, w + 1, i),
            Severity::Info => (e, w, i + 1),
        })
}
