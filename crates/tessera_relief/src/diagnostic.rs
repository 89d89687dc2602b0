//! Diagnostic value objects.
//!
//! The JSON shape matches the diagnostic records emitted by the TypeScript
//! server protocol, so producers can hand their payloads over untouched.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::location::{location_to_point, Location, Range};

/// Diagnostic category as reported by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Error,
    Warning,
    Suggestion,
    Message,
}

impl Category {
    /// Lowercase name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Error => "error",
            Category::Warning => "warning",
            Category::Suggestion => "suggestion",
            Category::Message => "message",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic code, numeric or textual depending on the producer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticCode {
    Number(u32),
    Text(CompactString),
}

impl DiagnosticCode {
    /// Whether the stringified code equals `code`.
    pub fn matches(&self, code: &str) -> bool {
        match self {
            DiagnosticCode::Number(n) => n.to_string() == code,
            DiagnosticCode::Text(text) => text == code,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::Number(n) => write!(f, "{}", n),
            DiagnosticCode::Text(text) => f.write_str(text),
        }
    }
}

impl From<u32> for DiagnosticCode {
    fn from(code: u32) -> Self {
        DiagnosticCode::Number(code)
    }
}

impl From<&str> for DiagnosticCode {
    fn from(code: &str) -> Self {
        DiagnosticCode::Text(code.into())
    }
}

/// A single reported issue.
///
/// Treated as an immutable value once handed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Producer category
    pub category: Category,
    /// Producer-specific code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub text: String,
    /// Start location (1-based), missing for some config-file diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Location>,
    /// End location (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Location>,
    /// Marks "declared but never used" style diagnostics
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reports_unnecessary: bool,
    /// Name of the tool that produced the diagnostic (e.g. "ts")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<CompactString>,
}

impl Diagnostic {
    /// Create a diagnostic spanning `start..end`.
    pub fn new(
        category: Category,
        code: impl Into<DiagnosticCode>,
        text: impl Into<String>,
        start: Location,
        end: Location,
    ) -> Self {
        Self {
            category,
            code: code.into(),
            text: text.into(),
            start: Some(start),
            end: Some(end),
            reports_unnecessary: false,
            source: None,
        }
    }

    /// Create an error diagnostic.
    pub fn error(
        code: impl Into<DiagnosticCode>,
        text: impl Into<String>,
        start: Location,
        end: Location,
    ) -> Self {
        Self::new(Category::Error, code, text, start, end)
    }

    /// Create a warning diagnostic.
    pub fn warning(
        code: impl Into<DiagnosticCode>,
        text: impl Into<String>,
        start: Location,
        end: Location,
    ) -> Self {
        Self::new(Category::Warning, code, text, start, end)
    }

    /// Create a suggestion diagnostic.
    pub fn suggestion(
        code: impl Into<DiagnosticCode>,
        text: impl Into<String>,
        start: Location,
        end: Location,
    ) -> Self {
        Self::new(Category::Suggestion, code, text, start, end)
    }

    /// Create a diagnostic without any location.
    pub fn unlocated(
        category: Category,
        code: impl Into<DiagnosticCode>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code: code.into(),
            text: text.into(),
            start: None,
            end: None,
            reports_unnecessary: false,
            source: None,
        }
    }

    /// Mark as reporting unnecessary code.
    pub fn with_reports_unnecessary(mut self) -> Self {
        self.reports_unnecessary = true;
        self
    }

    /// Whether both endpoints are present.
    #[inline]
    pub fn is_located(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The reported locations, or the synthetic origin if either is missing.
    pub fn locations(&self) -> (Location, Location) {
        match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            _ => (Location::ORIGIN, Location::ORIGIN),
        }
    }

    /// The 0-based half-open range this diagnostic covers.
    pub fn range(&self) -> Range {
        span_to_range(self)
    }
}

/// Convert a diagnostic span to a range.
///
/// A diagnostic missing either endpoint maps to a zero-width range at the
/// start of the file.
pub fn span_to_range(diagnostic: &Diagnostic) -> Range {
    let (start, end) = diagnostic.locations();
    Range::new(location_to_point(start), location_to_point(end))
}
