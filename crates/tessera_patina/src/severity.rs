//! Output severities and the code-based override table.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tessera_relief::{Category, Diagnostic};

use crate::config::DiagnosticsConfig;

/// Published message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Category mapping used when no rule matches.
    pub fn from_category(category: Category) -> Self {
        match category {
            Category::Error => Severity::Error,
            Category::Warning => Severity::Warning,
            Category::Suggestion | Category::Message => Severity::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `code => severity` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityRule {
    pub code: CompactString,
    pub severity: Severity,
}

/// Ordered severity rule table. The first rule whose code matches wins.
#[derive(Debug, Clone, Default)]
pub struct SeverityRules {
    rules: Vec<SeverityRule>,
}

impl SeverityRules {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build the table for a configuration snapshot.
    ///
    /// With `unused_as_info` set, every unused code maps to info ahead of
    /// the user's overrides.
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        let mut rules = Self::new();

        if config.unused_as_info {
            for code in &config.unused_diagnostic_codes {
                rules.push(code.clone(), Severity::Info);
            }
        }

        for (code, severity) in &config.severity_overrides {
            rules.push(code.clone(), *severity);
        }

        rules
    }

    /// Append a rule.
    pub fn push(&mut self, code: impl Into<CompactString>, severity: Severity) {
        self.rules.push(SeverityRule {
            code: code.into(),
            severity,
        });
    }

    /// All rules, in match order.
    pub fn rules(&self) -> &[SeverityRule] {
        &self.rules
    }

    /// Severity to publish `diagnostic` with.
    pub fn resolve(&self, diagnostic: &Diagnostic) -> Severity {
        self.rules
            .iter()
            .find(|rule| diagnostic.code.matches(&rule.code))
            .map(|rule| rule.severity)
            .unwrap_or_else(|| Severity::from_category(diagnostic.category))
    }
}
