//! Diagnostic source tags.
//!
//! Each producer reports under its own tag so that a fresh batch from one
//! producer never erases what another producer said about the same file.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Well-known source tag names.
pub mod sources {
    pub const SYNTACTIC: &str = "syntacticDiag";
    pub const SEMANTIC: &str = "semanticDiag";
    pub const SUGGESTION: &str = "suggestionDiag";
    pub const CONFIG_FILE: &str = "configFileDiag";
}

/// Identifier of the producer category that reported a diagnostic batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTag(CompactString);

impl SourceTag {
    /// Create a tag from any name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self(name.into())
    }

    /// Syntax diagnostics.
    pub fn syntactic() -> Self {
        Self::new(sources::SYNTACTIC)
    }

    /// Semantic (type checker) diagnostics.
    pub fn semantic() -> Self {
        Self::new(sources::SEMANTIC)
    }

    /// Suggestion diagnostics.
    pub fn suggestion() -> Self {
        Self::new(sources::SUGGESTION)
    }

    /// Project configuration file diagnostics.
    pub fn config_file() -> Self {
        Self::new(sources::CONFIG_FILE)
    }

    /// The tag name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SourceTag {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
