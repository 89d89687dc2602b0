//! Publish-time diagnostics configuration.
//!
//! The configuration is read as a fresh snapshot at every publish through a
//! [`ConfigProvider`], so changes take effect on the next publish without any
//! cache invalidation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compact_str::CompactString;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// TypeScript's "'x' is declared but its value is never read." code.
pub const DECLARED_BUT_NEVER_USED: &str = "6133";

/// Default dependency directory, relative to a project root.
pub const NODE_MODULES: &str = "node_modules";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for [`DiagnosticsConfig`].
    #[error("invalid diagnostics configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Diagnostics configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagnosticsConfig {
    /// Drop every diagnostic at publish time.
    pub suppress_all_diagnostics: bool,
    /// Codes (stringified) that are never published.
    pub ignored_diagnostic_codes: Vec<CompactString>,
    /// Drop "unused" diagnostics and suggestions inside dependency directories.
    pub ignore_unused_suggestion_diagnostics: bool,
    /// Publish "declared but never used" diagnostics as info.
    pub unused_as_info: bool,
    /// Codes treated as "declared but never used" by `unused_as_info`.
    pub unused_diagnostic_codes: Vec<CompactString>,
    /// Extra code to severity rules, consulted after the unused rule.
    pub severity_overrides: BTreeMap<CompactString, Severity>,
    /// Project roots used to relativize file paths.
    pub project_roots: Vec<String>,
    /// Directories (relative to a project root) holding third-party code.
    /// Without project roots they match at any depth.
    pub dependency_directories: Vec<String>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            suppress_all_diagnostics: false,
            ignored_diagnostic_codes: Vec::new(),
            ignore_unused_suggestion_diagnostics: false,
            unused_as_info: false,
            unused_diagnostic_codes: vec![DECLARED_BUT_NEVER_USED.into()],
            severity_overrides: BTreeMap::new(),
            project_roots: Vec::new(),
            dependency_directories: vec![NODE_MODULES.to_string()],
        }
    }
}

impl DiagnosticsConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Builder-style toggle for `suppress_all_diagnostics`.
    pub fn with_suppress_all(mut self, suppress: bool) -> Self {
        self.suppress_all_diagnostics = suppress;
        self
    }

    /// Builder-style setter for the ignore list.
    pub fn with_ignored_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        self.ignored_diagnostic_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style toggle for `ignore_unused_suggestion_diagnostics`.
    pub fn with_ignore_unused_suggestions(mut self, ignore: bool) -> Self {
        self.ignore_unused_suggestion_diagnostics = ignore;
        self
    }

    /// Builder-style toggle for `unused_as_info`.
    pub fn with_unused_as_info(mut self, enabled: bool) -> Self {
        self.unused_as_info = enabled;
        self
    }

    /// Builder-style setter for a severity override.
    pub fn with_severity_override(
        mut self,
        code: impl Into<CompactString>,
        severity: Severity,
    ) -> Self {
        self.severity_overrides.insert(code.into(), severity);
        self
    }

    /// Builder-style setter for a project root.
    pub fn with_project_root(mut self, root: impl Into<String>) -> Self {
        self.project_roots.push(root.into());
        self
    }
}

/// Source of configuration snapshots, consulted once per publish.
pub trait ConfigProvider: Send + Sync {
    /// The configuration to apply to the next publish.
    fn snapshot(&self) -> DiagnosticsConfig;
}

impl ConfigProvider for DiagnosticsConfig {
    fn snapshot(&self) -> DiagnosticsConfig {
        self.clone()
    }
}

/// Configuration handle that can be updated while an engine is running.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<DiagnosticsConfig>>,
}

impl SharedConfig {
    /// Create a handle holding `config`.
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Replace the whole configuration.
    pub fn replace(&self, config: DiagnosticsConfig) {
        *self.inner.write() = config;
    }

    /// Modify the configuration in place.
    pub fn update(&self, f: impl FnOnce(&mut DiagnosticsConfig)) {
        f(&mut *self.inner.write());
    }
}

impl ConfigProvider for SharedConfig {
    fn snapshot(&self) -> DiagnosticsConfig {
        self.inner.read().clone()
    }
}
