//! Configuration file loading for tessera.
//!
//! Reads `tessera.config.json` from the current working directory, or the
//! file given with `--config`. Also provides the JSON Schema for editor
//! autocompletion.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tessera_patina::DiagnosticsConfig;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "tessera.config.json";

/// Top-level tessera configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TesseraConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Publish-time diagnostics configuration.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Replay command configuration.
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// Configuration for the `replay` command.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayConfig {
    /// Publish debounce window in milliseconds (default 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

fn config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()
            .unwrap_or_default()
            .join(CONFIG_FILE_NAME),
    }
}

/// Load the configuration from `explicit`, or from `tessera.config.json` in
/// the CWD.
///
/// A missing default file yields the defaults silently. Anything that cannot
/// be read or parsed yields the defaults with a warning.
pub fn load_config(explicit: Option<&Path>) -> TesseraConfig {
    let config_path = config_path(explicit);

    if explicit.is_none() && !config_path.exists() {
        return TesseraConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => {
                tracing::debug!("loaded configuration from {}", config_path.display());
                config
            }
            Err(e) => {
                eprintln!(
                    "\x1b[33mWarning:\x1b[0m Failed to parse {}: {}",
                    config_path.display(),
                    e
                );
                TesseraConfig::default()
            }
        },
        Err(e) => {
            eprintln!(
                "\x1b[33mWarning:\x1b[0m Failed to read {}: {}",
                config_path.display(),
                e
            );
            TesseraConfig::default()
        }
    }
}

/// JSON Schema for `tessera.config.json`.
pub const TESSERA_CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Tessera Configuration",
  "description": "Configuration file for tessera - diagnostic aggregation and publication",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "diagnostics": {
      "type": "object",
      "description": "Publish-time diagnostics configuration, re-read at every publish",
      "properties": {
        "suppressAllDiagnostics": {
          "type": "boolean",
          "description": "Publish nothing at all",
          "default": false
        },
        "ignoredDiagnosticCodes": {
          "type": "array",
          "description": "Diagnostic codes that are never published (still returned by queries)",
          "items": { "type": "string" },
          "examples": [["2322", "7006"]]
        },
        "ignoreUnusedSuggestionDiagnostics": {
          "type": "boolean",
          "description": "Drop 'unused' diagnostics, and suggestions inside dependency directories",
          "default": false
        },
        "unusedAsInfo": {
          "type": "boolean",
          "description": "Publish 'declared but never used' diagnostics as info",
          "default": false
        },
        "unusedDiagnosticCodes": {
          "type": "array",
          "description": "Codes treated as 'declared but never used' by unusedAsInfo",
          "items": { "type": "string" },
          "default": ["6133"]
        },
        "severityOverrides": {
          "type": "object",
          "description": "Code to severity rules applied after unusedAsInfo",
          "additionalProperties": { "enum": ["error", "warning", "info"] }
        },
        "projectRoots": {
          "type": "array",
          "description": "Project roots used to relativize file paths (defaults to the working directory)",
          "items": { "type": "string" }
        },
        "dependencyDirectories": {
          "type": "array",
          "description": "Directories, relative to a project root, holding third-party code",
          "items": { "type": "string" },
          "default": ["node_modules"]
        }
      },
      "additionalProperties": false
    },
    "replay": {
      "type": "object",
      "description": "Replay command configuration",
      "properties": {
        "debounceMs": {
          "type": "integer",
          "minimum": 0,
          "description": "Publish debounce window in milliseconds",
          "default": 100
        }
      },
      "additionalProperties": false
    }
  },
  "additionalProperties": false
}"#;
