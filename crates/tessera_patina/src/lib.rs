//! # tessera_patina
//!
//! Patina - The publish-time quality pass for Tessera.
//!
//! ## Name Origin
//!
//! **Patina** (/ˈpætɪnə/) is the layer that forms on bronze over time and
//! decides how the piece finally looks. `tessera_patina` decides how stored
//! diagnostics finally look to the outside world: which ones are dropped,
//! which severity the survivors carry, and how they are printed.
//!
//! ## Pipeline
//!
//! 1. [`FilterPipeline`] - ordered suppression filters, first match drops
//!    - `suppress-all`: global switch
//!    - `ignored-code`: configured ignore list
//!    - `dependency-noise`: "unused" diagnostics, and suggestions in
//!      dependency directories such as `node_modules`
//! 2. [`SeverityRules`] - code-based overrides, then category mapping
//! 3. [`Message`] - normalized `{severity, excerpt, location}` records
//!
//! ## Usage
//!
//! ```
//! use tessera_patina::{flatten, DiagnosticsConfig, Severity};
//! use tessera_relief::{normalize_path, Diagnostic, Location};
//!
//! let file = normalize_path("/p/a.ts");
//! let diag = Diagnostic::error(2322, "Type 'string' is not assignable to type 'number'.",
//!     Location::new(3, 7), Location::new(3, 8));
//!
//! let config = DiagnosticsConfig::default();
//! let messages = flatten([(&file, &diag)], &config);
//! assert_eq!(messages[0].severity, Severity::Error);
//!
//! let config = DiagnosticsConfig::default().with_ignored_codes(["2322"]);
//! assert!(flatten([(&file, &diag)], &config).is_empty());
//! ```

pub mod config;
pub mod filter;
pub mod message;
pub mod output;
pub mod severity;

pub use config::{ConfigError, ConfigProvider, DiagnosticsConfig, SharedConfig};
pub use filter::{DependencyNoise, Filter, FilterOutcome, FilterPipeline, IgnoredCodes, SuppressAll};
pub use message::{flatten, Message, MessageLocation};
pub use output::{format_messages, format_summary, format_text, OutputFormat};
pub use severity::{Severity, SeverityRule, SeverityRules};
