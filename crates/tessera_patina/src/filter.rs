//! Filter trait and pipeline for publish-time suppression.
//!
//! Filters run in registration order and the first one that excludes a
//! diagnostic wins. Interactive queries never go through this pipeline.

use compact_str::CompactString;
use rustc_hash::FxHashSet;
use tessera_relief::{normalize_path, Category, Diagnostic, NormalizedPath};

use crate::config::DiagnosticsConfig;

/// Filter names.
pub mod names {
    pub const SUPPRESS_ALL: &str = "suppress-all";
    pub const IGNORED_CODE: &str = "ignored-code";
    pub const DEPENDENCY_NOISE: &str = "dependency-noise";
}

/// A single suppression predicate.
pub trait Filter: Send + Sync {
    /// Filter name, reported when it drops a diagnostic.
    fn name(&self) -> &'static str;

    /// Whether `diagnostic`, reported for `file`, must not be published.
    fn excludes(&self, file: &NormalizedPath, diagnostic: &Diagnostic) -> bool;
}

/// Result of running the pipeline over one diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The diagnostic survives.
    Keep,
    /// Dropped by the named filter.
    Drop(&'static str),
}

impl FilterOutcome {
    #[inline]
    pub fn is_kept(self) -> bool {
        matches!(self, FilterOutcome::Keep)
    }
}

/// Drops everything.
pub struct SuppressAll;

impl Filter for SuppressAll {
    fn name(&self) -> &'static str {
        names::SUPPRESS_ALL
    }

    fn excludes(&self, _file: &NormalizedPath, _diagnostic: &Diagnostic) -> bool {
        true
    }
}

/// Drops diagnostics whose stringified code is on the ignore list.
pub struct IgnoredCodes {
    codes: FxHashSet<CompactString>,
}

impl IgnoredCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }
}

impl Filter for IgnoredCodes {
    fn name(&self) -> &'static str {
        names::IGNORED_CODE
    }

    fn excludes(&self, _file: &NormalizedPath, diagnostic: &Diagnostic) -> bool {
        self.codes.contains(diagnostic.code.to_string().as_str())
    }
}

/// Drops "unused" diagnostics anywhere, and suggestions inside dependency
/// directories.
pub struct DependencyNoise {
    project_roots: Vec<NormalizedPath>,
    dependency_dirs: Vec<NormalizedPath>,
}

impl DependencyNoise {
    pub fn new<R, D>(project_roots: R, dependency_dirs: D) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            project_roots: project_roots
                .into_iter()
                .map(|r| normalize_path(r.as_ref()))
                .collect(),
            dependency_dirs: dependency_dirs
                .into_iter()
                .map(|d| normalize_path(d.as_ref()))
                .collect(),
        }
    }

    /// Whether `file` sits inside a dependency directory of a project root.
    ///
    /// Paths outside every project root are checked as given. Without any
    /// project root, a dependency directory may appear anywhere in the path.
    pub fn is_dependency_file(&self, file: &NormalizedPath) -> bool {
        if self.project_roots.is_empty() {
            return self.has_dependency_component(file);
        }

        let relative = self
            .project_roots
            .iter()
            .find_map(|root| file.relative_to(root))
            .unwrap_or(file.as_str());

        self.dependency_dirs.iter().any(|dir| {
            relative
                .strip_prefix(dir.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    fn has_dependency_component(&self, file: &NormalizedPath) -> bool {
        let components: Vec<&str> = file.components().collect();
        // the file name itself is never a directory
        let dirs = &components[..components.len().saturating_sub(1)];

        self.dependency_dirs.iter().any(|dir| {
            let dir: Vec<&str> = dir.components().collect();
            !dir.is_empty() && dirs.windows(dir.len()).any(|run| run == dir.as_slice())
        })
    }
}

impl Filter for DependencyNoise {
    fn name(&self) -> &'static str {
        names::DEPENDENCY_NOISE
    }

    fn excludes(&self, file: &NormalizedPath, diagnostic: &Diagnostic) -> bool {
        diagnostic.reports_unnecessary
            || (diagnostic.category == Category::Suggestion && self.is_dependency_file(file))
    }
}

/// Ordered set of filters.
#[derive(Default)]
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create an empty pipeline that keeps everything.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the standard pipeline for a configuration snapshot.
    ///
    /// Only filters enabled by the configuration are registered, in the
    /// order: suppress-all, ignored-code, dependency-noise.
    pub fn with_defaults(config: &DiagnosticsConfig) -> Self {
        let mut pipeline = Self::new();

        if config.suppress_all_diagnostics {
            pipeline.register(Box::new(SuppressAll));
        }

        if !config.ignored_diagnostic_codes.is_empty() {
            pipeline.register(Box::new(IgnoredCodes::new(
                config.ignored_diagnostic_codes.iter().cloned(),
            )));
        }

        if config.ignore_unused_suggestion_diagnostics {
            pipeline.register(Box::new(DependencyNoise::new(
                &config.project_roots,
                &config.dependency_directories,
            )));
        }

        pipeline
    }

    /// Append a filter.
    pub fn register(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    /// Registered filter names, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Whether any filter drops everything unconditionally.
    pub fn suppresses_all(&self) -> bool {
        self.filters.iter().any(|f| f.name() == names::SUPPRESS_ALL)
    }

    /// Run the filters over one diagnostic.
    pub fn evaluate(&self, file: &NormalizedPath, diagnostic: &Diagnostic) -> FilterOutcome {
        self.filters
            .iter()
            .find(|filter| filter.excludes(file, diagnostic))
            .map_or(FilterOutcome::Keep, |filter| {
                FilterOutcome::Drop(filter.name())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_relief::Location;

    fn error(code: u32) -> Diagnostic {
        Diagnostic::error(code, "msg", Location::new(1, 1), Location::new(1, 2))
    }

    fn suggestion(code: u32) -> Diagnostic {
        Diagnostic::suggestion(code, "msg", Location::new(1, 1), Location::new(1, 2))
    }

    #[test]
    fn test_empty_pipeline_keeps() {
        let pipeline = FilterPipeline::with_defaults(&DiagnosticsConfig::default());
        assert!(pipeline.names().is_empty());
        assert!(pipeline
            .evaluate(&normalize_path("/p/a.ts"), &error(2322))
            .is_kept());
    }

    #[test]
    fn test_ignored_code() {
        let config = DiagnosticsConfig::default().with_ignored_codes(["2322"]);
        let pipeline = FilterPipeline::with_defaults(&config);
        let file = normalize_path("/p/a.ts");

        assert_eq!(
            pipeline.evaluate(&file, &error(2322)),
            FilterOutcome::Drop(names::IGNORED_CODE)
        );
        assert!(pipeline.evaluate(&file, &error(2323)).is_kept());
    }

    #[test]
    fn test_suppress_all_short_circuits_first() {
        let config = DiagnosticsConfig::default()
            .with_suppress_all(true)
            .with_ignored_codes(["2322"]);
        let pipeline = FilterPipeline::with_defaults(&config);

        assert!(pipeline.suppresses_all());
        assert_eq!(
            pipeline.names(),
            vec![names::SUPPRESS_ALL, names::IGNORED_CODE]
        );
        assert_eq!(
            pipeline.evaluate(&normalize_path("/p/a.ts"), &error(2322)),
            FilterOutcome::Drop(names::SUPPRESS_ALL)
        );
    }

    #[test]
    fn test_reports_unnecessary_dropped_anywhere() {
        let config = DiagnosticsConfig::default().with_ignore_unused_suggestions(true);
        let pipeline = FilterPipeline::with_defaults(&config);

        let unused = suggestion(6133).with_reports_unnecessary();
        assert_eq!(
            pipeline.evaluate(&normalize_path("/p/src/a.ts"), &unused),
            FilterOutcome::Drop(names::DEPENDENCY_NOISE)
        );
    }

    #[test]
    fn test_suggestions_only_dropped_in_dependencies() {
        let config = DiagnosticsConfig::default()
            .with_ignore_unused_suggestions(true)
            .with_project_root("/p");
        let pipeline = FilterPipeline::with_defaults(&config);

        let dep = normalize_path("/p/node_modules/lib/index.d.ts");
        let own = normalize_path("/p/src/a.ts");

        assert!(!pipeline.evaluate(&dep, &suggestion(80001)).is_kept());
        assert!(pipeline.evaluate(&own, &suggestion(80001)).is_kept());
        assert!(pipeline.evaluate(&dep, &error(2322)).is_kept());
    }

    #[test]
    fn test_unused_flag_off_keeps_unnecessary() {
        let pipeline = FilterPipeline::with_defaults(&DiagnosticsConfig::default());
        let unused = suggestion(6133).with_reports_unnecessary();
        assert!(pipeline
            .evaluate(&normalize_path("/p/node_modules/x.ts"), &unused)
            .is_kept());
    }

    #[test]
    fn test_dependency_file_detection() {
        let noise = DependencyNoise::new(["/p"], ["node_modules"]);

        assert!(noise.is_dependency_file(&normalize_path("/p/node_modules/x/a.ts")));
        assert!(!noise.is_dependency_file(&normalize_path("/p/node_modules_old/a.ts")));
        assert!(!noise.is_dependency_file(&normalize_path("/p/src/node_modules/a.ts")));
        // outside every root the path is checked as given
        assert!(!noise.is_dependency_file(&normalize_path("/q/node_modules/a.ts")));
        assert!(noise.is_dependency_file(&normalize_path("node_modules/a.ts")));
    }

    #[test]
    fn test_dependency_file_without_project_roots() {
        let noise = DependencyNoise::new(Vec::<String>::new(), ["node_modules"]);

        assert!(noise.is_dependency_file(&normalize_path("/p/node_modules/x.d.ts")));
        assert!(noise.is_dependency_file(&normalize_path("C:\\w\\node_modules\\lib\\a.ts")));
        assert!(!noise.is_dependency_file(&normalize_path("/p/node_modules_old/a.ts")));
        assert!(!noise.is_dependency_file(&normalize_path("/p/src/node_modules")));
    }

    #[test]
    fn test_default_config_drops_dependency_suggestions() {
        let config = DiagnosticsConfig::default().with_ignore_unused_suggestions(true);
        let pipeline = FilterPipeline::with_defaults(&config);

        assert_eq!(
            pipeline.evaluate(&normalize_path("/p/node_modules/x.d.ts"), &suggestion(80001)),
            FilterOutcome::Drop(names::DEPENDENCY_NOISE)
        );
        assert!(pipeline
            .evaluate(&normalize_path("/p/src/a.ts"), &suggestion(80001))
            .is_kept());
    }

    #[test]
    fn test_custom_filter() {
        struct DropMessages;

        impl Filter for DropMessages {
            fn name(&self) -> &'static str {
                "drop-messages"
            }

            fn excludes(&self, _file: &NormalizedPath, diagnostic: &Diagnostic) -> bool {
                diagnostic.category == Category::Message
            }
        }

        let mut pipeline = FilterPipeline::new();
        pipeline.register(Box::new(DropMessages));

        let message = Diagnostic::unlocated(Category::Message, 6032, "File change detected");
        assert_eq!(
            pipeline.evaluate(&normalize_path("a.ts"), &message),
            FilterOutcome::Drop("drop-messages")
        );
    }
}
