//! Point and range queries over the store.
//!
//! Queries read raw stored state: no filter or severity rule applies. Results
//! are materialized fresh on every call and own their diagnostics.

use tessera_relief::{normalize_path, span_to_range, Diagnostic, Point, Range};

use crate::store::ErrorStore;

impl ErrorStore {
    /// Diagnostics for `file`, across every tag, whose range contains `point`.
    pub fn errors_at(&self, file: &str, point: Point) -> Vec<Diagnostic> {
        self.collect_matching(file, |range| range.contains_point(point))
    }

    /// Diagnostics for `file`, across every tag, whose range intersects `range`.
    ///
    /// Ranges that only touch at an endpoint do not intersect.
    pub fn errors_in_range(&self, file: &str, range: Range) -> Vec<Diagnostic> {
        self.collect_matching(file, |candidate| candidate.intersects(&range))
    }

    fn collect_matching(&self, file: &str, predicate: impl Fn(&Range) -> bool) -> Vec<Diagnostic> {
        let path = normalize_path(file);

        self.entries_for_file(&path)
            .flat_map(|entry| entry.diagnostics.iter())
            .filter(|diagnostic| predicate(&span_to_range(diagnostic)))
            .cloned()
            .collect()
    }
}
