//! # tessera_relief
//!
//! Relief - The diagnostic data model for Tessera.
//!
//! ## Name Origin
//!
//! A **relief** is a sculpture that rises from a flat surface, giving shape to
//! what would otherwise be a blank plane. `tessera_relief` gives shape to the
//! raw diagnostic payloads coming out of a compiler: where they are, what they
//! say, and which file they belong to.
//!
//! ## Contents
//!
//! - [`Diagnostic`], [`Category`], [`DiagnosticCode`] - immutable diagnostic records
//! - [`Location`] (1-based), [`Point`] (0-based) and half-open [`Range`]
//! - [`normalize_path`] / [`NormalizedPath`] - canonical file-path keys
//! - [`SourceTag`] - producer identifiers
//!
//! ## Example
//!
//! ```
//! use tessera_relief::{Diagnostic, Location, Point, normalize_path};
//!
//! let diag = Diagnostic::error(1005, "';' expected.", Location::new(2, 1), Location::new(2, 2));
//! assert!(diag.range().contains_point(Point::new(1, 0)));
//! assert_eq!(normalize_path("src\\.\\a.ts").as_str(), "src/a.ts");
//! ```

pub mod diagnostic;
pub mod location;
pub mod path;
pub mod source;

pub use diagnostic::{span_to_range, Category, Diagnostic, DiagnosticCode};
pub use location::{
    location_to_point, locations_to_range, text_span_to_range, Location, Point, Range,
};
pub use path::{normalize_path, NormalizedPath};
pub use source::{sources, SourceTag};
