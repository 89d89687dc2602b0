//! # Tessera
//!
//! Diagnostic aggregation and publication toolkit written in Rust.
//!
//! This crate re-exports all Tessera sub-crates for unified documentation.
//!
//! ## Crates
//!
//! - [`relief`] - Diagnostic records, locations, ranges and path keys
//! - [`patina`] - Publish-time filters, severity rules and output formatting
//! - [`maestro`] - The aggregation engine: store, queries, debounced publisher

/// Diagnostic records, locations, ranges and path keys.
pub use tessera_relief as relief;

/// Publish-time filters, severity rules and output formatting.
pub use tessera_patina as patina;

/// The aggregation engine.
pub use tessera_maestro as maestro;
