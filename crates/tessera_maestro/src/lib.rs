//! # tessera_maestro
//!
//! Maestro - The diagnostic aggregation and publication engine for Tessera.
//!
//! ## Name Origin
//!
//! **Maestro** is a master conductor who coordinates an orchestra, cueing
//! each section at the right moment. `tessera_maestro` coordinates many
//! diagnostic producers, holds their latest reports, and cues a single
//! consolidated publish once they have all gone quiet.
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------------------------------+
//! |                 tessera_maestro (Aggregator)                      |
//! +------------------------------------------------------------------+
//! |                                                                    |
//! |  producers --set_errors / clear_file_errors--+                     |
//! |                                              v                     |
//! |  +-----------------------------------------------------------+    |
//! |  |                      Error Store                           |    |
//! |  |  tag -> normalized path -> { trigger, diagnostics }        |    |
//! |  +-----------------------------------------------------------+    |
//! |        |  errors_at / errors_in_range        |  mutation        |
//! |        v  (raw, unfiltered)                  v                   |
//! |     callers                      +---------------------+         |
//! |                                  |  Debouncer (100ms)  |         |
//! |                                  +---------------------+         |
//! |                                              |  quiet period     |
//! |                                              v                   |
//! |  +-----------------------------------------------------------+    |
//! |  |          Publisher: flatten through tessera_patina         |    |
//! |  +-----------------------------------------------------------+    |
//! |                                              |                     |
//! |                                              v                     |
//! |                                      DiagnosticSink                |
//! +------------------------------------------------------------------+
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use tessera_maestro::{DiagnosticAggregator, MemorySink};
//! use tessera_relief::{Diagnostic, Location, SourceTag};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = DiagnosticAggregator::new().unwrap();
//!     let sink = MemorySink::new();
//!     engine.set_sink(sink.clone());
//!
//!     engine.set_errors(
//!         SourceTag::semantic(),
//!         "/p/a.ts",
//!         vec![Diagnostic::error(1005, "';' expected", Location::new(2, 1), Location::new(2, 2))],
//!         None,
//!     );
//!
//!     tokio::time::sleep(std::time::Duration::from_millis(150)).await;
//!     assert_eq!(sink.current().len(), 1);
//! }
//! ```

pub mod aggregator;
pub mod debounce;
pub mod error;
pub mod publisher;
pub mod query;
pub mod sink;
pub mod store;

pub use aggregator::{AggregatorConfig, DiagnosticAggregator, PublishState, DEFAULT_DEBOUNCE};
pub use debounce::Debouncer;
pub use error::{MaestroError, MaestroResult};
pub use publisher::Publisher;
pub use sink::{ChannelSink, DiagnosticSink, MemorySink, SinkEvent};
pub use store::{ClearSelector, ErrorStore, FileEntry};

/// Initialize stderr logging at `level`.
///
/// Later calls are ignored, as is a subscriber installed by the host.
pub fn init_logging(level: tracing::Level) {
    use std::sync::Once;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_max_level(level)
            .try_init();
    });
}
