//! The aggregation engine facade.
//!
//! [`DiagnosticAggregator`] owns the store and the publisher behind one lock.
//! Mutations apply immediately and schedule a debounced publish; queries read
//! the store directly and never wait for a publish.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tessera_patina::{ConfigProvider, DiagnosticsConfig, Message};
use tessera_relief::{Diagnostic, NormalizedPath, Point, Range, SourceTag};

use crate::debounce::Debouncer;
use crate::error::MaestroResult;
use crate::publisher::Publisher;
use crate::sink::DiagnosticSink;
use crate::store::{ClearSelector, ErrorStore};

/// Quiet period between the last mutation and the publish.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Engine construction options.
#[derive(Clone)]
pub struct AggregatorConfig {
    /// Quiet period before a publish
    pub debounce: Duration,
    /// Configuration consulted at every publish
    pub config: Arc<dyn ConfigProvider>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            config: Arc::new(DiagnosticsConfig::default()),
        }
    }
}

impl std::fmt::Debug for AggregatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregatorConfig")
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

/// Publisher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    /// Nothing scheduled
    Idle,
    /// A mutation happened and the publish timer is running
    Pending,
}

struct State {
    store: ErrorStore,
    publisher: Publisher,
}

struct Shared {
    state: Mutex<State>,
}

impl Shared {
    fn publish(&self) {
        let mut state = self.state.lock();
        let State { store, publisher } = &mut *state;
        publisher.publish(store);
    }
}

/// Diagnostic aggregation and publication engine.
pub struct DiagnosticAggregator {
    shared: Arc<Shared>,
    debouncer: Debouncer,
}

impl DiagnosticAggregator {
    /// Create an engine with default options on the current tokio runtime.
    pub fn new() -> MaestroResult<Self> {
        Self::with_config(AggregatorConfig::default())
    }

    /// Create an engine on the current tokio runtime.
    pub fn with_config(options: AggregatorConfig) -> MaestroResult<Self> {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                store: ErrorStore::new(),
                publisher: Publisher::new(options.config),
            }),
        });

        let target = Arc::clone(&shared);
        let debouncer = Debouncer::new(options.debounce, move || target.publish())?;

        tracing::debug!("aggregator created (debounce {:?})", options.debounce);
        Ok(Self { shared, debouncer })
    }

    /// Replace the diagnostics for `(tag, file)` and schedule a publish.
    pub fn set_errors(
        &self,
        tag: impl Into<SourceTag>,
        file: &str,
        diagnostics: Vec<Diagnostic>,
        trigger_file: Option<&str>,
    ) {
        self.shared
            .state
            .lock()
            .store
            .set_errors(tag.into(), file, diagnostics, trigger_file);
        self.debouncer.trigger();
    }

    /// Remove the entries chosen by `selector` and schedule a publish.
    ///
    /// An empty selector changes nothing and schedules nothing.
    pub fn clear_file_errors(&self, selector: &ClearSelector) -> usize {
        if selector.is_empty() {
            tracing::debug!("clear_file_errors: empty selector, nothing to do");
            return 0;
        }
        let removed = self.shared.state.lock().store.clear_file_errors(selector);
        self.debouncer.trigger();
        removed
    }

    /// Files whose stored trigger equals `trigger`.
    pub fn files_for_trigger(&self, trigger: &str) -> Vec<NormalizedPath> {
        self.shared.state.lock().store.files_for_trigger(trigger)
    }

    /// Raw diagnostics for `file` covering `point`.
    pub fn errors_at(&self, file: &str, point: Point) -> Vec<Diagnostic> {
        self.shared.state.lock().store.errors_at(file, point)
    }

    /// Raw diagnostics for `file` intersecting `range`.
    pub fn errors_in_range(&self, file: &str, range: Range) -> Vec<Diagnostic> {
        self.shared.state.lock().store.errors_in_range(file, range)
    }

    /// Attach `sink` and schedule a publish so it receives the current state.
    ///
    /// Returns the sink it replaces, which is neither cleared nor disposed.
    pub fn set_sink(&self, sink: impl DiagnosticSink + 'static) -> Option<Box<dyn DiagnosticSink>> {
        let previous = self.shared.state.lock().publisher.attach(Box::new(sink));
        self.debouncer.trigger();
        previous
    }

    /// Tell the sink to drop everything published so far.
    pub fn clear(&self) {
        self.shared.state.lock().publisher.clear();
    }

    /// Clear the sink, notify it, and detach it.
    ///
    /// The store is kept; a later `set_sink` publishes it again.
    pub fn dispose(&self) {
        self.shared.state.lock().publisher.dispose();
    }

    pub fn publish_state(&self) -> PublishState {
        if self.debouncer.is_pending() {
            PublishState::Pending
        } else {
            PublishState::Idle
        }
    }

    /// Publish now if a publish is scheduled. Returns whether one ran.
    pub fn flush(&self) -> bool {
        self.debouncer.flush()
    }

    /// What a publish would send right now, without sending it.
    pub fn snapshot_messages(&self) -> Vec<Message> {
        let state = self.shared.state.lock();
        state.publisher.render(&state.store)
    }

    /// Number of stored `(tag, file)` entries.
    pub fn file_count(&self) -> usize {
        self.shared.state.lock().store.file_count()
    }

    /// Number of stored diagnostics.
    pub fn diagnostic_count(&self) -> usize {
        self.shared.state.lock().store.diagnostic_count()
    }

    pub fn has_sink(&self) -> bool {
        self.shared.state.lock().publisher.has_sink()
    }
}

impl std::fmt::Debug for DiagnosticAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticAggregator")
            .field("debouncer", &self.debouncer)
            .field("files", &self.file_count())
            .finish()
    }
}
