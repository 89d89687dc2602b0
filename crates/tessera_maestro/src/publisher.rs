//! Publication of the store to the attached sink.

use std::sync::Arc;

use tessera_patina::{flatten, ConfigProvider, Message};

use crate::sink::DiagnosticSink;
use crate::store::ErrorStore;

/// Flattens the store and hands full replacement sets to a single sink.
pub struct Publisher {
    sink: Option<Box<dyn DiagnosticSink>>,
    config: Arc<dyn ConfigProvider>,
}

impl Publisher {
    /// Create a publisher with no sink attached.
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self { sink: None, config }
    }

    /// Attach `sink`, returning the one it replaces.
    ///
    /// The previous sink is handed back untouched; its messages are not cleared.
    pub fn attach(&mut self, sink: Box<dyn DiagnosticSink>) -> Option<Box<dyn DiagnosticSink>> {
        let previous = self.sink.replace(sink);
        tracing::debug!(
            "sink attached{}",
            if previous.is_some() { " (replacing previous)" } else { "" }
        );
        previous
    }

    /// Detach the current sink without notifying it.
    pub fn detach(&mut self) -> Option<Box<dyn DiagnosticSink>> {
        self.sink.take()
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Flatten `store` under a fresh configuration snapshot.
    pub fn render(&self, store: &ErrorStore) -> Vec<Message> {
        flatten(store.entries(), &self.config.snapshot())
    }

    /// Push the current state of `store` to the sink.
    ///
    /// Returns `false` without flattening when no sink is attached.
    pub fn publish(&mut self, store: &ErrorStore) -> bool {
        if self.sink.is_none() {
            tracing::trace!("publish skipped: no sink attached");
            return false;
        }

        let messages = self.render(store);
        tracing::debug!(
            "publishing {} message(s) from {} file entr{}",
            messages.len(),
            store.file_count(),
            if store.file_count() == 1 { "y" } else { "ies" }
        );

        if let Some(sink) = self.sink.as_mut() {
            sink.set_all_messages(messages);
        }
        true
    }

    /// Tell the sink to drop everything it holds. Safe without a sink.
    pub fn clear(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.clear_messages();
        }
    }

    /// Clear the sink, notify it of disposal, and detach it.
    pub fn dispose(&mut self) {
        self.clear();
        if let Some(mut sink) = self.sink.take() {
            sink.dispose();
            tracing::debug!("sink disposed and detached");
        }
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("has_sink", &self.has_sink())
            .finish()
    }
}
