//! In-memory sink that records every call.

use std::sync::Arc;

use parking_lot::Mutex;
use tessera_patina::Message;

use super::DiagnosticSink;

#[derive(Debug, Default)]
struct SinkLog {
    publishes: Vec<Vec<Message>>,
    current: Vec<Message>,
    clears: usize,
    disposed: bool,
}

/// Recording sink. Clones share the same log, so a handle kept by the caller
/// observes what the engine pushed into the boxed copy.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    log: Arc<Mutex<SinkLog>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages the sink currently holds.
    pub fn current(&self) -> Vec<Message> {
        self.log.lock().current.clone()
    }

    /// Number of `set_all_messages` calls received.
    pub fn publish_count(&self) -> usize {
        self.log.lock().publishes.len()
    }

    /// Every published set, oldest first.
    pub fn publishes(&self) -> Vec<Vec<Message>> {
        self.log.lock().publishes.clone()
    }

    /// The most recent published set.
    pub fn last_publish(&self) -> Option<Vec<Message>> {
        self.log.lock().publishes.last().cloned()
    }

    /// Number of `clear_messages` calls received.
    pub fn clear_count(&self) -> usize {
        self.log.lock().clears
    }

    /// Whether the engine released this sink.
    pub fn is_disposed(&self) -> bool {
        self.log.lock().disposed
    }
}

impl DiagnosticSink for MemorySink {
    fn set_all_messages(&mut self, messages: Vec<Message>) {
        let mut log = self.log.lock();
        log.current = messages.clone();
        log.publishes.push(messages);
    }

    fn clear_messages(&mut self) {
        let mut log = self.log.lock();
        log.current.clear();
        log.clears += 1;
    }

    fn dispose(&mut self) {
        self.log.lock().disposed = true;
    }
}
