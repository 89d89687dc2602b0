//! Downstream sinks for published message sets.
//!
//! A sink receives full replacement sets: every publish is authoritative and
//! supersedes whatever the sink previously held for this engine.

mod channel;
mod memory;

pub use channel::*;
pub use memory::*;

use tessera_patina::Message;

/// Consumer of published diagnostics.
///
/// Sink methods are called while the engine holds its state lock, so an
/// implementation must not call back into the engine.
pub trait DiagnosticSink: Send {
    /// Replace everything previously published with `messages`.
    fn set_all_messages(&mut self, messages: Vec<Message>);

    /// Drop everything previously published.
    fn clear_messages(&mut self);

    /// Called once when the engine releases the sink.
    fn dispose(&mut self) {}
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn set_all_messages(&mut self, messages: Vec<Message>) {
        (**self).set_all_messages(messages);
    }

    fn clear_messages(&mut self) {
        (**self).clear_messages();
    }

    fn dispose(&mut self) {
        (**self).dispose();
    }
}
