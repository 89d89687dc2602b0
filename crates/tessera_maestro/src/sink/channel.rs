//! Sink that forwards events over a tokio channel.

use tessera_patina::Message;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::DiagnosticSink;

/// Event forwarded by [`ChannelSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// A full replacement set
    Publish(Vec<Message>),
    /// Everything previously published was withdrawn
    Clear,
    /// The engine released the sink
    Dispose,
}

/// Sink that turns every call into a [`SinkEvent`] on an unbounded channel.
///
/// Sends after the receiver is gone are dropped with a warning.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver for its events.
    pub fn new() -> (Self, UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("channel sink receiver dropped, discarding event");
        }
    }
}

impl DiagnosticSink for ChannelSink {
    fn set_all_messages(&mut self, messages: Vec<Message>) {
        self.send(SinkEvent::Publish(messages));
    }

    fn clear_messages(&mut self) {
        self.send(SinkEvent::Clear);
    }

    fn dispose(&mut self) {
        self.send(SinkEvent::Dispose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_forwarded_in_order() {
        let (mut sink, mut rx) = ChannelSink::new();

        sink.set_all_messages(vec![]);
        sink.clear_messages();
        sink.dispose();

        assert_eq!(rx.try_recv().unwrap(), SinkEvent::Publish(vec![]));
        assert_eq!(rx.try_recv().unwrap(), SinkEvent::Clear);
        assert_eq!(rx.try_recv().unwrap(), SinkEvent::Dispose);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (mut sink, rx) = ChannelSink::new();
        drop(rx);
        // must not panic
        sink.set_all_messages(vec![]);
    }
}
