//! Per-request event delivery capability.
//!
//! Each download request gets its own [`EventChannel`], constructed by the
//! transport layer and passed into the job — lifecycle and progress events
//! are addressed to the requesting client only, never broadcast on a shared
//! connection. The channel is a capability boundary, not a concrete
//! transport: the receiving half can be drained directly or adapted into a
//! `Stream` for SSE/WebSocket-style forwarding.

use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::types::Event;

/// Receiving half of a per-request event channel
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<Event>;

/// Sending capability handed to a download job
#[derive(Clone, Debug)]
pub struct EventChannel {
    tx: tokio::sync::mpsc::UnboundedSender<Event>,
}

impl EventChannel {
    /// Create a channel pair for one request
    pub fn pair() -> (Self, EventReceiver) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit an event to the requesting client
    ///
    /// If the client is gone (receiver dropped), the event is silently
    /// discarded — a disconnected listener never stalls or fails the job.
    pub fn emit(&self, event: Event) {
        self.tx.send(event).ok();
    }
}

/// Adapt the receiving half into a `Stream` of events
///
/// Convenience for transports that forward events as an async stream.
pub fn into_stream(rx: EventReceiver) -> UnboundedReceiverStream<Event> {
    UnboundedReceiverStream::new(rx)
}
