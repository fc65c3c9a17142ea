//! # Forwarder: republish one native source as tagged events.
//!
//! [`Forwarder::begin`] spawns a background task that loops:
//!
//! ```text
//! loop {
//!   ├─► source.recv()
//!   │     ├─ Some(v) ─► send SelectEvent{ source: id, receive_status: true, received: v }
//!   │     └─ None    ─► exit silently (no terminal SelectEvent)
//!   └─ exit conditions:
//!        - native source closed
//!        - runtime token cancelled (shutdown / re-initialize)
//!        - per-source stop token cancelled (adapter `Stop`)
//!        - shared receiver dropped
//! }
//! ```
//!
//! ## Rules
//! - One forwarder per source, so values from one source stay FIFO.
//! - A forwarder starts at most once; its source is consumed by `begin`.
//! - Panics inside the task are logged, published as `ForwarderPanicked`,
//!   and then re-raised (they surface through the task's `JoinHandle`).

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{EventSink, NativeSource};
use crate::error::SelectError;
use crate::events::{Event, EventKind, SelectEvent};
use crate::identifier::SelectorIdentifier;

/// One-shot adapter from a [`NativeSource`] to the shared event channel.
pub struct Forwarder<S: NativeSource> {
    id: SelectorIdentifier,
    source: Option<S>,
    sink: EventSink,
    stop: Option<CancellationToken>,
}

impl<S: NativeSource> Forwarder<S> {
    /// Creates a forwarder over `source`, tagging events with the invalid identifier
    /// unless one is supplied to [`begin`](Self::begin) or [`with_identifier`](Self::with_identifier).
    pub fn new(source: S, sink: EventSink) -> Self {
        Self {
            id: SelectorIdentifier::invalid(),
            source: Some(source),
            sink,
            stop: None,
        }
    }

    /// Creates a forwarder with no underlying source; `begin` always fails.
    pub fn empty(sink: EventSink) -> Self {
        Self {
            id: SelectorIdentifier::invalid(),
            source: None,
            sink,
            stop: None,
        }
    }

    /// Sets the identifier used when `begin` is called without one.
    pub fn with_identifier(mut self, id: SelectorIdentifier) -> Self {
        self.id = id;
        self
    }

    /// Attaches a per-source stop token; cancelling it ends the task like a closed source.
    pub fn with_stop(mut self, stop: CancellationToken) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Starts the background task.
    ///
    /// Events are tagged with `id` if given, otherwise with the stored identifier.
    /// Fails with [`SelectError::BeginFailed`] when there is no source to read
    /// (never had one, or `begin` already consumed it).
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin(&mut self, id: Option<&SelectorIdentifier>) -> Result<JoinHandle<()>, SelectError> {
        let mut source = self.source.take().ok_or(SelectError::BeginFailed {
            reason: "forwarder has no source",
        })?;
        let id = id.cloned().unwrap_or_else(|| self.id.clone());
        let label = id.to_string();
        let sink = self.sink.clone();
        let stop = self.stop.clone();

        let pump = {
            let sink = sink.clone();
            async move {
                let tx = sink.sender();
                let runtime = sink.token();
                loop {
                    let item = tokio::select! {
                        biased;
                        _ = runtime.cancelled() => break,
                        _ = stopped(stop.as_ref()) => break,
                        item = source.recv() => item,
                    };
                    let Some(value) = item else { break };

                    let ev = SelectEvent::new(id.clone(), value);
                    tokio::select! {
                        biased;
                        _ = runtime.cancelled() => break,
                        _ = stopped(stop.as_ref()) => break,
                        sent = tx.send(ev) => if sent.is_err() { break },
                    }
                }
            }
        };

        Ok(tokio::spawn(async move {
            if let Err(panic) = AssertUnwindSafe(pump).catch_unwind().await {
                let info = panic_message(&*panic);
                tracing::error!(selector = %label, panic = %info, "forwarder panicked");
                sink.publish(
                    Event::new(EventKind::ForwarderPanicked)
                        .with_selector(label)
                        .with_reason(info),
                );
                std::panic::resume_unwind(panic);
            }
            tracing::debug!(selector = %label, "forwarder closed");
            sink.publish(Event::new(EventKind::ForwarderClosed).with_selector(label));
        }))
    }
}

/// Completes when the optional token is cancelled; never completes for `None`.
async fn stopped(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    fn sink(capacity: usize) -> (EventSink, mpsc::Receiver<SelectEvent>, CancellationToken) {
        let (tx, rx) = mpsc::channel(capacity);
        let token = CancellationToken::new();
        (EventSink::new(tx, token.clone(), Bus::new(16)), rx, token)
    }

    #[tokio::test]
    async fn test_forwards_in_order_and_exits_silently_on_close() {
        let (sink, mut shared, _token) = sink(8);
        let (tx, rx) = mpsc::channel::<u32>(8);
        let id = SelectorIdentifier::new("channel[u32]", 1);

        let mut fwd = Forwarder::new(rx, sink);
        let join = fwd.begin(Some(&id)).unwrap();

        tx.send(1).await.unwrap();
        tx.send(2).await.unwrap();
        drop(tx);
        join.await.unwrap();
        drop(fwd);

        let first = shared.recv().await.unwrap();
        let second = shared.recv().await.unwrap();
        assert_eq!((first.source.clone(), first.received::<u32>()), (id.clone(), Some(&1)));
        assert_eq!(second.received::<u32>(), Some(&2));
        assert!(first.receive_status && second.receive_status);

        // The forwarder held the only sender clone; nothing else was emitted.
        assert!(shared.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_uses_stored_identifier_when_none_supplied() {
        let (sink, mut shared, _token) = sink(1);
        let (tx, rx) = mpsc::unbounded_channel::<&'static str>();
        let id = SelectorIdentifier::new("stored", 9);

        let mut fwd = Forwarder::new(rx, sink).with_identifier(id.clone());
        fwd.begin(None).unwrap();
        tx.send("hi").unwrap();

        let ev = shared.recv().await.unwrap();
        assert_eq!(ev.source, id);
    }

    #[tokio::test]
    async fn test_begin_without_source_fails() {
        let (sink, _shared, _token) = sink(1);
        let mut fwd: Forwarder<mpsc::Receiver<u8>> = Forwarder::empty(sink.clone());
        let err = fwd.begin(None).unwrap_err();
        assert!(matches!(err, SelectError::BeginFailed { .. }));

        let (_tx, rx) = mpsc::channel::<u8>(1);
        let mut fwd = Forwarder::new(rx, sink);
        fwd.begin(None).unwrap();
        assert!(matches!(fwd.begin(None), Err(SelectError::BeginFailed { .. })));
    }

    #[tokio::test]
    async fn test_runtime_token_releases_blocked_forwarder() {
        let (sink, _shared, token) = sink(1);
        let (_tx, rx) = mpsc::channel::<u8>(1);

        let join = Forwarder::new(rx, sink).begin(None).unwrap();
        token.cancel();
        join.await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_token_releases_blocked_forwarder() {
        let (sink, _shared, _token) = sink(1);
        let (_tx, rx) = mpsc::channel::<u8>(1);
        let stop = CancellationToken::new();

        let join = Forwarder::new(rx, sink).with_stop(stop.clone()).begin(None).unwrap();
        stop.cancel();
        join.await.unwrap();
    }

    struct Exploding;

    #[async_trait]
    impl NativeSource for Exploding {
        type Item = ();

        async fn recv(&mut self) -> Option<()> {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn test_panic_is_reported_and_reraised() {
        let bus = Bus::new(16);
        let (tx, _rx) = mpsc::channel(1);
        let sink = EventSink::new(tx, CancellationToken::new(), bus.clone());
        let mut events = bus.subscribe();

        let join = Forwarder::new(Exploding, sink).begin(None).unwrap();
        let err = join.await.unwrap_err();
        assert!(err.is_panic());

        let ev = events.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ForwarderPanicked);
        assert_eq!(ev.reason.as_deref(), Some("boom"));
    }
}
