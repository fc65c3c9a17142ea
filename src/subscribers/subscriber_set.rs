//! # Non-blocking fan-out to multiple subscribers.
//!
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → SubscriberPanicked
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - `emit()` never blocks (uses `try_send`).
//! - A full or closed queue drops the event for that subscriber only and
//!   publishes `SubscriberOverflow`, unless the event is itself an overflow report.
//! - A panicking subscriber is reported as `SubscriberPanicked` on the bus and
//!   through `tracing`; its worker keeps consuming. Panic reports are not fanned
//!   back out to subscribers.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use super::Subscribe;
use crate::events::{Bus, Event, EventKind};
use crate::forward::panic_message;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Per-subscriber queues plus their worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Must be called inside a tokio runtime.
    ///
    /// `bus` receives the overflow and panic reports.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            let report = bus.clone();

            workers.push(tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic_message(&*panic);
                        tracing::warn!(subscriber = name, panic = %info, "subscriber panicked");
                        report.publish(Event::subscriber_panicked(name, info));
                    }
                }
            }));
            channels.push(SubscriberChannel { name, sender: tx });
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Number of subscribers in the set.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if the set holds no subscribers.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Queues a copy of `event` for every subscriber.
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Queues a shared event for every subscriber.
    ///
    /// `SubscriberPanicked` events are skipped.
    pub fn emit_arc(&self, event: Arc<Event>) {
        if matches!(event.kind, EventKind::SubscriberPanicked) {
            return;
        }
        let is_overflow = matches!(event.kind, EventKind::SubscriberOverflow);

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Closes every queue and waits for the workers to drain.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Arc<Recorder> {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Boom;

    #[async_trait]
    impl Subscribe for Boom {
        async fn on_event(&self, _ev: &Event) {
            panic!("boom");
        }
        fn name(&self) -> &'static str {
            "boom"
        }
    }

    #[tokio::test]
    async fn test_emit_preserves_order_per_subscriber() {
        let rec = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Arc::clone(&rec))];
        let set = SubscriberSet::new(subs, Bus::new(8));
        assert_eq!(set.len(), 1);

        set.emit(&Event::new(EventKind::SelectStarted));
        set.emit(&Event::new(EventKind::ShutdownRequested));
        set.emit(&Event::new(EventKind::SelectFinished));
        set.shutdown().await;

        assert_eq!(
            *rec.seen.lock(),
            vec![
                EventKind::SelectStarted,
                EventKind::ShutdownRequested,
                EventKind::SelectFinished
            ]
        );
    }

    #[tokio::test]
    async fn test_panic_is_reported_on_bus() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Boom)];
        let set = SubscriberSet::new(subs, bus);

        set.emit(&Event::new(EventKind::SelectStarted));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.selector.as_deref(), Some("boom"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        set.shutdown().await;
    }

    #[tokio::test]
    async fn test_panic_reports_are_not_fanned_out() {
        let rec = Arc::new(Recorder::default());
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Arc::clone(&rec))];
        let set = SubscriberSet::new(subs, Bus::new(8));

        set.emit(&Event::subscriber_panicked("boom", "boom".to_string()));
        set.emit(&Event::new(EventKind::SelectStarted));
        set.shutdown().await;

        assert_eq!(*rec.seen.lock(), vec![EventKind::SelectStarted]);
    }
}
