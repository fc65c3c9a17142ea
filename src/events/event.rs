//! # Lifecycle events emitted by the collection and its forwarders.
//!
//! The [`EventKind`] enum classifies notifications across three groups:
//! - **Registration/activation**: a selector was registered, activated, or failed to activate
//! - **Delivery**: forwarders closing or panicking, events dropped by the wait loop
//! - **Shutdown**: shutdown requested, a selector failed to stop, the wait loop started/finished
//!
//! These are *about* the collection; the payloads delivered to callbacks are
//! [`SelectEvent`](crate::SelectEvent)s.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use selectvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::StopFailed)
//!     .with_selector("signal[SIGINT]#1")
//!     .with_reason("already closed");
//!
//! assert_eq!(ev.kind, EventKind::StopFailed);
//! assert_eq!(ev.selector.as_deref(), Some("signal[SIGINT]#1"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registration / activation ===
    /// A selection was registered.
    ///
    /// Sets: `selector`
    SelectorRegistered,

    /// A registered selection was connected and its forwarder started.
    ///
    /// Sets: `selector`
    SelectorActivated,

    /// `initialize` stopped at a failing selection.
    ///
    /// Sets: `selector`, `reason`
    InitializeFailed,

    // === Delivery ===
    /// A forwarder's native source closed (or was cancelled); the forwarder exited.
    ///
    /// Sets: `selector`
    ForwarderClosed,

    /// A forwarder task panicked; the panic is re-raised after this event.
    ///
    /// Sets: `selector`, `reason`
    ForwarderPanicked,

    /// The wait loop received an event whose identifier is not registered.
    ///
    /// Sets: `selector`
    EventDropped,

    // === Shutdown ===
    /// `shutdown` was called.
    ShutdownRequested,

    /// A selection refused `Stop` during shutdown (best effort, not propagated).
    ///
    /// Sets: `selector`, `reason`
    StopFailed,

    /// The wait loop started.
    SelectStarted,

    /// The wait loop returned.
    SelectFinished,

    // === Subscriber events ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `selector` (subscriber name), `reason`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `selector` (subscriber name), `reason`
    SubscriberPanicked,
}

/// Lifecycle event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Rendered selector identifier (or subscriber name), if applicable.
    pub selector: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            selector: None,
            reason: None,
        }
    }

    /// Attaches a selector name.
    #[inline]
    pub fn with_selector(mut self, selector: impl Into<Arc<str>>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_selector(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_selector(subscriber)
            .with_reason(info)
    }
}
