//! # Shared output side of the fan-in.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, SelectEvent};

/// Handle to the collection's shared event channel.
///
/// Created by `SelectCollection::initialize` and passed to every
/// [`SelectionConfig::connect`](crate::SelectionConfig::connect).
/// Cloning is cheap.
///
/// ### Properties
/// - `tx`: shared bounded channel read by the single wait loop
/// - `token`: runtime token; cancelled by `shutdown` or by the next `initialize`
/// - `bus`: lifecycle bus for forwarder notifications
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: mpsc::Sender<SelectEvent>,
    token: CancellationToken,
    bus: Bus,
}

impl EventSink {
    /// Creates a sink. Normally done by the collection; public for custom harnesses.
    pub fn new(tx: mpsc::Sender<SelectEvent>, token: CancellationToken, bus: Bus) -> Self {
        Self { tx, token, bus }
    }

    /// Returns `true` once the runtime token is cancelled or the wait loop's receiver is gone.
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled() || self.tx.is_closed()
    }

    pub(crate) fn sender(&self) -> &mpsc::Sender<SelectEvent> {
        &self.tx
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub(crate) fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }
}
