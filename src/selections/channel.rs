//! # Arbitrary typed channel selection.
//!
//! [`ChannelSelection`] turns any `tokio::sync::mpsc::Receiver<T>` into a
//! selectable source. Every received `T` becomes the payload of a
//! [`SelectEvent`](crate::SelectEvent); dropping all senders closes the source.
//!
//! ## Rules
//! - The receiver can be connected once. A second `initialize` reports
//!   [`SelectError::SourceUnavailable`] for this source.
//! - `Stop` closes the source (second `Stop` fails), `Reset` is unsupported.

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::selection::{Activation, OnSelect, SelectionConfig};
use crate::error::SelectError;
use crate::events::SelectorEvent;
use crate::forward::{EventSink, Forwarder};
use crate::identifier::SelectorIdentifier;

/// Source backed by an `mpsc` receiver.
pub struct ChannelSelection<T> {
    name: String,
    capacity: usize,
    rx: Mutex<Option<mpsc::Receiver<T>>>,
    closed: AtomicBool,
    stop: CancellationToken,
    on_select: OnSelect,
}

impl<T: Send + 'static> ChannelSelection<T> {
    /// Wraps `rx`; the name embeds the element type, e.g. `channel[u32]`.
    pub fn new(rx: mpsc::Receiver<T>, on_select: OnSelect) -> Self {
        Self::named(format!("channel[{}]", type_name::<T>()), rx, on_select)
    }

    /// Wraps `rx` under an explicit name.
    pub fn named(name: impl Into<String>, rx: mpsc::Receiver<T>, on_select: OnSelect) -> Self {
        Self {
            name: name.into(),
            capacity: rx.max_capacity(),
            rx: Mutex::new(Some(rx)),
            closed: AtomicBool::new(false),
            stop: CancellationToken::new(),
            on_select,
        }
    }

    /// Returns `true` once the receiver has been handed to a forwarder.
    pub fn is_connected(&self) -> bool {
        self.rx.lock().is_none()
    }
}

impl<T: Send + 'static> SelectionConfig for ChannelSelection<T> {
    fn name(&self) -> &str {
        &self.name
    }

    /// The channel's capacity as a `usize`.
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.capacity
    }

    fn on_select(&self) -> &OnSelect {
        &self.on_select
    }

    fn connect(&self, sink: EventSink) -> Result<Option<Activation>, SelectError> {
        let rx = self
            .rx
            .lock()
            .take()
            .ok_or_else(|| SelectError::SourceUnavailable {
                selector: self.name.clone(),
                reason: Cow::Borrowed("receiver already connected"),
            })?;

        let mut fwd = Forwarder::new(rx, sink).with_stop(self.stop.clone());
        Ok(Some(Box::new(move |id: &SelectorIdentifier| {
            fwd.begin(Some(id)).map(drop)
        })))
    }

    fn execute(&self, event: SelectorEvent) -> Result<(), SelectError> {
        match event {
            SelectorEvent::Stop => {
                if self.closed.swap(true, Ordering::AcqRel) {
                    return Err(SelectError::ExecutionFailed {
                        selector: self.name.clone(),
                        event,
                        reason: Cow::Borrowed("channel already closed"),
                    });
                }
                self.stop.cancel();
                Ok(())
            }
            SelectorEvent::Reset | SelectorEvent::Unknown => {
                Err(SelectError::unsupported(&self.name, event))
            }
        }
    }
}
