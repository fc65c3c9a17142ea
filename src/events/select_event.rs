//! # Source-tagged payloads delivered to callbacks.
//!
//! A [`SelectEvent`] is created by a forwarder for every value read from its
//! native source and consumed exactly once by the collection's wait loop.
//! The payload is opaque to the collection; callbacks recover it with
//! [`SelectEvent::received`] or [`SelectEvent::into_received`].

use std::any::Any;
use std::fmt;

use crate::identifier::SelectorIdentifier;

/// A delivered, source-tagged payload.
pub struct SelectEvent {
    /// Registration that produced this event.
    pub source: SelectorIdentifier,
    /// Whether the originating read succeeded (the native source was open).
    pub receive_status: bool,
    /// The raw value read from the native source.
    pub received: Box<dyn Any + Send>,
}

impl SelectEvent {
    /// Wraps a value read from an open source.
    pub fn new<T: Send + 'static>(source: SelectorIdentifier, value: T) -> Self {
        Self {
            source,
            receive_status: true,
            received: Box::new(value),
        }
    }

    /// Borrows the payload as `T`, if it has that type.
    pub fn received<T: 'static>(&self) -> Option<&T> {
        self.received.downcast_ref::<T>()
    }

    /// Takes the payload as `T`; returns the event unchanged on a type mismatch.
    pub fn into_received<T: 'static>(self) -> Result<T, Self> {
        let Self {
            source,
            receive_status,
            received,
        } = self;
        match received.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(received) => Err(Self {
                source,
                receive_status,
                received,
            }),
        }
    }
}

impl fmt::Debug for SelectEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectEvent")
            .field("source", &self.source)
            .field("receive_status", &self.receive_status)
            .finish_non_exhaustive()
    }
}
