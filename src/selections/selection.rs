//! # Selection capability set.
//!
//! Provides [`SelectionConfig`], the narrow interface through which the
//! collection drives every source kind. New kinds are added by implementing
//! this trait; the collection itself never changes.
//!
//! ## Lifecycle
//! ```text
//! register(cfg)  ──► id                      (bookkeeping only)
//! initialize()   ──► cfg.connect(sink) ──► Activation ──► activation(&id)
//!                                                          └─► Forwarder::begin
//! select()       ──► cfg.on_select()(event, &collection)
//! shutdown()     ──► cfg.execute(SelectorEvent::Stop)
//! ```
//!
//! ## Example
//! ```rust
//! use std::any::Any;
//! use selectvisor::{
//!     Activation, EventSink, Forwarder, OnSelect, SelectError, SelectionConfig, SelectorEvent,
//!     SelectorIdentifier,
//! };
//! use tokio::sync::mpsc;
//!
//! struct Lines {
//!     rx: std::sync::Mutex<Option<mpsc::Receiver<String>>>,
//!     on_select: OnSelect,
//! }
//!
//! impl SelectionConfig for Lines {
//!     fn name(&self) -> &str { "lines" }
//!     fn source(&self) -> &(dyn Any + Send + Sync) { &() }
//!     fn on_select(&self) -> &OnSelect { &self.on_select }
//!
//!     fn connect(&self, sink: EventSink) -> Result<Option<Activation>, SelectError> {
//!         let rx = self.rx.lock().ok().and_then(|mut rx| rx.take());
//!         let Some(rx) = rx else { return Ok(None) };
//!         let mut fwd = Forwarder::new(rx, sink);
//!         Ok(Some(Box::new(move |id: &SelectorIdentifier| {
//!             fwd.begin(Some(id)).map(drop)
//!         })))
//!     }
//!
//!     fn execute(&self, event: SelectorEvent) -> Result<(), SelectError> {
//!         Err(SelectError::unsupported(self.name(), event))
//!     }
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

use crate::SelectCollection;
use crate::error::SelectError;
use crate::events::{SelectEvent, SelectorEvent};
use crate::forward::EventSink;
use crate::identifier::SelectorIdentifier;

/// Callback invoked from the wait loop.
///
/// Receives the event and the collection that dispatched it; returning
/// `false` stops the loop. Invocations never overlap, so a callback that
/// blocks stalls every other source.
pub type OnSelect = Arc<dyn Fn(SelectEvent, &SelectCollection) -> bool + Send + Sync>;

/// Starts a connected source's forwarder, tagging its events with the given identifier.
pub type Activation = Box<dyn FnOnce(&SelectorIdentifier) -> Result<(), SelectError> + Send>;

/// Wraps a closure as an [`OnSelect`] callback.
pub fn on_select<F>(f: F) -> OnSelect
where
    F: Fn(SelectEvent, &SelectCollection) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Capability set of a registrable source.
///
/// A selection is owned by the collection that registered it for the rest of
/// the collection's life; there is no unregister.
pub trait SelectionConfig: Send + Sync + 'static {
    /// Stable, human-readable name. Seeds the registration identifier.
    fn name(&self) -> &str;

    /// The adapter's native configuration (timer period, signal list, ...), for introspection.
    fn source(&self) -> &(dyn Any + Send + Sync);

    /// Callback invoked for every event this source delivers.
    fn on_select(&self) -> &OnSelect;

    /// Wires the source to the shared channel.
    ///
    /// Returns the activation that starts forwarding. `Ok(None)` means the
    /// source has nothing to activate; `initialize` treats that as a failure.
    fn connect(&self, sink: EventSink) -> Result<Option<Activation>, SelectError>;

    /// Applies a lifecycle transition. Unsupported values fail with
    /// [`SelectError::ExecutionFailed`].
    fn execute(&self, event: SelectorEvent) -> Result<(), SelectError>;
}
