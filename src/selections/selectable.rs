//! # Deferred registration steps.
//!
//! A [`Selectable`] wraps "register this source on a collection" so that the
//! collection builder can apply a list of them in order, stopping at the first
//! failure. The `with_*` helpers build one adapter each.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use selectvisor::{Config, SelectCollection, on_select, with_timer};
//!
//! let collection = SelectCollection::builder(Config::default())
//!     .with(with_timer(Duration::from_millis(20), on_select(|_ev, _c| false)))
//!     .build()
//!     .unwrap();
//! assert_eq!(collection.len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::channel::ChannelSelection;
use super::selection::{OnSelect, SelectionConfig};
#[cfg(unix)]
use super::signal::{OsSignal, SignalSelection};
use super::time::TimeSelection;
use crate::SelectCollection;
use crate::error::SelectError;
use crate::identifier::SelectorIdentifier;

type Step = Box<dyn FnOnce(&SelectCollection) -> Result<SelectorIdentifier, SelectError> + Send>;

/// A deferred registration step.
pub struct Selectable {
    step: Step,
}

impl Selectable {
    /// Wraps an arbitrary registration step.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&SelectCollection) -> Result<SelectorIdentifier, SelectError> + Send + 'static,
    {
        Self { step: Box::new(f) }
    }

    /// Runs the step against `collection`.
    pub fn apply(self, collection: &SelectCollection) -> Result<SelectorIdentifier, SelectError> {
        (self.step)(collection)
    }
}

impl fmt::Debug for Selectable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selectable").finish_non_exhaustive()
    }
}

/// Registers a pre-built selection.
pub fn with_selection<C: SelectionConfig>(config: C) -> Selectable {
    let config: Arc<dyn SelectionConfig> = Arc::new(config);
    Selectable::new(move |collection| collection.register(Some(config)))
}

/// Registers a [`TimeSelection`] ticking every `period`.
pub fn with_timer(period: Duration, on_select: OnSelect) -> Selectable {
    with_selection(TimeSelection::new(period, on_select))
}

/// Registers a [`SignalSelection`] for `signals`.
#[cfg(unix)]
pub fn with_signals(signals: impl IntoIterator<Item = OsSignal>, on_select: OnSelect) -> Selectable {
    with_selection(SignalSelection::new(signals, on_select))
}

/// Registers a [`ChannelSelection`] over `rx`.
pub fn with_channel<T: Send + 'static>(rx: mpsc::Receiver<T>, on_select: OnSelect) -> Selectable {
    with_selection(ChannelSelection::new(rx, on_select))
}
