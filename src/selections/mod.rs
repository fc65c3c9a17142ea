//! # Selections: the sources a collection can wait on.
//!
//! - [`SelectionConfig`] the capability set every registrable source implements
//! - [`TimeSelection`] periodic timer
//! - [`SignalSelection`] OS signals (unix only)
//! - [`ChannelSelection`] arbitrary typed `mpsc` channel
//! - [`Selectable`] deferred registration steps used by the collection builder

mod channel;
mod selectable;
mod selection;
#[cfg(unix)]
mod signal;
mod ticker;
mod time;

pub use channel::ChannelSelection;
#[cfg(unix)]
pub use selectable::with_signals;
pub use selectable::{Selectable, with_channel, with_selection, with_timer};
pub use selection::{Activation, OnSelect, SelectionConfig, on_select};
#[cfg(unix)]
pub use signal::{OsSignal, SignalSelection, SignalStream};
pub use time::TimeSelection;
