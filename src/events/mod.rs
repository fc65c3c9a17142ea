//! Event types: delivered payloads, lifecycle control values and the
//! observability bus.
//!
//! ## Contents
//! - [`SelectEvent`] a source-tagged payload delivered to `on_select` callbacks
//! - [`SelectorEvent`] a lifecycle control value (`Stop`/`Reset`/`Unknown`)
//! - [`EventKind`], [`Event`] lifecycle notifications about the collection itself
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast` carrying [`Event`]s
//!
//! ## Quick reference
//! - **Publishers**: `SelectCollection` (register/initialize/select/shutdown),
//!   forwarder tasks (closed/panicked), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `SubscriberSet` via the collection's listener, or any
//!   receiver obtained from `SelectCollection::subscribe`.

mod bus;
mod event;
mod select_event;
mod selector_event;

pub use bus::Bus;
pub use event::{Event, EventKind};
pub use select_event::SelectEvent;
pub use selector_event::SelectorEvent;
