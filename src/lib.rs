//! # selectvisor
//!
//! **Selectvisor** waits on a set of event sources that is only known at
//! runtime: periodic timers, OS signals and arbitrary typed channels, plus any
//! source you describe with [`SelectionConfig`].
//!
//! Each source is registered on a [`SelectCollection`], activated by
//! [`initialize`](SelectCollection::initialize), and then multiplexed by a
//! single [`select`](SelectCollection::select) loop that hands every event to
//! the callback registered with its source.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌───────────────┐  ┌────────────────┐  ┌─────────────────┐
//!   │ TimeSelection │  │SignalSelection │  │ChannelSelection │   (SelectionConfig)
//!   └───────┬───────┘  └───────┬────────┘  └────────┬────────┘
//!           ▼                  ▼                    ▼
//! ┌────────────────────────────────────────────────────────────────┐
//! │  SelectCollection                                              │
//! │  - registry (SelectorIdentifier ─► config, registration order) │
//! │  - shared event channel + shutdown channel                     │
//! │  - Bus (lifecycle events) ─► SubscriberSet                     │
//! └───────┬──────────────────┬────────────────────┬────────────────┘
//!         ▼ initialize()     ▼                    ▼
//!   ┌────────────┐     ┌────────────┐       ┌────────────┐
//!   │ Forwarder  │     │ Forwarder  │       │ Forwarder  │   (one task per source)
//!   └─────┬──────┘     └─────┬──────┘       └─────┬──────┘
//!         └──────────────────┼────────────────────┘
//!                            ▼  SelectEvent { source, receive_status, received }
//!                  ┌───────────────────────┐
//!                  │   select() loop       │ ─► on_select(event, &collection) ─► continue?
//!                  └───────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! register(cfg) ─► SelectorIdentifier { name, seq }
//! initialize()  ─► connect + activate each source in order (first failure aborts)
//! select()      ─► one callback at a time until a callback returns false or shutdown()
//! shutdown()    ─► Stop every source (best effort) ─► release forwarders ─► release select()
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                                |
//! |-------------------|----------------------------------------------------------|---------------------------------------------------|
//! | **Collection**    | Register, activate, multiplex and shut down sources.     | [`SelectCollection`], [`SelectCollectionBuilder`] |
//! | **Sources**       | Built-in adapters and the adapter contract.              | [`TimeSelection`], [`ChannelSelection`], [`SelectionConfig`] |
//! | **Forwarding**    | Per-source fan-in tasks writing to the shared channel.   | [`Forwarder`], [`EventSink`], [`NativeSource`]    |
//! | **Events**        | Delivered payloads and lifecycle control values.         | [`SelectEvent`], [`SelectorEvent`]                |
//! | **Observability** | Lifecycle events fanned out to subscribers.              | [`Event`], [`EventKind`], [`Subscribe`]           |
//! | **Errors**        | Typed registration, initialization and execution errors. | [`SelectError`], [`BuildError`]                   |
//!
//! ## Optional features
//! - `logging`: exports the built-in `LogWriter` subscriber, which renders
//!   lifecycle events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//! use selectvisor::{Config, SelectCollection, TimeSelection, on_select};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), selectvisor::SelectError> {
//!     let collection = SelectCollection::new(Config::default());
//!
//!     let ticks = AtomicU32::new(0);
//!     collection.add(TimeSelection::new(
//!         Duration::from_millis(10),
//!         on_select(move |ev, _collection| {
//!             assert!(ev.receive_status);
//!             ticks.fetch_add(1, Ordering::Relaxed) + 1 < 3
//!         }),
//!     ))?;
//!
//!     collection.initialize()?;
//!     collection.select().await;
//!     collection.shutdown();
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod forward;
mod identifier;
mod selections;
mod subscribers;

// ---- Public re-exports ----

pub use self::core::{Config, SelectCollection, SelectCollectionBuilder, wait_for_shutdown_signal};
pub use error::{BuildError, SelectError};
pub use events::{Bus, Event, EventKind, SelectEvent, SelectorEvent};
pub use forward::{EventSink, Forwarder, NativeSource};
pub use identifier::SelectorIdentifier;
pub use selections::{
    Activation, ChannelSelection, OnSelect, Selectable, SelectionConfig, TimeSelection, on_select,
    with_channel, with_selection, with_timer,
};
#[cfg(unix)]
pub use selections::{OsSignal, SignalSelection, SignalStream, with_signals};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose the built-in tracing subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
