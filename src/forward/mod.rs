//! # Forwarders: per-source fan-in tasks.
//!
//! Every activated selection owns one [`Forwarder`] that blocks on its native
//! source and republishes each value as a [`SelectEvent`](crate::SelectEvent)
//! on the collection's shared channel ([`EventSink`]).
//!
//! ```text
//! NativeSource 1 ──► Forwarder 1 ──┐
//! NativeSource 2 ──► Forwarder 2 ──┼──► EventSink (shared mpsc) ──► SelectCollection::select()
//! NativeSource N ──► Forwarder N ──┘
//! ```
//!
//! - [`NativeSource`] abstracts "something with an async `recv`".
//! - [`EventSink`] bundles the shared sender with the collection's runtime token.

mod forwarder;
mod sink;
mod source;

pub use forwarder::Forwarder;
pub(crate) use forwarder::panic_message;
pub use sink::EventSink;
pub use source::NativeSource;
