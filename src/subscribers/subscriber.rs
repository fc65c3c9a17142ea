//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for observing a collection's
//! lifecycle. Each subscriber is driven by a dedicated worker fed by a bounded
//! queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Rules
//! - A slow subscriber only fills its own queue; publishers never wait.
//! - On overflow the event is dropped for that subscriber only and
//!   `EventKind::SubscriberOverflow` is published.
//! - Events are handled sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use selectvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct StopAudit;
//!
//! #[async_trait]
//! impl Subscribe for StopAudit {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::StopFailed {
//!             // record the failure somewhere durable
//!         }
//!     }
//!     fn name(&self) -> &'static str { "stop-audit" }
//!     fn queue_capacity(&self) -> usize { 64 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for lifecycle event subscribers.
///
/// Called from a subscriber-dedicated worker task; avoid blocking the runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue (clamped to at least 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
