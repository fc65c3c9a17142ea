//! # Lifecycle event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in `LogWriter` (feature `logging`).
//!
//! ## Architecture
//! ```text
//!   SelectCollection ─┐
//!   Forwarders       ─┴─ publish(Event) ──► Bus ──► listener ──► SubscriberSet::emit
//!                                                                    │
//!                                                        ┌───────────┼──────────┐
//!                                                        ▼           ▼          ▼
//!                                                    LogWriter    Metrics    Custom
//! ```
//!
//! Subscribers are attached with
//! [`SelectCollectionBuilder::with_subscribers`](crate::SelectCollectionBuilder::with_subscribers).

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
