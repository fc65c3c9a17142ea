//! # Logging subscriber.
//!
//! [`LogWriter`] renders every lifecycle event through `tracing`, at `warn`
//! for failures and `debug`/`info` otherwise.
//!
//! ```text
//! selector registered      selector=timer[20ms]#1
//! stop failed during shutdown  selector=signal[SIGINT]#2 reason="signal listener already closed"
//! ```

use async_trait::async_trait;

use super::Subscribe;
use crate::events::{Event, EventKind};

/// Subscriber that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let selector = e.selector.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::SelectorRegistered => {
                tracing::debug!(seq = e.seq, selector, "selector registered");
            }
            EventKind::SelectorActivated => {
                tracing::debug!(seq = e.seq, selector, "selector activated");
            }
            EventKind::InitializeFailed => {
                tracing::warn!(seq = e.seq, selector, reason, "initialize failed");
            }
            EventKind::ForwarderClosed => {
                tracing::debug!(seq = e.seq, selector, "forwarder closed");
            }
            EventKind::ForwarderPanicked => {
                tracing::warn!(seq = e.seq, selector, reason, "forwarder panicked");
            }
            EventKind::EventDropped => {
                tracing::warn!(seq = e.seq, selector, "event from unknown selector dropped");
            }
            EventKind::ShutdownRequested => {
                tracing::info!(seq = e.seq, "shutdown requested");
            }
            EventKind::StopFailed => {
                tracing::warn!(seq = e.seq, selector, reason, "stop failed during shutdown");
            }
            EventKind::SelectStarted => {
                tracing::info!(seq = e.seq, "select started");
            }
            EventKind::SelectFinished => {
                tracing::info!(seq = e.seq, "select finished");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(seq = e.seq, subscriber = selector, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::warn!(seq = e.seq, subscriber = selector, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_renders_every_kind() {
        let kinds = [
            EventKind::SelectorRegistered,
            EventKind::SelectorActivated,
            EventKind::InitializeFailed,
            EventKind::ForwarderClosed,
            EventKind::ForwarderPanicked,
            EventKind::EventDropped,
            EventKind::ShutdownRequested,
            EventKind::StopFailed,
            EventKind::SelectStarted,
            EventKind::SelectFinished,
            EventKind::SubscriberOverflow,
            EventKind::SubscriberPanicked,
        ];
        for kind in kinds {
            LogWriter.on_event(&Event::new(kind).with_selector("timer[5ms]#1")).await;
        }
        assert_eq!(LogWriter.name(), "log-writer");
    }
}
