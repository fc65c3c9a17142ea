//! # Native source abstraction.
//!
//! [`NativeSource`] is implemented for tokio `mpsc` receivers out of the box;
//! the timer and signal adapters provide their own implementations.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// A native channel a [`Forwarder`](crate::Forwarder) can read from.
///
/// `recv` returns `None` once the source is closed; the forwarder then exits
/// without emitting a terminal event. Implementations must be cancel-safe:
/// the forwarder may drop a pending `recv` when it is told to stop.
#[async_trait]
pub trait NativeSource: Send + 'static {
    /// Element type read from the source.
    type Item: Send + 'static;

    /// Waits for the next value, or `None` once the source is closed.
    async fn recv(&mut self) -> Option<Self::Item>;
}

#[async_trait]
impl<T: Send + 'static> NativeSource for mpsc::Receiver<T> {
    type Item = T;

    async fn recv(&mut self) -> Option<T> {
        mpsc::Receiver::recv(self).await
    }
}

#[async_trait]
impl<T: Send + 'static> NativeSource for mpsc::UnboundedReceiver<T> {
    type Item = T;

    async fn recv(&mut self) -> Option<T> {
        mpsc::UnboundedReceiver::recv(self).await
    }
}
