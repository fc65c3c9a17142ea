//! # OS signal selection (unix).
//!
//! [`SignalSelection`] delivers OS signals as [`SelectEvent`](crate::SelectEvent)s
//! whose payload is the [`OsSignal`] that fired.
//!
//! ## Signals
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal, often used for core dumps or hard stop)
//! - `SIGHUP`, `SIGUSR1`, `SIGUSR2`
//!
//! ## Lifecycle
//! - Listeners are installed on `connect` (during `initialize`), not at construction.
//!   Once tokio installs a listener for a signal, its default action stays replaced
//!   for the rest of the process.
//! - `Stop` closes the source; the forwarder exits without a terminal event.
//!   A second `Stop` fails with [`SelectError::ExecutionFailed`].
//! - `Reset` is not supported.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::future::select_all;
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio_util::sync::CancellationToken;

use super::selection::{Activation, OnSelect, SelectionConfig};
use crate::error::SelectError;
use crate::events::SelectorEvent;
use crate::forward::{EventSink, Forwarder, NativeSource};
use crate::identifier::SelectorIdentifier;

/// Signals a [`SignalSelection`] can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsSignal {
    /// `SIGINT`
    Interrupt,
    /// `SIGTERM`
    Terminate,
    /// `SIGQUIT`
    Quit,
    /// `SIGHUP`
    Hangup,
    /// `SIGUSR1`
    User1,
    /// `SIGUSR2`
    User2,
}

impl OsSignal {
    /// Conventional signal name, e.g. `"SIGINT"`.
    pub fn as_str(self) -> &'static str {
        match self {
            OsSignal::Interrupt => "SIGINT",
            OsSignal::Terminate => "SIGTERM",
            OsSignal::Quit => "SIGQUIT",
            OsSignal::Hangup => "SIGHUP",
            OsSignal::User1 => "SIGUSR1",
            OsSignal::User2 => "SIGUSR2",
        }
    }

    fn kind(self) -> SignalKind {
        match self {
            OsSignal::Interrupt => SignalKind::interrupt(),
            OsSignal::Terminate => SignalKind::terminate(),
            OsSignal::Quit => SignalKind::quit(),
            OsSignal::Hangup => SignalKind::hangup(),
            OsSignal::User1 => SignalKind::user_defined1(),
            OsSignal::User2 => SignalKind::user_defined2(),
        }
    }
}

impl fmt::Display for OsSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native source merging the listeners of several signals.
pub struct SignalStream {
    listeners: Vec<(OsSignal, Signal)>,
}

impl SignalStream {
    /// Installs one listener per signal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(signals: &[OsSignal]) -> std::io::Result<Self> {
        let listeners = signals
            .iter()
            .map(|&sig| signal(sig.kind()).map(|listener| (sig, listener)))
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self { listeners })
    }
}

#[async_trait]
impl NativeSource for SignalStream {
    type Item = OsSignal;

    async fn recv(&mut self) -> Option<OsSignal> {
        if self.listeners.is_empty() {
            return None;
        }
        let waits = self.listeners.iter_mut().map(|(sig, listener)| {
            let sig = *sig;
            Box::pin(async move { listener.recv().await.map(|()| sig) })
        });
        let (received, _, _) = select_all(waits).await;
        received
    }
}

/// OS signal source.
pub struct SignalSelection {
    name: String,
    signals: Vec<OsSignal>,
    closed: AtomicBool,
    stop: CancellationToken,
    on_select: OnSelect,
}

impl SignalSelection {
    /// Creates a selection for `signals`. Duplicates are kept as given.
    pub fn new(signals: impl IntoIterator<Item = OsSignal>, on_select: OnSelect) -> Self {
        let signals: Vec<OsSignal> = signals.into_iter().collect();
        let joined = signals
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            name: format!("signal[{joined}]"),
            signals,
            closed: AtomicBool::new(false),
            stop: CancellationToken::new(),
            on_select,
        }
    }

    /// Signals this selection listens for.
    pub fn signals(&self) -> &[OsSignal] {
        &self.signals
    }

    /// Returns `true` after a successful `Stop`.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl SelectionConfig for SignalSelection {
    fn name(&self) -> &str {
        &self.name
    }

    /// The signal list as a `Vec<OsSignal>`.
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.signals
    }

    fn on_select(&self) -> &OnSelect {
        &self.on_select
    }

    fn connect(&self, sink: EventSink) -> Result<Option<Activation>, SelectError> {
        if self.signals.is_empty() {
            return Err(SelectError::SourceUnavailable {
                selector: self.name.clone(),
                reason: Cow::Borrowed("no signals to listen for"),
            });
        }
        if self.is_closed() {
            return Err(SelectError::SourceUnavailable {
                selector: self.name.clone(),
                reason: Cow::Borrowed("signal source closed"),
            });
        }
        let stream = SignalStream::open(&self.signals).map_err(|e| SelectError::SourceUnavailable {
            selector: self.name.clone(),
            reason: Cow::Owned(e.to_string()),
        })?;

        let mut fwd = Forwarder::new(stream, sink).with_stop(self.stop.clone());
        Ok(Some(Box::new(move |id: &SelectorIdentifier| {
            fwd.begin(Some(id)).map(drop)
        })))
    }

    fn execute(&self, event: SelectorEvent) -> Result<(), SelectError> {
        match event {
            SelectorEvent::Stop => {
                if self.closed.swap(true, Ordering::AcqRel) {
                    return Err(SelectError::ExecutionFailed {
                        selector: self.name.clone(),
                        event,
                        reason: Cow::Borrowed("signal source already closed"),
                    });
                }
                self.stop.cancel();
                Ok(())
            }
            SelectorEvent::Reset | SelectorEvent::Unknown => {
                Err(SelectError::unsupported(&self.name, event))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::on_select;

    fn selection(signals: &[OsSignal]) -> SignalSelection {
        SignalSelection::new(signals.iter().copied(), on_select(|_, _| true))
    }

    #[test]
    fn test_name_joins_signal_names() {
        let s = selection(&[OsSignal::Interrupt, OsSignal::Terminate]);
        assert_eq!(s.name(), "signal[SIGINT,SIGTERM]");
        assert_eq!(
            s.source().downcast_ref::<Vec<OsSignal>>(),
            Some(&vec![OsSignal::Interrupt, OsSignal::Terminate])
        );
    }

    #[test]
    fn test_second_stop_fails() {
        let s = selection(&[OsSignal::Hangup]);
        s.execute(SelectorEvent::Stop).unwrap();
        assert!(s.is_closed());

        let err = s.execute(SelectorEvent::Stop).unwrap_err();
        assert!(matches!(err, SelectError::ExecutionFailed { .. }));
    }

    #[test]
    fn test_reset_and_unknown_are_unsupported() {
        let s = selection(&[OsSignal::Hangup]);
        assert!(matches!(
            s.execute(SelectorEvent::Reset),
            Err(SelectError::ExecutionFailed { .. })
        ));
        assert!(matches!(
            s.execute(SelectorEvent::from(-1)),
            Err(SelectError::ExecutionFailed { .. })
        ));
        assert!(!s.is_closed());
    }

    #[tokio::test]
    async fn test_stopped_selection_installs_no_listener() {
        let s = selection(&[OsSignal::User2]);
        s.execute(SelectorEvent::Stop).unwrap();

        let (tx, _rx) = tokio::sync::mpsc::channel(1);
        let sink = EventSink::new(tx, CancellationToken::new(), crate::events::Bus::new(1));
        let err = s.connect(sink).err().unwrap();
        assert!(matches!(
            err,
            SelectError::SourceUnavailable { ref reason, .. } if reason == "signal source closed"
        ));
    }

    #[tokio::test]
    async fn test_stop_releases_running_forwarder() {
        let s = selection(&[OsSignal::User2]);
        let bus = crate::events::Bus::new(8);
        let mut events = bus.subscribe();
        let (tx, _rx) = tokio::sync::mpsc::channel(1);
        let sink = EventSink::new(tx, CancellationToken::new(), bus);
        let id = SelectorIdentifier::new(s.name(), 1);

        let activate = s.connect(sink).unwrap().unwrap();
        activate(&id).unwrap();
        s.execute(SelectorEvent::Stop).unwrap();

        let ev = events.recv().await.unwrap();
        assert_eq!(ev.kind, crate::events::EventKind::ForwarderClosed);
        assert_eq!(ev.selector.as_deref(), Some(id.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_empty_signal_list_cannot_connect() {
        let s = selection(&[]);
        let (tx, _rx) = tokio::sync::mpsc::channel(1);
        let sink = EventSink::new(tx, CancellationToken::new(), crate::events::Bus::new(1));
        assert!(matches!(
            s.connect(sink),
            Err(SelectError::SourceUnavailable { .. })
        ));
    }
}
