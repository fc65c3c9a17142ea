//! # SelectCollection: wait on a runtime-determined set of sources.
//!
//! The [`SelectCollection`] owns the registered selections, the shared event
//! channel every forwarder writes to, and a buffered shutdown channel.
//!
//! ## High-level architecture
//! ```text
//! register(cfg) ──► registry: BTreeMap<SelectorIdentifier, Arc<dyn SelectionConfig>>
//!
//! initialize():
//!   fresh shared channel + fresh runtime token
//!   for (id, cfg) in registry (registration order):
//!       cfg.connect(sink) ──► Activation ──► activation(&id) ──► Forwarder task
//!       (first failure aborts; sources activated before it keep running)
//!
//! select():                                   forwarders (one per source)
//!   loop {                                      │   │   │
//!     tokio::select! {                          ▼   ▼   ▼
//!       ev = shared.recv()  ◄───────────── shared mpsc channel
//!             └─► registry[ev.source].on_select()(ev, &self) ─► continue?
//!       _  = shutdown.recv() ─► stop
//!     }
//!   }
//!
//! shutdown():
//!   for cfg in registry: cfg.execute(Stop)   (best effort, failures logged)
//!   runtime_token.cancel()                   (releases every forwarder)
//!   shutdown_tx.try_send(())                 (never blocks)
//! ```
//!
//! ## Rules
//! - Callbacks run on the task that called `select`, one at a time.
//! - Only registry mutation takes the write lock; `initialize` and `shutdown`
//!   iterate a snapshot taken under the read lock.
//! - `initialize` marks the collection initialized even when it fails.
//! - A shutdown sentinel sent while no loop is running is consumed by the next
//!   `select`, which then returns immediately.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{self, broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use super::builder::SelectCollectionBuilder;
use super::config::Config;
use crate::error::SelectError;
use crate::events::{Bus, Event, EventKind, SelectEvent, SelectorEvent};
use crate::forward::EventSink;
use crate::identifier::SelectorIdentifier;
use crate::selections::SelectionConfig;
use crate::subscribers::SubscriberSet;

#[derive(Default)]
struct Registry {
    next_seq: u64,
    entries: BTreeMap<SelectorIdentifier, Arc<dyn SelectionConfig>>,
}

/// Orchestrates registration, activation, dispatch and shutdown of selections.
pub struct SelectCollection {
    cfg: Config,
    bus: Bus,
    registry: RwLock<Registry>,
    sink: Mutex<Option<EventSink>>,
    events_rx: sync::Mutex<Option<mpsc::Receiver<SelectEvent>>>,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: sync::Mutex<mpsc::Receiver<()>>,
    runtime_token: Mutex<CancellationToken>,
    life_token: CancellationToken,
    initialized: AtomicBool,
}

impl SelectCollection {
    /// Creates an empty collection.
    pub fn new(cfg: Config) -> Arc<Self> {
        Arc::new(Self::new_internal(cfg))
    }

    /// Returns a builder applying [`Selectable`](crate::Selectable) steps at construction.
    pub fn builder(cfg: Config) -> SelectCollectionBuilder {
        SelectCollectionBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let (shutdown_tx, shutdown_rx) = mpsc::channel(cfg.shutdown_capacity_clamped());
        Self {
            cfg,
            bus,
            registry: RwLock::new(Registry::default()),
            sink: Mutex::new(None),
            events_rx: sync::Mutex::new(None),
            shutdown_tx,
            shutdown_rx: sync::Mutex::new(shutdown_rx),
            runtime_token: Mutex::new(CancellationToken::new()),
            life_token: CancellationToken::new(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Registers a selection and returns its identifier.
    ///
    /// Registration is bookkeeping only; nothing starts until [`initialize`](Self::initialize).
    /// An absent config fails with [`SelectError::RegistrationFailed`] and leaves
    /// the collection untouched.
    pub fn register(
        &self,
        config: Option<Arc<dyn SelectionConfig>>,
    ) -> Result<SelectorIdentifier, SelectError> {
        let config = config.ok_or(SelectError::RegistrationFailed {
            reason: "selection config is absent",
        })?;

        let id = {
            let mut registry = self.registry.write();
            registry.next_seq += 1;
            let id = SelectorIdentifier::new(config.name(), registry.next_seq);
            registry.entries.insert(id.clone(), config);
            id
        };

        tracing::debug!(selector = %id, "selector registered");
        self.bus
            .publish(Event::new(EventKind::SelectorRegistered).with_selector(id.to_string()));
        Ok(id)
    }

    /// Shorthand for `register(Some(Arc::new(config)))`.
    pub fn add<C: SelectionConfig>(&self, config: C) -> Result<SelectorIdentifier, SelectError> {
        self.register(Some(Arc::new(config)))
    }

    /// Connects and activates every registered selection.
    ///
    /// Creates a fresh shared channel and runtime token (the previous token is
    /// cancelled, releasing forwarders from an earlier `initialize`). Selections
    /// are processed in registration order; the first failure is returned and
    /// the rest are skipped, while those already activated keep running.
    ///
    /// The collection is marked initialized regardless of the outcome.
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`SelectError::SelectInProgress`] while a `select` loop is running.
    pub fn initialize(&self) -> Result<(), SelectError> {
        let (tx, rx) = mpsc::channel(self.cfg.event_capacity_clamped());
        {
            let mut events = self
                .events_rx
                .try_lock()
                .map_err(|_| SelectError::SelectInProgress)?;
            *events = Some(rx);
        }

        let token = CancellationToken::new();
        let previous = std::mem::replace(&mut *self.runtime_token.lock(), token.clone());
        previous.cancel();

        let sink = EventSink::new(tx, token, self.bus.clone());
        *self.sink.lock() = Some(sink.clone());
        let res = self.activate_all(&sink);
        self.initialized.store(true, Ordering::Release);

        if let Err(e) = &res {
            tracing::warn!(error = %e, "initialize stopped at first failing selector");
            let mut ev = Event::new(EventKind::InitializeFailed).with_reason(e.to_string());
            if let Some(id) = e.identifier() {
                ev = ev.with_selector(id.to_string());
            }
            self.bus.publish(ev);
        }
        res
    }

    /// Connect-then-activate each selection, stopping at the first failure.
    fn activate_all(&self, sink: &EventSink) -> Result<(), SelectError> {
        for (id, config) in self.snapshot() {
            let activation = config
                .connect(sink.clone())
                .map_err(|e| SelectError::InitializationFailed {
                    id: id.clone(),
                    source: Box::new(e),
                })?
                .ok_or_else(|| SelectError::MissingActivation { id: id.clone() })?;

            activation(&id).map_err(|e| SelectError::InitializationFailed {
                id: id.clone(),
                source: Box::new(e),
            })?;

            tracing::debug!(selector = %id, "selector activated");
            self.bus
                .publish(Event::new(EventKind::SelectorActivated).with_selector(id.to_string()));
        }
        Ok(())
    }

    /// Runs the wait loop until a callback returns `false` or `shutdown` is called.
    ///
    /// Returns immediately if the collection was never initialized. Events whose
    /// identifier is not registered are dropped. Concurrent calls are serialized.
    pub async fn select(&self) {
        if !self.is_initialized() {
            return;
        }
        let mut events = self.events_rx.lock().await;
        let Some(rx) = events.as_mut() else {
            return;
        };
        let mut shutdown = self.shutdown_rx.lock().await;

        self.bus.publish(Event::new(EventKind::SelectStarted));
        let mut proceed = true;
        while proceed {
            tokio::select! {
                ev = rx.recv() => match ev {
                    Some(ev) => proceed = self.dispatch(ev),
                    None => proceed = false,
                },
                _ = shutdown.recv() => proceed = false,
            }
        }
        self.bus.publish(Event::new(EventKind::SelectFinished));
    }

    /// Hands one event to its selection's callback; returns whether to keep selecting.
    fn dispatch(&self, ev: SelectEvent) -> bool {
        let Some(config) = self.get_selector(&ev.source) else {
            self.bus
                .publish(Event::new(EventKind::EventDropped).with_selector(ev.source.to_string()));
            return true;
        };
        let on_select = Arc::clone(config.on_select());
        on_select(ev, self)
    }

    /// Stops every selection (best effort) and releases the wait loop.
    ///
    /// Per-selection `Stop` failures are logged and published as
    /// [`EventKind::StopFailed`]; they never prevent the loop from being released.
    /// Never blocks: safe to call from any task, before, during or after `select`.
    pub fn shutdown(&self) {
        self.bus.publish(Event::new(EventKind::ShutdownRequested));

        for (id, config) in self.snapshot() {
            if let Err(e) = config.execute(SelectorEvent::Stop) {
                tracing::warn!(selector = %id, error = %e, "selector failed to stop");
                self.bus.publish(
                    Event::new(EventKind::StopFailed)
                        .with_selector(id.to_string())
                        .with_reason(e.to_string()),
                );
            }
        }

        self.runtime_token.lock().cancel();

        match self.shutdown_tx.try_send(()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(())) => {
                tracing::debug!("shutdown already pending");
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::debug!("shutdown channel closed");
            }
        }
    }

    /// Looks up a registered selection.
    pub fn get_selector(&self, id: &SelectorIdentifier) -> Option<Arc<dyn SelectionConfig>> {
        self.registry.read().entries.get(id).cloned()
    }

    /// Returns registered identifiers in registration order.
    pub fn list(&self) -> Vec<SelectorIdentifier> {
        self.registry.read().entries.keys().cloned().collect()
    }

    /// Number of registered selections.
    pub fn len(&self) -> usize {
        self.registry.read().entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.read().entries.is_empty()
    }

    /// Returns true once `initialize` has run (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Creates a receiver of lifecycle [`Event`]s.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The configuration this collection was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub(crate) fn bus(&self) -> Bus {
        self.bus.clone()
    }

    /// Sink of the current shared channel, if initialized.
    ///
    /// The collection keeps it so the shared channel stays open even when no
    /// forwarder is running.
    pub(crate) fn sink(&self) -> Option<EventSink> {
        self.sink.lock().clone()
    }

    /// Forwards bus events to `subs` until the collection is dropped.
    pub(crate) fn spawn_subscriber_listener(&self, subs: Arc<SubscriberSet>) {
        let mut rx = self.bus.subscribe();
        let life = self.life_token.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = life.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => subs.emit(&ev),
                        Err(broadcast::error::RecvError::Closed) => break,
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    }
                }
            }
        });
    }

    fn snapshot(&self) -> Vec<(SelectorIdentifier, Arc<dyn SelectionConfig>)> {
        self.registry
            .read()
            .entries
            .iter()
            .map(|(id, cfg)| (id.clone(), Arc::clone(cfg)))
            .collect()
    }
}

impl Drop for SelectCollection {
    fn drop(&mut self) {
        self.runtime_token.get_mut().cancel();
        self.life_token.cancel();
    }
}

impl fmt::Debug for SelectCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectCollection")
            .field("selectors", &self.list())
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
