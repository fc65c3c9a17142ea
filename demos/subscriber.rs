//! # Example: subscriber
//!
//! Observes a collection's lifecycle with a custom [`Subscribe`] implementation.
//!
//! The subscriber counts registrations, activations and forwarder exits, and
//! prints shutdown-time stop failures.
//!
//! ## Run
//! ```bash
//! cargo run --example subscriber
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use selectvisor::{
    Config, Event, EventKind, OsSignal, SelectCollection, Subscribe, on_select, with_signals,
    with_timer,
};

struct Lifecycle {
    registered: AtomicU64,
    activated: AtomicU64,
    closed: AtomicU64,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            registered: AtomicU64::new(0),
            activated: AtomicU64::new(0),
            closed: AtomicU64::new(0),
        }
    }

    fn print_stats(&self) {
        println!();
        println!("Lifecycle:");
        println!(" ├─► Registered: {}", self.registered.load(Ordering::Relaxed));
        println!(" ├─► Activated:  {}", self.activated.load(Ordering::Relaxed));
        println!(" └─► Closed:     {}", self.closed.load(Ordering::Relaxed));
    }
}

#[async_trait::async_trait]
impl Subscribe for Lifecycle {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::SelectorRegistered => {
                self.registered.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::SelectorActivated => {
                self.activated.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::ForwarderClosed => {
                self.closed.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::StopFailed => {
                println!(
                    "[sub] stop failed: selector={} reason={}",
                    ev.selector.as_deref().unwrap_or("<unknown>"),
                    ev.reason.as_deref().unwrap_or("<none>")
                );
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "lifecycle"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lifecycle = Arc::new(Lifecycle::new());

    let collection = SelectCollection::builder(Config::default())
        .with_subscribers(vec![Arc::clone(&lifecycle) as Arc<dyn Subscribe>])
        .with(with_timer(
            Duration::from_millis(100),
            on_select(|ev, _| {
                println!("[tick] {}", ev.source);
                true
            }),
        ))
        .with(with_signals(
            [OsSignal::User1],
            on_select(|_, _| {
                println!("[signal] SIGUSR1, stopping");
                false
            }),
        ))
        .build()?;

    collection.initialize()?;
    {
        let collection = Arc::clone(&collection);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(550)).await;
            collection.shutdown();
        });
    }
    collection.select().await;

    // A second shutdown makes the signal source report a stop failure.
    collection.shutdown();
    tokio::time::sleep(Duration::from_millis(50)).await;

    lifecycle.print_stats();
    Ok(())
}
