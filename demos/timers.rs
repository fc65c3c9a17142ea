//! # Example: timers
//!
//! Waits on two timers and a channel at once, and stops on Ctrl-C.
//!
//! Shows how to:
//! - Register adapters through the builder with `with_timer` / `with_channel`.
//! - Feed a [`ChannelSelection`](selectvisor::ChannelSelection) from another task.
//! - End the loop from a callback (returning `false`) or on a termination signal.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► builder: timer[250ms], timer[1s], channel[String]
//!   ├─► initialize()  ─► three forwarders
//!   ├─► shutdown_on_signal()
//!   ├─► producer task ─► tx.send("job-N")
//!   └─► select()      ─► callbacks, until "job-5" or Ctrl-C
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example timers
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use selectvisor::{Config, SelectCollection, on_select, with_channel, with_timer};
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fast_ticks = Arc::new(AtomicU64::new(0));
    let (tx, rx) = mpsc::channel::<String>(16);

    let fast = {
        let fast_ticks = Arc::clone(&fast_ticks);
        with_timer(
            Duration::from_millis(250),
            on_select(move |_, _| {
                fast_ticks.fetch_add(1, Ordering::Relaxed);
                true
            }),
        )
    };
    let slow = with_timer(
        Duration::from_secs(1),
        on_select(|ev, _| {
            println!("[tick]  source={}", ev.source);
            true
        }),
    );
    let jobs = with_channel(
        rx,
        on_select(|ev, _| match ev.into_received::<String>() {
            Ok(job) => {
                println!("[job]   {job}");
                job != "job-5"
            }
            Err(_) => true,
        }),
    );

    let collection = SelectCollection::builder(Config::default())
        .with_all([fast, slow, jobs])
        .build()?;
    for id in collection.list() {
        println!("[ready] {id}");
    }

    collection.initialize()?;
    let _signal = collection.shutdown_on_signal();

    tokio::spawn(async move {
        for n in 1.. {
            tokio::time::sleep(Duration::from_millis(700)).await;
            if tx.send(format!("job-{n}")).await.is_err() {
                break;
            }
        }
    });

    collection.select().await;
    collection.shutdown();

    println!(
        "[done]  fast timer fired {} times",
        fast_ticks.load(Ordering::Relaxed)
    );
    Ok(())
}
