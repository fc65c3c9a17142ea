//! End-to-end behavior of the collection with the built-in adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};

use selectvisor::{
    ChannelSelection, Config, Event, EventKind, SelectCollection, SelectError, SelectionConfig,
    SelectorEvent, SelectorIdentifier, TimeSelection, on_select, with_timer,
};

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

fn drain_forwarder_closed(events: &mut broadcast::Receiver<Event>) -> usize {
    std::iter::from_fn(|| events.try_recv().ok())
        .filter(|ev| ev.kind == EventKind::ForwarderClosed)
        .count()
}

#[tokio::test(start_paused = true)]
async fn single_timer_stops_after_second_delivery() {
    let c = SelectCollection::new(Config::default());
    let seen: Arc<Mutex<Vec<(SelectorIdentifier, bool)>>> = Arc::default();

    let id = {
        let seen = Arc::clone(&seen);
        c.add(TimeSelection::new(
            Duration::from_millis(10),
            on_select(move |ev, _| {
                let mut seen = seen.lock();
                seen.push((ev.source.clone(), ev.receive_status));
                seen.len() < 2
            }),
        ))
        .unwrap()
    };

    c.initialize().unwrap();
    c.select().await;

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|(src, ok)| *src == id && *ok));
}

#[tokio::test(start_paused = true)]
async fn two_timers_interleave_until_shutdown() {
    let c = SelectCollection::new(Config::default());
    let fast = counter();
    let slow = counter();

    for (period, hits) in [(20, &fast), (50, &slow)] {
        let hits = Arc::clone(hits);
        c.add(TimeSelection::new(
            Duration::from_millis(period),
            on_select(move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ))
        .unwrap();
    }
    c.initialize().unwrap();

    let stopper = {
        let c = Arc::clone(&c);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            c.shutdown();
        })
    };
    c.select().await;
    stopper.await.unwrap();

    let fast = fast.load(Ordering::SeqCst);
    assert!((5..=6).contains(&fast), "fast timer fired {fast} times");
    assert_eq!(slow.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn select_before_initialize_returns_immediately() {
    let c = SelectCollection::new(Config::default());
    c.add(TimeSelection::new(Duration::from_millis(5), on_select(|_, _| true)))
        .unwrap();
    c.select().await;
    assert!(!c.is_initialized());
}

#[tokio::test(start_paused = true)]
async fn shutdown_before_select_makes_it_return_immediately() {
    let c = SelectCollection::new(Config::default());
    let hits = counter();
    {
        let hits = Arc::clone(&hits);
        c.add(TimeSelection::new(
            Duration::from_millis(5),
            on_select(move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ))
        .unwrap();
    }
    c.initialize().unwrap();
    c.shutdown();
    c.select().await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_from_callback_ends_loop() {
    let c = SelectCollection::new(Config::default());
    let hits = counter();
    {
        let hits = Arc::clone(&hits);
        c.add(TimeSelection::new(
            Duration::from_millis(5),
            on_select(move |_, collection| {
                if hits.fetch_add(1, Ordering::SeqCst) == 2 {
                    collection.shutdown();
                }
                true
            }),
        ))
        .unwrap();
    }
    c.initialize().unwrap();
    c.select().await;
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    // After the loop: still safe, never blocks.
    c.shutdown();
    c.shutdown();
}

#[tokio::test(start_paused = true)]
async fn closed_source_produces_no_further_events() {
    let c = SelectCollection::new(Config::default());
    let items = counter();
    let ticks = counter();

    let (tx, rx) = mpsc::channel::<&'static str>(4);
    {
        let items = Arc::clone(&items);
        c.add(ChannelSelection::new(
            rx,
            on_select(move |ev, _| {
                assert!(ev.received::<&'static str>().is_some());
                items.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ))
        .unwrap();
    }
    {
        let ticks = Arc::clone(&ticks);
        c.add(TimeSelection::new(
            Duration::from_millis(10),
            on_select(move |_, _| ticks.fetch_add(1, Ordering::SeqCst) < 4),
        ))
        .unwrap();
    }
    c.initialize().unwrap();

    tx.send("a").await.unwrap();
    tx.send("b").await.unwrap();
    drop(tx);
    c.select().await;

    assert_eq!(items.load(Ordering::SeqCst), 2);
    assert_eq!(ticks.load(Ordering::SeqCst), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn callbacks_never_overlap_across_sources() {
    const PER_SOURCE: usize = 200;
    const SOURCES: usize = 4;

    let c = SelectCollection::new(Config::default());
    let in_flight = Arc::new(AtomicBool::new(false));
    let overlaps = counter();
    let total = counter();
    let mut senders = Vec::new();

    for n in 0..SOURCES {
        let (tx, rx) = mpsc::channel::<usize>(8);
        senders.push(tx);
        let in_flight = Arc::clone(&in_flight);
        let overlaps = Arc::clone(&overlaps);
        let total = Arc::clone(&total);
        c.add(ChannelSelection::named(
            format!("producer-{n}"),
            rx,
            on_select(move |_, _| {
                if in_flight.swap(true, Ordering::SeqCst) {
                    overlaps.fetch_add(1, Ordering::SeqCst);
                }
                std::hint::spin_loop();
                in_flight.store(false, Ordering::SeqCst);
                total.fetch_add(1, Ordering::SeqCst) + 1 < PER_SOURCE * SOURCES
            }),
        ))
        .unwrap();
    }
    c.initialize().unwrap();

    for tx in senders {
        tokio::spawn(async move {
            for i in 0..PER_SOURCE {
                if tx.send(i).await.is_err() {
                    break;
                }
            }
        });
    }
    c.select().await;

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(total.load(Ordering::SeqCst), PER_SOURCE * SOURCES);
    c.shutdown();
}

#[tokio::test(start_paused = true)]
async fn per_source_order_is_preserved() {
    let c = SelectCollection::new(Config::default());
    let got: Arc<Mutex<Vec<u32>>> = Arc::default();
    let (tx, rx) = mpsc::channel::<u32>(16);
    {
        let got = Arc::clone(&got);
        c.add(ChannelSelection::new(
            rx,
            on_select(move |ev, _| {
                let mut got = got.lock();
                got.extend(ev.received::<u32>().copied());
                got.len() < 10
            }),
        ))
        .unwrap();
    }
    c.initialize().unwrap();
    for i in 0..10 {
        tx.send(i).await.unwrap();
    }
    c.select().await;
    assert_eq!(*got.lock(), (0..10).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn timer_stop_pauses_until_reset() {
    let c = SelectCollection::new(Config::default());
    let paced = counter();
    let pacer = counter();

    let timer = {
        let paced = Arc::clone(&paced);
        Arc::new(TimeSelection::new(
            Duration::from_millis(10),
            on_select(move |_, _| {
                paced.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ))
    };
    c.register(Some(Arc::clone(&timer) as Arc<dyn SelectionConfig>))
        .unwrap();
    {
        let pacer = Arc::clone(&pacer);
        c.add(TimeSelection::new(
            Duration::from_millis(25),
            on_select(move |_, _| pacer.fetch_add(1, Ordering::SeqCst) % 2 == 0),
        ))
        .unwrap();
    }
    c.initialize().unwrap();

    timer.execute(SelectorEvent::Stop).unwrap();
    assert!(!timer.is_running());
    c.select().await;
    assert_eq!(paced.load(Ordering::SeqCst), 0);

    timer.execute(SelectorEvent::Reset).unwrap();
    assert!(timer.is_running());
    c.select().await;
    assert!(paced.load(Ordering::SeqCst) >= 4);
}

#[test]
fn unsupported_lifecycle_values_fail_on_every_adapter() {
    let (_tx, rx) = mpsc::channel::<u8>(1);
    let mut adapters: Vec<Box<dyn SelectionConfig>> = vec![
        Box::new(TimeSelection::new(Duration::from_millis(5), on_select(|_, _| true))),
        Box::new(ChannelSelection::new(rx, on_select(|_, _| true))),
    ];
    #[cfg(unix)]
    adapters.push(Box::new(selectvisor::SignalSelection::new(
        [selectvisor::OsSignal::User2],
        on_select(|_, _| true),
    )));
    for adapter in adapters {
        let err = adapter.execute(SelectorEvent::from(42)).unwrap_err();
        assert!(
            matches!(err, SelectError::ExecutionFailed { event: SelectorEvent::Unknown, .. }),
            "{} accepted an unknown lifecycle value",
            adapter.name()
        );
    }
}

#[cfg(unix)]
#[tokio::test]
async fn signal_is_delivered_to_its_callback() {
    use selectvisor::{OsSignal, SignalSelection};

    let c = SelectCollection::new(Config::default());
    let got: Arc<Mutex<Option<OsSignal>>> = Arc::default();
    {
        let got = Arc::clone(&got);
        c.add(SignalSelection::new(
            [OsSignal::User1],
            on_select(move |ev, _| {
                *got.lock() = ev.received::<OsSignal>().copied();
                false
            }),
        ))
        .unwrap();
    }
    c.initialize().unwrap();

    let status = std::process::Command::new("kill")
        .arg("-USR1")
        .arg(std::process::id().to_string())
        .status()
        .unwrap();
    assert!(status.success());

    tokio::time::timeout(Duration::from_secs(5), c.select())
        .await
        .unwrap();
    assert_eq!(*got.lock(), Some(OsSignal::User1));
    c.shutdown();
}

#[tokio::test(start_paused = true)]
async fn reinitialize_releases_previous_forwarders() {
    let c = SelectCollection::builder(Config::default())
        .with(with_timer(Duration::from_millis(5), on_select(|_, _| false)))
        .build()
        .unwrap();
    let mut events = c.subscribe();

    c.initialize().unwrap();
    c.initialize().unwrap();
    c.select().await;

    // Only the first forwarder was released by the second initialize.
    assert_eq!(drain_forwarder_closed(&mut events), 1);

    c.shutdown();
    let released = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match events.recv().await {
                Ok(ev) if ev.kind == EventKind::ForwarderClosed => break true,
                Ok(_) => continue,
                Err(_) => break false,
            }
        }
    })
    .await
    .unwrap_or(false);
    assert!(released, "second forwarder kept running after shutdown");
    assert_eq!(drain_forwarder_closed(&mut events), 0);
}
