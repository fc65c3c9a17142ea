//! # Pausable periodic ticker.
//!
//! [`Ticker`] is the native source behind [`TimeSelection`](crate::TimeSelection).
//! It is driven by a [`TickerControl`] through a `watch` channel so that the
//! adapter can stop and re-arm it while the forwarder owns the ticker.
//!
//! ## Rules
//! - The first tick arrives one period after the ticker starts (or is reset).
//! - Missed ticks are skipped, not burst.
//! - `stop` pauses ticking without closing the source; `reset` re-arms it.
//! - Dropping the control closes the source.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::forward::NativeSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TickerState {
    running: bool,
    epoch: u64,
    period: Duration,
}

/// Owner side of one or more [`Ticker`]s.
#[derive(Debug)]
pub(crate) struct TickerControl {
    tx: watch::Sender<TickerState>,
}

impl TickerControl {
    pub(crate) fn new(period: Duration) -> Self {
        let (tx, _rx) = watch::channel(TickerState {
            running: true,
            epoch: 0,
            period,
        });
        Self { tx }
    }

    /// Creates a ticker following this control.
    pub(crate) fn ticker(&self) -> Ticker {
        let control = self.tx.subscribe();
        let epoch = control.borrow().epoch;
        Ticker {
            control,
            epoch,
            interval: None,
        }
    }

    pub(crate) fn stop(&self) {
        self.tx.send_modify(|state| state.running = false);
    }

    /// Re-arms the ticker, optionally with a new period, and resumes it if stopped.
    pub(crate) fn reset(&self, period: Option<Duration>) {
        self.tx.send_modify(|state| {
            state.running = true;
            state.epoch = state.epoch.wrapping_add(1);
            if let Some(period) = period {
                state.period = period;
            }
        });
    }

    pub(crate) fn period(&self) -> Duration {
        self.tx.borrow().period
    }

    pub(crate) fn is_running(&self) -> bool {
        self.tx.borrow().running
    }
}

/// Periodic source yielding the [`Instant`] of each tick.
#[derive(Debug)]
pub(crate) struct Ticker {
    control: watch::Receiver<TickerState>,
    epoch: u64,
    interval: Option<Interval>,
}

fn arm(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

#[async_trait]
impl NativeSource for Ticker {
    type Item = Instant;

    async fn recv(&mut self) -> Option<Instant> {
        loop {
            let state = *self.control.borrow_and_update();
            if state.epoch != self.epoch {
                self.epoch = state.epoch;
                self.interval = None;
            }
            if !state.running {
                self.control.changed().await.ok()?;
                continue;
            }

            let interval = self.interval.get_or_insert_with(|| arm(state.period));
            tokio::select! {
                instant = interval.tick() => return Some(instant),
                changed = self.control.changed() => changed.ok()?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let control = TickerControl::new(Duration::from_millis(30));
        let mut ticker = control.ticker();
        let start = Instant::now();

        let first = ticker.recv().await.unwrap();
        assert_eq!(first - start, Duration::from_millis(30));
        let second = ticker.recv().await.unwrap();
        assert_eq!(second - first, Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_ticker_is_silent_until_reset() {
        let control = TickerControl::new(Duration::from_millis(10));
        let mut ticker = control.ticker();
        control.stop();
        assert!(!control.is_running());

        let silent = tokio::time::timeout(Duration::from_millis(100), ticker.recv()).await;
        assert!(silent.is_err());

        let before = Instant::now();
        control.reset(Some(Duration::from_millis(25)));
        let tick = ticker.recv().await.unwrap();
        assert_eq!(tick - before, Duration::from_millis(25));
        assert_eq!(control.period(), Duration::from_millis(25));
    }

    #[tokio::test]
    async fn test_dropping_control_closes_source() {
        let control = TickerControl::new(Duration::from_secs(3600));
        let mut ticker = control.ticker();
        drop(control);
        assert!(ticker.recv().await.is_none());
    }
}
