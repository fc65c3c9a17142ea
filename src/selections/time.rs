//! # Periodic timer selection.
//!
//! [`TimeSelection`] binds a pausable periodic [`Ticker`] to the selection
//! contract. Each tick is delivered as a [`SelectEvent`](crate::SelectEvent)
//! whose payload is the tick's [`tokio::time::Instant`].
//!
//! ## Lifecycle
//! - `Stop`: pauses ticking. The forwarder stays parked until `Reset` or shutdown.
//! - `Reset`: re-arms the period from now (also resumes a stopped timer).
//! - anything else: [`SelectError::ExecutionFailed`].
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use selectvisor::{SelectionConfig, TimeSelection, on_select};
//!
//! let timer = TimeSelection::new(Duration::from_millis(20), on_select(|_ev, _c| true));
//! assert_eq!(timer.name(), "timer[20ms]");
//! ```

use std::any::Any;
use std::time::Duration;

use super::selection::{Activation, OnSelect, SelectionConfig};
use super::ticker::TickerControl;
use crate::error::SelectError;
use crate::events::SelectorEvent;
use crate::forward::{EventSink, Forwarder};
use crate::identifier::SelectorIdentifier;

/// Shortest accepted period; zero periods are raised to this.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Recurring timer source.
pub struct TimeSelection {
    name: String,
    period: Duration,
    control: TickerControl,
    on_select: OnSelect,
}

impl TimeSelection {
    /// Creates a timer ticking every `period` (at least 1ms).
    ///
    /// Nothing runs until the owning collection is initialized.
    pub fn new(period: Duration, on_select: OnSelect) -> Self {
        let period = period.max(MIN_PERIOD);
        Self {
            name: format!("timer[{period:?}]"),
            period,
            control: TickerControl::new(period),
            on_select,
        }
    }

    /// Current tick period (differs from the configured one after [`reset_period`](Self::reset_period)).
    pub fn period(&self) -> Duration {
        self.control.period()
    }

    /// Returns `false` after `Stop` until the next reset.
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Re-arms the timer with a new period and resumes it if stopped.
    pub fn reset_period(&self, period: Duration) {
        self.control.reset(Some(period.max(MIN_PERIOD)));
    }
}

impl SelectionConfig for TimeSelection {
    fn name(&self) -> &str {
        &self.name
    }

    /// The configured period as a [`Duration`].
    fn source(&self) -> &(dyn Any + Send + Sync) {
        &self.period
    }

    fn on_select(&self) -> &OnSelect {
        &self.on_select
    }

    fn connect(&self, sink: EventSink) -> Result<Option<Activation>, SelectError> {
        let mut fwd = Forwarder::new(self.control.ticker(), sink);
        Ok(Some(Box::new(move |id: &SelectorIdentifier| {
            fwd.begin(Some(id)).map(drop)
        })))
    }

    fn execute(&self, event: SelectorEvent) -> Result<(), SelectError> {
        match event {
            SelectorEvent::Stop => {
                self.control.stop();
                Ok(())
            }
            SelectorEvent::Reset => {
                self.control.reset(None);
                Ok(())
            }
            SelectorEvent::Unknown => Err(SelectError::unsupported(&self.name, event)),
        }
    }
}
