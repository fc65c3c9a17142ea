//! # Collection configuration.
//!
//! Provides [`Config`] centralized settings for a [`SelectCollection`](crate::SelectCollection).
//!
//! ## Sentinel values
//! Capacities of `0` are clamped to `1`; use the `*_clamped` accessors rather
//! than reading the fields directly.

/// Channel sizing for a select collection.
///
/// ## Field semantics
/// - `event_capacity`: buffer of the shared event channel all forwarders write to
/// - `shutdown_capacity`: buffer of the shutdown channel (sentinels beyond it are dropped)
/// - `bus_capacity`: lifecycle event bus ring buffer size
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the shared event channel.
    ///
    /// Forwarders wait for room when the wait loop falls behind, so this bounds
    /// how many undelivered events may queue up across all sources.
    pub event_capacity: usize,

    /// Capacity of the shutdown channel.
    ///
    /// `shutdown` uses a non-blocking send; once this many sentinels are
    /// pending, further ones are redundant and dropped.
    pub shutdown_capacity: usize,

    /// Capacity of the lifecycle event bus broadcast channel.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the shared event channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn event_capacity_clamped(&self) -> usize {
        self.event_capacity.max(1)
    }

    /// Returns the shutdown channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn shutdown_capacity_clamped(&self) -> usize {
        self.shutdown_capacity.max(1)
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `event_capacity = 64`
    /// - `shutdown_capacity = 16`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            event_capacity: 64,
            shutdown_capacity: 16,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacities_are_clamped() {
        let cfg = Config {
            event_capacity: 0,
            shutdown_capacity: 0,
            bus_capacity: 0,
        };
        assert_eq!(cfg.event_capacity_clamped(), 1);
        assert_eq!(cfg.shutdown_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
