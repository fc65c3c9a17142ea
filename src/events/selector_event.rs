//! # Lifecycle control values passed to `SelectionConfig::execute`.

/// Lifecycle transition requested from a selection.
///
/// Backed by an `i32`; equality is by value, so
/// `SelectorEvent::from(1) == SelectorEvent::Stop`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectorEvent {
    /// Anything that is not `Stop` or `Reset`.
    #[default]
    Unknown = 0,
    /// Stop producing events.
    Stop = 1,
    /// Re-arm the source (timers only).
    Reset = 2,
}

impl SelectorEvent {
    /// Returns the underlying integer value.
    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl From<i32> for SelectorEvent {
    fn from(raw: i32) -> Self {
        match raw {
            1 => SelectorEvent::Stop,
            2 => SelectorEvent::Reset,
            _ => SelectorEvent::Unknown,
        }
    }
}
