//! # Per-registration identifiers.
//!
//! A [`SelectorIdentifier`] names exactly one `register` call on one collection.
//! It combines the selection's human-readable name with the collection's
//! monotonically increasing registration counter, so registering the same
//! source twice still yields two distinct identifiers.
//!
//! ## Rules
//! - Sequence numbers start at 1; `0` is reserved for [`SelectorIdentifier::invalid`].
//! - Identifiers are never reused within a collection's lifetime.
//! - Ordering is by sequence first, which makes registration order the natural
//!   iteration order of the collection.

use std::fmt;
use std::sync::Arc;

/// Opaque, comparable name of one registration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorIdentifier {
    seq: u64,
    name: Arc<str>,
}

impl SelectorIdentifier {
    /// Creates an identifier from a selection name and a registration sequence number.
    pub fn new(name: impl Into<Arc<str>>, seq: u64) -> Self {
        Self {
            seq,
            name: name.into(),
        }
    }

    /// The sentinel denoting "no identifier".
    pub fn invalid() -> Self {
        Self {
            seq: 0,
            name: Arc::from(""),
        }
    }

    /// Returns `false` for the [`invalid`](Self::invalid) sentinel.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.seq != 0
    }

    /// Registration sequence number (1-based).
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Name of the selection this identifier was derived from.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for SelectorIdentifier {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for SelectorIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}#{}", self.name, self.seq)
        } else {
            f.write_str("<invalid>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_different_seq_differ() {
        let a = SelectorIdentifier::new("timer[20ms]", 1);
        let b = SelectorIdentifier::new("timer[20ms]", 2);
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(a, SelectorIdentifier::new("timer[20ms]", 1));
    }

    #[test]
    fn test_invalid_sentinel() {
        let id = SelectorIdentifier::invalid();
        assert!(!id.is_valid());
        assert_eq!(id, SelectorIdentifier::default());
        assert_eq!(id.to_string(), "<invalid>");
        assert_eq!(SelectorIdentifier::new("x", 4).to_string(), "x#4");
    }
}
