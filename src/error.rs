//! Error types used by the select collection, its forwarders and source adapters.
//!
//! This module defines two error types:
//!
//! - [`SelectError`] — errors raised while registering, activating or controlling sources.
//! - [`BuildError`] — a builder step failed; carries the partially built collection.
//!
//! [`SelectError`] provides helper methods (`as_label`, `as_message`) for logging/metrics.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::SelectCollection;
use crate::events::SelectorEvent;
use crate::identifier::SelectorIdentifier;

/// # Errors produced by the select collection.
///
/// Every variant carries structured context (identifier, selector name, reason)
/// rather than a bare string.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SelectError {
    /// The selection could not be registered (absent config).
    #[error("registration failed: {reason}")]
    RegistrationFailed {
        /// Why registration was refused.
        reason: &'static str,
    },

    /// A source failed while being connected or activated during `initialize`.
    #[error("initialization of {id} failed: {source}")]
    InitializationFailed {
        /// Identifier of the offending registration.
        id: SelectorIdentifier,
        /// The underlying connect/activation failure.
        #[source]
        source: Box<SelectError>,
    },

    /// A source's wiring step returned no activation.
    #[error("initialization of {id} failed: no activation returned")]
    MissingActivation {
        /// Identifier of the offending registration.
        id: SelectorIdentifier,
    },

    /// A forwarder was started without an underlying source.
    #[error("forwarder begin failed: {reason}")]
    BeginFailed {
        /// Why the forwarder could not start.
        reason: &'static str,
    },

    /// The native source could not be opened (already consumed, OS refused a listener, ...).
    #[error("source {selector} unavailable: {reason}")]
    SourceUnavailable {
        /// Human-readable selector name.
        selector: String,
        /// Underlying cause.
        reason: Cow<'static, str>,
    },

    /// A lifecycle request could not be executed.
    #[error("execution of {event:?} on {selector} failed: {reason}")]
    ExecutionFailed {
        /// Human-readable selector name.
        selector: String,
        /// The lifecycle value that was requested.
        event: SelectorEvent,
        /// Underlying cause.
        reason: Cow<'static, str>,
    },

    /// `initialize` was called while a `select` loop owns the shared receiver.
    #[error("select loop is running")]
    SelectInProgress,
}

impl SelectError {
    /// Builds the error returned for lifecycle values an adapter does not handle.
    pub fn unsupported(selector: impl Into<String>, event: SelectorEvent) -> Self {
        SelectError::ExecutionFailed {
            selector: selector.into(),
            event,
            reason: Cow::Borrowed("unsupported event"),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use selectvisor::SelectError;
    ///
    /// let err = SelectError::BeginFailed { reason: "no source" };
    /// assert_eq!(err.as_label(), "select_begin_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SelectError::RegistrationFailed { .. } => "select_registration_failed",
            SelectError::InitializationFailed { .. } => "select_init_failed",
            SelectError::MissingActivation { .. } => "select_missing_activation",
            SelectError::BeginFailed { .. } => "select_begin_failed",
            SelectError::SourceUnavailable { .. } => "select_source_unavailable",
            SelectError::ExecutionFailed { .. } => "select_execution_failed",
            SelectError::SelectInProgress => "select_in_progress",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SelectError::RegistrationFailed { reason } => format!("registration: {reason}"),
            SelectError::InitializationFailed { id, source } => {
                format!("init {id}: {}", source.as_message())
            }
            SelectError::MissingActivation { id } => format!("init {id}: no activation"),
            SelectError::BeginFailed { reason } => format!("begin: {reason}"),
            SelectError::SourceUnavailable { selector, reason } => {
                format!("source {selector}: {reason}")
            }
            SelectError::ExecutionFailed {
                selector,
                event,
                reason,
            } => format!("execute {event:?} on {selector}: {reason}"),
            SelectError::SelectInProgress => "select in progress".to_string(),
        }
    }

    /// Returns the identifier attached to initialization failures.
    pub fn identifier(&self) -> Option<&SelectorIdentifier> {
        match self {
            SelectError::InitializationFailed { id, .. } | SelectError::MissingActivation { id } => {
                Some(id)
            }
            _ => None,
        }
    }
}

/// # A builder step failed.
///
/// Construction stops at the first failing [`Selectable`](crate::Selectable);
/// steps applied before it stay registered in [`BuildError::collection`].
#[derive(Error)]
#[error("building select collection failed: {source}")]
pub struct BuildError {
    /// The collection as it stood when the failing step ran.
    pub collection: Arc<SelectCollection>,
    /// The first error reported by a builder step.
    #[source]
    pub source: SelectError,
}

impl fmt::Debug for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildError")
            .field("registered", &self.collection.len())
            .field("source", &self.source)
            .finish()
    }
}
