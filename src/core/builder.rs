use std::sync::Arc;

use super::{collection::SelectCollection, config::Config};
use crate::{
    error::BuildError,
    selections::Selectable,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a SelectCollection with pre-registered selections.
pub struct SelectCollectionBuilder {
    cfg: Config,
    steps: Vec<Selectable>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SelectCollectionBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            steps: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    /// Appends one registration step. Steps run in the order they were added.
    pub fn with(mut self, step: Selectable) -> Self {
        self.steps.push(step);
        self
    }

    /// Appends several registration steps.
    pub fn with_all(mut self, steps: impl IntoIterator<Item = Selectable>) -> Self {
        self.steps.extend(steps);
        self
    }

    /// Sets lifecycle event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with
    /// bounded queues. With at least one subscriber, `build` must run inside
    /// a tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the collection and applies every step, stopping at the first failure.
    ///
    /// On failure the returned [`BuildError`] still holds the collection with
    /// the steps that succeeded before the failing one.
    pub fn build(self) -> Result<Arc<SelectCollection>, BuildError> {
        let collection = Arc::new(SelectCollection::new_internal(self.cfg));

        if !self.subscribers.is_empty() {
            let subs = Arc::new(SubscriberSet::new(self.subscribers, collection.bus()));
            collection.spawn_subscriber_listener(subs);
        }

        for step in self.steps {
            if let Err(source) = step.apply(&collection) {
                return Err(BuildError { collection, source });
            }
        }
        Ok(collection)
    }

    /// Like [`build`](Self::build), but panics on the first failing step.
    pub fn must_build(self) -> Arc<SelectCollection> {
        match self.build() {
            Ok(collection) => collection,
            Err(e) => panic!("{e}"),
        }
    }

    /// Like [`build`](Self::build), but discards the error and returns the
    /// partially built collection.
    pub fn build_ignoring_errors(self) -> Arc<SelectCollection> {
        match self.build() {
            Ok(collection) => collection,
            Err(BuildError { collection, source }) => {
                tracing::warn!(error = %source, "ignoring failed selection step");
                collection
            }
        }
    }
}
