//! Named threshold check over a batch of parsed series

use super::aggregator::Aggregator;
use super::config::ThresholdRule;
use super::decision::Decision;
use crate::series::{RawSeries, SeriesStore};

/// Default name used in responses
pub const DEFAULT_CHECK_NAME: &str = "graphite check";

/// A threshold rule bound to a display name
#[derive(Debug, Clone)]
pub struct Check {
    /// Name used in responses
    pub name: String,
    /// Validated rule
    pub rule: ThresholdRule,
}

impl Check {
    /// Create a check with the default name
    pub fn new(rule: ThresholdRule) -> Self {
        Self {
            name: DEFAULT_CHECK_NAME.to_string(),
            rule,
        }
    }

    /// Set name used in responses
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build a store from `raw` and evaluate it
    pub fn run(&self, raw: Vec<RawSeries>) -> Decision {
        let store = SeriesStore::build(raw);
        self.run_store(&store)
    }

    /// Evaluate an already built store
    pub fn run_store(&self, store: &SeriesStore) -> Decision {
        tracing::debug!(
            check = %self.name,
            series = store.len(),
            "Running threshold check"
        );
        Aggregator::evaluate_store(store, &self.rule)
    }

    /// Message reported when nothing breached
    pub fn ok_message(&self) -> String {
        format!("{} value okay", self.name)
    }
}
