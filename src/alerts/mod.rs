//! Threshold evaluation for metric series
//!
//! Per-series comparison against warning/critical bounds, with rising-trend
//! suppression and a node quorum gate when folding results together.

pub mod aggregator;
pub mod checker;
pub mod config;
pub mod decision;
pub mod policy;

pub use aggregator::Aggregator;
pub use checker::{Check, DEFAULT_CHECK_NAME};
pub use config::{Direction, RuleConfig, RuleError, Severity, ThresholdRule};
pub use decision::{Decision, Status};
pub use policy::{SeriesVerdict, ThresholdPolicy};
