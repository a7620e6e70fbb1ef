//! Watermark: Threshold Evaluation for Metric Series
//!
//! Decides whether Graphite-style time series crossed configured warning or
//! critical thresholds, per series and across a group of nodes.
//!
//! # Features
//!
//! - **Null Filtering**: Incomplete datapoints and empty series are dropped
//! - **Directional Bounds**: Alert above or below a threshold
//! - **Rising-Trend Suppression**: Skip "above" alerts while the trailing
//!   window is strictly increasing
//! - **Node Quorum**: Escalate only when enough series breach
//!
//! # Example
//!
//! ```
//! use watermark::alerts::{Aggregator, RuleConfig, Status, ThresholdRule};
//! use watermark::series::{RawSeries, SeriesStore};
//!
//! let store = SeriesStore::build(vec![RawSeries::new(
//!     "web1.load",
//!     vec![(Some(1.0), 1000), (None, 1060), (Some(7.5), 1120)],
//! )]);
//!
//! let rule = ThresholdRule::try_from(RuleConfig::new().with_warning(5.0)).unwrap();
//! let decision = Aggregator::evaluate_store(&store, &rule);
//!
//! assert_eq!(decision.status(), Status::Warning);
//! assert_eq!(
//!     decision.warning_messages(),
//!     &["web1.load has passed warning threshold (7.5)".to_string()]
//! );
//! ```

pub mod alerts;
pub mod series;

// Re-export commonly used types
pub use alerts::{Aggregator, Check, Decision, RuleConfig, Status, ThresholdPolicy, ThresholdRule};
pub use series::{RawSeries, Series, SeriesStore};
