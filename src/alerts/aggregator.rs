//! Fold per-series verdicts into one [`Decision`]

use super::config::ThresholdRule;
use super::decision::{Decision, Status};
use super::policy::{SeriesVerdict, ThresholdPolicy};
use crate::series::SeriesStore;

/// Combines verdicts into counts and an overall status
pub struct Aggregator;

impl Aggregator {
    /// Aggregate verdicts (in evaluation order) under `rule`.
    ///
    /// Without `min_breaching_nodes` a single breaching series escalates.
    /// With it, escalation needs at least that many breaching series.
    pub fn aggregate(verdicts: &[SeriesVerdict], rule: &ThresholdRule) -> Decision {
        if !rule.has_bounds() {
            return Decision::unknown("No warning or critical threshold configured");
        }
        if verdicts.is_empty() {
            return Decision::unknown("No data for time period and/or target");
        }

        let mut critical_count = 0;
        let mut warning_flags = 0;
        let mut ok_count = 0;
        let mut critical_messages = Vec::new();
        let mut warning_messages = Vec::new();

        for verdict in verdicts {
            if verdict.breached_critical {
                critical_count += 1;
                critical_messages.extend(verdict.critical_message.clone());
            }
            // A critical series is tallied once, through critical_count
            if verdict.breached_warning && !verdict.breached_critical {
                warning_flags += 1;
                warning_messages.extend(verdict.warning_message.clone());
            }
            if verdict.is_ok() {
                ok_count += 1;
            }
        }

        // Series at or above warning
        let warning_count = warning_flags + critical_count;

        let status = match rule.min_breaching_nodes() {
            None => {
                if critical_count > 0 {
                    Status::Critical
                } else if warning_flags > 0 {
                    Status::Warning
                } else {
                    Status::Ok
                }
            }
            Some(nodes) => {
                if critical_count >= nodes {
                    Status::Critical
                } else if warning_count >= nodes {
                    Status::Warning
                } else {
                    Status::Ok
                }
            }
        };

        Decision::new(
            status,
            critical_count,
            warning_count,
            ok_count,
            critical_messages,
            warning_messages,
        )
    }

    /// Evaluate every series of `store` in order and aggregate the results
    pub fn evaluate_store(store: &SeriesStore, rule: &ThresholdRule) -> Decision {
        let verdicts: Vec<SeriesVerdict> = store
            .iter()
            .map(|series| {
                let verdict = ThresholdPolicy::evaluate(series, rule);
                if let Some(message) = verdict.message() {
                    tracing::debug!(series = %verdict.series_name, "{}", message);
                }
                verdict
            })
            .collect();

        let decision = Self::aggregate(&verdicts, rule);

        tracing::info!(
            status = %decision.status(),
            series = verdicts.len(),
            critical = decision.critical_count(),
            warning = decision.warning_count(),
            "Threshold evaluation finished"
        );

        decision
    }
}
