//! Per-series threshold evaluation

use serde::Serialize;

use super::config::{Direction, Severity, ThresholdRule};
use crate::series::Series;

/// Outcome of evaluating one series against a rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesVerdict {
    pub series_name: String,
    pub breached_critical: bool,
    pub breached_warning: bool,
    /// "<series> has passed critical threshold (<value>)"
    pub critical_message: Option<String>,
    pub warning_message: Option<String>,
}

impl SeriesVerdict {
    fn clear(series_name: &str) -> Self {
        Self {
            series_name: series_name.to_string(),
            breached_critical: false,
            breached_warning: false,
            critical_message: None,
            warning_message: None,
        }
    }

    /// Highest severity breached, if any
    pub fn severity(&self) -> Option<Severity> {
        if self.breached_critical {
            Some(Severity::Critical)
        } else if self.breached_warning {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    /// Message for the most severe breach
    pub fn message(&self) -> Option<&str> {
        self.critical_message
            .as_deref()
            .or(self.warning_message.as_deref())
    }

    /// Neither bound breached
    pub fn is_ok(&self) -> bool {
        !self.breached_critical && !self.breached_warning
    }
}

/// Stateless evaluator of a single series against a [`ThresholdRule`]
pub struct ThresholdPolicy;

impl ThresholdPolicy {
    /// Evaluate the newest sample of `series` against both bounds of `rule`.
    ///
    /// Critical is checked before warning; both can be flagged at once.
    pub fn evaluate(series: &Series, rule: &ThresholdRule) -> SeriesVerdict {
        let mut verdict = SeriesVerdict::clear(series.name());
        let current = series.current();

        // Computed once; only consulted for the "above" direction
        let suppressed = match (rule.direction(), rule.hysteresis_window()) {
            (Direction::Above, Some(window)) => Self::rising_within(series.values(), window),
            _ => false,
        };

        for severity in [Severity::Critical, Severity::Warning] {
            let Some(bound) = rule.bound(severity) else {
                continue;
            };

            let breached = match rule.direction() {
                Direction::Below => current < bound,
                Direction::Above => current > bound && !suppressed,
            };
            if !breached {
                continue;
            }

            let message = format!(
                "{} has passed {} threshold ({})",
                series.name(),
                severity,
                current
            );
            match severity {
                Severity::Critical => {
                    verdict.breached_critical = true;
                    verdict.critical_message = Some(message);
                }
                Severity::Warning => {
                    verdict.breached_warning = true;
                    verdict.warning_message = Some(message);
                }
            }
        }

        verdict
    }

    /// True when every consecutive pair of the trailing `window` samples is
    /// strictly increasing.
    ///
    /// The window is clamped to the series length. Fewer than two samples
    /// never count as rising. NaN breaks the run.
    pub fn rising_within(values: &[f64], window: usize) -> bool {
        let window = window.min(values.len());
        let tail = &values[values.len() - window..];

        tail.len() >= 2 && tail.windows(2).all(|pair| pair[1] > pair[0])
    }
}
