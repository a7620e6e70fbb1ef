use proptest::prelude::*;
use watermark::alerts::{Aggregator, Direction, RuleConfig, Status, ThresholdPolicy, ThresholdRule};
use watermark::series::{RawSeries, Series, SeriesStore};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn raw(name: &str, values: &[f64]) -> RawSeries {
    RawSeries::new(
        name,
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (Some(*v), 1_700_000_000 + i as i64 * 60))
            .collect(),
    )
}

fn series(values: &[f64]) -> Series {
    Series::from_raw(raw("X", values)).unwrap()
}

fn rule(config: RuleConfig) -> ThresholdRule {
    ThresholdRule::try_from(config).unwrap()
}

/// A non-empty series of finite samples.
fn arb_values(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0f64..1000.0, 1..max_len)
}

/// Warning/critical bounds, critical at or beyond warning for `Above`.
fn arb_bounds() -> impl Strategy<Value = (f64, f64)> {
    (-1000.0f64..1000.0, 0.0f64..500.0).prop_map(|(warning, gap)| (warning, warning + gap))
}

fn strictly_rising(values: &[f64]) -> bool {
    values.len() >= 2 && values.windows(2).all(|p| p[1] > p[0])
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn single_sample_is_never_suppressed(
        value in -1000.0f64..1000.0,
        gap in 0.001f64..100.0,
        window in 1i64..64,
    ) {
        let r = rule(RuleConfig::new().with_critical(value - gap).with_hysteresis_window(window));
        let verdict = ThresholdPolicy::evaluate(&series(&[value]), &r);
        prop_assert!(verdict.breached_critical);
    }

    #[test]
    fn below_is_never_suppressed(
        values in arb_values(32),
        bound in -1000.0f64..1000.0,
        window in 1i64..64,
    ) {
        let r = rule(
            RuleConfig::new()
                .with_critical(bound)
                .with_direction(Direction::Below)
                .with_hysteresis_window(window),
        );
        let verdict = ThresholdPolicy::evaluate(&series(&values), &r);
        prop_assert_eq!(verdict.breached_critical, *values.last().unwrap() < bound);
    }

    #[test]
    fn above_breach_matches_trailing_window(
        values in arb_values(32),
        bound in -1000.0f64..1000.0,
        window in 1usize..64,
    ) {
        let r = rule(
            RuleConfig::new()
                .with_critical(bound)
                .with_hysteresis_window(window as i64),
        );
        let tail = &values[values.len() - window.min(values.len())..];
        let expected = *values.last().unwrap() > bound && !strictly_rising(tail);

        let verdict = ThresholdPolicy::evaluate(&series(&values), &r);
        prop_assert_eq!(verdict.breached_critical, expected);
    }

    #[test]
    fn oversized_window_covers_whole_series(values in arb_values(32), extra in 0usize..32) {
        prop_assert_eq!(
            ThresholdPolicy::rising_within(&values, values.len() + extra),
            ThresholdPolicy::rising_within(&values, values.len())
        );
    }

    #[test]
    fn evaluation_is_idempotent(
        values in arb_values(32),
        (warning, critical) in arb_bounds(),
        window in 1i64..16,
    ) {
        let s = series(&values);
        let r = rule(
            RuleConfig::new()
                .with_warning(warning)
                .with_critical(critical)
                .with_hysteresis_window(window),
        );
        prop_assert_eq!(ThresholdPolicy::evaluate(&s, &r), ThresholdPolicy::evaluate(&s, &r));
    }

    #[test]
    fn quorum_and_tallies_hold(
        nodes in prop::collection::vec(arb_values(8), 0..10),
        (warning, critical) in arb_bounds(),
        quorum in 1i64..8,
    ) {
        let store = SeriesStore::build(
            nodes.iter().enumerate().map(|(i, v)| raw(&format!("node{i}"), v)),
        );
        let r = rule(
            RuleConfig::new()
                .with_warning(warning)
                .with_critical(critical)
                .with_min_breaching_nodes(quorum),
        );
        let decision = Aggregator::evaluate_store(&store, &r);

        if nodes.is_empty() {
            prop_assert_eq!(decision.status(), Status::Unknown);
            return Ok(());
        }

        prop_assert!(decision.warning_count() >= decision.critical_count());
        prop_assert!(decision.warning_count() <= nodes.len());
        prop_assert_eq!(decision.warning_count() + decision.ok_count(), nodes.len());
        match decision.status() {
            Status::Critical => prop_assert!(decision.critical_count() >= quorum as usize),
            Status::Warning => prop_assert!(decision.warning_count() >= quorum as usize),
            Status::Ok => prop_assert!(decision.warning_count() < quorum as usize),
            Status::Unknown => prop_assert!(false, "bounds and series were present"),
        }
    }
}
