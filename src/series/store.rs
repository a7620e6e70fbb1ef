use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One parsed series as handed over by the data source.
///
/// The serde shape matches a Graphite render entry:
/// `{"target": "a.b.c", "datapoints": [[1.5, 1700000000], [null, 1700000060]]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub target: String,
    #[serde(default)]
    pub datapoints: Vec<(Option<f64>, i64)>,
}

impl RawSeries {
    /// Create a raw series
    pub fn new(target: impl Into<String>, datapoints: Vec<(Option<f64>, i64)>) -> Self {
        Self {
            target: target.into(),
            datapoints,
        }
    }
}

/// A named, time-ordered sequence of samples (oldest first).
///
/// Always holds at least one value. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: String,
    values: Vec<f64>,
    /// Unix seconds of the first kept sample
    start: i64,
    /// Unix seconds of the last kept sample
    end: i64,
    /// Nominal sampling interval, informational only
    step: i64,
}

impl Series {
    /// Build a series from raw datapoints, dropping null samples.
    ///
    /// Returns `None` when nothing survives the filter.
    pub fn from_raw(raw: RawSeries) -> Option<Self> {
        let kept: Vec<(f64, i64)> = raw
            .datapoints
            .into_iter()
            .filter_map(|(value, ts)| value.map(|v| (v, ts)))
            .collect();

        let (_, start) = *kept.first()?;
        let (_, end) = *kept.last()?;
        let step = (end.saturating_sub(start) as f64 / kept.len() as f64).ceil() as i64;

        Some(Self {
            name: raw.target,
            values: kept.into_iter().map(|(v, _)| v).collect(),
            start,
            end,
            step,
        })
    }

    /// Series name (Graphite target)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Samples, oldest first
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Most recent sample
    pub fn current(&self) -> f64 {
        // Non-empty by construction
        self.values[self.values.len() - 1]
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a built series
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Unix seconds of the first sample
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Unix seconds of the last sample
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Nominal sampling interval in seconds
    pub fn step(&self) -> i64 {
        self.step
    }

    /// First sample time, `None` if out of range
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start, 0)
    }

    /// Last sample time, `None` if out of range
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.end, 0)
    }
}

/// Collection of series keyed by name, iterated in input order.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    series: Vec<Series>,
    index: FxHashMap<String, usize>,
}

impl SeriesStore {
    /// Build a store from parsed series.
    ///
    /// Series with no non-null sample are skipped silently. A repeated target
    /// replaces the earlier series but keeps its position.
    pub fn build(raw: impl IntoIterator<Item = RawSeries>) -> Self {
        let mut store = Self::default();

        for raw_series in raw {
            let target = raw_series.target.clone();
            let Some(series) = Series::from_raw(raw_series) else {
                tracing::debug!(series = %target, "Dropping series with no datapoints");
                continue;
            };

            match store.index.get(&target) {
                Some(&pos) => store.series[pos] = series,
                None => {
                    store.index.insert(target, store.series.len());
                    store.series.push(series);
                }
            }
        }

        store
    }

    /// Parse a JSON array of raw series and build a store from it
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let raw: Vec<RawSeries> = serde_json::from_str(json)?;
        Ok(Self::build(raw))
    }

    /// Look up a series by name
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.index.get(name).map(|&pos| &self.series[pos])
    }

    /// Number of series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no series survived filtering
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterate series in input order
    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    /// Series names in input order
    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(Series::name).collect()
    }
}

/// Series input errors
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid series JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(target: &str, points: &[(Option<f64>, i64)]) -> RawSeries {
        RawSeries::new(target, points.to_vec())
    }

    #[test]
    fn test_build_drops_null_samples() {
        let store = SeriesStore::build(vec![raw(
            "web1.load",
            &[(Some(1.0), 100), (None, 160), (Some(3.0), 220)],
        )]);

        let series = store.get("web1.load").unwrap();
        assert_eq!(series.values(), &[1.0, 3.0]);
        assert_eq!(series.start(), 100);
        assert_eq!(series.end(), 220);
        assert_eq!(series.current(), 3.0);
    }

    #[test]
    fn test_build_skips_empty_series() {
        let store = SeriesStore::build(vec![
            raw("all_null", &[(None, 100), (None, 160)]),
            raw("no_points", &[]),
            raw("kept", &[(Some(2.0), 100)]),
        ]);

        assert_eq!(store.len(), 1);
        assert!(store.get("all_null").is_none());
        assert!(store.get("no_points").is_none());
        assert!(store.get("kept").is_some());
    }

    #[test]
    fn test_step_is_ceiled() {
        // (250 - 100) / 3 = 50
        let store = SeriesStore::build(vec![raw(
            "a",
            &[(Some(1.0), 100), (Some(1.0), 160), (Some(1.0), 250)],
        )]);
        assert_eq!(store.get("a").unwrap().step(), 50);

        // (170 - 100) / 3 = 23.33 -> 24
        let store = SeriesStore::build(vec![raw(
            "b",
            &[(Some(1.0), 100), (Some(1.0), 130), (Some(1.0), 170)],
        )]);
        assert_eq!(store.get("b").unwrap().step(), 24);

        let store = SeriesStore::build(vec![raw("c", &[(Some(1.0), 100)])]);
        assert_eq!(store.get("c").unwrap().step(), 0);
    }

    #[test]
    fn test_step_with_extreme_timestamps() {
        let store = SeriesStore::build(vec![raw(
            "wide",
            &[(Some(1.0), i64::MIN), (Some(2.0), i64::MAX)],
        )]);
        let series = store.get("wide").unwrap();
        assert_eq!(series.step(), (i64::MAX as f64 / 2.0).ceil() as i64);
        assert!(series.start_time().is_none());
    }

    #[test]
    fn test_iteration_follows_input_order() {
        let store = SeriesStore::build(vec![
            raw("zeta", &[(Some(1.0), 1)]),
            raw("alpha", &[(Some(1.0), 1)]),
            raw("mid", &[(Some(1.0), 1)]),
        ]);
        assert_eq!(store.names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_target_replaces_in_place() {
        let store = SeriesStore::build(vec![
            raw("a", &[(Some(1.0), 1)]),
            raw("b", &[(Some(2.0), 1)]),
            raw("a", &[(Some(9.0), 1)]),
        ]);
        assert_eq!(store.names(), vec!["a", "b"]);
        assert_eq!(store.get("a").unwrap().current(), 9.0);
    }

    #[test]
    fn test_from_json_render_format() {
        let json = r#"[
            {"target": "host1.cpu", "datapoints": [[10, 1700000000], [null, 1700000060], [12.5, 1700000120]]},
            {"target": "host2.cpu", "datapoints": [[null, 1700000000]]}
        ]"#;

        let store = SeriesStore::from_json(json).unwrap();
        assert_eq!(store.len(), 1);

        let series = store.get("host1.cpu").unwrap();
        assert_eq!(series.values(), &[10.0, 12.5]);
        assert_eq!(
            series.start_time().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(matches!(
            SeriesStore::from_json("{\"target\": 1}"),
            Err(ParseError::Json(_))
        ));
        assert!(SeriesStore::from_json("[]").unwrap().is_empty());
    }
}
