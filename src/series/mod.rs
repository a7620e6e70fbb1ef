//! In-memory series collection built once per evaluation cycle.

pub mod store;

pub use store::{ParseError, RawSeries, Series, SeriesStore};
