//! Query construction and result selection
//!
//! Everything in this module is pure: no I/O, no clock. The command layer feeds it the raw
//! command-line strings and the current time, hands the resulting [`MetricQuery`] to a
//! [`crate::cloud::MetricsSource`], and runs the returned data points through [`select`].
//!
//! - [`parse_dimensions`]: shorthand dimension filter parsing
//! - [`classify`]: standard vs percentile statistic classification
//! - [`resolve`]: time window resolution from duration, delay and window inputs
//! - [`select`]: latest data point selection and value extraction

mod data_point;
mod dimension;
mod error;
mod selector;
mod statistic;
mod window;

pub use data_point::DataPoint;
pub use dimension::{Dimension, parse_dimensions};
pub use error::QueryError;
pub use selector::{QueryResult, select};
pub use statistic::{StandardStatistic, StatisticSpec, classify};
pub use window::{DEFAULT_DELAY, DEFAULT_DURATION, DEFAULT_PERIOD_SECS, TimeWindow, WindowDefaults, resolve, resolve_with_defaults};

/// Everything the metrics backend needs to run one statistics query.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub namespace: String,
    pub metric: String,
    pub dimensions: Vec<Dimension>,
    pub window: TimeWindow,
    pub statistic: StatisticSpec,
}
