//! Metrics backends
//!
//! A [`MetricsSource`] runs one [`MetricQuery`] and returns the raw data points. The real
//! implementation talks to CloudWatch; tests substitute their own.

mod cloudwatch;

pub use cloudwatch::CloudWatchSource;

use crate::Result;
use crate::query::{DataPoint, MetricQuery};

/// Executes statistics queries against a metrics backend.
pub trait MetricsSource {
    /// Run `query` and return every data point in its window, in whatever order the backend uses.
    fn fetch(&self, query: &MetricQuery) -> impl Future<Output = Result<Vec<DataPoint>>>;
}
