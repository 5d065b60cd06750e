use super::StandardStatistic;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One aggregated sample returned by the metrics backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub sample_count: Option<f64>,
    pub average: Option<f64>,
    pub sum: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,

    /// Percentile values keyed by their label, such as `p99`.
    pub extended: BTreeMap<String, f64>,
}

impl DataPoint {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Set the field for a standard statistic.
    #[must_use]
    pub fn with_standard(mut self, kind: StandardStatistic, value: f64) -> Self {
        let slot = match kind {
            StandardStatistic::SampleCount => &mut self.sample_count,
            StandardStatistic::Average => &mut self.average,
            StandardStatistic::Sum => &mut self.sum,
            StandardStatistic::Minimum => &mut self.minimum,
            StandardStatistic::Maximum => &mut self.maximum,
        };
        *slot = Some(value);
        self
    }

    /// Add a percentile value.
    #[must_use]
    pub fn with_extended(mut self, label: impl Into<String>, value: f64) -> Self {
        let _ = self.extended.insert(label.into(), value);
        self
    }

    /// The value of a standard statistic, if the backend returned one.
    #[must_use]
    pub const fn standard(&self, kind: StandardStatistic) -> Option<f64> {
        match kind {
            StandardStatistic::SampleCount => self.sample_count,
            StandardStatistic::Average => self.average,
            StandardStatistic::Sum => self.sum,
            StandardStatistic::Minimum => self.minimum,
            StandardStatistic::Maximum => self.maximum,
        }
    }
}
