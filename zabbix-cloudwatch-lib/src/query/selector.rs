use super::{DataPoint, QueryError, StatisticSpec};
use core::fmt::{Display, Formatter, Result as FmtResult};

/// The value printed for the monitoring agent.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// A standard statistic of the latest data point.
    Value(f64),

    /// Every percentile value of the latest data point, ordered by label.
    Percentiles(Vec<f64>),

    /// The configured sentinel, used when the window holds no data.
    NoData(i64),
}

impl Display for QueryResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Percentiles(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            Self::NoData(sentinel) => write!(f, "{sentinel}"),
        }
    }
}

/// Pick the latest data point and extract the requested statistic from it.
///
/// With no data points the sentinel is returned as is. Data points sharing the latest timestamp
/// resolve to the one that comes first in `data_points`.
pub fn select(data_points: &[DataPoint], spec: &StatisticSpec, no_data: i64) -> Result<QueryResult, QueryError> {
    let Some(latest) = latest(data_points) else {
        return Ok(QueryResult::NoData(no_data));
    };

    match spec {
        StatisticSpec::Standard(kind) => latest
            .standard(*kind)
            .map(QueryResult::Value)
            .ok_or_else(|| QueryError::MissingValue(kind.to_string())),

        StatisticSpec::Percentile(label) => {
            if !latest.extended.contains_key(label) {
                return Err(QueryError::InconsistentPercentile(label.clone()));
            }

            Ok(QueryResult::Percentiles(latest.extended.values().copied().collect()))
        }
    }
}

fn latest(data_points: &[DataPoint]) -> Option<&DataPoint> {
    // strictly greater keeps the earliest of equal timestamps
    data_points
        .iter()
        .reduce(|best, candidate| if candidate.timestamp > best.timestamp { candidate } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{StandardStatistic, classify};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sum(secs: i64, value: f64) -> DataPoint {
        DataPoint::new(at(secs)).with_standard(StandardStatistic::Sum, value)
    }

    const SUM: StatisticSpec = StatisticSpec::Standard(StandardStatistic::Sum);

    #[test]
    fn test_empty_returns_sentinel() {
        assert_eq!(select(&[], &SUM, -1).unwrap(), QueryResult::NoData(-1));
        assert_eq!(
            select(&[], &StatisticSpec::Percentile("p99".into()), 0).unwrap(),
            QueryResult::NoData(0)
        );
    }

    #[test]
    fn test_latest_wins() {
        let points = [sum(0, 5.0), sum(60, 9.0)];
        assert_eq!(select(&points, &SUM, -1).unwrap(), QueryResult::Value(9.0));
    }

    #[test]
    fn test_latest_wins_regardless_of_order() {
        let points = [sum(120, 3.0), sum(0, 5.0), sum(60, 9.0)];
        assert_eq!(select(&points, &SUM, -1).unwrap(), QueryResult::Value(3.0));
    }

    #[test]
    fn test_tie_keeps_input_order() {
        let points = [sum(0, 1.0), sum(60, 2.0), sum(60, 3.0)];
        assert_eq!(select(&points, &SUM, -1).unwrap(), QueryResult::Value(2.0));
    }

    #[test]
    fn test_input_is_untouched() {
        let points = vec![sum(0, 5.0), sum(60, 9.0)];
        let before = points.clone();
        let _ = select(&points, &SUM, -1).unwrap();
        assert_eq!(points, before);
    }

    #[test]
    fn test_each_standard_field() {
        let dp = DataPoint::new(at(0))
            .with_standard(StandardStatistic::SampleCount, 10.0)
            .with_standard(StandardStatistic::Average, 2.5)
            .with_standard(StandardStatistic::Sum, 25.0)
            .with_standard(StandardStatistic::Minimum, 1.0)
            .with_standard(StandardStatistic::Maximum, 4.0);

        for (stat, expected) in [("SampleCount", 10.0), ("Average", 2.5), ("Sum", 25.0), ("Minimum", 1.0), ("Maximum", 4.0)] {
            let spec = classify(stat).unwrap();
            assert_eq!(select(core::slice::from_ref(&dp), &spec, -1).unwrap(), QueryResult::Value(expected), "{stat}");
        }
    }

    #[test]
    fn test_missing_standard_value() {
        let dp = DataPoint::new(at(0)).with_standard(StandardStatistic::Average, 1.0);
        let result = select(&[dp], &SUM, -1);
        assert!(matches!(result, Err(QueryError::MissingValue(ref s)) if s == "Sum"), "got {result:?}");
    }

    #[test]
    fn test_missing_value_only_checks_latest() {
        let points = [sum(0, 5.0), DataPoint::new(at(60))];
        assert!(matches!(select(&points, &SUM, -1), Err(QueryError::MissingValue(_))));
    }

    #[test]
    fn test_percentile() {
        let dp = DataPoint::new(at(0)).with_extended("p99", 42.0);
        let spec = StatisticSpec::Percentile("p99".into());
        assert_eq!(select(&[dp], &spec, -1).unwrap(), QueryResult::Percentiles(vec![42.0]));
    }

    #[test]
    fn test_percentile_from_latest_point() {
        let points = [
            DataPoint::new(at(60)).with_extended("p99", 42.0),
            DataPoint::new(at(0)).with_extended("p99", 1.0),
        ];
        let spec = StatisticSpec::Percentile("p99".into());
        assert_eq!(select(&points, &spec, -1).unwrap(), QueryResult::Percentiles(vec![42.0]));
    }

    #[test]
    fn test_inconsistent_percentile() {
        let dp = DataPoint::new(at(0)).with_extended("p99", 42.0);
        let spec = StatisticSpec::Percentile("p95".into());
        let result = select(&[dp], &spec, -1);
        assert!(matches!(result, Err(QueryError::InconsistentPercentile(ref s)) if s == "p95"), "got {result:?}");
    }

    #[test]
    fn test_percentile_label_is_matched_exactly() {
        let dp = DataPoint::new(at(0)).with_extended("p99.0", 42.0);
        let spec = StatisticSpec::Percentile("p99".into());
        assert!(matches!(select(&[dp], &spec, -1), Err(QueryError::InconsistentPercentile(_))));
    }

    #[test]
    fn test_all_percentile_values_are_emitted() {
        let dp = DataPoint::new(at(0)).with_extended("p99", 42.0).with_extended("p50", 7.0);
        let spec = StatisticSpec::Percentile("p99".into());
        assert_eq!(select(&[dp], &spec, -1).unwrap(), QueryResult::Percentiles(vec![7.0, 42.0]));
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryResult::Value(9.0).to_string(), "9");
        assert_eq!(QueryResult::Value(0.25).to_string(), "0.25");
        assert_eq!(QueryResult::NoData(-1).to_string(), "-1");
        assert_eq!(QueryResult::Percentiles(vec![7.0, 42.5]).to_string(), "7\n42.5");
    }

    #[test]
    fn test_display_never_uses_exponent_notation() {
        assert_eq!(QueryResult::Value(1e21).to_string(), "1000000000000000000000");
        assert_eq!(QueryResult::Value(1e-7).to_string(), "0.0000001");
        assert_eq!(QueryResult::Value(-2.5e-3).to_string(), "-0.0025");
    }
}
