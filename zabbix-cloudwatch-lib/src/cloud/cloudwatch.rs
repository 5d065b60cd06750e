//! CloudWatch `GetMetricStatistics` client.

use super::MetricsSource;
use crate::Result;
use crate::query::{DataPoint, MetricQuery, StatisticSpec};
use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::operation::get_metric_statistics::builders::GetMetricStatisticsFluentBuilder;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, Statistic};
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::{IntoAppError, app_err};

/// Session name recorded in CloudTrail when assuming a role.
const SESSION_NAME: &str = "zabbix-cloudwatch";

/// CloudWatch client bound to one region and one set of credentials.
#[derive(Debug, Clone)]
pub struct CloudWatchSource {
    client: Client,
    request_timeout: Duration,
}

impl CloudWatchSource {
    /// Build a client for `region` from the default credential chain.
    ///
    /// When `role_arn` is given, the default credentials are only used to assume that role, and
    /// queries run with the role's temporary credentials.
    pub async fn connect(region: &str, role_arn: Option<&str>, request_timeout: Duration) -> Self {
        let region = Region::new(region.to_string());
        let base = aws_config::defaults(BehaviorVersion::latest()).region(region.clone()).load().await;

        let mut config = aws_sdk_cloudwatch::config::Builder::from(&base);
        if let Some(role_arn) = role_arn {
            log::debug!("assuming role {role_arn}");
            let provider = AssumeRoleProvider::builder(role_arn)
                .session_name(SESSION_NAME)
                .region(region)
                .configure(&base)
                .build()
                .await;
            config = config.credentials_provider(provider);
        }

        Self {
            client: Client::from_conf(config.build()),
            request_timeout,
        }
    }
}

impl MetricsSource for CloudWatchSource {
    async fn fetch(&self, query: &MetricQuery) -> Result<Vec<DataPoint>> {
        let request = build_request(&self.client, query)?;

        let output = tokio::time::timeout(self.request_timeout, request.send())
            .await
            .into_app_err_with(|| {
                format!(
                    "CloudWatch request timed out after {}",
                    humantime::format_duration(self.request_timeout)
                )
            })?
            .map_err(|e| app_err!("querying CloudWatch GetMetricStatistics: {}", DisplayErrorContext(&e)))?;

        Ok(output.datapoints().iter().map(to_data_point).collect())
    }
}

/// Translate a query into a `GetMetricStatistics` request.
///
/// A standard statistic goes into `Statistics`, a percentile into `ExtendedStatistics`.
fn build_request(client: &Client, query: &MetricQuery) -> Result<GetMetricStatisticsFluentBuilder> {
    let period = i32::try_from(query.window.period_secs()).into_app_err("period does not fit CloudWatch limits")?;

    let dimensions = query
        .dimensions
        .iter()
        .map(|d| Dimension::builder().name(d.name()).value(d.value()).build())
        .collect();

    let request = client
        .get_metric_statistics()
        .namespace(&query.namespace)
        .metric_name(&query.metric)
        .set_dimensions(Some(dimensions))
        .start_time(to_aws_time(query.window.start()))
        .end_time(to_aws_time(query.window.end()))
        .period(period);

    Ok(match &query.statistic {
        StatisticSpec::Standard(kind) => request.statistics(Statistic::from(kind.as_ref())),
        StatisticSpec::Percentile(label) => request.extended_statistics(label),
    })
}

fn to_aws_time(instant: DateTime<Utc>) -> AwsDateTime {
    AwsDateTime::from_millis(instant.timestamp_millis())
}

/// Convert an SDK data point. A missing or unrepresentable timestamp counts as the oldest.
fn to_data_point(dp: &Datapoint) -> DataPoint {
    let timestamp = dp
        .timestamp()
        .and_then(|t| t.to_millis().ok())
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    DataPoint {
        timestamp,
        sample_count: dp.sample_count(),
        average: dp.average(),
        sum: dp.sum(),
        minimum: dp.minimum(),
        maximum: dp.maximum(),
        extended: dp
            .extended_statistics()
            .map(|stats| stats.iter().map(|(label, value)| (label.clone(), *value)).collect())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{TimeWindow, classify, parse_dimensions, resolve};
    use chrono::TimeZone;

    fn offline_client() -> Client {
        let config = aws_sdk_cloudwatch::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .build();
        Client::from_conf(config)
    }

    fn window() -> TimeWindow {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        resolve("10m", "1m", "", now).unwrap().with_period(300).unwrap()
    }

    fn query(stat: &str) -> MetricQuery {
        MetricQuery {
            namespace: "AWS/ELB".into(),
            metric: "Latency".into(),
            dimensions: parse_dimensions("Name=LoadBalancerName,Value=front Name=AvailabilityZone,Value=eu-west-1a").unwrap(),
            window: window(),
            statistic: classify(stat).unwrap(),
        }
    }

    #[test]
    fn test_request_for_standard_statistic() {
        let request = build_request(&offline_client(), &query("Average")).unwrap();
        let input = request.as_input();

        assert_eq!(input.get_statistics().as_deref(), Some([Statistic::Average].as_slice()));
        assert_eq!(input.get_extended_statistics(), &None);
    }

    #[test]
    fn test_request_for_percentile() {
        let request = build_request(&offline_client(), &query("p99.5")).unwrap();
        let input = request.as_input();

        assert_eq!(input.get_extended_statistics().as_deref(), Some(["p99.5".to_string()].as_slice()));
        assert_eq!(input.get_statistics(), &None);
    }

    #[test]
    fn test_request_carries_metric_dimensions_and_window() {
        let request = build_request(&offline_client(), &query("Sum")).unwrap();
        let input = request.as_input();

        assert_eq!(input.get_namespace().as_deref(), Some("AWS/ELB"));
        assert_eq!(input.get_metric_name().as_deref(), Some("Latency"));
        assert_eq!(input.get_period(), &Some(300));
        assert_eq!(input.get_start_time(), &Some(to_aws_time(window().start())));
        assert_eq!(input.get_end_time(), &Some(to_aws_time(window().end())));

        let dimensions: Vec<_> = input
            .get_dimensions()
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|d| (d.name().unwrap_or_default(), d.value().unwrap_or_default()))
            .collect();
        assert_eq!(dimensions, [("LoadBalancerName", "front"), ("AvailabilityZone", "eu-west-1a")]);
    }

    #[test]
    fn test_every_standard_statistic_maps_to_a_known_sdk_value() {
        for stat in ["SampleCount", "Average", "Sum", "Minimum", "Maximum"] {
            let request = build_request(&offline_client(), &query(stat)).unwrap();
            let statistics = request.as_input().get_statistics().clone().unwrap();
            assert_eq!(statistics.len(), 1);
            assert_eq!(statistics[0].as_str(), stat);
            assert!(Statistic::values().contains(&stat), "{stat}");
        }
    }

    #[test]
    fn test_to_aws_time_keeps_millis() {
        let instant = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
        assert_eq!(to_aws_time(instant).to_millis().unwrap(), 1_700_000_123_456);
    }

    #[test]
    fn test_to_data_point_standard_fields() {
        let dp = Datapoint::builder()
            .timestamp(AwsDateTime::from_secs(1_700_000_000))
            .sum(25.0)
            .average(2.5)
            .build();

        let converted = to_data_point(&dp);

        assert_eq!(converted.timestamp, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        assert_eq!(converted.sum, Some(25.0));
        assert_eq!(converted.average, Some(2.5));
        assert_eq!(converted.minimum, None);
        assert!(converted.extended.is_empty());
    }

    #[test]
    fn test_to_data_point_extended_statistics() {
        let dp = Datapoint::builder()
            .timestamp(AwsDateTime::from_secs(1_700_000_000))
            .extended_statistics("p99", 42.0)
            .extended_statistics("p50", 7.0)
            .build();

        let converted = to_data_point(&dp);

        assert_eq!(converted.extended.get("p99"), Some(&42.0));
        assert_eq!(converted.extended.get("p50"), Some(&7.0));
    }

    #[test]
    fn test_to_data_point_without_timestamp_is_oldest() {
        let dp = Datapoint::builder().sum(1.0).build();
        assert_eq!(to_data_point(&dp).timestamp, DateTime::<Utc>::MIN_UTC);
    }
}
