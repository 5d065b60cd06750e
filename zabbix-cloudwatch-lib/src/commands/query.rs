use super::config::Config;
use crate::cloud::MetricsSource;
use crate::query::{MetricQuery, QueryError, QueryResult, classify, parse_dimensions, resolve_with_defaults, select};
use chrono::{DateTime, Utc};
use clap::Args;
use core::time::Duration;

/// Arguments describing the metric to fetch
#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// CloudWatch region to query (mandatory)
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Namespace of the target metric, such as `AWS/EC2` (mandatory)
    #[arg(long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Name of the metric to collect (mandatory)
    #[arg(long, value_name = "NAME")]
    pub metric: Option<String>,

    /// Statistic to return: SampleCount, Average, Sum, Minimum, Maximum, or a percentile like p99.5 (mandatory)
    #[arg(long, value_name = "STAT")]
    pub stat: Option<String>,

    /// Dimensions to filter on, in shorthand syntax: "Name=a,Value=b Name=c,Value=d" (mandatory)
    #[arg(long, value_name = "SHORTHAND")]
    pub dimensions: Option<String>,

    /// Integer printed when the window holds no data (mandatory)
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    pub no_data_value: Option<String>,

    /// Sampling period in seconds [default: 60]
    #[arg(long, value_name = "SECONDS")]
    pub period: Option<u32>,

    /// Lookback span, like "300s" or "5m"; ignored when --window is given [default: 300s]
    #[arg(long, value_name = "SPAN")]
    pub duration: Option<String>,

    /// How long before now the window ends; ignored when --window is given [default: 300s]
    #[arg(long, value_name = "SPAN")]
    pub delay: Option<String>,

    /// Window as "duration[:delay]", like "300s:300s"; a missing delay means 300s
    #[arg(long, value_name = "DURATION[:DELAY]", default_value = "")]
    pub window: String,

    /// Role to assume before querying, like arn:aws:iam::123456789012:role/monitoring
    #[arg(long, value_name = "ARN")]
    pub role_arn: Option<String>,
}

/// Where and how to reach the metrics backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub region: String,
    pub role_arn: Option<String>,
    pub request_timeout: Duration,
}

/// A fully validated invocation, ready to run
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub connection: Connection,
    pub query: MetricQuery,
    pub no_data: i64,
}

impl QueryArgs {
    /// Validate the arguments and build the query they describe.
    ///
    /// Checks run in a fixed order: mandatory flags, the no-data value, dimensions, the time
    /// window, then the statistic. The first failure wins.
    pub fn prepare(&self, config: &Config, now: DateTime<Utc>) -> Result<Invocation, QueryError> {
        let [region, namespace, metric, stat, dimensions, no_data] = self.required()?;

        let no_data = no_data
            .parse::<i64>()
            .map_err(|_e| QueryError::BadNoDataValue(no_data.to_string()))?;

        let dimensions = parse_dimensions(dimensions)?;

        let window = resolve_with_defaults(
            self.duration.as_deref().unwrap_or_default(),
            self.delay.as_deref().unwrap_or_default(),
            &self.window,
            now,
            config.window_defaults(),
        )?
        .with_period(self.period.unwrap_or(config.period))?;

        let statistic = classify(stat)?;

        log::debug!(
            "querying {namespace}/{metric} {statistic} from {} to {} every {}s",
            window.start(),
            window.end(),
            window.period_secs()
        );

        Ok(Invocation {
            connection: Connection {
                region: region.to_string(),
                role_arn: self.role_arn.clone().filter(|arn| !arn.is_empty()),
                request_timeout: config.request_timeout,
            },
            query: MetricQuery {
                namespace: namespace.to_string(),
                metric: metric.to_string(),
                dimensions,
                window,
                statistic,
            },
            no_data,
        })
    }

    /// The mandatory flags, in declaration order. Empty values count as missing.
    fn required(&self) -> Result<[&str; 6], QueryError> {
        let flags = [
            ("--region", &self.region),
            ("--namespace", &self.namespace),
            ("--metric", &self.metric),
            ("--stat", &self.stat),
            ("--dimensions", &self.dimensions),
            ("--no-data-value", &self.no_data_value),
        ];

        let missing: Vec<_> = flags
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(flag, _)| *flag)
            .collect();

        if !missing.is_empty() {
            return Err(QueryError::MissingRequiredFlag(missing));
        }

        Ok(flags.map(|(_, value)| value.as_deref().unwrap_or_default()))
    }
}

/// Run a prepared query and pick the value to report.
pub async fn execute<S: MetricsSource>(source: &S, invocation: &Invocation) -> Result<QueryResult, QueryError> {
    let data_points = source
        .fetch(&invocation.query)
        .await
        .map_err(QueryError::CollaboratorFailure)?;

    log::debug!("received {} data point(s)", data_points.len());

    select(&data_points, &invocation.query.statistic, invocation.no_data)
}
