//! Failure classes of a single metric query.

use thiserror::Error;

/// Every way a query can fail, each with its own process exit code.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("at least --namespace, --dimensions, --metric, --stat, --region and --no-data-value must be provided (missing: {})", .0.join(", "))]
    MissingRequiredFlag(Vec<&'static str>),

    #[error("no-data value '{0}' is not an integer")]
    BadNoDataValue(String),

    #[error("dimension pair '{0}' does not match the CloudWatch shorthand format 'Name=<name>,Value=<value>', see https://docs.aws.amazon.com/cli/latest/reference/cloudwatch/get-metric-statistics.html")]
    MalformedDimension(String),

    #[error("unknown CloudWatch statistic '{0}', see https://docs.aws.amazon.com/AmazonCloudWatch/latest/monitoring/cloudwatch_concepts.html#Statistic")]
    UnknownStatistic(String),

    #[error("invalid duration '{value}': {reason}")]
    BadDuration { value: String, reason: String },

    #[error("metrics query failed: {0:#}")]
    CollaboratorFailure(ohno::AppError),

    #[error("CloudWatch returned a data point without a value for statistic '{0}'")]
    MissingValue(String),

    #[error("CloudWatch returned extended statistics without the requested percentile '{0}'")]
    InconsistentPercentile(String),

    #[error("invalid configuration: {0:#}")]
    BadConfig(ohno::AppError),

    #[error("writing the result: {0}")]
    OutputFailure(std::io::Error),
}

impl QueryError {
    /// Process exit code reported for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::MissingRequiredFlag(_) => 3,
            Self::UnknownStatistic(_) => 4,
            Self::MalformedDimension(_) => 5,
            Self::BadDuration { .. } => 6,
            Self::BadNoDataValue(_) => 7,
            Self::CollaboratorFailure(_) => 8,
            Self::MissingValue(_) => 9,
            Self::InconsistentPercentile(_) => 10,
            Self::BadConfig(_) => 11,
            Self::OutputFailure(_) => 12,
        }
    }

    pub(crate) fn bad_duration(value: &str, reason: impl Into<String>) -> Self {
        Self::BadDuration {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
