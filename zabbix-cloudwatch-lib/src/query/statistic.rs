//! Classification of the `--stat` argument.
//!
//! CloudWatch distinguishes between the five standard statistics, which come back as dedicated
//! fields on every data point, and extended statistics (percentiles), which come back in a
//! label to value map. [`classify`] is the single place where a statistic string is mapped to one
//! of the two forms; both the outbound query and the inbound result extraction go through it.

use super::QueryError;
use core::fmt::{Display, Formatter, Result as FmtResult};
use regex::Regex;
use std::sync::LazyLock;
use strum::{AsRefStr, EnumString, VariantArray};

/// Percentile labels: `p` followed by `0`..`99` with up to two fraction digits, or exactly `p100`.
static PERCENTILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^p(?:[0-9]{1,2}(?:\.[0-9]{0,2})?|100)$").expect("percentile pattern should compile"));

/// The standard CloudWatch statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, VariantArray)]
pub enum StandardStatistic {
    SampleCount,
    Average,
    Sum,
    Minimum,
    Maximum,
}

impl Display for StandardStatistic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_ref())
    }
}

/// A validated statistic, either standard or percentile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatisticSpec {
    Standard(StandardStatistic),

    /// The label exactly as given on the command line, such as `p99.5`.
    Percentile(String),
}

impl Display for StatisticSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Standard(kind) => write!(f, "{kind}"),
            Self::Percentile(label) => f.write_str(label),
        }
    }
}

/// Classify a statistic string as standard or percentile.
///
/// Depends only on `stat`, so repeated calls give identical results.
pub fn classify(stat: &str) -> Result<StatisticSpec, QueryError> {
    if let Ok(kind) = stat.parse::<StandardStatistic>() {
        return Ok(StatisticSpec::Standard(kind));
    }

    if PERCENTILE_PATTERN.is_match(stat) {
        return Ok(StatisticSpec::Percentile(stat.to_string()));
    }

    Err(QueryError::UnknownStatistic(stat.to_string()))
}
