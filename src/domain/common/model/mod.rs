//! Shared domain types (TimeRange, metric maps, periods, breakdowns)

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// end_time → value for one metric.
pub type MetricSeries = BTreeMap<String, f64>;

/// metric name → its series.
pub type MetricSeriesMap = BTreeMap<String, MetricSeries>;

/// metric name → single value (lifetime, per-post, per-story and total-value metrics).
pub type MetricScalarMap = BTreeMap<String, f64>;

/// caller key (post id, media id, bucket timestamp) → reduced result.
pub type BatchKeyedResult<T> = BTreeMap<String, T>;

/// A closed time span on whole seconds. `since <= until` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    since: DateTime<Utc>,
    until: DateTime<Utc>,
}

impl TimeRange {
    /// Builds a range, swapping the endpoints when they arrive reversed.
    ///
    /// Endpoints are truncated to whole seconds, the resolution sent on the wire.
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        let (since, until) = (since.trunc_subsecs(0), until.trunc_subsecs(0));
        if since <= until {
            Self { since, until }
        } else {
            Self {
                since: until,
                until: since,
            }
        }
    }

    pub fn since(&self) -> DateTime<Utc> {
        self.since
    }

    pub fn until(&self) -> DateTime<Utc> {
        self.until
    }

    pub fn span(&self) -> Duration {
        self.until - self.since
    }

    /// Span in (possibly fractional) days.
    pub fn span_days(&self) -> f64 {
        self.span().num_seconds() as f64 / 86_400.0
    }

    /// Key used for a chunk inside a batch: `{since}_{until}` in unix seconds.
    pub fn bucket_key(&self) -> String {
        format!("{}_{}", self.since.timestamp(), self.until.timestamp())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightsPeriod {
    Day,
    Week,
    Days28,
    Month,
    Lifetime,
    TotalOverRange,
}

impl InsightsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightsPeriod::Day => "day",
            InsightsPeriod::Week => "week",
            InsightsPeriod::Days28 => "days_28",
            InsightsPeriod::Month => "month",
            InsightsPeriod::Lifetime => "lifetime",
            InsightsPeriod::TotalOverRange => "total_over_range",
        }
    }
}

impl fmt::Display for InsightsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `metric_type` request variant; decides which reducer reads the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    TotalValue,
    TimeSeries,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::TotalValue => "total_value",
            MetricType::TimeSeries => "time_series",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakdownResult {
    #[serde(default)]
    pub dimension_values: Vec<String>,
    pub value: f64,
}

/// A metric reported as dimension-tagged sub-values (city, navigation action, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricBreakdown {
    #[serde(default)]
    pub dimension_keys: Vec<String>,
    #[serde(default)]
    pub results: Vec<BreakdownResult>,
}

impl MetricBreakdown {
    pub fn is_empty(&self) -> bool {
        self.dimension_keys.is_empty() && self.results.is_empty()
    }
}
