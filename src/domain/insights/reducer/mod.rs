//! Reducers turning one raw insights/graph response into a flat metric mapping.
//!
//! Every reducer is total: absent bodies, missing `data` and partial entries
//! produce an empty (or shorter) result, never an error.

pub mod breakdown_reducer;
pub mod engagement_reducer;
pub mod scalar_reducer;
pub mod series_reducer;
pub mod total_value_reducer;

use serde_json::Value;

use crate::domain::common::model::MetricScalarMap;

pub use breakdown_reducer::reduce_breakdown;
pub use engagement_reducer::reduce_engagement;
pub use scalar_reducer::reduce_scalar;
pub use series_reducer::{merge_series, reduce_series};
pub use total_value_reducer::reduce_total_value;

/// Reducers that yield one number per metric.
///
/// Chosen by the operation that issued the request, never by looking at the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarReducer {
    /// `values[0].value` of each entry.
    Lifetime,
    /// `total_value.value` of each entry (`metric_type=total_value` requests).
    TotalValue,
    /// Flat `{metric: {summary: {total_count}}}` objects for the listed metrics.
    Engagement(Vec<String>),
}

impl ScalarReducer {
    pub fn reduce(&self, body: Option<&Value>) -> MetricScalarMap {
        match self {
            ScalarReducer::Lifetime => reduce_scalar(body),
            ScalarReducer::TotalValue => reduce_total_value(body),
            ScalarReducer::Engagement(metrics) => reduce_engagement(body, metrics),
        }
    }
}

/// Entries of `body.data`, empty when the body or the array is missing.
pub(crate) fn data_entries(body: Option<&Value>) -> impl Iterator<Item = &Value> {
    body.and_then(|b| b.get("data"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

pub(crate) fn entry_name(entry: &Value) -> Option<&str> {
    entry.get("name").and_then(Value::as_str)
}
