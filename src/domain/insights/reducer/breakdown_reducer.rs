use serde_json::Value;

use crate::domain::common::model::{BreakdownResult, MetricBreakdown};
use crate::domain::insights::reducer::data_entries;

/// Unwraps `data[0].total_value.breakdowns[..]` into a [`MetricBreakdown`].
///
/// Picks the breakdown listing `dimension_key`, else the first one. Results
/// without a numeric `value` are dropped.
pub fn reduce_breakdown(body: Option<&Value>, dimension_key: &str) -> MetricBreakdown {
    let Some(breakdowns) = data_entries(body)
        .next()
        .and_then(|entry| entry.get("total_value"))
        .and_then(|total| total.get("breakdowns"))
        .and_then(Value::as_array)
    else {
        return MetricBreakdown::default();
    };

    let chosen = breakdowns
        .iter()
        .find(|b| string_list(b.get("dimension_keys")).iter().any(|k| k == dimension_key))
        .or_else(|| breakdowns.first());

    let Some(breakdown) = chosen else {
        return MetricBreakdown::default();
    };

    let results = breakdown
        .get("results")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|row| {
            Some(BreakdownResult {
                dimension_values: string_list(row.get("dimension_values")),
                value: row.get("value")?.as_f64()?,
            })
        })
        .collect();

    MetricBreakdown {
        dimension_keys: string_list(breakdown.get("dimension_keys")),
        results,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}
