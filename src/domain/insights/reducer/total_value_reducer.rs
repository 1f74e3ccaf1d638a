use serde_json::Value;

use crate::domain::common::model::MetricScalarMap;
use crate::domain::insights::reducer::{data_entries, entry_name};

/// Maps `metric_type=total_value` entries to `name → total_value.value`.
///
/// Post-level replies sometimes flatten `total_value` to a bare number; both
/// forms are read.
pub fn reduce_total_value(body: Option<&Value>) -> MetricScalarMap {
    data_entries(body)
        .filter_map(|entry| {
            let name = entry_name(entry)?;
            let total = entry.get("total_value")?;
            let value = total
                .get("value")
                .and_then(Value::as_f64)
                .or_else(|| total.as_f64())?;
            Some((name.to_string(), value))
        })
        .collect()
}
