use serde_json::Value;

use crate::domain::common::model::MetricScalarMap;
use crate::domain::insights::reducer::{data_entries, entry_name};

/// Maps lifetime entries to `name → values[0].value`.
pub fn reduce_scalar(body: Option<&Value>) -> MetricScalarMap {
    data_entries(body)
        .filter_map(|entry| {
            let name = entry_name(entry)?;
            let value = entry.get("values")?.get(0)?.get("value")?.as_f64()?;
            Some((name.to_string(), value))
        })
        .collect()
}
