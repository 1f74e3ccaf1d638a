use serde_json::Value;
use tracing::debug;

use crate::domain::common::model::{MetricSeries, MetricSeriesMap};
use crate::domain::insights::reducer::{data_entries, entry_name};

/// Periods kept by [`reduce_series`]; anything else (e.g. `week`) is dropped.
pub const SERIES_PERIODS: [&str; 2] = ["day", "lifetime"];

/// Maps `data[*]` to `name → {end_time → value}` for daily and lifetime entries.
///
/// Values without both `end_time` and a numeric `value` are skipped.
pub fn reduce_series(body: Option<&Value>) -> MetricSeriesMap {
    let mut result = MetricSeriesMap::new();

    for entry in data_entries(body) {
        let Some(name) = entry_name(entry) else {
            continue;
        };
        let period = entry.get("period").and_then(Value::as_str).unwrap_or_default();
        if !SERIES_PERIODS.iter().any(|p| *p == period) {
            continue;
        }

        let series: MetricSeries = entry
            .get("values")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|point| {
                let end_time = point.get("end_time")?.as_str()?;
                let value = point.get("value")?.as_f64()?;
                Some((end_time.to_string(), value))
            })
            .collect();

        result.insert(name.to_string(), series);
    }

    result
}

/// Unions `chunk` into `acc` per metric. On a repeated end_time the chunk wins.
pub fn merge_series(acc: &mut MetricSeriesMap, chunk: MetricSeriesMap) {
    for (name, series) in chunk {
        let target = acc.entry(name).or_default();
        for (end_time, value) in series {
            if let Some(previous) = target.insert(end_time.clone(), value) {
                debug!(
                    "end_time {} reported by two windows ({} replaced by {})",
                    end_time, previous, value
                );
            }
        }
    }
}
