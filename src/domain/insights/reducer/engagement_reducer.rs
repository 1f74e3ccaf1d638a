use serde_json::Value;

use crate::domain::common::model::MetricScalarMap;

/// Reads `{metric: {summary: {total_count}}}` for each requested metric.
///
/// `shares` is reported as `{count}` and defaults to 0 when absent; every other
/// metric missing from the reply is left out.
pub fn reduce_engagement(body: Option<&Value>, requested: &[String]) -> MetricScalarMap {
    let mut result = MetricScalarMap::new();

    let Some(body) = body.filter(|b| b.as_object().is_some_and(|o| !o.is_empty())) else {
        return result;
    };

    for metric in requested {
        if metric == "shares" {
            let count = body
                .get("shares")
                .and_then(|s| s.get("count"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            result.insert(metric.clone(), count);
            continue;
        }

        let total = body
            .get(metric.as_str())
            .and_then(|m| m.get("summary"))
            .and_then(|s| s.get("total_count"))
            .and_then(Value::as_f64);

        if let Some(total) = total {
            result.insert(metric.clone(), total);
        }
    }

    result
}
