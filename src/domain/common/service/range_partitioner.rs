use chrono::Duration;
use tracing::debug;

use crate::domain::common::model::TimeRange;

/// Splits `range` into contiguous windows of at most `max_days` days.
///
/// Spans up to `max_days` come back untouched. Longer spans yield exactly
/// `ceil(span / max_days)` windows walking forward from `since`; the last one
/// is clamped to `until`.
pub fn partition(range: &TimeRange, max_days: i64) -> Vec<TimeRange> {
    let max_days = max_days.max(1);
    let step = Duration::days(max_days);
    let span = range.span();

    if span <= step {
        return vec![*range];
    }

    let span_secs = span.num_seconds();
    let step_secs = step.num_seconds();
    let count = ((span_secs + step_secs - 1) / step_secs) as usize;

    let mut intervals = Vec::with_capacity(count);
    let mut since = range.since();

    while intervals.len() < count {
        let until = (since + step).min(range.until());
        intervals.push(TimeRange::new(since, until));
        since = until;
    }

    debug!(
        "Partitioned {:.2} day(s) into {} window(s) of <= {} day(s)",
        range.span_days(),
        intervals.len(),
        max_days
    );
    intervals
}

/// Groups `items` into chunks of at most `limit` for batch dispatch, keeping order.
pub fn chunk_for_batch<T: Clone>(items: &[T], limit: usize) -> Vec<Vec<T>> {
    items
        .chunks(limit.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}
