use std::collections::BTreeSet;

use anyhow::Result;
use tracing::{debug, warn};

use crate::core::client::{graph_params, join_fields, GraphParams, GraphRequest};
use crate::domain::common::model::{
    BatchKeyedResult, InsightsPeriod, MetricBreakdown, MetricScalarMap, MetricSeriesMap,
    MetricType, TimeRange,
};
use crate::domain::common::service::{
    dispatch_intervals, dispatch_keyed, ok_body, send_single, GraphContext,
};
use crate::domain::insights::reducer::{merge_series, reduce_breakdown, reduce_series, ScalarReducer};
use crate::domain::insights::service::{insights_path, now_param};

/// Daily/lifetime series for `metrics`, merged across every partition window of `range`.
///
/// Without a range the provider's default window ending now is used.
pub async fn get_page_insights_metrics_data(
    ctx: &GraphContext,
    page_id: &str,
    metrics: &[&str],
    range: Option<TimeRange>,
    period: Option<InsightsPeriod>,
) -> Result<MetricSeriesMap> {
    let path = insights_path(page_id);
    let mut params = graph_params([("metric", join_fields(metrics))]);
    if let Some(period) = period {
        params.insert("period".into(), period.to_string());
    }

    let responses = match range {
        Some(range) => dispatch_intervals(ctx, &path, &params, &range).await?,
        None => {
            params.insert("until".into(), now_param());
            vec![send_single(ctx, &GraphRequest::get(path, params)).await?]
        }
    };

    let mut series = MetricSeriesMap::new();
    for response in responses {
        if let Some(body) = ok_body(response, "Page insights") {
            merge_series(&mut series, reduce_series(Some(&body)));
        }
    }

    debug!("Page {} insights: {} metric series", page_id, series.len());
    Ok(series)
}

/// Lifetime audience breakdown (city, country, age, ...) of a single metric.
pub async fn get_page_insights_audience_data(
    ctx: &GraphContext,
    page_id: &str,
    metric: &str,
    breakdown: &str,
) -> Result<MetricBreakdown> {
    let params = graph_params([
        ("metric", metric),
        ("period", InsightsPeriod::Lifetime.as_str()),
        ("metric_type", MetricType::TotalValue.as_str()),
        ("breakdown", breakdown),
    ]);

    let response = send_single(ctx, &GraphRequest::get(insights_path(page_id), params)).await?;

    Ok(ok_body(response, "Audience insights")
        .map(|body| reduce_breakdown(Some(&body), breakdown))
        .unwrap_or_default())
}

pub async fn get_page_insights_for_total_value_metrics(
    ctx: &GraphContext,
    page_id: &str,
    metrics: &[&str],
    period: InsightsPeriod,
    range: TimeRange,
) -> Result<MetricScalarMap> {
    let request = GraphRequest::get(insights_path(page_id), total_value_params(metrics, period, &range));
    let response = send_single(ctx, &request).await?;

    Ok(ok_body(response, "Total value insights")
        .map(|body| ScalarReducer::TotalValue.reduce(Some(&body)))
        .unwrap_or_default())
}

/// Total values per bucket, keyed by the bucket's `since` in unix seconds.
///
/// Bucket starts must be unique: buckets sharing a `since` share one key, and
/// the last of them in `buckets` order wins.
pub async fn get_page_insights_batch_total_value_metrics(
    ctx: &GraphContext,
    page_id: &str,
    metrics: &[&str],
    period: InsightsPeriod,
    buckets: &[TimeRange],
) -> Result<BatchKeyedResult<MetricScalarMap>> {
    let starts: BTreeSet<i64> = buckets.iter().map(|b| b.since().timestamp()).collect();
    if starts.len() < buckets.len() {
        warn!(
            "{} bucket(s) share a start with another; only the last of each is kept",
            buckets.len() - starts.len()
        );
    }

    let requests = buckets
        .iter()
        .map(|bucket| {
            (
                bucket.since().timestamp().to_string(),
                GraphRequest::get(insights_path(page_id), total_value_params(metrics, period, bucket)),
            )
        })
        .collect();

    dispatch_keyed(ctx, requests, |body| ScalarReducer::TotalValue.reduce(body)).await
}

fn total_value_params(
    metrics: &[&str],
    period: InsightsPeriod,
    range: &TimeRange,
) -> GraphParams {
    graph_params([
        ("metric", join_fields(metrics)),
        ("metric_type", MetricType::TotalValue.to_string()),
        ("period", period.to_string()),
        ("since", range.since().timestamp().to_string()),
        ("until", range.until().timestamp().to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::mock_graph_client::MockGraphClient;
    use crate::core::client::GraphResponse;
    use crate::domain::common::service::DispatchLimits;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::{json, Value};
    use std::sync::Arc;

    const PAGE_ID: &str = "2222222";

    fn ctx(client: &Arc<MockGraphClient>) -> GraphContext {
        GraphContext::new(client.clone(), DispatchLimits::default())
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn daily(name: &str, period: &str, points: &[(&str, i64)]) -> Value {
        let values: Vec<Value> = points
            .iter()
            .map(|(end_time, value)| json!({ "end_time": end_time, "value": value }))
            .collect();
        json!({ "name": name, "period": period, "values": values })
    }

    fn total_value_body() -> Value {
        json!({
            "data": [
                { "name": "page_impressions", "period": "day", "total_value": { "value": 500 } },
                { "name": "page_engaged_users", "period": "day", "total_value": { "value": 100 } }
            ]
        })
    }

    #[tokio::test]
    async fn without_range_sends_one_request_up_to_now() {
        let body = json!({
            "data": [
                daily("page_posts_impressions", "day", &[("2017-05-01T07:00:00+0000", 11), ("2017-05-02T07:00:00+0000", 22)]),
                daily("page_posts_impressions", "week", &[("2017-05-01T07:00:00+0000", 99)])
            ]
        });
        let client = Arc::new(MockGraphClient::new().with_response(GraphResponse::ok(body)));

        let series = get_page_insights_metrics_data(
            &ctx(&client),
            PAGE_ID,
            &["page_posts_impressions", "page_fans"],
            None,
            None,
        )
        .await
        .unwrap();

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/2222222/insights");
        assert_eq!(requests[0].param("metric"), Some("page_posts_impressions,page_fans"));
        assert!(requests[0].param("until").is_some());
        assert_eq!(requests[0].param("since"), None);
        assert_eq!(requests[0].param("period"), None);

        assert_eq!(series.len(), 1);
        assert_eq!(series["page_posts_impressions"]["2017-05-01T07:00:00+0000"], 11.0);
        assert_eq!(series["page_posts_impressions"]["2017-05-02T07:00:00+0000"], 22.0);
    }

    #[tokio::test]
    async fn period_is_forwarded_when_given() {
        let client = Arc::new(MockGraphClient::new().with_response(GraphResponse::ok(json!({ "data": [] }))));

        get_page_insights_metrics_data(&ctx(&client), PAGE_ID, &["page_fans"], None, Some(InsightsPeriod::Days28))
            .await
            .unwrap();

        assert_eq!(client.recorded_requests()[0].param("period"), Some("days_28"));
    }

    #[tokio::test]
    async fn short_range_uses_exact_since_and_until() {
        let client = Arc::new(MockGraphClient::new().with_response(GraphResponse::ok(json!({ "data": [] }))));
        let range = TimeRange::new(ts(1_493_826_552), ts(1_496_418_552));

        let series = get_page_insights_metrics_data(&ctx(&client), PAGE_ID, &["page_fans"], Some(range), None)
            .await
            .unwrap();

        assert!(series.is_empty());
        let requests = client.recorded_requests();
        assert_eq!(requests[0].param("since"), Some("1493826552"));
        assert_eq!(requests[0].param("until"), Some("1496418552"));
        assert!(client.recorded_batches().is_empty());
    }

    #[tokio::test]
    async fn forty_one_days_merge_two_batched_chunks() {
        let first = json!({ "data": [daily("page_fans", "day", &[("2024-01-02T08:00:00+0000", 10), ("2024-01-03T08:00:00+0000", 11)])] });
        let second = json!({ "data": [daily("page_fans", "day", &[("2024-02-01T08:00:00+0000", 40), ("2024-02-10T08:00:00+0000", 41)])] });
        let client = Arc::new(
            MockGraphClient::new().with_batch(vec![GraphResponse::ok(first), GraphResponse::ok(second)]),
        );
        let until = Utc.with_ymd_and_hms(2024, 2, 11, 0, 0, 0).unwrap();
        let range = TimeRange::new(until - Duration::days(41), until);

        let series = get_page_insights_metrics_data(&ctx(&client), PAGE_ID, &["page_fans"], Some(range), None)
            .await
            .unwrap();

        let batches = client.recorded_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);

        let fans = &series["page_fans"];
        assert_eq!(fans.len(), 4);
        assert_eq!(fans["2024-01-02T08:00:00+0000"], 10.0);
        assert_eq!(fans["2024-02-10T08:00:00+0000"], 41.0);
    }

    #[tokio::test]
    async fn null_and_error_chunks_contribute_nothing() {
        let good = json!({ "data": [daily("page_fans", "day", &[("2024-01-02T08:00:00+0000", 10)])] });
        let client = Arc::new(MockGraphClient::new().with_batch(vec![
            GraphResponse::new(200, Some(Value::Null)),
            GraphResponse::new(500, Some(json!({ "error": { "message": "boom" } }))),
            GraphResponse::ok(good),
        ]));
        let until = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let range = TimeRange::new(until - Duration::days(75), until);

        let series = get_page_insights_metrics_data(&ctx(&client), PAGE_ID, &["page_fans"], Some(range), None)
            .await
            .unwrap();

        assert_eq!(series["page_fans"].len(), 1);
    }

    #[tokio::test]
    async fn empty_data_yields_empty_result() {
        let client = Arc::new(MockGraphClient::new().with_response(GraphResponse::ok(json!({ "data": [] }))));

        let series = get_page_insights_metrics_data(&ctx(&client), PAGE_ID, &["page_fans"], None, None)
            .await
            .unwrap();

        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let client = Arc::new(MockGraphClient::failing("connection reset"));

        let result = get_page_insights_metrics_data(&ctx(&client), PAGE_ID, &["page_fans"], None, None).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn audience_breakdown_is_unwrapped() {
        let body = json!({
            "data": [{
                "name": "follower_demographics",
                "period": "lifetime",
                "total_value": {
                    "breakdowns": [{
                        "dimension_keys": ["city"],
                        "results": [
                            { "dimension_values": ["Sydney, New South Wales"], "value": 631 },
                            { "dimension_values": ["London, England"], "value": 1142 }
                        ]
                    }]
                }
            }]
        });
        let client = Arc::new(MockGraphClient::new().with_response(GraphResponse::ok(body)));

        let audience = get_page_insights_audience_data(&ctx(&client), PAGE_ID, "follower_demographics", "city")
            .await
            .unwrap();

        assert_eq!(audience.dimension_keys, vec!["city".to_string()]);
        assert_eq!(audience.results[1].value, 1142.0);

        let request = &client.recorded_requests()[0];
        assert_eq!(request.param("period"), Some("lifetime"));
        assert_eq!(request.param("metric_type"), Some("total_value"));
        assert_eq!(request.param("breakdown"), Some("city"));
    }

    #[tokio::test]
    async fn audience_is_empty_without_data() {
        let client = Arc::new(
            MockGraphClient::new()
                .with_response(GraphResponse::ok(json!({ "data": [] })))
                .with_response(GraphResponse::new(400, Some(json!({ "error": { "message": "bad metric" } })))),
        );
        let ctx = ctx(&client);

        let empty = get_page_insights_audience_data(&ctx, PAGE_ID, "follower_demographics", "city")
            .await
            .unwrap();
        let failed = get_page_insights_audience_data(&ctx, PAGE_ID, "follower_demographics", "city")
            .await
            .unwrap();

        assert!(empty.is_empty());
        assert!(failed.is_empty());
    }

    #[tokio::test]
    async fn total_value_metrics_send_metric_type() {
        let client = Arc::new(MockGraphClient::new().with_response(GraphResponse::ok(total_value_body())));
        let range = TimeRange::new(ts(1_493_826_552), ts(1_496_418_552));

        let totals = get_page_insights_for_total_value_metrics(
            &ctx(&client),
            PAGE_ID,
            &["page_impressions", "page_engaged_users"],
            InsightsPeriod::Day,
            range,
        )
        .await
        .unwrap();

        assert_eq!(totals["page_impressions"], 500.0);
        assert_eq!(totals["page_engaged_users"], 100.0);

        let request = &client.recorded_requests()[0];
        assert_eq!(request.param("metric"), Some("page_impressions,page_engaged_users"));
        assert_eq!(request.param("metric_type"), Some("total_value"));
        assert_eq!(request.param("period"), Some("day"));
        assert_eq!(request.param("since"), Some("1493826552"));
        assert_eq!(request.param("until"), Some("1496418552"));
    }

    #[tokio::test]
    async fn total_value_metrics_empty_on_null_body() {
        let client = Arc::new(MockGraphClient::new().with_response(GraphResponse::new(200, None)));
        let range = TimeRange::new(ts(1_493_826_552), ts(1_496_418_552));

        let totals = get_page_insights_for_total_value_metrics(&ctx(&client), PAGE_ID, &["page_impressions"], InsightsPeriod::Day, range)
            .await
            .unwrap();

        assert!(totals.is_empty());
    }

    #[tokio::test]
    async fn batch_total_values_split_at_fifty_and_key_by_since() {
        let client = Arc::new(MockGraphClient::new().with_batch_responder(|_| GraphResponse::ok(total_value_body())));
        let buckets: Vec<TimeRange> = (0..51)
            .map(|day| {
                let since = ts(1_493_826_552 + day * 86_400);
                TimeRange::new(since, since + Duration::days(1))
            })
            .collect();

        let result = get_page_insights_batch_total_value_metrics(
            &ctx(&client),
            PAGE_ID,
            &["page_impressions", "page_engaged_users"],
            InsightsPeriod::Day,
            &buckets,
        )
        .await
        .unwrap();

        let sizes: Vec<usize> = client.recorded_batches().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![50, 1]);
        assert_eq!(result.len(), 51);
        assert!(result.contains_key("1493826552"));
        for totals in result.values() {
            assert_eq!(totals["page_impressions"], 500.0);
            assert_eq!(totals["page_engaged_users"], 100.0);
        }
    }

    #[tokio::test]
    async fn batch_total_values_keep_empty_buckets() {
        let client = Arc::new(MockGraphClient::new().with_batch(vec![GraphResponse::ok(json!({ "data": [] }))]));
        let bucket = TimeRange::new(ts(1_493_826_552), ts(1_493_912_952));

        let result = get_page_insights_batch_total_value_metrics(&ctx(&client), PAGE_ID, &["page_impressions"], InsightsPeriod::Day, &[bucket])
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert!(result["1493826552"].is_empty());
    }

    #[tokio::test]
    async fn buckets_sharing_a_start_keep_the_last_one() {
        let client = Arc::new(MockGraphClient::new().with_batch(vec![
            GraphResponse::ok(json!({ "data": [] })),
            GraphResponse::ok(total_value_body()),
        ]));
        let since = ts(1_493_826_552);
        let buckets = [
            TimeRange::new(since, since + Duration::days(1)),
            TimeRange::new(since, since + Duration::days(7)),
        ];

        let result = get_page_insights_batch_total_value_metrics(&ctx(&client), PAGE_ID, &["page_impressions"], InsightsPeriod::Day, &buckets)
            .await
            .unwrap();

        assert_eq!(client.recorded_batches()[0].len(), 2);
        assert_eq!(result.len(), 1);
        assert_eq!(result["1493826552"]["page_impressions"], 500.0);
    }
}
