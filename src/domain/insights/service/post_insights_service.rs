use anyhow::Result;

use crate::core::client::{graph_params, join_fields, GraphParams, GraphRequest};
use crate::domain::common::model::{BatchKeyedResult, InsightsPeriod, MetricScalarMap, MetricType};
use crate::domain::common::service::{dispatch_keyed, ok_body, send_single, GraphContext};
use crate::domain::insights::reducer::ScalarReducer;
use crate::domain::insights::service::{insights_path, now_param};

/// `comments.summary(true),likes.summary(true),...`
fn engagement_fields(metrics: &[&str]) -> String {
    metrics
        .iter()
        .map(|metric| format!("{}.summary(true)", metric))
        .collect::<Vec<_>>()
        .join(",")
}

fn engagement_reducer(metrics: &[&str]) -> ScalarReducer {
    ScalarReducer::Engagement(metrics.iter().map(|m| m.to_string()).collect())
}

fn lifetime_params(metrics: &[&str]) -> GraphParams {
    graph_params([
        ("metric", join_fields(metrics)),
        ("period", InsightsPeriod::Lifetime.to_string()),
        ("until", now_param()),
    ])
}

/// Comment/like/reaction/share counts of one page post.
pub async fn get_page_post_graph_metrics_data(
    ctx: &GraphContext,
    page_id: &str,
    post_id: &str,
    metrics: &[&str],
) -> Result<MetricScalarMap> {
    let path = format!("/{}_{}", page_id, post_id);
    let params = graph_params([("fields", engagement_fields(metrics))]);

    let response = send_single(ctx, &GraphRequest::get(path, params)).await?;

    Ok(ok_body(response, "Post engagement")
        .map(|body| engagement_reducer(metrics).reduce(Some(&body)))
        .unwrap_or_default())
}

/// Engagement counts for many posts, keyed by post id.
pub async fn get_page_batch_posts_graph_metrics_data(
    ctx: &GraphContext,
    post_ids: &[&str],
    metrics: &[&str],
) -> Result<BatchKeyedResult<MetricScalarMap>> {
    let fields = engagement_fields(metrics);
    let requests = post_ids
        .iter()
        .map(|post_id| {
            let params = graph_params([("fields", fields.as_str())]);
            (post_id.to_string(), GraphRequest::get(format!("/{}", post_id), params))
        })
        .collect();

    let reducer = engagement_reducer(metrics);
    dispatch_keyed(ctx, requests, |body| reducer.reduce(body)).await
}

/// Lifetime insights of one page post.
pub async fn get_page_post_insights_metric_data(
    ctx: &GraphContext,
    page_id: &str,
    post_id: &str,
    metrics: &[&str],
) -> Result<MetricScalarMap> {
    let path = insights_path(&format!("{}_{}", page_id, post_id));
    let response = send_single(ctx, &GraphRequest::get(path, lifetime_params(metrics))).await?;

    Ok(ok_body(response, "Post insights")
        .map(|body| ScalarReducer::Lifetime.reduce(Some(&body)))
        .unwrap_or_default())
}

/// Lifetime insights for many posts, keyed by post id.
///
/// With `metric_type = total_value` the provider's aggregate form is read instead
/// of `values[0]`.
pub async fn get_page_batch_posts_insights_metric_data(
    ctx: &GraphContext,
    post_ids: &[&str],
    metrics: &[&str],
    metric_type: Option<MetricType>,
) -> Result<BatchKeyedResult<MetricScalarMap>> {
    let mut params = lifetime_params(metrics);
    if let Some(metric_type) = metric_type {
        params.insert("metric_type".into(), metric_type.to_string());
    }

    let requests = post_ids
        .iter()
        .map(|post_id| (post_id.to_string(), GraphRequest::get(insights_path(post_id), params.clone())))
        .collect();

    let reducer = match metric_type {
        Some(MetricType::TotalValue) => ScalarReducer::TotalValue,
        _ => ScalarReducer::Lifetime,
    };
    dispatch_keyed(ctx, requests, |body| reducer.reduce(body)).await
}
