use anyhow::Result;

use crate::core::client::{graph_params, join_fields, GraphRequest};
use crate::domain::common::model::{MetricBreakdown, MetricScalarMap, MetricType};
use crate::domain::common::service::{send_single, warn_provider_error, GraphContext};
use crate::domain::insights::reducer::{reduce_breakdown, ScalarReducer};
use crate::domain::insights::service::insights_path;

const NAVIGATION_METRIC: &str = "navigation";
const NAVIGATION_BREAKDOWN: &str = "story_navigation_action_type";

/// Lifetime insights of one story. `None` when the provider rejects the call.
pub async fn get_instagram_story_insights(
    ctx: &GraphContext,
    story_id: &str,
    metrics: &[&str],
    metric_type: Option<MetricType>,
) -> Result<Option<MetricScalarMap>> {
    let mut params = graph_params([("metric", join_fields(metrics))]);
    if let Some(metric_type) = metric_type {
        params.insert("metric_type".into(), metric_type.to_string());
    }

    let response = send_single(ctx, &GraphRequest::get(insights_path(story_id), params)).await?;
    if response.is_error() {
        warn_provider_error(&response, "Story insights");
        return Ok(None);
    }

    Ok(Some(ScalarReducer::Lifetime.reduce(response.decoded_body())))
}

/// Tap/swipe navigation counts of one story.
///
/// `None` on provider error, an empty breakdown when the story has no data.
pub async fn get_instagram_story_navigation_insights(
    ctx: &GraphContext,
    story_id: &str,
) -> Result<Option<MetricBreakdown>> {
    let params = graph_params([
        ("metric", NAVIGATION_METRIC),
        ("breakdown", NAVIGATION_BREAKDOWN),
    ]);

    let response = send_single(ctx, &GraphRequest::get(insights_path(story_id), params)).await?;
    if response.is_error() {
        warn_provider_error(&response, "Story navigation insights");
        return Ok(None);
    }

    Ok(Some(reduce_breakdown(response.decoded_body(), NAVIGATION_BREAKDOWN)))
}
