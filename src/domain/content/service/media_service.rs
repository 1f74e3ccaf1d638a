use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::client::{graph_params, join_fields, GraphNode, GraphRequest};
use crate::domain::common::model::BatchKeyedResult;
use crate::domain::common::service::{
    dispatch_keyed, ok_body, send_single, warn_provider_error, GraphContext,
};
use crate::domain::content::service::{into_object, start_of_yesterday};

/// Media `timestamp` format, e.g. `2018-04-03T03:38:30+0000`.
const MEDIA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Ids of a user's media published within `[since, until]`, walking every page.
///
/// Defaults: `since` is the start of yesterday, `until` is now. Media with an
/// unreadable timestamp are skipped.
pub async fn get_user_medias(
    ctx: &GraphContext,
    user_id: &str,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> Result<Vec<String>> {
    let since = since.unwrap_or_else(start_of_yesterday);
    let until = until.unwrap_or_else(Utc::now);

    let request = GraphRequest::get(format!("/{}/media", user_id), graph_params([("fields", "timestamp")]));
    let response = send_single(ctx, &request).await?;
    if response.is_error() {
        warn_provider_error(&response, "User media");
        return Ok(Vec::new());
    }

    let mut page = match ctx.client().graph_edge(&response) {
        Ok(edge) => Some(edge),
        Err(err) => {
            warn!("User media reply unreadable: {}", err);
            None
        }
    };

    let mut ids = Vec::new();
    let mut pages = 0usize;
    while let Some(edge) = page {
        pages += 1;
        ids.extend(
            edge.items()
                .iter()
                .filter(|media| published_within(media, since, until))
                .filter_map(|media| media.field_str("id").map(str::to_string)),
        );
        page = ctx.client().next_page(&edge).await?;
    }

    debug!("User {}: {} media in range across {} page(s)", user_id, ids.len(), pages);
    Ok(ids)
}

fn published_within(media: &GraphNode, since: DateTime<Utc>, until: DateTime<Utc>) -> bool {
    media
        .field_str("timestamp")
        .and_then(|raw| DateTime::parse_from_str(raw, MEDIA_TIMESTAMP_FORMAT).ok())
        .map(|published| published.with_timezone(&Utc))
        .is_some_and(|published| published >= since && published <= until)
}

/// Requested fields of many media objects, keyed by media id. Failed lookups map to `{}`.
pub async fn get_batch_media_basic_data(
    ctx: &GraphContext,
    media_ids: &[&str],
    fields: &[&str],
) -> Result<BatchKeyedResult<Map<String, Value>>> {
    let fields = join_fields(fields);
    let requests = media_ids
        .iter()
        .map(|media_id| {
            let params = graph_params([("fields", fields.as_str())]);
            (media_id.to_string(), GraphRequest::get(format!("/{}", media_id), params))
        })
        .collect();

    dispatch_keyed(ctx, requests, |body| into_object(body.cloned())).await
}

/// Arbitrary fields of one node; `{}` when the lookup fails.
pub async fn get_instagram_graph_node_metadata(
    ctx: &GraphContext,
    node_id: &str,
    fields: &[&str],
) -> Result<Map<String, Value>> {
    let params = graph_params([("fields", join_fields(fields))]);
    let response = send_single(ctx, &GraphRequest::get(format!("/{}", node_id), params)).await?;

    Ok(into_object(ok_body(response, "Node metadata")))
}

pub async fn get_media_comment(
    ctx: &GraphContext,
    comment_id: &str,
    fields: &[&str],
) -> Result<Map<String, Value>> {
    let params = graph_params([("fields", join_fields(fields))]);
    let response = send_single(ctx, &GraphRequest::get(format!("/{}", comment_id), params)).await?;

    Ok(into_object(ok_body(response, "Media comment")))
}

/// Current stories of a user (`data` of the reply), `None` when the provider rejects the call.
pub async fn get_instagram_user_stories(
    ctx: &GraphContext,
    user_id: &str,
    fields: &[&str],
) -> Result<Option<Vec<Value>>> {
    let params = graph_params([("fields", join_fields(fields))]);
    let response = send_single(ctx, &GraphRequest::get(format!("/{}/stories", user_id), params)).await?;

    if response.is_error() {
        warn_provider_error(&response, "User stories");
        return Ok(None);
    }

    let stories = response
        .into_decoded_body()
        .and_then(|mut body| body.get_mut("data").map(Value::take))
        .and_then(|data| match data {
            Value::Array(items) => Some(items),
            _ => None,
        })
        .unwrap_or_default();

    Ok(Some(stories))
}
