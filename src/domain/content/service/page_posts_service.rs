use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::client::{graph_params, GraphNode, GraphRequest};
use crate::domain::common::service::{send_single, warn_provider_error, GraphContext};
use crate::domain::content::service::start_of_yesterday;

pub const DEFAULT_PAGE_POSTS_LIMIT: u32 = 100;

const PAGE_POST_FIELDS: &str = "id,created_time,updated_time,attachments,message";

/// Posts published on a page between `since` (default: start of yesterday) and
/// `until` (default: now).
///
/// An unreadable or rejected reply yields no posts; only transport failures are `Err`.
pub async fn get_page_posts(
    ctx: &GraphContext,
    page_id: &str,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    limit: u32,
) -> Result<Vec<GraphNode>> {
    let since = since.unwrap_or_else(start_of_yesterday);
    let until = until.unwrap_or_else(Utc::now);

    let params = graph_params([
        ("since", since.timestamp().to_string()),
        ("until", until.timestamp().to_string()),
        ("limit", limit.to_string()),
        ("fields", PAGE_POST_FIELDS.to_string()),
    ]);

    let response = send_single(ctx, &GraphRequest::get(format!("/{}/posts", page_id), params)).await?;
    if response.is_error() {
        warn_provider_error(&response, "Page posts");
        return Ok(Vec::new());
    }

    match ctx.client().graph_edge(&response) {
        Ok(edge) => {
            debug!("Page {} returned {} post(s)", page_id, edge.items().len());
            Ok(edge.into_items())
        }
        Err(err) => {
            warn!("Page posts reply unreadable: {}", err);
            Ok(Vec::new())
        }
    }
}
