//! Insights operations: page, post and story metrics.

pub mod page_insights_service;
pub mod post_insights_service;
pub mod story_insights_service;

use chrono::Utc;

pub(crate) fn insights_path(object_id: &str) -> String {
    format!("/{}/insights", object_id)
}

/// `until` value for "up to now" queries, in unix seconds.
pub(crate) fn now_param() -> String {
    Utc::now().timestamp().to_string()
}
