//! Content listings and node lookups: page posts, media, stories, comments.

pub mod media_service;
pub mod page_posts_service;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

/// Default lower bound of listing windows: 00:00 UTC of the previous day.
pub(crate) fn start_of_yesterday() -> DateTime<Utc> {
    let now = Utc::now();
    (now.date_naive() - Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now - Duration::days(1))
}

/// The body as a JSON object, empty for anything else.
pub(crate) fn into_object(body: Option<Value>) -> Map<String, Value> {
    match body {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
