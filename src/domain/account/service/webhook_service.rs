use anyhow::Result;
use http::Method;
use serde_json::Value;

use crate::core::client::{graph_params, GraphParams, GraphRequest};
use crate::domain::common::service::{ok_body, send_single, GraphContext};

/// `subscribed_apps` requires at least one field; `email` is the one the app
/// subscribes to so that story insight events get delivered.
const WEBHOOK_FIELDS: &str = "email";

fn subscribed_apps_path(page_id: &str) -> String {
    format!("/{}/subscribed_apps", page_id)
}

pub async fn subscribe_to_webhook(ctx: &GraphContext, page_id: &str) -> Result<Option<Value>> {
    let request = GraphRequest::new(
        Method::POST,
        subscribed_apps_path(page_id),
        graph_params([("subscribed_fields", WEBHOOK_FIELDS)]),
    );
    let response = send_single(ctx, &request).await?;

    Ok(ok_body(response, "Webhook subscribe"))
}

pub async fn unsubscribe_from_webhook(ctx: &GraphContext, page_id: &str) -> Result<Option<Value>> {
    let request = GraphRequest::new(Method::DELETE, subscribed_apps_path(page_id), GraphParams::new());
    let response = send_single(ctx, &request).await?;

    Ok(ok_body(response, "Webhook unsubscribe"))
}
