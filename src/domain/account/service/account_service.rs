use anyhow::Result;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::client::{graph_params, join_fields, GraphParams, GraphRequest};
use crate::domain::common::service::{ok_body, send_single, GraphContext};

const ACCOUNT_FIELDS: [&str; 2] = ["instagram_business_account", "access_token"];
const AD_ACCOUNT_FIELDS: [&str; 3] = [
    "account_id",
    "currency",
    "promote_pages{id,instagram_business_account}",
];

/// Installs the token sent with every later call. Never fails: `false` means it was not set.
pub fn set_access_token(ctx: &GraphContext, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }

    match ctx.client().set_default_access_token(token) {
        Ok(()) => {
            debug!("Default access token updated");
            true
        }
        Err(err) => {
            warn!("Failed to set access token: {}", err);
            false
        }
    }
}

pub async fn get_page_access_token(ctx: &GraphContext, page_id: &str) -> Result<Option<String>> {
    let params = graph_params([("fields", "access_token")]);
    let response = send_single(ctx, &GraphRequest::get(format!("/{}", page_id), params)).await?;

    Ok(ok_body(response, "Page access token").and_then(|body| {
        body.get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
    }))
}

pub async fn get_me(ctx: &GraphContext) -> Result<Option<Value>> {
    fetch(ctx, "/me", GraphParams::new(), "Me").await
}

/// Pages the token can manage, with their linked Instagram business account.
pub async fn get_accounts(ctx: &GraphContext) -> Result<Option<Value>> {
    let params = graph_params([("fields", join_fields(&ACCOUNT_FIELDS))]);
    fetch(ctx, "/me/accounts", params, "Accounts").await
}

/// One page of ad accounts; pass the previous page's `after` cursor to continue.
pub async fn get_ad_accounts(ctx: &GraphContext, after: Option<&str>) -> Result<Option<Value>> {
    let mut params = graph_params([("fields", join_fields(&AD_ACCOUNT_FIELDS))]);
    if let Some(after) = after.filter(|a| !a.is_empty()) {
        params.insert("after".into(), after.to_string());
    }
    fetch(ctx, "/me/adaccounts", params, "Ad accounts").await
}

pub async fn get_token_scopes(ctx: &GraphContext, input_token: &str) -> Result<Option<Value>> {
    let params = graph_params([("fields", "scopes"), ("input_token", input_token)]);
    fetch(ctx, "/debug_token", params, "Token scopes").await
}

async fn fetch(ctx: &GraphContext, path: &str, params: GraphParams, what: &str) -> Result<Option<Value>> {
    let response = send_single(ctx, &GraphRequest::get(path, params)).await?;
    Ok(ok_body(response, what))
}
