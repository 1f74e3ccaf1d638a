use anyhow::Result;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::client::{GraphParams, GraphRequest, GraphResponse};
use crate::domain::common::model::{BatchKeyedResult, TimeRange};
use crate::domain::common::service::graph_context::GraphContext;
use crate::domain::common::service::range_partitioner::{chunk_for_batch, partition};

/// One network call. Transport failures are `Err`; provider errors come back as a response.
pub async fn send_single(ctx: &GraphContext, request: &GraphRequest) -> Result<GraphResponse> {
    debug!("Dispatching {} {}", request.method, request.path);
    ctx.client().send_request(request).await
}

pub fn warn_provider_error(response: &GraphResponse, what: &str) {
    warn!(
        "{} failed ({}): {}",
        what,
        response.status(),
        response.error_message().unwrap_or("no body")
    );
}

/// Decoded body of a successful response, `None` (logged) for provider errors.
pub fn ok_body(response: GraphResponse, what: &str) -> Option<Value> {
    if response.is_error() {
        warn_provider_error(&response, what);
        return None;
    }
    response.into_decoded_body()
}

/// Sends keyed requests as batch calls of at most `batch_limit` members.
///
/// Returns one entry per input key, in input order. Keys are matched to
/// responses by position; a key the provider sent no response for gets `None`.
pub async fn send_keyed_batch(
    ctx: &GraphContext,
    requests: Vec<(String, GraphRequest)>,
) -> Result<Vec<(String, Option<GraphResponse>)>> {
    let mut out = Vec::with_capacity(requests.len());

    for chunk in chunk_for_batch(&requests, ctx.limits().batch_limit) {
        let (keys, members): (Vec<String>, Vec<GraphRequest>) = chunk.into_iter().unzip();

        debug!("Dispatching batch of {} request(s)", members.len());
        let responses = ctx.client().send_batch_request(&members).await?;

        if responses.len() != keys.len() {
            warn!(
                "Batch answered {} of {} request(s); unmatched keys are left empty",
                responses.len(),
                keys.len()
            );
        }

        let mut responses = responses.into_iter();
        for key in keys {
            out.push((key, responses.next()));
        }
    }

    Ok(out)
}

/// Batch-dispatches `requests` and reduces each response under its key.
///
/// Provider errors and missing responses become `T::default()`; only a failed
/// batch call is an `Err`.
pub async fn dispatch_keyed<T, F>(
    ctx: &GraphContext,
    requests: Vec<(String, GraphRequest)>,
    reduce: F,
) -> Result<BatchKeyedResult<T>>
where
    T: Default,
    F: Fn(Option<&Value>) -> T,
{
    let mut result = BatchKeyedResult::new();

    for (key, response) in send_keyed_batch(ctx, requests).await? {
        let value = match response {
            Some(response) if !response.is_error() => reduce(response.decoded_body()),
            Some(response) => {
                warn_provider_error(&response, &format!("Batch item {}", key));
                T::default()
            }
            None => T::default(),
        };
        result.insert(key, value);
    }

    Ok(result)
}

/// Issues `path` once per partition window of `range`, with `since`/`until` set per window.
///
/// A single window goes out as a plain request; several go out as one keyed
/// batch (`{since}_{until}` keys). Responses come back in window order, with
/// missing batch items as [`GraphResponse::missing`].
pub async fn dispatch_intervals(
    ctx: &GraphContext,
    path: &str,
    params: &GraphParams,
    range: &TimeRange,
) -> Result<Vec<GraphResponse>> {
    let windows = partition(range, ctx.limits().max_span_days);

    let requests: Vec<(String, GraphRequest)> = windows
        .iter()
        .map(|window| {
            let mut params = params.clone();
            params.insert("since".into(), window.since().timestamp().to_string());
            params.insert("until".into(), window.until().timestamp().to_string());
            (window.bucket_key(), GraphRequest::get(path, params))
        })
        .collect();

    if let [(_, request)] = requests.as_slice() {
        return Ok(vec![send_single(ctx, request).await?]);
    }

    Ok(send_keyed_batch(ctx, requests)
        .await?
        .into_iter()
        .map(|(_, response)| response.unwrap_or_else(GraphResponse::missing))
        .collect())
}
