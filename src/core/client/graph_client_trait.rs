use anyhow::Result;
use async_trait::async_trait;

use crate::core::client::graph_types::{GraphEdge, GraphRequest, GraphResponse};

/// The wrapped Graph API client.
///
/// `Err` means the call itself failed (network, auth, envelope decoding).
/// Provider-reported errors come back as `Ok` responses whose `is_error()` is true.
#[async_trait]
pub trait GraphClientTrait: Send + Sync {
    /// Sets the token attached to every subsequent request.
    fn set_default_access_token(&self, token: &str) -> Result<()>;

    async fn send_request(&self, request: &GraphRequest) -> Result<GraphResponse>;

    /// Sends `requests` as one batch call.
    /// Responses come back in submission order; callers re-associate keys by position.
    async fn send_batch_request(&self, requests: &[GraphRequest]) -> Result<Vec<GraphResponse>>;

    fn graph_edge(&self, response: &GraphResponse) -> Result<GraphEdge> {
        GraphEdge::from_response(response)
    }

    /// Fetches the page after `edge`, `None` once the collection is exhausted
    /// or the next page carries no readable `data`.
    async fn next_page(&self, edge: &GraphEdge) -> Result<Option<GraphEdge>>;
}
