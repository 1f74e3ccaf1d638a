use std::sync::RwLock;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use http::Method;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use validator::Validate;

use crate::core::client::graph_batch_dto::{BatchItemResponse, BatchOperation};
use crate::core::client::graph_client_trait::GraphClientTrait;
use crate::core::client::graph_types::{GraphEdge, GraphParams, GraphRequest, GraphResponse};
use crate::core::config::GraphConfig;
use crate::errors::{transport_error, AppError};

/// `reqwest`-backed Graph API client.
pub struct GraphHttpClient {
    http: Client,
    config: GraphConfig,
    access_token: RwLock<Option<String>>,
}

impl GraphHttpClient {
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate().map_err(AppError::from)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        debug!(
            "Graph HTTP client initialized (base_url={}, version={})",
            config.base_url, config.default_graph_version
        );

        Ok(Self {
            http,
            config,
            access_token: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let version = &self.config.default_graph_version;
        let path = path.trim_start_matches('/');

        if path.is_empty() {
            format!("{}/{}", base, version)
        } else {
            format!("{}/{}/{}", base, version, path)
        }
    }

    fn current_token(&self) -> Result<Option<String>> {
        self.access_token
            .read()
            .map(|token| token.clone())
            .map_err(|_| anyhow!("access token lock poisoned"))
    }

    /// Copies `params`, adding the default token unless the caller set one.
    fn with_token(&self, params: &GraphParams) -> Result<GraphParams> {
        let mut params = params.clone();
        if !params.contains_key("access_token") {
            if let Some(token) = self.current_token()? {
                params.insert("access_token".into(), token);
            }
        }
        Ok(params)
    }

    async fn read_response(resp: reqwest::Response) -> Result<GraphResponse> {
        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(AppError::from)?;
        let body = serde_json::from_str::<Value>(&text).ok();

        Ok(GraphResponse::new(status, body))
    }
}

#[async_trait]
impl GraphClientTrait for GraphHttpClient {
    fn set_default_access_token(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(AppError::InvalidInput("access token is empty".into()).into());
        }

        let mut slot = self
            .access_token
            .write()
            .map_err(|_| anyhow!("access token lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    async fn send_request(&self, request: &GraphRequest) -> Result<GraphResponse> {
        let params = self.with_token(&request.params)?;
        let url = self.endpoint(&request.path);

        debug!("Graph {} {}", request.method, request.path);

        let builder = self.http.request(request.method.clone(), &url);
        let builder = if request.method == Method::POST {
            builder.form(&params)
        } else {
            builder.query(&params)
        };

        let resp = builder.send().await.map_err(transport_error)?;
        Self::read_response(resp).await
    }

    async fn send_batch_request(&self, requests: &[GraphRequest]) -> Result<Vec<GraphResponse>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let version = &self.config.default_graph_version;
        let operations: Vec<BatchOperation> = requests
            .iter()
            .map(|r| BatchOperation::from_request(r, version))
            .collect();

        let mut form = self.with_token(&GraphParams::new())?;
        form.insert("batch".into(), serde_json::to_string(&operations)?);
        form.insert("include_headers".into(), "false".into());

        debug!("Graph batch with {} operation(s)", operations.len());

        let resp = self
            .http
            .post(self.endpoint(""))
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::read_response(resp).await?;

        if response.is_error() {
            return Err(AppError::GraphApi {
                status: response.status(),
                message: response
                    .error_message()
                    .unwrap_or("batch request failed")
                    .to_string(),
            }
            .into());
        }

        let items: Vec<Option<BatchItemResponse>> =
            serde_json::from_value(response.into_decoded_body().unwrap_or(Value::Null))
                .map_err(|e| AppError::Decode(format!("batch response: {}", e)))?;

        if items.len() != requests.len() {
            warn!(
                "Graph batch returned {} item(s) for {} operation(s)",
                items.len(),
                requests.len()
            );
        }

        Ok(items
            .into_iter()
            .map(|item| {
                item.map(BatchItemResponse::into_graph_response)
                    .unwrap_or_else(GraphResponse::missing)
            })
            .collect())
    }

    async fn next_page(&self, edge: &GraphEdge) -> Result<Option<GraphEdge>> {
        let Some(next) = edge.next_cursor() else {
            return Ok(None);
        };

        let resp = self.http.get(next).send().await.map_err(transport_error)?;
        let response = Self::read_response(resp).await?;

        if response.is_error() {
            warn!(
                "Stopping pagination, provider error: {}",
                response.error_message().unwrap_or("unknown")
            );
            return Ok(None);
        }

        match GraphEdge::from_response(&response) {
            Ok(edge) => Ok(Some(edge)),
            Err(err) => {
                warn!("Stopping pagination, unreadable page: {}", err);
                Ok(None)
            }
        }
    }
}
