use http::Method;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::core::client::graph_types::{GraphParams, GraphRequest, GraphResponse};

/// One member of the `batch` form field.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOperation {
    pub method: String,
    pub relative_url: String,
    pub body: Option<String>,
}

impl BatchOperation {
    pub fn from_request(request: &GraphRequest, graph_version: &str) -> Self {
        let path = format!("{}/{}", graph_version, request.path.trim_start_matches('/'));
        let encoded = encode_params(&request.params);

        // POST members carry their params as a form body, the rest as a query string.
        if request.method == Method::POST {
            Self {
                method: request.method.to_string(),
                relative_url: path,
                body: (!encoded.is_empty()).then_some(encoded),
            }
        } else {
            let relative_url = if encoded.is_empty() {
                path
            } else {
                format!("{}?{}", path, encoded)
            };
            Self {
                method: request.method.to_string(),
                relative_url,
                body: None,
            }
        }
    }
}

/// One entry of the batch reply. The provider sends `null` for members it did not run.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchItemResponse {
    pub code: u16,
    #[serde(default)]
    pub body: Option<String>,
}

impl BatchItemResponse {
    pub fn into_graph_response(self) -> GraphResponse {
        let body = self
            .body
            .and_then(|raw| serde_json::from_str(&raw).ok());
        GraphResponse::new(self.code, body)
    }
}

pub fn encode_params(params: &GraphParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
