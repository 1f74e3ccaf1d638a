use std::collections::BTreeMap;

use anyhow::Result;
use http::Method;
use serde_json::{Map, Value};

use crate::errors::AppError;

pub type GraphParams = BTreeMap<String, String>;

/// One logical Graph API call, usable on its own or as a batch member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphRequest {
    pub method: Method,
    pub path: String,
    pub params: GraphParams,
}

impl GraphRequest {
    pub fn new(method: Method, path: impl Into<String>, params: GraphParams) -> Self {
        Self {
            method,
            path: path.into(),
            params,
        }
    }

    pub fn get(path: impl Into<String>, params: GraphParams) -> Self {
        Self::new(Method::GET, path, params)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Builds a [`GraphParams`] map from literal pairs.
pub fn graph_params<K, V, I>(pairs: I) -> GraphParams
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Comma-joins metric or field names the way list parameters are sent.
pub fn join_fields(names: &[&str]) -> String {
    names.join(",")
}

/// Status plus decoded JSON body of one Graph API call.
///
/// A batch item the provider answered with `null` is represented with status 0
/// and no body, which reads as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphResponse {
    status: u16,
    body: Option<Value>,
}

impl GraphResponse {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, Some(body))
    }

    pub fn missing() -> Self {
        Self::new(0, None)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_error(&self) -> bool {
        if !(200..300).contains(&self.status) {
            return true;
        }
        self.body
            .as_ref()
            .and_then(|b| b.get("error"))
            .is_some()
    }

    /// Decoded body, `None` when the provider sent nothing decodable (or `null`).
    pub fn decoded_body(&self) -> Option<&Value> {
        self.body.as_ref().filter(|b| !b.is_null())
    }

    pub fn into_decoded_body(self) -> Option<Value> {
        self.body.filter(|b| !b.is_null())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body
            .as_ref()?
            .get("error")?
            .get("message")?
            .as_str()
    }
}

/// A single object of a paginated edge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphNode {
    fields: Map<String, Value>,
}

impl GraphNode {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// One page of a paginated collection plus the opaque handle to the next one.
///
/// Only the client implementation looks at the cursor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphEdge {
    items: Vec<GraphNode>,
    next: Option<String>,
}

impl GraphEdge {
    pub fn new(items: Vec<GraphNode>, next: Option<String>) -> Self {
        Self { items, next }
    }

    /// Reads `data` and `paging.next` from a collection response.
    pub fn from_response(response: &GraphResponse) -> Result<Self> {
        let body = response
            .decoded_body()
            .ok_or_else(|| AppError::Decode("collection response has no body".into()))?;

        let data = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::Decode("collection response has no data array".into()))?;

        let items = data
            .iter()
            .filter_map(|item| item.as_object().cloned())
            .map(GraphNode::new)
            .collect();

        let next = body
            .get("paging")
            .and_then(|p| p.get("next"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self { items, next })
    }

    pub fn items(&self) -> &[GraphNode] {
        &self.items
    }

    pub fn into_items(self) -> Vec<GraphNode> {
        self.items
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

impl<'a> IntoIterator for &'a GraphEdge {
    type Item = &'a GraphNode;
    type IntoIter = std::slice::Iter<'a, GraphNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
