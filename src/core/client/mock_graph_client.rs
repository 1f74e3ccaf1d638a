//! Scripted `GraphClientTrait` double for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::core::client::graph_client_trait::GraphClientTrait;
use crate::core::client::graph_types::{GraphEdge, GraphRequest, GraphResponse};

type BatchResponder = Box<dyn Fn(&GraphRequest) -> GraphResponse + Send + Sync>;

#[derive(Default)]
pub struct MockGraphClient {
    pub token: Mutex<Option<String>>,
    pub requests: Mutex<Vec<GraphRequest>>,
    pub batches: Mutex<Vec<Vec<GraphRequest>>>,
    pub page_requests: Mutex<usize>,
    responses: Mutex<VecDeque<GraphResponse>>,
    batch_responses: Mutex<VecDeque<Vec<GraphResponse>>>,
    batch_responder: Option<BatchResponder>,
    pages: Mutex<VecDeque<GraphEdge>>,
    fail_with: Option<String>,
}

impl MockGraphClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as a transport error.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_response(self, response: GraphResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_batch(self, responses: Vec<GraphResponse>) -> Self {
        self.batch_responses.lock().unwrap().push_back(responses);
        self
    }

    /// Answers batch members one by one once the scripted batches run out.
    pub fn with_batch_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&GraphRequest) -> GraphResponse + Send + Sync + 'static,
    {
        self.batch_responder = Some(Box::new(responder));
        self
    }

    pub fn with_page(self, edge: GraphEdge) -> Self {
        self.pages.lock().unwrap().push_back(edge);
        self
    }

    pub fn recorded_requests(&self) -> Vec<GraphRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn recorded_batches(&self) -> Vec<Vec<GraphRequest>> {
        self.batches.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        match &self.fail_with {
            Some(message) => Err(crate::errors::transport_error(message).into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GraphClientTrait for MockGraphClient {
    fn set_default_access_token(&self, token: &str) -> Result<()> {
        self.check_failure()?;
        if token.is_empty() {
            return Err(anyhow!("empty token"));
        }
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn send_request(&self, request: &GraphRequest) -> Result<GraphResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.check_failure()?;

        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(GraphResponse::missing))
    }

    async fn send_batch_request(&self, requests: &[GraphRequest]) -> Result<Vec<GraphResponse>> {
        self.batches.lock().unwrap().push(requests.to_vec());
        self.check_failure()?;

        if let Some(scripted) = self.batch_responses.lock().unwrap().pop_front() {
            return Ok(scripted);
        }

        Ok(match &self.batch_responder {
            Some(responder) => requests.iter().map(|r| responder(r)).collect(),
            None => Vec::new(),
        })
    }

    async fn next_page(&self, edge: &GraphEdge) -> Result<Option<GraphEdge>> {
        *self.page_requests.lock().unwrap() += 1;
        self.check_failure()?;

        if edge.next_cursor().is_none() {
            return Ok(None);
        }
        Ok(self.pages.lock().unwrap().pop_front())
    }
}
