use std::sync::Arc;

use crate::core::client::GraphClientTrait;
use crate::core::config::graph_config::{GraphConfig, MAX_BATCH_OPERATIONS, MAX_SPAN_DAYS};

/// Provider limits the partitioner and dispatcher honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchLimits {
    pub batch_limit: usize,
    pub max_span_days: i64,
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            batch_limit: MAX_BATCH_OPERATIONS,
            max_span_days: MAX_SPAN_DAYS,
        }
    }
}

impl From<&GraphConfig> for DispatchLimits {
    fn from(config: &GraphConfig) -> Self {
        Self {
            batch_limit: config.batch_limit,
            max_span_days: config.max_span_days,
        }
    }
}

/// Injected client plus limits, handed to every domain service.
#[derive(Clone)]
pub struct GraphContext {
    client: Arc<dyn GraphClientTrait>,
    limits: DispatchLimits,
}

impl GraphContext {
    pub fn new(client: Arc<dyn GraphClientTrait>, limits: DispatchLimits) -> Self {
        Self { client, limits }
    }

    pub fn client(&self) -> &dyn GraphClientTrait {
        self.client.as_ref()
    }

    pub fn limits(&self) -> DispatchLimits {
        self.limits
    }
}
