use std::env;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::errors::AppError;

pub const DEFAULT_GRAPH_VERSION: &str = "v14.0";
pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider cap on operations per batch call.
pub const MAX_BATCH_OPERATIONS: usize = 50;

/// Provider cap on the span of one insights query window.
pub const MAX_SPAN_DAYS: i64 = 30;

/// Settings for the Graph API adapter.
///
/// Built explicitly by the caller or loaded once through [`GraphConfig::from_env`];
/// nothing below this struct reads the process environment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GraphConfig {
    #[validate(length(min = 1))]
    pub app_id: String,

    #[validate(length(min = 1))]
    pub app_secret: String,

    #[validate(length(min = 1))]
    pub default_graph_version: String,

    #[validate(length(min = 1))]
    pub base_url: String,

    #[validate(range(min = 1))]
    pub timeout_secs: u64,

    #[validate(range(min = 1, max = 50))]
    pub batch_limit: usize,

    #[validate(range(min = 1))]
    pub max_span_days: i64,
}

impl GraphConfig {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            default_graph_version: DEFAULT_GRAPH_VERSION.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            batch_limit: MAX_BATCH_OPERATIONS,
            max_span_days: MAX_SPAN_DAYS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_graph_version(mut self, version: impl Into<String>) -> Self {
        self.default_graph_version = version.into();
        self
    }

    /// Loads configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let app_id = env::var("FACEBOOK_APP_ID")
            .map_err(|_| AppError::Config("FACEBOOK_APP_ID is not set".into()))?;
        let app_secret = env::var("FACEBOOK_APP_SECRET")
            .map_err(|_| AppError::Config("FACEBOOK_APP_SECRET is not set".into()))?;

        let mut config = Self::new(app_id, app_secret);

        if let Ok(version) = env::var("FACEBOOK_GRAPH_VERSION") {
            config.default_graph_version = version;
        }
        if let Ok(base_url) = env::var("FACEBOOK_GRAPH_BASE_URL") {
            config.base_url = base_url;
        }

        config.validate().map_err(AppError::from)?;

        debug!(
            "Loaded Graph config (version={}, base_url={})",
            config.default_graph_version, config.base_url
        );
        Ok(config)
    }
}
