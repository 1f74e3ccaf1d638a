use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::core::client::{GraphClientTrait, GraphHttpClient, GraphNode};
use crate::core::config::GraphConfig;
use crate::domain::account::service::{account_service, webhook_service};
use crate::domain::common::model::{
    BatchKeyedResult, InsightsPeriod, MetricBreakdown, MetricScalarMap, MetricSeriesMap,
    MetricType, TimeRange,
};
use crate::domain::common::service::{DispatchLimits, GraphContext};
use crate::domain::content::service::{media_service, page_posts_service};
use crate::domain::insights::service::{
    page_insights_service, post_insights_service, story_insights_service,
};

macro_rules! delegate_graph_operation {
    ($($(#[$meta:meta])* fn $name:ident($($arg:ident : $typ:ty),*) -> $ret:ty => $path:path;)+) => {
        $(
            $(#[$meta])*
            pub async fn $name(&self, $($arg: $typ),*) -> anyhow::Result<$ret> {
                $path(&self.ctx, $($arg),*).await
            }
        )+
    };
}

/// Caller-facing surface over one Graph API client.
///
/// Every operation runs its requests one after another on the injected client;
/// transport failures surface as `Err`, provider errors as empty or `None` results.
#[derive(Clone)]
pub struct GraphAdapter {
    ctx: GraphContext,
}

impl GraphAdapter {
    pub fn new(client: Arc<dyn GraphClientTrait>, limits: DispatchLimits) -> Self {
        Self {
            ctx: GraphContext::new(client, limits),
        }
    }

    /// Builds the HTTP client from `config` and takes the dispatch limits from it.
    pub fn from_config(config: GraphConfig) -> Result<Self> {
        let limits = DispatchLimits::from(&config);
        let client = GraphHttpClient::new(config)?;
        Ok(Self::new(Arc::new(client), limits))
    }

    pub fn context(&self) -> &GraphContext {
        &self.ctx
    }

    pub fn set_access_token(&self, token: &str) -> bool {
        account_service::set_access_token(&self.ctx, token)
    }

    delegate_graph_operation! {
        fn get_page_access_token(page_id: &str) -> Option<String> => account_service::get_page_access_token;
        fn get_me() -> Option<Value> => account_service::get_me;
        fn get_accounts() -> Option<Value> => account_service::get_accounts;
        fn get_ad_accounts(after: Option<&str>) -> Option<Value> => account_service::get_ad_accounts;
        fn get_token_scopes(input_token: &str) -> Option<Value> => account_service::get_token_scopes;
        fn subscribe_to_webhook(page_id: &str) -> Option<Value> => webhook_service::subscribe_to_webhook;
        fn unsubscribe_from_webhook(page_id: &str) -> Option<Value> => webhook_service::unsubscribe_from_webhook;
    }

    delegate_graph_operation! {
        /// Series per metric, partitioned into legal windows and merged back together.
        fn get_page_insights_metrics_data(page_id: &str, metrics: &[&str], range: Option<TimeRange>, period: Option<InsightsPeriod>) -> MetricSeriesMap => page_insights_service::get_page_insights_metrics_data;
        fn get_page_insights_audience_data(page_id: &str, metric: &str, breakdown: &str) -> MetricBreakdown => page_insights_service::get_page_insights_audience_data;
        fn get_page_insights_for_total_value_metrics(page_id: &str, metrics: &[&str], period: InsightsPeriod, range: TimeRange) -> MetricScalarMap => page_insights_service::get_page_insights_for_total_value_metrics;
        /// Keyed by each bucket's `since` in unix seconds.
        fn get_page_insights_batch_total_value_metrics(page_id: &str, metrics: &[&str], period: InsightsPeriod, buckets: &[TimeRange]) -> BatchKeyedResult<MetricScalarMap> => page_insights_service::get_page_insights_batch_total_value_metrics;
        fn get_page_post_graph_metrics_data(page_id: &str, post_id: &str, metrics: &[&str]) -> MetricScalarMap => post_insights_service::get_page_post_graph_metrics_data;
        fn get_page_batch_posts_graph_metrics_data(post_ids: &[&str], metrics: &[&str]) -> BatchKeyedResult<MetricScalarMap> => post_insights_service::get_page_batch_posts_graph_metrics_data;
        fn get_page_post_insights_metric_data(page_id: &str, post_id: &str, metrics: &[&str]) -> MetricScalarMap => post_insights_service::get_page_post_insights_metric_data;
        fn get_page_batch_posts_insights_metric_data(post_ids: &[&str], metrics: &[&str], metric_type: Option<MetricType>) -> BatchKeyedResult<MetricScalarMap> => post_insights_service::get_page_batch_posts_insights_metric_data;
        fn get_instagram_story_insights(story_id: &str, metrics: &[&str], metric_type: Option<MetricType>) -> Option<MetricScalarMap> => story_insights_service::get_instagram_story_insights;
        fn get_instagram_story_navigation_insights(story_id: &str) -> Option<MetricBreakdown> => story_insights_service::get_instagram_story_navigation_insights;
    }

    delegate_graph_operation! {
        fn get_page_posts(page_id: &str, since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>, limit: u32) -> Vec<GraphNode> => page_posts_service::get_page_posts;
        fn get_user_medias(user_id: &str, since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Vec<String> => media_service::get_user_medias;
        fn get_batch_media_basic_data(media_ids: &[&str], fields: &[&str]) -> BatchKeyedResult<Map<String, Value>> => media_service::get_batch_media_basic_data;
        fn get_instagram_graph_node_metadata(node_id: &str, fields: &[&str]) -> Map<String, Value> => media_service::get_instagram_graph_node_metadata;
        fn get_instagram_user_stories(user_id: &str, fields: &[&str]) -> Option<Vec<Value>> => media_service::get_instagram_user_stories;
        fn get_media_comment(comment_id: &str, fields: &[&str]) -> Map<String, Value> => media_service::get_media_comment;
    }
}
