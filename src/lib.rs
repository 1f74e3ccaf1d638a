//! Graph API insights adapter.
//!
//! Splits date ranges and id lists into the provider's legal request sizes,
//! dispatches them as single or batch calls, and folds the replies back into
//! flat metric maps. [`GraphAdapter`] is the entry point.

pub mod core;
pub mod domain;
pub mod errors;
pub mod graph_adapter;

pub use crate::core::client::{GraphClientTrait, GraphHttpClient};
pub use crate::core::config::GraphConfig;
pub use crate::core::logging::init_tracing;
pub use crate::domain::common::model::{
    BatchKeyedResult, BreakdownResult, InsightsPeriod, MetricBreakdown, MetricScalarMap,
    MetricSeries, MetricSeriesMap, MetricType, TimeRange,
};
pub use crate::domain::common::service::DispatchLimits;
pub use errors::AppError;
pub use graph_adapter::GraphAdapter;
