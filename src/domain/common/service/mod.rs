//! Shared domain services: range partitioning, dispatch context and keyed batching

pub mod dispatcher;
pub mod graph_context;
pub mod range_partitioner;

pub use dispatcher::{
    dispatch_intervals, dispatch_keyed, ok_body, send_keyed_batch, send_single, warn_provider_error,
};
pub use graph_context::{DispatchLimits, GraphContext};
pub use range_partitioner::{chunk_for_batch, partition};
