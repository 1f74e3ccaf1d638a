// Graph API transport
pub mod graph_batch_dto;
pub mod graph_client_trait;
pub mod graph_http_client;
pub mod graph_types;

#[cfg(test)]
pub mod mock_graph_client;

pub use graph_client_trait::GraphClientTrait;
pub use graph_http_client::GraphHttpClient;
pub use graph_types::{
    graph_params, join_fields, GraphEdge, GraphNode, GraphParams, GraphRequest, GraphResponse,
};
