pub mod graph_config;

pub use graph_config::GraphConfig;
