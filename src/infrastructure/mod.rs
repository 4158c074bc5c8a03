// Infrastructure layer - Configuration and the concrete record store
pub mod config;
pub mod json_store;
