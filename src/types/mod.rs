//! Data types for the Neo4j Memory server
//!
//! This module contains the records exchanged between the transports and the store.

mod entity;
mod graph;
mod observation;
mod relation;

pub use entity::Entity;
pub use graph::KnowledgeGraph;
pub use observation::{AddedObservations, ObservationAddition, ObservationDeletion};
pub use relation::Relation;

/// Result type for transport-level MCP operations
pub type McpResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
