//! Memory tools
//!
//! The nine knowledge graph operations exposed as MCP tools.

mod add_observations;
mod create_entities;
mod create_relations;
mod delete_entities;
mod delete_observations;
mod delete_relations;
mod find_nodes;
mod read_graph;
mod search_nodes;

pub use add_observations::AddObservationsTool;
pub use create_entities::CreateEntitiesTool;
pub use create_relations::CreateRelationsTool;
pub use delete_entities::DeleteEntitiesTool;
pub use delete_observations::DeleteObservationsTool;
pub use delete_relations::DeleteRelationsTool;
pub use find_nodes::FindNodesTool;
pub use read_graph::ReadGraphTool;
pub use search_nodes::SearchNodesTool;
