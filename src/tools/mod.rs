//! MCP Tools implementation
//!
//! The nine knowledge graph tools, one struct per tool, all sharing a single
//! `KnowledgeBase`.

pub mod memory;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{StoreError, StoreResult};
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::Tool;
use crate::server::McpServer;

// Re-export all tools for convenience
pub use memory::{
    AddObservationsTool, CreateEntitiesTool, CreateRelationsTool, DeleteEntitiesTool,
    DeleteObservationsTool, DeleteRelationsTool, FindNodesTool, ReadGraphTool, SearchNodesTool,
};

/// Every tool, bound to the given knowledge base
pub fn all_tools(kb: Arc<KnowledgeBase>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(CreateEntitiesTool::new(kb.clone())),
        Arc::new(CreateRelationsTool::new(kb.clone())),
        Arc::new(AddObservationsTool::new(kb.clone())),
        Arc::new(DeleteEntitiesTool::new(kb.clone())),
        Arc::new(DeleteObservationsTool::new(kb.clone())),
        Arc::new(DeleteRelationsTool::new(kb.clone())),
        Arc::new(ReadGraphTool::new(kb.clone())),
        Arc::new(SearchNodesTool::new(kb.clone())),
        Arc::new(FindNodesTool::new(kb)),
    ]
}

/// Register all tools with the MCP server
pub fn register_all_tools(server: &mut McpServer, kb: Arc<KnowledgeBase>) {
    for tool in all_tools(kb) {
        server.register_tool(tool);
    }
}

/// Deserialize a required argument from a tool call
pub(crate) fn required_arg<T: DeserializeOwned>(params: &Value, key: &str) -> StoreResult<T> {
    let value = params
        .get(key)
        .ok_or_else(|| StoreError::validation(format!("missing required argument '{}'", key)))?;
    serde_json::from_value(value.clone())
        .map_err(|e| StoreError::validation(format!("invalid argument '{}': {}", key, e)))
}

/// Acknowledgement returned by the delete tools
pub(crate) fn success(message: &str) -> Value {
    json!({
        "status": "success",
        "message": message
    })
}
