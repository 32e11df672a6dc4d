//! Search nodes tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};
use crate::tools::required_arg;

/// Tool for full-text search over the knowledge graph
pub struct SearchNodesTool {
    kb: Arc<KnowledgeBase>,
}

impl SearchNodesTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for SearchNodesTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "search_nodes",
            "Search for nodes in the knowledge graph based on a query. \
             Returns matching entities, their direct neighbours and the relations between them.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Full-text query matched against entity names, types, and observations"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn execute(&self, params: Value) -> StoreResult<Value> {
        let query: String = required_arg(&params, "query")?;
        let graph = self.kb.search_nodes(&query).await?;
        json_content(&graph)
    }
}
