//! Find nodes tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};
use crate::tools::required_arg;

/// Tool for opening specific nodes by their names
pub struct FindNodesTool {
    kb: Arc<KnowledgeBase>,
}

impl FindNodesTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for FindNodesTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "find_nodes",
            "Open specific nodes in the knowledge graph by their names",
            json!({
                "type": "object",
                "properties": {
                    "names": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "An array of entity names to retrieve"
                    }
                },
                "required": ["names"]
            }),
        )
    }

    async fn execute(&self, params: Value) -> StoreResult<Value> {
        let names: Vec<String> = required_arg(&params, "names")?;
        let graph = self.kb.find_nodes(names).await?;
        json_content(&graph)
    }
}
