//! Delete entities tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::StoreResult;
use crate::knowledge_base::KnowledgeBase;
use crate::protocol::{json_content, McpTool, Tool};
use crate::tools::{required_arg, success};

/// Tool for deleting entities together with their relations
pub struct DeleteEntitiesTool {
    kb: Arc<KnowledgeBase>,
}

impl DeleteEntitiesTool {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for DeleteEntitiesTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "delete_entities",
            "Delete multiple entities and their associated relations from the knowledge graph",
            json!({
                "type": "object",
                "properties": {
                    "entityNames": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "An array of entity names to delete"
                    }
                },
                "required": ["entityNames"]
            }),
        )
    }

    async fn execute(&self, params: Value) -> StoreResult<Value> {
        let names: Vec<String> = required_arg(&params, "entityNames")?;
        self.kb.delete_entities(names).await?;
        json_content(&success("Entities deleted successfully"))
    }
}
